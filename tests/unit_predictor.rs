// Unit tests for the prediction service's response shape.
//
// Covers serde defaults, `null` handling, both suggestion encodings and
// confidence clamping, all without network access.

use toxiguard::predictor::traits::{AnalysisResult, Severity};

#[test]
fn deserialize_minimal_response() {
    let json = r#"{"toxic": false, "confidence": 0.12}"#;
    let result: AnalysisResult = serde_json::from_str(json).unwrap();
    assert!(!result.toxic);
    assert_eq!(result.severity, Severity::Low);
    assert!(result.abusive_words.is_empty());
    assert!(result.suggestions.is_empty());
    assert!(result.reason.is_none());
    assert!(result.source.is_none());
    assert!(result.sentiment.is_none());
}

#[test]
fn deserialize_full_backend_response() {
    // Shape returned by the reference backend, including fields we ignore
    let json = r#"{
        "toxic": true,
        "confidence": 0.95,
        "severity": "high",
        "reason": "Rules: True | ML prob: 0.81 | LLM: insult",
        "abusive_words": ["idiot"],
        "sentiment": {"polarity": -0.8, "subjectivity": 1.0, "label": "negative", "confidence": 0.8},
        "source": "hybrid",
        "rules": {"triggered": true},
        "ml": null,
        "llm": {},
        "word_frequency": {"idiot": 1},
        "suggestions": {"idiot": "Please express your opinion politely and respectfully."}
    }"#;
    let result: AnalysisResult = serde_json::from_str(json).unwrap();
    assert!(result.toxic);
    assert_eq!(result.severity, Severity::High);
    assert_eq!(result.abusive_words, vec!["idiot"]);
    assert_eq!(
        result.suggestions,
        vec!["Please express your opinion politely and respectfully."]
    );
    assert_eq!(result.source.as_deref(), Some("hybrid"));
    let sentiment = result.sentiment.unwrap();
    assert_eq!(sentiment.label, "negative");
    assert!((sentiment.polarity + 0.8).abs() < 1e-9);
}

#[test]
fn deserialize_suggestions_as_list() {
    let json = r#"{"toxic": true, "confidence": 0.7, "suggestions": ["Be kind.", "Rephrase."]}"#;
    let result: AnalysisResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.suggestions, vec!["Be kind.", "Rephrase."]);
}

#[test]
fn deserialize_nulls_as_defaults() {
    let json = r#"{
        "toxic": false,
        "confidence": 0.0,
        "severity": null,
        "abusive_words": null,
        "suggestions": null,
        "sentiment": null,
        "reason": null
    }"#;
    let result: AnalysisResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.severity, Severity::Low);
    assert!(result.abusive_words.is_empty());
    assert!(result.suggestions.is_empty());
    assert!(result.sentiment.is_none());
}

#[test]
fn deserialize_capitalized_severity() {
    let json = r#"{"toxic": true, "confidence": 0.9, "severity": "High"}"#;
    let result: AnalysisResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.severity, Severity::High);

    let json = r#"{"toxic": true, "confidence": 0.6, "severity": "MEDIUM"}"#;
    let result: AnalysisResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.severity, Severity::Medium);
}

#[test]
fn deserialize_unknown_severity_as_low_and_keeps_result() {
    let json = r#"{
        "toxic": true,
        "confidence": 0.9,
        "severity": "critical",
        "abusive_words": ["idiot"]
    }"#;
    let result: AnalysisResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.severity, Severity::Low);
    assert!(result.toxic);
    assert_eq!(result.abusive_words, vec!["idiot"]);
    assert_eq!(result.percent(), 90);
}

#[test]
fn deserialize_non_string_severity_is_rejected() {
    let json = r#"{"toxic": true, "confidence": 0.9, "severity": 3}"#;
    assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
}

#[test]
fn out_of_range_confidence_is_clamped() {
    let json = r#"{"toxic": true, "confidence": 1.4}"#;
    let result: AnalysisResult = serde_json::from_str(json).unwrap();
    assert!(result.confidence_out_of_range());
    assert_eq!(result.percent(), 100);

    let normalized = result.normalized();
    assert!(!normalized.confidence_out_of_range());
    assert!((normalized.confidence - 1.0).abs() < f64::EPSILON);
}
