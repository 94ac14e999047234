// Unit tests for local text statistics.
//
// Word frequency, abusive-word highlighting and headline metrics are pure
// functions of the text (and the result's word list), so these tests need no
// runtime and no network.

use toxiguard::predictor::traits::AnalysisResult;
use toxiguard::text::frequency::frequency;
use toxiguard::text::highlight::{abusive_spans, highlight, HighlightSpan};
use toxiguard::text::metrics::TextMetrics;

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn joined(spans: &[HighlightSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

fn marked(spans: &[HighlightSpan]) -> Vec<&str> {
    abusive_spans(spans).map(|s| s.text.as_str()).collect()
}

// ============================================================
// frequency
// ============================================================

#[test]
fn frequency_counts_normalized_words() {
    let freq = frequency("The cat sat on the mat.");
    assert_eq!(freq.len(), 5);
    assert_eq!(freq.get("the"), 2);
    assert_eq!(freq.get("cat"), 1);
    assert_eq!(freq.get("sat"), 1);
    assert_eq!(freq.get("on"), 1);
    assert_eq!(freq.get("mat"), 1);
    assert_eq!(freq.total(), 6);
}

#[test]
fn frequency_of_blank_text_is_empty() {
    assert!(frequency("").is_empty());
    assert!(frequency("   \n\t ").is_empty());
    assert!(frequency("?! ... ,,").is_empty());
}

#[test]
fn frequency_is_deterministic() {
    let text = "Go go GO! Stop, stop.";
    assert_eq!(frequency(text), frequency(text));
    assert_eq!(frequency(text).get("go"), 3);
    assert_eq!(frequency(text).get("stop"), 2);
}

#[test]
fn frequency_keeps_digits_and_underscores() {
    let freq = frequency("user_1 said 42 times: user_1!");
    assert_eq!(freq.get("user_1"), 2);
    assert_eq!(freq.get("42"), 1);
    assert_eq!(freq.get("times"), 1);
}

#[test]
fn top_orders_by_count_then_alphabetically() {
    let freq = frequency("b a c a b a");
    assert_eq!(
        freq.top(2),
        vec![("a".to_string(), 3), ("b".to_string(), 2)]
    );
    assert_eq!(freq.top(10).len(), 3);
}

#[test]
fn top_content_words_skips_stop_words() {
    let freq = frequency("the the the idiot and the fool");
    let content = freq.top_content_words(5);
    assert!(content.iter().all(|(w, _)| w != "the" && w != "and"));
    assert!(content.iter().any(|(w, _)| w == "idiot"));
    assert!(content.iter().any(|(w, _)| w == "fool"));
}

// ============================================================
// highlight
// ============================================================

#[test]
fn highlight_marks_each_listed_word() {
    let text = "You are stupid and dumb.";
    let spans = highlight(text, &words(&["stupid", "dumb"]));
    assert_eq!(joined(&spans), text);
    assert_eq!(marked(&spans), vec!["stupid", "dumb"]);
}

#[test]
fn highlight_ignores_partial_words() {
    let text = "stupidity is not nice";
    let spans = highlight(text, &words(&["stupid"]));
    assert_eq!(joined(&spans), text);
    assert!(marked(&spans).is_empty());
}

#[test]
fn highlight_is_case_insensitive_and_keeps_original_case() {
    let text = "STUPID, Stupid and stupid";
    let spans = highlight(text, &words(&["stupid"]));
    assert_eq!(marked(&spans), vec!["STUPID", "Stupid", "stupid"]);
    assert_eq!(joined(&spans), text);
}

#[test]
fn highlight_longest_overlapping_word_wins() {
    let text = "what an asshole, you ass";
    let spans = highlight(text, &words(&["ass", "asshole"]));
    assert_eq!(marked(&spans), vec!["asshole", "ass"]);
    assert_eq!(joined(&spans), text);
}

#[test]
fn highlight_marks_multi_word_phrases() {
    let text = "Just shut up already";
    let spans = highlight(text, &words(&["shut up"]));
    assert_eq!(marked(&spans), vec!["shut up"]);
}

#[test]
fn highlight_without_words_is_one_plain_span() {
    let spans = highlight("nothing to see", &[]);
    assert_eq!(
        spans,
        vec![HighlightSpan {
            text: "nothing to see".to_string(),
            abusive: false,
        }]
    );
    assert!(highlight("", &words(&["x"])).is_empty());
}

#[test]
fn highlight_keeps_markup_as_plain_text() {
    let text = "<b>idiot</b> & <script>alert(1)</script>";
    let spans = highlight(text, &words(&["idiot"]));
    assert_eq!(joined(&spans), text);
    assert_eq!(marked(&spans), vec!["idiot"]);
    // Nothing was wrapped or rewritten
    assert!(spans.iter().all(|s| !s.text.contains("abusive-word")));
}

#[test]
fn highlight_reconstructs_unicode_text() {
    let text = "Ça va, idiot? 😀 très idiot!";
    let spans = highlight(text, &words(&["idiot"]));
    assert_eq!(joined(&spans), text);
    assert_eq!(marked(&spans).len(), 2);
}

// ============================================================
// metrics
// ============================================================

fn result(confidence: f64, abusive: &[&str]) -> AnalysisResult {
    AnalysisResult {
        toxic: confidence >= 0.5,
        confidence,
        severity: Default::default(),
        abusive_words: words(abusive),
        suggestions: vec![],
        reason: None,
        source: None,
        sentiment: None,
    }
}

#[test]
fn metrics_without_result() {
    let metrics = TextMetrics::compute("  one two   three ", None);
    assert_eq!(metrics.total_words, 3);
    assert_eq!(metrics.abusive_count, 0);
    assert_eq!(metrics.toxicity_percent, None);
}

#[test]
fn metrics_percent_never_leaves_range() {
    let metrics = TextMetrics::compute("bad words", Some(&result(1.4, &["bad"])));
    assert_eq!(metrics.abusive_count, 1);
    assert_eq!(metrics.toxicity_percent, Some(100));

    let metrics = TextMetrics::compute("fine", Some(&result(-3.0, &[])));
    assert_eq!(metrics.toxicity_percent, Some(0));
}
