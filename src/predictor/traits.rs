// Predictor trait and the result shape returned by the prediction service.
//
// Every optional field on the wire defaults to empty/absent, and `null` is
// treated the same as a missing field. Confidence is never trusted as-is:
// callers go through `normalized()` or `percent()` before displaying it.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// How severe the service judged the text to be.
///
/// Parsing is lenient: any casing is accepted and unrecognised labels fall
/// back to `Low`, so a bad severity never costs an otherwise valid result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Map a wire label to a severity, ignoring case and surrounding
    /// whitespace. Anything unrecognised is `Low`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("high") {
            Severity::High
        } else if label.eq_ignore_ascii_case("medium") {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sentiment attached to a prediction, if the service computed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: String,
    pub polarity: f64,
}

/// The classification of a single piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub toxic: bool,
    /// Probability the text is toxic, 0.0 to 1.0 once normalized.
    pub confidence: f64,
    #[serde(default, deserialize_with = "severity_label")]
    pub severity: Severity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub abusive_words: Vec<String>,
    #[serde(default, deserialize_with = "suggestion_list")]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

impl AnalysisResult {
    /// Return a copy with confidence forced into [0, 1]. NaN becomes 0.
    pub fn normalized(mut self) -> Self {
        self.confidence = clamp_confidence(self.confidence);
        self
    }

    /// True if the raw confidence falls outside [0, 1] (or is NaN).
    pub fn confidence_out_of_range(&self) -> bool {
        !(0.0..=1.0).contains(&self.confidence)
    }

    /// Confidence as a whole percentage, always within 0..=100.
    pub fn percent(&self) -> u8 {
        confidence_percent(self.confidence)
    }
}

/// Clamp a raw confidence into [0, 1].
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Convert a raw confidence to a rounded percentage within 0..=100.
pub fn confidence_percent(confidence: f64) -> u8 {
    (clamp_confidence(confidence) * 100.0).round() as u8
}

/// Trait for classifying text. Implementations are async because the
/// real service is a network call.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Classify a single text.
    async fn predict(&self, text: &str) -> Result<AnalysisResult>;
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn severity_label<'de, D>(deserializer: D) -> std::result::Result<Severity, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    let severity = label.as_deref().map(Severity::from_label).unwrap_or_default();
    if let Some(raw) = label.as_deref() {
        if !raw.trim().is_empty() && !raw.trim().eq_ignore_ascii_case(severity.as_str()) {
            debug!(severity = raw, "Unrecognised severity label, treating as low");
        }
    }
    Ok(severity)
}

/// The reference backend sends suggestions as `{phrase: suggestion}`; other
/// services send a plain list. Accept both, flattening objects to values.
fn suggestion_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Suggestions {
        List(Vec<String>),
        ByPhrase(BTreeMap<String, String>),
    }

    Ok(match Option::<Suggestions>::deserialize(deserializer)? {
        Some(Suggestions::List(list)) => list,
        Some(Suggestions::ByPhrase(map)) => map.into_values().collect(),
        None => Vec::new(),
    })
}
