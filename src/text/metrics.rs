// Headline numbers shown next to a result: word count, abusive count and
// toxicity percentage.

use serde::Serialize;

use crate::predictor::traits::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextMetrics {
    /// Whitespace-separated tokens in the trimmed text.
    pub total_words: usize,
    /// Abusive words reported by the current result (0 without one).
    pub abusive_count: usize,
    /// Clamped toxicity percentage, absent without a result.
    pub toxicity_percent: Option<u8>,
}

impl TextMetrics {
    pub fn compute(text: &str, result: Option<&AnalysisResult>) -> Self {
        Self {
            total_words: text.split_whitespace().count(),
            abusive_count: result.map_or(0, |r| r.abusive_words.len()),
            toxicity_percent: result.map(AnalysisResult::percent),
        }
    }
}
