// Abusive-word highlighting as structured spans.
//
// The output is a list of `{text, abusive}` segments, never markup. Joining
// the segment texts in order gives back the input byte-for-byte; escaping and
// styling are the renderer's job.
//
// Matching is ASCII case-insensitive and whole-word. Word boundaries are
// ASCII too: a listed word that starts or ends with a non-ASCII letter
// ("café") never matches, and non-ASCII letters only match their exact
// case. When listed words
// overlap ("ass" and "asshole"), the longest word that matches at a position
// wins and the shorter one is not applied inside it.

use regex_lite::Regex;
use serde::Serialize;
use tracing::warn;

/// One contiguous piece of the highlighted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub text: String,
    pub abusive: bool,
}

impl HighlightSpan {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            abusive: false,
        }
    }

    fn marked(text: &str) -> Self {
        Self {
            text: text.to_string(),
            abusive: true,
        }
    }
}

/// Split `text` into spans, marking every whole-word occurrence of any
/// word in `abusive_words`.
pub fn highlight(text: &str, abusive_words: &[String]) -> Vec<HighlightSpan> {
    if text.is_empty() {
        return Vec::new();
    }

    let Some(pattern) = build_pattern(abusive_words) else {
        return vec![HighlightSpan::plain(text)];
    };

    let regex = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(e) => {
            warn!(error = %e, words = abusive_words.len(), "Could not compile highlight pattern");
            return vec![HighlightSpan::plain(text)];
        }
    };

    let mut spans = Vec::new();
    let mut cursor = 0;
    for m in regex.find_iter(text) {
        if m.start() > cursor {
            spans.push(HighlightSpan::plain(&text[cursor..m.start()]));
        }
        spans.push(HighlightSpan::marked(m.as_str()));
        cursor = m.end();
    }
    if cursor < text.len() {
        spans.push(HighlightSpan::plain(&text[cursor..]));
    }

    spans
}

/// The marked spans only, in text order.
pub fn abusive_spans(spans: &[HighlightSpan]) -> impl Iterator<Item = &HighlightSpan> {
    spans.iter().filter(|s| s.abusive)
}

/// Build `(?i)\b(?:longest|...|shortest)\b`, or None if there is nothing to
/// match. Longest-first ordering makes the leftmost-first alternation prefer
/// the longest word at each position.
fn build_pattern(abusive_words: &[String]) -> Option<String> {
    let mut words: Vec<String> = abusive_words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return None;
    }

    words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    words.dedup();

    let alternation = words
        .iter()
        .map(|w| regex_lite::escape(w))
        .collect::<Vec<_>>()
        .join("|");

    Some(format!(r"(?i)\b(?:{alternation})\b"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_orders_longest_first_and_dedups() {
        let words = vec!["ass".to_string(), "Asshole".to_string(), "ass".to_string()];
        assert_eq!(
            build_pattern(&words).as_deref(),
            Some(r"(?i)\b(?:asshole|ass)\b")
        );
    }

    #[test]
    fn blank_words_produce_no_pattern() {
        assert!(build_pattern(&["  ".to_string(), String::new()]).is_none());
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let spans = highlight("what the f*ck", &["f*ck".to_string()]);
        assert_eq!(abusive_spans(&spans).count(), 1);

        let spans = highlight("fck fffck", &["f*ck".to_string()]);
        assert_eq!(abusive_spans(&spans).count(), 0);
    }

    #[test]
    fn boundaries_and_case_folding_are_ascii_only() {
        let spans = highlight("nice café here", &["café".to_string()]);
        assert_eq!(spans, vec![HighlightSpan::plain("nice café here")]);

        let spans = highlight("so naïve, so Naïve, so NAÏVE", &["naïve".to_string()]);
        let marked: Vec<&str> = abusive_spans(&spans).map(|s| s.text.as_str()).collect();
        assert_eq!(marked, vec!["naïve", "Naïve"]);
    }
}
