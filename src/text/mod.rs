// Local text statistics: everything derived from the raw text without a
// round-trip to the prediction service.
//
// Word characters are ASCII letters, digits and underscore throughout, so
// frequency tokens and highlight word boundaries agree with each other.

pub mod frequency;
pub mod highlight;
pub mod metrics;

/// True for characters that belong to a word.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
