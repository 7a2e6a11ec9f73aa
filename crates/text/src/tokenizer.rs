use unicode_segmentation::UnicodeSegmentation;

/// Split text into lower-cased words using Unicode word boundaries.
///
/// Punctuation and whitespace are dropped; apostrophes inside words are kept
/// (`"don't"` stays one token).
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(str::to_lowercase).collect()
}
