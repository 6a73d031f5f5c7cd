//! Title and text normalization.
//!
//! Punctuation acts as a word separator, so `"Saint-Exupéry"` becomes the two
//! words `Saint` and `Exupéry`. Lengths are counted in characters.

fn words(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|w| !w.is_empty())
}

/// Split a raw string into its words.
pub fn split_words(raw: &str) -> Vec<String> {
    words(raw).map(str::to_string).collect()
}

/// Character length of a single word.
pub fn word_length(word: &str) -> usize {
    word.chars().count()
}

/// Lengths of the first `max_depth` words of a body text.
pub fn text_profile(text: &str, max_depth: usize) -> Vec<usize> {
    words(text).take(max_depth).map(word_length).collect()
}
