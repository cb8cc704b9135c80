//! Token counting for the document splitter.
//!
//! Segment bounds are measured in tokens, not characters, because token
//! length is model-dependent. [`Tokenizer`] is the seam for plugging in a
//! model-specific tokenizer; [`HeuristicTokenizer`] is a model-free
//! estimator good enough for splitting.

/// Counts the tokens a piece of text would occupy for an embedding model.
pub trait Tokenizer: Send + Sync {
    /// Return the token count of `text`.
    fn count_tokens(&self, text: &str) -> usize;
}

/// A model-free token estimator blending character and word counts.
///
/// Roughly four characters per token, averaged with a word-based estimate.
/// Non-empty text always counts as at least one token.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenizer;

impl Tokenizer for HeuristicTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        let chars = text.chars().count();
        let words = text.split_whitespace().count();
        let char_estimate = chars / 4;
        let word_estimate = (words * 10) / 13;
        usize::midpoint(char_estimate, word_estimate).max(usize::from(words > 0))
    }
}
