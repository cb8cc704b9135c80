//! Document splitting into token-bounded, overlapping segments.
//!
//! [`RecursiveSplitter`] partitions text into the largest contiguous spans
//! that fit a token budget, preferring natural boundaries (paragraph, then
//! sentence, then word) before falling back to a hard cut. Separators stay
//! attached to the preceding span, so the produced spans cover every
//! character of the input exactly once; overlap is then prepended to each
//! segment after the first.

use std::sync::Arc;

use crate::tokenizer::Tokenizer;

/// Boundary preference for recursive splitting: paragraph, sentence, word.
const SEPARATORS: &[&str] = &["\n\n", ". ", "! ", "? ", " "];

/// Splits documents into token-bounded segments with token-bounded overlap.
///
/// Output is deterministic for a given document and configuration. Segment
/// sizes are measured by the supplied [`Tokenizer`], never by raw character
/// count.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::{HeuristicTokenizer, RecursiveSplitter};
///
/// let splitter = RecursiveSplitter::new(100, 20, Arc::new(HeuristicTokenizer));
/// let segments = splitter.split(document_text);
/// ```
pub struct RecursiveSplitter {
    max_tokens: usize,
    overlap_tokens: usize,
    tokenizer: Arc<dyn Tokenizer>,
}

impl RecursiveSplitter {
    /// Create a new splitter.
    ///
    /// # Arguments
    ///
    /// * `max_tokens` — maximum tokens per segment, overlap included
    /// * `overlap_tokens` — tokens of a segment's tail repeated at the
    ///   start of its successor, clamped so the segment bound still holds
    /// * `tokenizer` — the token measure applied to candidate segments
    pub fn new(max_tokens: usize, overlap_tokens: usize, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { max_tokens, overlap_tokens, tokenizer }
    }

    /// Split a document into segments.
    ///
    /// Non-empty input always yields at least one segment; input that fits
    /// `max_tokens` yields exactly one segment with no overlap applied.
    /// Empty input yields no segments.
    pub fn split(&self, document: &str) -> Vec<String> {
        if document.is_empty() {
            return Vec::new();
        }

        let spans = self.split_spans(document, SEPARATORS);
        if self.overlap_tokens == 0 || spans.len() <= 1 {
            return spans;
        }

        let mut segments = Vec::with_capacity(spans.len());
        for (i, span) in spans.iter().enumerate() {
            if i == 0 {
                segments.push(span.clone());
                continue;
            }
            let mut segment = self.overlap_prefix(&spans[i - 1], span);
            segment.push_str(span);
            segments.push(segment);
        }
        segments
    }

    fn count(&self, text: &str) -> usize {
        self.tokenizer.count_tokens(text)
    }

    /// Partition `text` into spans that each fit `max_tokens`, splitting at
    /// the first separator that produces more than one part and recursing
    /// into finer separators for oversized parts.
    fn split_spans(&self, text: &str, separators: &[&str]) -> Vec<String> {
        if self.count(text) <= self.max_tokens {
            return vec![text.to_string()];
        }
        let Some((separator, rest)) = separators.split_first() else {
            return self.hard_split(text);
        };

        let parts = split_after(text, separator);
        if parts.len() <= 1 {
            return self.split_spans(text, rest);
        }

        let mut spans = Vec::new();
        let mut current = String::new();
        for part in parts {
            let merged_len = current.len();
            current.push_str(part);
            if merged_len > 0 && self.count(&current) > self.max_tokens {
                current.truncate(merged_len);
                self.flush_span(std::mem::take(&mut current), rest, &mut spans);
                current.push_str(part);
            }
        }
        if !current.is_empty() {
            self.flush_span(current, rest, &mut spans);
        }
        spans
    }

    /// Emit a finished span, recursing with finer separators if a single
    /// part on its own exceeds the token budget.
    fn flush_span(&self, span: String, rest: &[&str], out: &mut Vec<String>) {
        if self.count(&span) > self.max_tokens {
            out.extend(self.split_spans(&span, rest));
        } else {
            out.push(span);
        }
    }

    /// Last-resort character-level cut for text with no usable boundaries.
    fn hard_split(&self, text: &str) -> Vec<String> {
        let mut spans = Vec::new();
        let mut current = String::new();
        for ch in text.chars() {
            current.push(ch);
            if self.count(&current) > self.max_tokens && current.chars().count() > 1 {
                current.pop();
                spans.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
        if !current.is_empty() {
            spans.push(current);
        }
        spans
    }

    /// The longest word-aligned suffix of `prev` that fits the overlap
    /// budget without pushing `span` over the segment bound.
    fn overlap_prefix(&self, prev: &str, span: &str) -> String {
        let budget = self.overlap_tokens.min(self.max_tokens.saturating_sub(self.count(span)));
        if budget == 0 {
            return String::new();
        }

        let mut word_starts = Vec::new();
        let mut in_whitespace = true;
        for (i, ch) in prev.char_indices() {
            if in_whitespace && !ch.is_whitespace() {
                word_starts.push(i);
            }
            in_whitespace = ch.is_whitespace();
        }

        let mut best = "";
        for &start in word_starts.iter().rev() {
            let suffix = &prev[start..];
            if self.count(suffix) > budget || self.count_joined(suffix, span) > self.max_tokens {
                break;
            }
            best = suffix;
        }
        best.to_string()
    }

    fn count_joined(&self, a: &str, b: &str) -> usize {
        let mut joined = String::with_capacity(a.len() + b.len());
        joined.push_str(a);
        joined.push_str(b);
        self.count(&joined)
    }
}

/// Split text at a separator while keeping the separator attached to the
/// preceding part, so the parts concatenate back to the original text.
fn split_after<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        parts.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        parts.push(&text[start..]);
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::HeuristicTokenizer;

    fn splitter(max_tokens: usize, overlap_tokens: usize) -> RecursiveSplitter {
        RecursiveSplitter::new(max_tokens, overlap_tokens, Arc::new(HeuristicTokenizer))
    }

    #[test]
    fn empty_document_yields_no_segments() {
        assert!(splitter(10, 2).split("").is_empty());
    }

    #[test]
    fn short_document_yields_one_segment_without_overlap() {
        let segments = splitter(100, 50).split("The sky is blue.");
        assert_eq!(segments, vec!["The sky is blue.".to_string()]);
    }

    #[test]
    fn segments_without_overlap_reconstruct_the_document() {
        let text = "First paragraph with several words in it.\n\n\
                    Second paragraph, also with a number of words. \
                    It has two sentences.\n\nThird paragraph closes the document.";
        let segments = splitter(8, 0).split(text);
        assert!(segments.len() > 1);
        assert_eq!(segments.concat(), text);
    }

    #[test]
    fn no_segment_exceeds_the_token_budget() {
        let tokenizer = HeuristicTokenizer;
        let text = "lorem ipsum dolor sit amet ".repeat(40);
        for (max_tokens, overlap_tokens) in [(6, 0), (6, 3), (12, 12)] {
            for segment in splitter(max_tokens, overlap_tokens).split(&text) {
                assert!(
                    tokenizer.count_tokens(&segment) <= max_tokens,
                    "segment over budget of {max_tokens}: {segment:?}"
                );
            }
        }
    }

    #[test]
    fn overlapping_segments_start_with_a_suffix_of_their_predecessor() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa \
                    lambda mu nu xi omicron pi rho sigma tau upsilon";
        let segments = splitter(4, 2).split(text);
        assert!(segments.len() > 1);
        // Compare against the overlap-free spans to isolate the prefixes.
        let spans = splitter(4, 0).split(text);
        for (i, segment) in segments.iter().enumerate().skip(1) {
            assert!(segment.ends_with(spans[i].as_str()));
            let prefix = &segment[..segment.len() - spans[i].len()];
            assert!(spans[i - 1].ends_with(prefix), "prefix {prefix:?} not a suffix of predecessor");
        }
    }

    #[test]
    fn splitting_is_deterministic() {
        let text = "one two three four five six seven eight nine ten ".repeat(10);
        assert_eq!(splitter(8, 3).split(&text), splitter(8, 3).split(&text));
    }

    #[test]
    fn paragraph_boundaries_are_preferred() {
        let text = "short paragraph one\n\nshort paragraph two\n\nshort paragraph three";
        let segments = splitter(5, 0).split(text);
        assert!(segments.iter().take(segments.len() - 1).all(|s| s.ends_with("\n\n")));
    }
}
