//! Property tests for the recursive document splitter.

use std::sync::Arc;

use proptest::prelude::*;
use ragkit::{HeuristicTokenizer, RecursiveSplitter, Tokenizer};

fn splitter(max_tokens: usize, overlap_tokens: usize) -> RecursiveSplitter {
    RecursiveSplitter::new(max_tokens, overlap_tokens, Arc::new(HeuristicTokenizer))
}

/// Generate a document of unique words joined by natural separators, so
/// overlap prefixes can be distinguished from the underlying text.
fn arb_document() -> impl Strategy<Value = String> {
    let separator = prop_oneof![Just(" "), Just(". "), Just("! "), Just("\n\n")];
    (2usize..120, proptest::collection::vec(separator, 120)).prop_map(|(words, separators)| {
        let mut doc = String::new();
        for i in 0..words {
            if i > 0 {
                doc.push_str(separators[i - 1]);
            }
            doc.push_str(&format!("word{i}"));
        }
        doc
    })
}

/// Walk the document, matching each segment's tail after discarding its
/// overlap prefix. Returns the number of document bytes covered.
fn reconstruct(document: &str, segments: &[String]) -> Option<usize> {
    let mut pos = 0usize;
    for (i, segment) in segments.iter().enumerate() {
        let rest = &document[pos..];
        let split = (0..=segment.len())
            .filter(|k| segment.is_char_boundary(*k))
            .find(|k| rest.starts_with(&segment[*k..]))?;
        if i == 0 && split != 0 {
            return None;
        }
        pos += segment.len() - split;
    }
    Some(pos)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Without overlap, segments concatenate back to the document exactly.
    #[test]
    fn segments_cover_the_document_exactly(
        document in arb_document(),
        max_tokens in 3usize..20,
    ) {
        let segments = splitter(max_tokens, 0).split(&document);
        prop_assert!(!segments.is_empty());
        prop_assert_eq!(segments.concat(), document);
    }

    /// With overlap, stripping each segment's overlap prefix reconstructs
    /// the document with every character covered.
    #[test]
    fn overlapping_segments_cover_the_document(
        document in arb_document(),
        max_tokens in 3usize..20,
        overlap_tokens in 1usize..20,
    ) {
        prop_assume!(overlap_tokens <= max_tokens);
        let segments = splitter(max_tokens, overlap_tokens).split(&document);
        prop_assert!(!segments.is_empty());
        let covered = reconstruct(&document, &segments);
        prop_assert_eq!(covered, Some(document.len()));
    }

    /// No segment exceeds the token budget as measured by the tokenizer
    /// the splitter was configured with.
    #[test]
    fn segments_respect_the_token_budget(
        document in arb_document(),
        max_tokens in 3usize..20,
        overlap_tokens in 0usize..20,
    ) {
        prop_assume!(overlap_tokens <= max_tokens);
        let tokenizer = HeuristicTokenizer;
        for segment in splitter(max_tokens, overlap_tokens).split(&document) {
            prop_assert!(
                tokenizer.count_tokens(&segment) <= max_tokens,
                "segment of {} tokens exceeds budget {max_tokens}: {segment:?}",
                tokenizer.count_tokens(&segment),
            );
        }
    }

    /// Splitting is deterministic for a fixed document and configuration.
    #[test]
    fn splitting_is_deterministic(
        document in arb_document(),
        max_tokens in 3usize..20,
        overlap_tokens in 0usize..20,
    ) {
        prop_assume!(overlap_tokens <= max_tokens);
        prop_assert_eq!(
            splitter(max_tokens, overlap_tokens).split(&document),
            splitter(max_tokens, overlap_tokens).split(&document)
        );
    }
}
