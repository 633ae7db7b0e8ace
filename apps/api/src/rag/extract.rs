//! Extractive answer synthesis: pick the candidate sentences that overlap the
//! query most and stitch them together.

use crate::rag::calibration::OverlapWeights;
use crate::rag::text::{collapse_whitespace, dedupe, overlap_score, split_sentences, tokenize};

/// Best `max_sentences` sentences from `texts`, highest overlap first.
///
/// Sentences with zero overlap are never picked, so the result is empty when
/// nothing in `texts` shares a token with the query.
pub fn extractive_answer(
    query: &str,
    texts: &[String],
    max_sentences: usize,
    weights: &OverlapWeights,
) -> String {
    let query_tokens = tokenize(query);

    let mut scored: Vec<(f64, String)> = texts
        .iter()
        .flat_map(|text| split_sentences(text))
        .filter_map(|sentence| {
            let score = overlap_score(&query_tokens, &tokenize(&sentence), weights);
            (score > 0.0).then_some((score, sentence))
        })
        .collect();

    // stable: ties keep encounter order
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let picked: Vec<String> = dedupe(scored.into_iter().map(|(_, s)| s))
        .into_iter()
        .take(max_sentences)
        .collect();

    collapse_whitespace(&picked.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_picks_overlapping_sentences_in_score_order() {
        let t = texts(&["Project: X. Built a cache. Reduced latency by 50%"]);
        let answer = extractive_answer("cache project", &t, 3, &OverlapWeights::default());
        // the title sentence is shorter, so its jaccard share is higher
        assert_eq!(answer, "Project: X. Built a cache.");
    }

    #[test]
    fn test_respects_max_sentences() {
        let t = texts(&["Rust one. Rust two. Rust three. Rust four."]);
        let answer = extractive_answer("rust", &t, 2, &OverlapWeights::default());
        assert_eq!(answer, "Rust one. Rust two.");
    }

    #[test]
    fn test_higher_overlap_ranks_first() {
        let t = texts(&["I like rust. Rust cache latency work."]);
        let answer = extractive_answer("rust cache latency", &t, 1, &OverlapWeights::default());
        assert_eq!(answer, "Rust cache latency work.");
    }

    #[test]
    fn test_deduplicates_identical_sentences() {
        let t = texts(&["Built a cache. Other.", "Built a cache."]);
        let answer = extractive_answer("cache", &t, 3, &OverlapWeights::default());
        assert_eq!(answer, "Built a cache.");
    }

    #[test]
    fn test_collapses_whitespace() {
        let t = texts(&["Built   a\n\ncache"]);
        let answer = extractive_answer("cache", &t, 3, &OverlapWeights::default());
        assert_eq!(answer, "Built a cache");
    }

    #[test]
    fn test_empty_when_nothing_overlaps() {
        let t = texts(&["Built a cache."]);
        assert_eq!(
            extractive_answer("quantum teleportation", &t, 3, &OverlapWeights::default()),
            ""
        );
        assert_eq!(extractive_answer("cache", &[], 3, &OverlapWeights::default()), "");
        assert_eq!(extractive_answer("", &t, 3, &OverlapWeights::default()), "");
    }
}
