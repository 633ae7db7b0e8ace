//! Tokenization, sentence splitting and the token-overlap heuristics shared by
//! the hybrid scorer and the extractive synthesizer.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::rag::calibration::OverlapWeights;

/// Word characters plus `@ . - +`, so emails and hyphenated terms survive.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[\w@.\-+]+\b").expect("valid token regex"));

static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Lowercased tokens in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Splits after `.`, `!` or `?` when followed by whitespace. Sentences are
/// trimmed and empty ones dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END_RE.find_iter(text) {
        // keep the terminator with its sentence
        push_trimmed(&mut sentences, &text[start..m.start() + 1]);
        start = m.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}

/// Collapses whitespace runs to a single space and trims.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Drops repeated items, keeping the first occurrence.
pub fn dedupe<T: Clone + Eq + std::hash::Hash>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Set intersection over union. Zero when either side is empty.
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    intersection as f64 / union as f64
}

/// Fraction of the first `k` query tokens found anywhere in `doc`.
pub fn precision_at_k(query: &[String], doc: &[String], k: usize) -> f64 {
    if query.is_empty() || doc.is_empty() {
        return 0.0;
    }
    let doc: HashSet<&str> = doc.iter().map(String::as_str).collect();
    let head = &query[..k.min(query.len())];
    let hits = head.iter().filter(|t| doc.contains(t.as_str())).count();
    hits as f64 / head.len().max(1) as f64
}

/// `jaccard * w.jaccard + precision@k * w.precision`.
pub fn overlap_score(query: &[String], doc: &[String], weights: &OverlapWeights) -> f64 {
    weights.jaccard * jaccard(query, doc)
        + weights.precision * precision_at_k(query, doc, weights.k)
}
