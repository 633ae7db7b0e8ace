//! The résumé index: hybrid retrieval plus the answer pipeline.
//!
//! Flow per query:
//! 1. intent routing on the raw query; a hit returns a templated answer
//! 2. query expansion → BM25 over weighted text, blended with token overlap
//!    against the raw document text
//! 3. top-k contexts → extractive answer, gated by the best score
//!
//! Documents, raw texts, raw tokens and BM25 rows are all built from the same
//! flatten pass and share one ordering; position `i` is the same document in
//! every one of them.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::resume::{Resume, ResumeError};
use crate::rag::bm25::LexicalIndex;
use crate::rag::calibration::Calibration;
use crate::rag::expand::SynonymTable;
use crate::rag::extract::extractive_answer;
use crate::rag::flatten::{flatten, Document};
use crate::rag::intent::{render_intent_answer, Intent, IntentRouter};
use crate::rag::text::{overlap_score, tokenize};

pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_MIN_CONF: f64 = 0.35;

/// Confidence reported for routed (templated) answers.
pub const INTENT_CONFIDENCE: f64 = 0.95;

pub const LOW_CONFIDENCE_FALLBACK: &str =
    "I couldn't find that in the resume. Closest matches are shown.";

const LOW_CONFIDENCE_SENTENCES: usize = 2;
const ANSWER_SENTENCES: usize = 3;
const MAX_ANSWER_CHARS: usize = 450;
const TRUNCATED_CHARS: usize = 447;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
    pub answer: String,
    pub intent: Intent,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    /// Raw document texts backing the answer. Empty for routed answers.
    pub sources: Vec<String>,
}

/// A retrieved document: hybrid score plus its raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub score: f64,
    pub text: String,
}

pub struct ResumeIndex {
    resume: Resume,
    documents: Vec<Document>,
    raw_texts: Vec<String>,
    raw_tokens: Vec<Vec<String>>,
    lexical: LexicalIndex,
    synonyms: SynonymTable,
    router: IntentRouter,
    calibration: Calibration,
}

impl ResumeIndex {
    /// Reads the résumé from disk and builds the index.
    pub fn from_path(path: &Path, calibration: Calibration) -> Result<Self, ResumeError> {
        let resume = Resume::load(path)?;
        Ok(Self::build(resume, calibration))
    }

    pub fn build(resume: Resume, calibration: Calibration) -> Self {
        Self::with_tables(
            resume,
            calibration,
            SynonymTable::default(),
            IntentRouter::default(),
        )
    }

    pub fn with_tables(
        resume: Resume,
        calibration: Calibration,
        synonyms: SynonymTable,
        router: IntentRouter,
    ) -> Self {
        let documents: Vec<Document> = flatten(&resume)
            .into_iter()
            .map(|flat| Document::new(flat, &calibration))
            .collect();

        let weighted_tokens: Vec<Vec<String>> =
            documents.iter().map(|d| tokenize(&d.weighted_text)).collect();
        let lexical = LexicalIndex::build(&weighted_tokens, calibration.bm25.clone());

        let raw_texts: Vec<String> = documents.iter().map(Document::raw_text).collect();
        let raw_tokens: Vec<Vec<String>> = raw_texts.iter().map(|t| tokenize(t)).collect();

        info!("Built resume index: {} documents", documents.len());

        Self {
            resume,
            documents,
            raw_texts,
            raw_tokens,
            lexical,
            synonyms,
            router,
            calibration,
        }
    }

    pub fn resume(&self) -> &Resume {
        &self.resume
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Display texts, aligned with [`ResumeIndex::documents`].
    #[cfg(test)]
    pub fn raw_texts(&self) -> &[String] {
        &self.raw_texts
    }

    /// One blended score per document, in document order.
    pub fn hybrid_scores(&self, query: &str) -> Vec<f64> {
        let query_tokens = self
            .synonyms
            .expand_tokens(query, self.calibration.max_query_tokens);

        let lexical = self.lexical.score(&query_tokens);

        let overlap: Vec<f64> = self
            .raw_tokens
            .iter()
            .map(|doc| overlap_score(&query_tokens, doc, &self.calibration.overlap))
            .collect();

        let max = overlap.iter().copied().fold(0.0_f64, f64::max);
        let scale = if max > 0.0 {
            max
        } else {
            self.calibration.overlap_epsilon
        };

        let blend = &self.calibration.blend;
        lexical
            .iter()
            .zip(&overlap)
            .map(|(lex, ov)| blend.lexical * lex + blend.overlap * (ov / scale))
            .collect()
    }

    /// Top `top_k` documents by hybrid score. Ties keep document order.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<Hit> {
        let scores = self.hybrid_scores(query);

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        order
            .into_iter()
            .take(top_k)
            .map(|i| Hit {
                score: scores[i],
                text: self.raw_texts[i].clone(),
            })
            .collect()
    }

    /// Context snippets for a query, best first.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<String> {
        self.retrieve(query, top_k)
            .into_iter()
            .map(|hit| hit.text)
            .collect()
    }

    pub fn answer(&self, query: &str, top_k: usize, min_conf: f64) -> AnswerResult {
        let intent = self.router.route(query);
        if intent != Intent::Generic {
            let routed = render_intent_answer(intent, &self.resume);
            if !routed.is_empty() {
                debug!("Routed query to intent '{}'", intent.as_str());
                return AnswerResult {
                    answer: routed,
                    intent,
                    confidence: INTENT_CONFIDENCE,
                    sources: Vec::new(),
                };
            }
        }

        let hits = self.retrieve(query, top_k);
        let best = hits.first().map(|h| h.score).unwrap_or(0.0);
        let contexts: Vec<String> = hits.into_iter().map(|h| h.text).collect();
        let confidence = round3(best.clamp(0.0, 1.0));

        debug!(
            "Retrieved {} contexts, best score {:.3} (min_conf {:.3})",
            contexts.len(),
            best,
            min_conf
        );

        let weights = &self.calibration.overlap;

        if best < min_conf {
            let sketch = extractive_answer(query, &contexts, LOW_CONFIDENCE_SENTENCES, weights);
            let answer = if sketch.is_empty() {
                LOW_CONFIDENCE_FALLBACK.to_string()
            } else {
                sketch
            };
            return AnswerResult {
                answer,
                intent: Intent::Generic,
                confidence,
                sources: contexts,
            };
        }

        let extracted = extractive_answer(query, &contexts, ANSWER_SENTENCES, weights);
        let answer = if !extracted.is_empty() {
            truncate_answer(extracted)
        } else if let Some(top) = contexts.first() {
            top.clone()
        } else {
            LOW_CONFIDENCE_FALLBACK.to_string()
        };

        AnswerResult {
            answer,
            intent: Intent::Generic,
            confidence,
            sources: contexts,
        }
    }
}

/// Cuts answers longer than the limit at a word boundary and marks the cut
/// with an ellipsis.
fn truncate_answer(answer: String) -> String {
    if answer.chars().count() <= MAX_ANSWER_CHARS {
        return answer;
    }
    let head: String = answer.chars().take(TRUNCATED_CHARS).collect();
    let cut = match head.rfind(' ') {
        Some(pos) => &head[..pos],
        None => head.as_str(),
    };
    format!("{cut}...")
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
