//! Okapi BM25 over pre-tokenized documents.
//!
//! Built once; a corpus change means building a new index. Scores are returned
//! as a vector aligned with the input document order.

use std::collections::HashMap;

use crate::rag::calibration::Bm25Params;

#[derive(Debug, Clone)]
pub struct LexicalIndex {
    params: Bm25Params,
    term_freqs: Vec<HashMap<String, u32>>,
    doc_lens: Vec<usize>,
    doc_freq: HashMap<String, usize>,
    avg_doc_len: f64,
}

impl LexicalIndex {
    pub fn build(docs: &[Vec<String>], params: Bm25Params) -> Self {
        let mut term_freqs = Vec::with_capacity(docs.len());
        let mut doc_lens = Vec::with_capacity(docs.len());
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut total_len = 0usize;

        for tokens in docs {
            let mut tf: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *tf.entry(token.clone()).or_insert(0) += 1;
            }
            for term in tf.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            total_len += tokens.len();
            doc_lens.push(tokens.len());
            term_freqs.push(tf);
        }

        let avg_doc_len = if docs.is_empty() {
            0.0
        } else {
            total_len as f64 / docs.len() as f64
        };

        Self {
            params,
            term_freqs,
            doc_lens,
            doc_freq,
            avg_doc_len,
        }
    }

    fn len(&self) -> usize {
        self.doc_lens.len()
    }

    /// Smoothed IDF, always positive: `ln(1 + (N - df + 0.5) / (df + 0.5))`.
    fn idf(&self, term: &str) -> f64 {
        let n = self.len() as f64;
        let df = self.doc_freq.get(term).copied().unwrap_or(0) as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// One score per document. Repeated query tokens count repeatedly.
    pub fn score(&self, query: &[String]) -> Vec<f64> {
        let (k1, b) = (self.params.k1, self.params.b);
        let avg = if self.avg_doc_len > 0.0 {
            self.avg_doc_len
        } else {
            1.0
        };

        let idfs: Vec<f64> = query.iter().map(|t| self.idf(t)).collect();

        self.term_freqs
            .iter()
            .zip(&self.doc_lens)
            .map(|(tf, &len)| {
                let norm = k1 * (1.0 - b + b * (len as f64 / avg));
                query
                    .iter()
                    .zip(&idfs)
                    .map(|(term, idf)| {
                        let f = tf.get(term.as_str()).copied().unwrap_or(0) as f64;
                        if f == 0.0 {
                            0.0
                        } else {
                            idf * (f * (k1 + 1.0)) / (f + norm)
                        }
                    })
                    .sum::<f64>()
            })
            .collect()
    }
}
