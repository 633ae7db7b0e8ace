//! Query expansion with a domain synonym table.

use crate::rag::text::{dedupe, tokenize};

/// Canonical key → variants. Order matters: expansions are appended in table
/// order for every matching query token.
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymTable {
    entries: Vec<(String, Vec<String>)>,
}

impl SynonymTable {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// Expands `query` into a bounded token list: original tokens first, then
    /// the canonical key and every variant of each matched entry, deduplicated
    /// and cut to `max_tokens`.
    pub fn expand_tokens(&self, query: &str, max_tokens: usize) -> Vec<String> {
        let tokens = tokenize(query);
        let mut extras: Vec<String> = Vec::new();

        for token in &tokens {
            for (key, variants) in &self.entries {
                if token == key || variants.iter().any(|v| v == token) {
                    extras.extend(tokenize(key));
                    for variant in variants {
                        extras.extend(tokenize(variant));
                    }
                }
            }
        }

        let mut expanded = dedupe(tokens.into_iter().chain(extras));
        expanded.truncate(max_tokens);
        expanded
    }

    /// Space-joined form of [`SynonymTable::expand_tokens`].
    #[cfg(test)]
    pub fn expand(&self, query: &str, max_tokens: usize) -> String {
        self.expand_tokens(query, max_tokens).join(" ")
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        let table: &[(&str, &[&str])] = &[
            ("llm", &["large language model", "language model", "gpt", "gemini"]),
            ("rag", &["retrieval augmented generation", "retrieval-augmented generation"]),
            ("cv", &["resume"]),
            ("job", &["role", "position"]),
            ("tech", &["technology", "stack"]),
            ("stt", &["speech to text", "speech-to-text", "asr"]),
            ("tts", &["text to speech", "text-to-speech"]),
            ("deploy", &["deployment"]),
            ("school", &["university", "college"]),
            ("masters", &["ms", "master"]),
            ("bachelors", &["bs", "bachelor"]),
        ];

        Self::new(
            table
                .iter()
                .map(|(key, variants)| {
                    (
                        key.to_string(),
                        variants.iter().map(|v| v.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_adds_canonical_and_variants() {
        let table = SynonymTable::default();
        assert_eq!(
            table.expand("Any LLM work?", 40),
            "any llm work large language model gpt gemini"
        );
    }

    #[test]
    fn test_expand_matches_on_variant() {
        let table = SynonymTable::default();
        let tokens = table.expand_tokens("speech-to-text", 40);
        assert_eq!(tokens[0], "speech-to-text");
        assert!(tokens.contains(&"stt".to_string()));
        assert!(tokens.contains(&"asr".to_string()));
    }

    #[test]
    fn test_expand_without_matches_is_identity_minus_duplicates() {
        let table = SynonymTable::default();
        assert_eq!(table.expand("quantum quantum teleportation", 40), "quantum teleportation");
    }

    #[test]
    fn test_expand_is_bounded() {
        let table = SynonymTable::default();
        let long_query = (0..100).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let tokens = table.expand_tokens(&format!("llm rag stt tts {long_query}"), 40);
        assert_eq!(tokens.len(), 40);
        assert_eq!(&tokens[..4], &["llm", "rag", "stt", "tts"]);
    }

    #[test]
    fn test_expand_keeps_every_original_token_when_not_truncated() {
        let table = SynonymTable::default();
        let query = "masters school deploy";
        let expanded = table.expand_tokens(query, 40);
        for token in tokenize(query) {
            assert!(expanded.contains(&token), "missing {token}");
        }
        assert!(expanded.len() <= 40);
    }

    #[test]
    fn test_expand_empty_query() {
        assert_eq!(SynonymTable::default().expand("", 40), "");
    }

    #[test]
    fn test_custom_table() {
        let table = SynonymTable::new(vec![("k8s".to_string(), vec!["kubernetes".to_string()])]);
        assert_eq!(table.expand("kubernetes", 40), "kubernetes k8s");
    }
}
