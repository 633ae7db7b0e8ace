//! Retrieval and answer synthesis over a single résumé.
//!
//! Build time: résumé → flattened documents → field-weighted text → BM25.
//! Query time: intent routing, or expansion → hybrid scoring → extractive
//! answer with confidence gating.

pub mod bm25;
pub mod calibration;
pub mod expand;
pub mod extract;
pub mod flatten;
pub mod index;
pub mod intent;
pub mod lazy;
pub mod text;

pub use calibration::Calibration;
pub use index::{AnswerResult, DEFAULT_MIN_CONF, DEFAULT_TOP_K};
pub use lazy::LazyIndex;
