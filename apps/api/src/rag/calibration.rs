//! Tunable ranking constants.
//!
//! All values are empirical. Defaults reproduce the shipped ranking.

use crate::rag::flatten::DocTag;

/// Per-section importance. Fed into the index through token repetition.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBoosts {
    pub summary: f64,
    pub skill: f64,
    pub project: f64,
    pub experience: f64,
    pub education: f64,
    pub award: f64,
}

impl Default for FieldBoosts {
    fn default() -> Self {
        Self {
            summary: 1.2,
            skill: 1.5,
            project: 1.6,
            experience: 1.7,
            education: 1.1,
            award: 1.0,
        }
    }
}

impl FieldBoosts {
    pub fn for_tag(&self, tag: DocTag) -> f64 {
        match tag {
            DocTag::Summary => self.summary,
            DocTag::Skill => self.skill,
            DocTag::Project => self.project,
            DocTag::Experience => self.experience,
            DocTag::Education => self.education,
            DocTag::Award => self.award,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// Weights of the token-overlap heuristic: `jaccard * a + precision@k * b`.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapWeights {
    pub jaccard: f64,
    pub precision: f64,
    pub k: usize,
}

impl Default for OverlapWeights {
    fn default() -> Self {
        Self {
            jaccard: 0.6,
            precision: 0.4,
            k: 8,
        }
    }
}

/// Blend of the lexical score and the max-scaled overlap score.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendWeights {
    pub lexical: f64,
    pub overlap: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            lexical: 0.85,
            overlap: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub boosts: FieldBoosts,
    /// Extra repetitions per tag are `floor((boost - 1.0) * repetition_scale)`.
    pub repetition_scale: f64,
    pub bm25: Bm25Params,
    pub overlap: OverlapWeights,
    pub blend: BlendWeights,
    /// Hard cap on the expanded query length, in tokens.
    pub max_query_tokens: usize,
    /// Floor used when scaling overlap scores whose maximum is zero.
    pub overlap_epsilon: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            boosts: FieldBoosts::default(),
            repetition_scale: 3.0,
            bm25: Bm25Params::default(),
            overlap: OverlapWeights::default(),
            blend: BlendWeights::default(),
            max_query_tokens: 40,
            overlap_epsilon: 1e-9,
        }
    }
}
