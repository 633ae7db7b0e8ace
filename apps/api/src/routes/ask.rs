use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::rag::{AnswerResult, DEFAULT_MIN_CONF, DEFAULT_TOP_K};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_conf")]
    pub min_conf: f64,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_min_conf() -> f64 {
    DEFAULT_MIN_CONF
}

impl AskRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.top_k < 1 {
            return Err(AppError::Validation("top_k must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.min_conf) {
            return Err(AppError::Validation(
                "min_conf must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// POST /ask
pub async fn ask_handler(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AnswerResult>, AppError> {
    req.validate()?;
    let index = state.index().await?;
    Ok(Json(index.answer(&req.query, req.top_k, req.min_conf)))
}
