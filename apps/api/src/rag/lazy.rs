//! Lazily built, shared résumé index.
//!
//! The index is built on first use and then shared by every caller. Concurrent
//! first calls serialize on a build lock; the first one builds, the rest see
//! its result. A failed build is not cached, so the next call retries.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::info;

use crate::models::resume::ResumeError;
use crate::rag::calibration::Calibration;
use crate::rag::index::ResumeIndex;

pub struct LazyIndex {
    source: PathBuf,
    calibration: Calibration,
    cell: OnceLock<ResumeIndex>,
    build_lock: Mutex<()>,
}

impl LazyIndex {
    pub fn new(source: impl Into<PathBuf>, calibration: Calibration) -> Self {
        Self {
            source: source.into(),
            calibration,
            cell: OnceLock::new(),
            build_lock: Mutex::new(()),
        }
    }

    /// Wraps an index that is already built.
    #[cfg(test)]
    pub fn ready(index: ResumeIndex) -> Self {
        let lazy = Self::new(PathBuf::new(), Calibration::default());
        let _ = lazy.cell.set(index);
        lazy
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<&ResumeIndex, ResumeError> {
        if let Some(index) = self.cell.get() {
            return Ok(index);
        }

        let _guard = self
            .build_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(index) = self.cell.get() {
            return Ok(index);
        }

        info!("Building resume index from {}", self.source.display());
        let index = ResumeIndex::from_path(&self.source, self.calibration.clone())?;
        Ok(self.cell.get_or_init(|| index))
    }
}
