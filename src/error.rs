use thiserror::Error;

use crate::pose::KeypointIndex;

/// Errors produced by the counting core.
///
/// Only `InvalidConfiguration` is fatal. The other variants mean
/// "skip this person for this frame" and never touch the rep count.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepError {
    #[error("missing keypoints for {operation}: {missing:?}")]
    MissingKeypoints {
        operation: &'static str,
        missing: Vec<KeypointIndex>,
    },

    #[error("degenerate geometry: coincident keypoints")]
    DegenerateGeometry,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl RepError {
    pub fn missing(operation: &'static str, missing: Vec<KeypointIndex>) -> Self {
        Self::MissingKeypoints { operation, missing }
    }
}

pub type RepResult<T> = Result<T, RepError>;
