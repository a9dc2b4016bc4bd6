//! Errors surfaced to callers of the assessment engine
//!
//! Only structurally impossible input is an error. Degraded keypoints turn
//! into absent metric fields instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The swing has no frames, no usable keypoints, or an empty impact frame
    #[error("missing data for swing {swing_id}: {reason}")]
    MissingData { swing_id: String, reason: String },

    /// The swing violates an input invariant (impact index, frame rate)
    #[error("invalid swing {swing_id}: {reason}")]
    InvalidSwing { swing_id: String, reason: String },

    #[error("session {0} has no swings")]
    EmptySession(String),

    #[error("session {0} not found")]
    SessionNotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AnalysisError {
    pub fn missing_data(swing_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MissingData {
            swing_id: swing_id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_swing(swing_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSwing {
            swing_id: swing_id.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure is confined to one swing and the session can go on
    pub fn is_swing_level(&self) -> bool {
        matches!(self, Self::MissingData { .. } | Self::InvalidSwing { .. })
    }
}
