// src/error.rs
use crate::skeleton::HandSide;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetargetError {
    #[error("hand tracking authorization denied")]
    AuthorizationDenied,

    #[error("failed to start hand tracking: {0}")]
    SessionStartFailure(String),

    #[error("glove model not found: {0}")]
    AssetNotFound(String),

    #[error("failed to load {identifier}: {reason}")]
    AssetLoadFailure { identifier: String, reason: String },

    #[error(
        "joint count mismatch for {side} glove: model has {actual} joints, \
         but the hand skeleton has {expected} joints"
    )]
    JointCountMismatch {
        side: HandSide,
        expected: usize,
        actual: usize,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RetargetError>;
