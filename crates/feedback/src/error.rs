// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an operation on the registry is refused. A refused operation leaves every
/// session untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackError {
    #[error("Session title must not be empty")]
    InvalidTitle,

    #[error("Session end time must be after its start time")]
    InvalidTimeRange,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Submission window is closed")]
    OutsideWindow,

    #[error("Member has already submitted feedback")]
    AlreadySubmitted,

    #[error("Encrypted input proof was rejected")]
    InvalidProof,

    #[error("Session has no feedback to finalize")]
    NoFeedback,

    #[error("Decryption callback is not authorized for this request")]
    UnauthorizedCallback,

    #[error("Session is already finalized")]
    AlreadyFinalized,

    #[error("Session is not finalized")]
    NotFinalized,

    #[error("Homomorphic operation failed: {0}")]
    Homomorphic(String),
}

impl FeedbackError {
    /// Whether the error came from a collaborator rather than from the request itself.
    pub fn is_external(&self) -> bool {
        matches!(self, FeedbackError::Homomorphic(_))
    }
}

