// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use gf_events::{CiphertextHandle, SessionId};
use gf_fhe::Ciphertext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Finalization progress of a session. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FinalizationState {
    Open,
    FinalizationRequested,
    Finalized,
}

impl fmt::Display for FinalizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FinalizationState::Open => "Open",
            FinalizationState::FinalizationRequested => "FinalizationRequested",
            FinalizationState::Finalized => "Finalized",
        };
        f.write_str(name)
    }
}

/// Outstanding decryption request. A verified callback consumes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub request_id: u64,
    /// Handle of the accumulator at the time of the request
    pub handle: CiphertextHandle,
    /// Contributions folded into that accumulator
    pub feedback_count: u64,
    /// Number of times the request has been re-announced
    pub attempt: u32,
}

/// Revealed aggregate of a finalized session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedbackResults {
    pub total_score: u64,
    pub feedback_count: u64,
    pub average_score: u64,
}

impl FeedbackResults {
    /// `average_score` is the floor of `total_score / feedback_count`.
    pub fn from_total(total_score: u64, feedback_count: u64) -> Option<Self> {
        let average_score = total_score.checked_div(feedback_count)?;
        Some(Self {
            total_score,
            feedback_count,
            average_score,
        })
    }
}

/// Public view of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub title: String,
    pub description: String,
    pub start_time: u64,
    pub end_time: u64,
    pub creator: Address,
    pub finalized: bool,
    pub feedback_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) start_time: u64,
    pub(crate) end_time: u64,
    pub(crate) creator: Address,
    pub(crate) participants: BTreeSet<Address>,
    /// `None` until the first contribution arrives
    pub(crate) accumulated_score: Option<Ciphertext>,
    pub(crate) feedback_count: u64,
    pub(crate) state: FinalizationState,
    pub(crate) pending: Option<PendingRequest>,
    pub(crate) results: Option<FeedbackResults>,
}

impl Session {
    pub(crate) fn new(
        id: SessionId,
        title: String,
        description: String,
        start_time: u64,
        end_time: u64,
        creator: Address,
    ) -> Self {
        Self {
            id,
            title,
            description,
            start_time,
            end_time,
            creator,
            participants: BTreeSet::new(),
            accumulated_score: None,
            feedback_count: 0,
            state: FinalizationState::Open,
            pending: None,
            results: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> FinalizationState {
        self.state
    }

    pub fn feedback_count(&self) -> u64 {
        self.feedback_count
    }

    pub fn participants(&self) -> &BTreeSet<Address> {
        &self.participants
    }

    pub fn pending_request(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    /// Inclusive on both ends.
    pub fn is_within_window(&self, now: u64) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            title: self.title.clone(),
            description: self.description.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            creator: self.creator,
            finalized: self.state == FinalizationState::Finalized,
            feedback_count: self.feedback_count,
        }
    }
}
