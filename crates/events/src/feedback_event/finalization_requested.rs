// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CiphertextHandle, SessionId};
use actix::Message;
use derivative::Derivative;
use gf_utils::ArcBytes;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Decryption request for a session's accumulated score.
///
/// Publishing this event is the access grant: it hands the decryption service the ciphertext
/// behind `handle`, tagged with the `request_id` its attestation must echo. `attempt` counts
/// prompts for the same request so a re-prompt is not dropped as a duplicate.
#[derive(Message, Derivative, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derivative(Debug)]
#[rtype(result = "()")]
pub struct FinalizationRequested {
    pub session_id: SessionId,
    pub request_id: u64,
    pub attempt: u32,
    pub handle: CiphertextHandle,
    #[derivative(Debug(format_with = "gf_utils::formatters::hexf"))]
    pub ciphertext: ArcBytes,
    pub feedback_count: u64,
}

impl Display for FinalizationRequested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session_id: {}, request_id: {}, attempt: {}, handle: {}, feedback_count: {}",
            self.session_id, self.request_id, self.attempt, self.handle, self.feedback_count
        )
    }
}
