// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::SessionId;
use actix::Message;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A contribution was folded into the session's encrypted total. Carries nothing derived from
/// the score itself.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct FeedbackSubmitted {
    pub session_id: SessionId,
    pub submitter: Address,
    pub feedback_count: u64,
}

impl Display for FeedbackSubmitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session_id: {}, submitter: {}, feedback_count: {}",
            self.session_id, self.submitter, self.feedback_count
        )
    }
}
