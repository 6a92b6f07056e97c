// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::SessionId;
use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct Finalized {
    pub session_id: SessionId,
    pub total_score: u64,
    pub feedback_count: u64,
    pub average_score: u64,
}

impl Display for Finalized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session_id: {}, total_score: {}, feedback_count: {}, average_score: {}",
            self.session_id, self.total_score, self.feedback_count, self.average_score
        )
    }
}
