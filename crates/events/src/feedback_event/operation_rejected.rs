// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::SessionId;
use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use strum::{Display as StrumDisplay, EnumString};

/// Operation a rejection refers to
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay, EnumString,
)]
pub enum Operation {
    CreateSession,
    SubmitFeedback,
    RequestFinalize,
    DecryptionCallback,
}

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct OperationRejected {
    /// Position of this rejection among those raised by the publishing service
    pub seq: u64,
    pub session_id: Option<SessionId>,
    pub operation: Operation,
    pub message: String,
}

impl OperationRejected {
    pub fn new(
        seq: u64,
        session_id: Option<SessionId>,
        operation: Operation,
        message: &str,
    ) -> Self {
        Self {
            seq,
            session_id,
            operation,
            message: message.to_string(),
        }
    }
}

impl Display for OperationRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.session_id {
            Some(id) => write!(f, "{} on {}: {}", self.operation, id, self.message),
            None => write!(f, "{}: {}", self.operation, self.message),
        }
    }
}
