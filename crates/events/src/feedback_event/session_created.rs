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

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct SessionCreated {
    pub session_id: SessionId,
    pub creator: Address,
    pub title: String,
    pub start_time: u64,
    pub end_time: u64,
}

impl Display for SessionCreated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session_id: {}, creator: {}, title: {:?}, window: [{}, {}]",
            self.session_id, self.creator, self.title, self.start_time, self.end_time
        )
    }
}
