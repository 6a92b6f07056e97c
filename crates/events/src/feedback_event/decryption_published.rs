// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::DecryptionAttestation;
use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Published by the decryption service once it has revealed a requested total. The session
/// service treats it as untrusted until the attestation checks out.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct DecryptionPublished {
    pub attestation: DecryptionAttestation,
}

impl Display for DecryptionPublished {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = &self.attestation.payload;
        write!(
            f,
            "session_id: {}, request_id: {}, handle: {}",
            payload.session_id, payload.request_id, payload.handle
        )
    }
}
