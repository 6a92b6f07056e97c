// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{keccak256, B256};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Stable reference to a ciphertext: `keccak256` of its serialized bytes.
///
/// Attestations and decryption requests refer to the accumulated score by handle so a callback
/// can be matched against the exact ciphertext that was granted for decryption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CiphertextHandle(B256);

impl CiphertextHandle {
    pub fn of(ciphertext: &[u8]) -> Self {
        Self(keccak256(ciphertext))
    }

    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = self.0.to_string();
        write!(f, "ct:{}", &full[..10])
    }
}
