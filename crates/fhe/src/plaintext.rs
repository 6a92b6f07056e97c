// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Ciphertext, Encryptor, HomomorphicAdapter, InputContext, InputProof};
use alloy::primitives::Address;
use anyhow::{anyhow, bail, Result};

/// Stand-in scheme that "encrypts" a value as its little-endian `u64` bytes.
///
/// It offers no confidentiality and exists so the session lifecycle can be exercised without
/// real cryptography. Proof checking is the same input binding the BFV adapter uses.
#[derive(Clone, Debug, Default)]
pub struct PlaintextAdapter;

impl PlaintextAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(value: u64) -> Ciphertext {
        Ciphertext::from_bytes(&value.to_le_bytes())
    }

    pub fn decode(ciphertext: &Ciphertext) -> Result<u64> {
        let bytes: [u8; 8] = ciphertext
            .as_bytes()
            .try_into()
            .map_err(|_| anyhow!("Plaintext ciphertext must be 8 bytes"))?;
        Ok(u64::from_le_bytes(bytes))
    }
}

impl HomomorphicAdapter for PlaintextAdapter {
    fn name(&self) -> &'static str {
        "plaintext"
    }

    fn validate(
        &self,
        ciphertext: &Ciphertext,
        proof: &InputProof,
        submitter: &Address,
        context: &InputContext,
    ) -> Result<bool> {
        Self::decode(ciphertext)?;
        Ok(proof.binds(ciphertext, submitter, context))
    }

    fn add(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        let Some(sum) = Self::decode(lhs)?.checked_add(Self::decode(rhs)?) else {
            bail!("Plaintext accumulator overflow");
        };
        Ok(Self::encode(sum))
    }
}

impl Encryptor for PlaintextAdapter {
    fn encrypt(&self, value: u64) -> Result<Ciphertext> {
        Ok(Self::encode(value))
    }
}
