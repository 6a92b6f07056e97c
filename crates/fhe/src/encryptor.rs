// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Ciphertext, InputContext, InputProof};
use alloy::primitives::Address;
use anyhow::{bail, Result};

pub const DEFAULT_MAX_SCORE: u64 = 10;

/// Encrypts a single cleartext value
pub trait Encryptor {
    fn encrypt(&self, value: u64) -> Result<Ciphertext>;
}

/// Participant side helper: range checks a satisfaction score, encrypts it and binds it to the
/// submitter and session it is meant for.
pub struct ScoreEncryptor<E: Encryptor> {
    inner: E,
    max_score: u64,
}

impl<E: Encryptor> ScoreEncryptor<E> {
    pub fn new(inner: E) -> Self {
        Self::with_max_score(inner, DEFAULT_MAX_SCORE)
    }

    pub fn with_max_score(inner: E, max_score: u64) -> Self {
        Self { inner, max_score }
    }

    pub fn max_score(&self) -> u64 {
        self.max_score
    }

    pub fn encrypt_score(
        &self,
        score: u64,
        submitter: &Address,
        context: &InputContext,
    ) -> Result<(Ciphertext, InputProof)> {
        if score < 1 || score > self.max_score {
            bail!("Score {score} is outside 1..={}", self.max_score);
        }
        let ciphertext = self.inner.encrypt(score)?;
        let proof = InputProof::bind(&ciphertext, submitter, context);
        Ok((ciphertext, proof))
    }
}
