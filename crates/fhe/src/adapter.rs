// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Ciphertext, InputContext, InputProof};
use alloy::primitives::Address;
use anyhow::Result;

/// Capability interface the session core needs from an encryption scheme.
///
/// Implementations own the ciphertext format. `validate` returning `Ok(false)` is a rejection
/// of the input; `Err` means the input could not be processed at all (for example it does not
/// decode). Callers treat both as a rejected submission.
pub trait HomomorphicAdapter: Send + Sync + 'static {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Check that `ciphertext` was honestly produced by `submitter` for `context`.
    fn validate(
        &self,
        ciphertext: &Ciphertext,
        proof: &InputProof,
        submitter: &Address,
        context: &InputContext,
    ) -> Result<bool>;

    /// Ciphertext-level addition.
    fn add(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext>;
}
