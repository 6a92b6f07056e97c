// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::FeedbackConfig;
use alloy_primitives::Address;
use anyhow::{bail, Result};

pub fn validate(config: &FeedbackConfig) -> Result<()> {
    if config.oracle_signer() == Some(Address::ZERO) {
        bail!("oracle_signer must not be the zero address");
    }

    let bfv = config.bfv();
    if bfv.moduli.is_empty() {
        bail!("bfv.moduli must contain at least one modulus");
    }
    if !bfv.degree.is_power_of_two() {
        bail!("bfv.degree must be a power of two, got {}", bfv.degree);
    }
    if bfv.plaintext_modulus < 2 {
        bail!("bfv.plaintext_modulus must be at least 2");
    }

    if config.max_score() == 0 {
        bail!("max_score must be at least 1");
    }

    Ok(())
}
