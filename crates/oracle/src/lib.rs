// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Local decryption service. Answers `FinalizationRequested` events with a signed
//! `DecryptionPublished` in place of an external threshold network.

mod decryptor;
mod oracle;

pub use decryptor::*;
pub use oracle::*;
