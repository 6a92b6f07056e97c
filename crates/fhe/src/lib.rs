// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod adapter;
mod bfv;
mod ciphertext;
mod encryptor;
mod plaintext;

pub use adapter::*;
pub use bfv::*;
pub use ciphertext::*;
pub use encryptor::*;
pub use plaintext::*;
