// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Confidential feedback sessions.
//!
//! A [`SessionRegistry`] owns every session. Participants fold encrypted scores into a
//! per-session accumulator (the aggregation ledger) and a three-step state machine takes a
//! session from collection to a publicly readable total once an attested decryption arrives.
//! [`FeedbackService`] wraps the registry in an actor so that each operation runs to
//! completion before the next one starts.

mod clock;
mod error;
mod finalization;
mod ledger;
mod registry;
mod service;
mod session;

pub use clock::*;
pub use error::*;
pub use registry::*;
pub use service::*;
pub use session::*;
