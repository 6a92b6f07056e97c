// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod attestation;
mod event_id;
mod eventbus;
mod feedback_event;
mod handle;
mod session_id;
mod traits;

pub use attestation::*;
pub use event_id::*;
pub use eventbus::*;
pub use feedback_event::*;
pub use handle::*;
pub use session_id::*;
pub use traits::*;
