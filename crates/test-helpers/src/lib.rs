// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod feedback_system;
mod feedback_system_builder;
mod fixtures;

pub use feedback_system::*;
pub use feedback_system_builder::*;
pub use fixtures::*;
