// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod decryption_published;
mod feedback_submitted;
mod finalization_requested;
mod finalized;
mod operation_rejected;
mod session_created;

pub use decryption_published::*;
pub use feedback_submitted::*;
pub use finalization_requested::*;
pub use finalized::*;
pub use operation_rejected::*;
pub use session_created::*;

use crate::{ErrorEvent, Event, EventId, SessionId};
use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to help define From traits for FeedbackEvent
macro_rules! impl_from_event {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for FeedbackEvent {
                fn from(data: $variant) -> Self {
                    FeedbackEvent::$variant {
                        id: EventId::hash(data.clone()),
                        data,
                    }
                }
            }
        )*
    };
}

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub enum FeedbackEvent {
    SessionCreated {
        id: EventId,
        data: SessionCreated,
    },
    FeedbackSubmitted {
        id: EventId,
        data: FeedbackSubmitted,
    },
    FinalizationRequested {
        id: EventId,
        data: FinalizationRequested,
    },
    DecryptionPublished {
        id: EventId,
        data: DecryptionPublished,
    },
    Finalized {
        id: EventId,
        data: Finalized,
    },
    OperationRejected {
        id: EventId,
        data: OperationRejected,
    },
}

impl FeedbackEvent {
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    pub fn get_id(&self) -> EventId {
        match self {
            FeedbackEvent::SessionCreated { id, .. } => id.clone(),
            FeedbackEvent::FeedbackSubmitted { id, .. } => id.clone(),
            FeedbackEvent::FinalizationRequested { id, .. } => id.clone(),
            FeedbackEvent::DecryptionPublished { id, .. } => id.clone(),
            FeedbackEvent::Finalized { id, .. } => id.clone(),
            FeedbackEvent::OperationRejected { id, .. } => id.clone(),
        }
    }

    pub fn get_session_id(&self) -> Option<SessionId> {
        match self {
            FeedbackEvent::SessionCreated { data, .. } => Some(data.session_id),
            FeedbackEvent::FeedbackSubmitted { data, .. } => Some(data.session_id),
            FeedbackEvent::FinalizationRequested { data, .. } => Some(data.session_id),
            FeedbackEvent::DecryptionPublished { data, .. } => {
                Some(data.attestation.payload.session_id)
            }
            FeedbackEvent::Finalized { data, .. } => Some(data.session_id),
            FeedbackEvent::OperationRejected { data, .. } => data.session_id,
        }
    }

    pub fn get_data(&self) -> String {
        match self {
            FeedbackEvent::SessionCreated { data, .. } => format!("{}", data),
            FeedbackEvent::FeedbackSubmitted { data, .. } => format!("{}", data),
            FeedbackEvent::FinalizationRequested { data, .. } => format!("{}", data),
            FeedbackEvent::DecryptionPublished { data, .. } => format!("{}", data),
            FeedbackEvent::Finalized { data, .. } => format!("{}", data),
            FeedbackEvent::OperationRejected { data, .. } => format!("{}", data),
        }
    }
}

impl Event for FeedbackEvent {
    type Id = EventId;

    fn event_type(&self) -> String {
        match self {
            FeedbackEvent::SessionCreated { .. } => "SessionCreated",
            FeedbackEvent::FeedbackSubmitted { .. } => "FeedbackSubmitted",
            FeedbackEvent::FinalizationRequested { .. } => "FinalizationRequested",
            FeedbackEvent::DecryptionPublished { .. } => "DecryptionPublished",
            FeedbackEvent::Finalized { .. } => "Finalized",
            FeedbackEvent::OperationRejected { .. } => "OperationRejected",
        }
        .to_string()
    }

    fn event_id(&self) -> Self::Id {
        self.get_id()
    }
}

impl ErrorEvent for FeedbackEvent {
    type Error = OperationRejected;

    fn as_error(&self) -> Option<&Self::Error> {
        match self {
            FeedbackEvent::OperationRejected { data, .. } => Some(data),
            _ => None,
        }
    }
}

impl_from_event!(
    SessionCreated,
    FeedbackSubmitted,
    FinalizationRequested,
    DecryptionPublished,
    Finalized,
    OperationRejected
);

impl fmt::Display for FeedbackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.event_type(), self.get_data())
    }
}
