// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{FeedbackError, Session, SessionInfo};
use alloy::primitives::Address;
use anyhow::{Context, Result};
use gf_events::SessionId;
use gf_fhe::InputContext;
use serde::{Deserialize, Serialize};

/// Every session ever created, indexed by id. Sessions are appended and never removed so
/// an id is its position in the arena.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRegistry {
    contract: Address,
    sessions: Vec<Session>,
    next_request_id: u64,
}

impl SessionRegistry {
    /// `contract` is the context encrypted inputs and decryption attestations must be bound to.
    pub fn new(contract: Address) -> Self {
        Self {
            contract,
            sessions: Vec::new(),
            next_request_id: 0,
        }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn input_context(&self, session_id: SessionId) -> InputContext {
        InputContext::new(self.contract, session_id)
    }

    pub fn create_session(
        &mut self,
        title: &str,
        description: &str,
        start_time: u64,
        end_time: u64,
        creator: Address,
    ) -> Result<SessionId, FeedbackError> {
        if title.is_empty() {
            return Err(FeedbackError::InvalidTitle);
        }
        if end_time <= start_time {
            return Err(FeedbackError::InvalidTimeRange);
        }

        let id = SessionId::new(self.sessions.len() as u64);
        self.sessions.push(Session::new(
            id,
            title.to_string(),
            description.to_string(),
            start_time,
            end_time,
            creator,
        ));
        Ok(id)
    }

    pub fn session_count(&self) -> u64 {
        self.sessions.len() as u64
    }

    pub fn session_info(&self, session_id: SessionId) -> Result<SessionInfo, FeedbackError> {
        Ok(self.get(session_id)?.info())
    }

    pub fn list_sessions(&self) -> Vec<(SessionId, SessionInfo)> {
        self.sessions.iter().map(|s| (s.id(), s.info())).collect()
    }

    pub fn get(&self, session_id: SessionId) -> Result<&Session, FeedbackError> {
        session_id
            .index()
            .and_then(|index| self.sessions.get(index))
            .ok_or(FeedbackError::SessionNotFound)
    }

    pub(crate) fn get_mut(&mut self, session_id: SessionId) -> Result<&mut Session, FeedbackError> {
        session_id
            .index()
            .and_then(|index| self.sessions.get_mut(index))
            .ok_or(FeedbackError::SessionNotFound)
    }

    pub(crate) fn issue_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).context("Could not serialize session registry")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).context("Could not deserialize session registry")
    }
}
