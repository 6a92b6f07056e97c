// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::SchemeEncryptor;
use actix::Addr;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{bail, Context, Result};
use gf_events::{
    Event, EventBus, FeedbackEvent, GetErrors, HistoryCollector, OperationRejected, SessionId,
    TakeEvents,
};
use gf_feedback::{
    Clock, CreateSession, FeedbackError, FeedbackService, ManualClock, SubmitFeedback,
};
use gf_fhe::{InputContext, ScoreEncryptor};
use gf_oracle::DecryptionOracle;
use std::{ops::Deref, time::Duration};
use tokio::time::timeout;

/// Handles to a running feedback system.
pub struct FeedbackSystem {
    bus: Addr<EventBus<FeedbackEvent>>,
    service: Addr<FeedbackService>,
    oracle: Option<Addr<DecryptionOracle>>,
    oracle_key: PrivateKeySigner,
    history: Option<Addr<HistoryCollector<FeedbackEvent>>>,
    errors: Option<Addr<HistoryCollector<FeedbackEvent>>>,
    clock: ManualClock,
    contract: Address,
    encryptor: ScoreEncryptor<SchemeEncryptor>,
}

impl FeedbackSystem {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        bus: Addr<EventBus<FeedbackEvent>>,
        service: Addr<FeedbackService>,
        oracle: Option<Addr<DecryptionOracle>>,
        oracle_key: PrivateKeySigner,
        history: Option<Addr<HistoryCollector<FeedbackEvent>>>,
        errors: Option<Addr<HistoryCollector<FeedbackEvent>>>,
        clock: ManualClock,
        contract: Address,
        encryptor: ScoreEncryptor<SchemeEncryptor>,
    ) -> Self {
        Self {
            bus,
            service,
            oracle,
            oracle_key,
            history,
            errors,
            clock,
            contract,
            encryptor,
        }
    }

    pub fn bus(&self) -> &Addr<EventBus<FeedbackEvent>> {
        &self.bus
    }

    pub fn service(&self) -> &Addr<FeedbackService> {
        &self.service
    }

    pub fn oracle(&self) -> Option<&Addr<DecryptionOracle>> {
        self.oracle.as_ref()
    }

    /// Key the local oracle signs with.
    pub fn oracle_key(&self) -> &PrivateKeySigner {
        &self.oracle_key
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn input_context(&self, session_id: SessionId) -> InputContext {
        InputContext::new(self.contract, session_id)
    }

    /// Open a session whose window starts now and lasts `duration` seconds.
    pub async fn open_session(&self, title: &str, duration: u64) -> Result<SessionId> {
        let now = self.clock.now();
        let session_id = self
            .service
            .send(CreateSession {
                title: title.to_string(),
                description: format!("{title} description"),
                start_time: now,
                end_time: now + duration,
                creator: self.oracle_key.address(),
            })
            .await??;
        Ok(session_id)
    }

    /// Encrypted submission of `score` by `member`, ready to send.
    pub fn submission(
        &self,
        session_id: SessionId,
        score: u64,
        member: Address,
    ) -> Result<SubmitFeedback> {
        let context = self.input_context(session_id);
        let (encrypted_score, proof) = self.encryptor.encrypt_score(score, &member, &context)?;
        Ok(SubmitFeedback {
            session_id,
            encrypted_score,
            proof,
            submitter: member,
        })
    }

    /// Encrypt `score` for `member` and submit it. The inner result is the service's answer.
    pub async fn submit_score(
        &self,
        session_id: SessionId,
        score: u64,
        member: Address,
    ) -> Result<Result<u64, FeedbackError>> {
        let msg = self.submission(session_id, score, member)?;
        Ok(self.service.send(msg).await?)
    }

    pub async fn take_history(&self, count: usize) -> Result<FeedbackHistory> {
        self.take_history_with_timeout(count, Duration::from_millis(4000))
            .await
    }

    pub async fn take_history_with_timeout(
        &self,
        count: usize,
        tout: Duration,
    ) -> Result<FeedbackHistory> {
        let Some(history) = &self.history else {
            bail!("System was built without history");
        };

        let events = timeout(tout, history.send(TakeEvents::new(count)))
            .await
            .context(format!("Could not take {} events", count))??;

        Ok(FeedbackHistory(events))
    }

    pub async fn get_errors(&self) -> Result<Vec<OperationRejected>> {
        let Some(errors) = &self.errors else {
            bail!("System was built without error collection");
        };
        Ok(errors.send(GetErrors::new()).await?)
    }
}

#[derive(Debug, Clone)]
pub struct FeedbackHistory(Vec<FeedbackEvent>);

impl FeedbackHistory {
    pub fn filter_by_event_type(&self, event_type: &str) -> Vec<FeedbackEvent> {
        self.0
            .iter()
            .filter(|e| e.event_type() == event_type)
            .cloned()
            .collect()
    }

    pub fn event_types(&self) -> Vec<String> {
        self.0.iter().map(|e| e.event_type()).collect()
    }
}

impl Deref for FeedbackHistory {
    type Target = Vec<FeedbackEvent>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
