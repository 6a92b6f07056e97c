// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::Decryptor;
use actix::prelude::*;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use anyhow::Result;
use gf_events::{
    DecryptionAttestation, DecryptionPayload, DecryptionPublished, EventBus, FeedbackEvent,
    FinalizationRequested, Subscribe,
};
use gf_fhe::Ciphertext;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Decrypts accumulated totals on request and publishes signed results.
pub struct DecryptionOracle {
    bus: Addr<EventBus<FeedbackEvent>>,
    decryptor: Arc<dyn Decryptor>,
    signer: PrivateKeySigner,
    contract: Address,
    delay: Option<Duration>,
    paused: bool,
}

pub struct DecryptionOracleParams {
    pub bus: Addr<EventBus<FeedbackEvent>>,
    pub decryptor: Arc<dyn Decryptor>,
    pub signer: PrivateKeySigner,
    /// Contract the attestations are issued for
    pub contract: Address,
    /// Time to wait before publishing a result
    pub delay: Option<Duration>,
}

/// Stop answering requests. Requests received while paused are dropped.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct PauseOracle;

#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct ResumeOracle;

impl DecryptionOracle {
    pub fn new(params: DecryptionOracleParams) -> Self {
        Self {
            bus: params.bus,
            decryptor: params.decryptor,
            signer: params.signer,
            contract: params.contract,
            delay: params.delay,
            paused: false,
        }
    }

    pub fn attach(params: DecryptionOracleParams) -> Addr<Self> {
        let bus = params.bus.clone();
        let addr = DecryptionOracle::new(params).start();
        bus.do_send(Subscribe::new(
            "FinalizationRequested",
            addr.clone().recipient(),
        ));
        addr
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    fn attest(&self, request: &FinalizationRequested) -> Result<DecryptionAttestation> {
        let ciphertext = Ciphertext::from(request.ciphertext.clone());
        let total = self.decryptor.decrypt(&ciphertext)?;
        DecryptionAttestation::sign(
            DecryptionPayload {
                contract: self.contract,
                session_id: request.session_id,
                request_id: request.request_id,
                handle: ciphertext.handle(),
                total,
            },
            &self.signer,
        )
    }
}

impl Actor for DecryptionOracle {
    type Context = Context<Self>;
}

impl Handler<FeedbackEvent> for DecryptionOracle {
    type Result = ();
    fn handle(&mut self, msg: FeedbackEvent, ctx: &mut Self::Context) -> Self::Result {
        if let FeedbackEvent::FinalizationRequested { data, .. } = msg {
            <Self as Handler<FinalizationRequested>>::handle(self, data, ctx)
        }
    }
}

impl Handler<FinalizationRequested> for DecryptionOracle {
    type Result = ();
    fn handle(&mut self, msg: FinalizationRequested, ctx: &mut Self::Context) -> Self::Result {
        if self.paused {
            info!(
                session_id = %msg.session_id,
                request_id = msg.request_id,
                "Oracle paused, dropping request"
            );
            return;
        }

        let attestation = match self.attest(&msg) {
            Ok(attestation) => attestation,
            Err(e) => {
                error!(
                    session_id = %msg.session_id,
                    request_id = msg.request_id,
                    "Could not answer decryption request: {e}"
                );
                return;
            }
        };

        info!(
            session_id = %msg.session_id,
            request_id = msg.request_id,
            attempt = msg.attempt,
            "Publishing decryption"
        );
        let event = FeedbackEvent::from(DecryptionPublished { attestation });
        match self.delay {
            Some(delay) => {
                ctx.run_later(delay, move |act, _| act.bus.do_send(event));
            }
            None => self.bus.do_send(event),
        }
    }
}

impl Handler<PauseOracle> for DecryptionOracle {
    type Result = ();
    fn handle(&mut self, _: PauseOracle, _: &mut Self::Context) -> Self::Result {
        self.paused = true;
    }
}

impl Handler<ResumeOracle> for DecryptionOracle {
    type Result = ();
    fn handle(&mut self, _: ResumeOracle, _: &mut Self::Context) -> Self::Result {
        self.paused = false;
    }
}
