// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    Clock, FeedbackError, FeedbackResults, FinalizationState, SessionInfo, SessionRegistry,
};
use actix::prelude::*;
use alloy::primitives::Address;
use gf_events::{
    DecryptionAttestation, DecryptionPublished, EventBus, FeedbackEvent, FeedbackSubmitted,
    Finalized, Operation, OperationRejected, SessionCreated, SessionId, Subscribe,
};
use gf_fhe::{Ciphertext, HomomorphicAdapter, InputProof};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<SessionId, FeedbackError>")]
pub struct CreateSession {
    pub title: String,
    pub description: String,
    pub start_time: u64,
    pub end_time: u64,
    pub creator: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "u64")]
pub struct GetSessionCount;

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<SessionInfo, FeedbackError>")]
pub struct GetSessionInfo {
    pub session_id: SessionId,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Vec<(SessionId, SessionInfo)>")]
pub struct ListSessions;

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<u64, FeedbackError>")]
pub struct SubmitFeedback {
    pub session_id: SessionId,
    pub encrypted_score: Ciphertext,
    pub proof: InputProof,
    pub submitter: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<bool, FeedbackError>")]
pub struct HasMemberSubmitted {
    pub session_id: SessionId,
    pub member: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<Option<Ciphertext>, FeedbackError>")]
pub struct GetEncryptedTotalScore {
    pub session_id: SessionId,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<bool, FeedbackError>")]
pub struct IsSessionActive {
    pub session_id: SessionId,
}

/// Also serves as the decryption access grant. Resolves to the request id that a callback
/// must answer.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<u64, FeedbackError>")]
pub struct RequestFinalize {
    pub session_id: SessionId,
}

pub type GrantDecryptionAccess = RequestFinalize;

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<FeedbackResults, FeedbackError>")]
pub struct DecryptionCallback {
    pub session_id: SessionId,
    pub decrypted_total: u64,
    pub attestation: DecryptionAttestation,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<FeedbackResults, FeedbackError>")]
pub struct GetResults {
    pub session_id: SessionId,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<FinalizationState, FeedbackError>")]
pub struct GetFinalizationState {
    pub session_id: SessionId,
}

/// Serialized registry for a host to persist.
#[derive(Message, Clone, Debug)]
#[rtype(result = "anyhow::Result<Vec<u8>>")]
pub struct GetSnapshot;

pub struct FeedbackServiceParams {
    pub bus: Addr<EventBus<FeedbackEvent>>,
    pub adapter: Arc<dyn HomomorphicAdapter>,
    pub clock: Arc<dyn Clock>,
    /// Address decryption attestations must be signed by
    pub oracle_signer: Option<Address>,
    pub registry: SessionRegistry,
}

/// Owns the [`SessionRegistry`]. The actor mailbox serializes every operation, which is what
/// makes "not yet submitted, then accumulate" indivisible.
pub struct FeedbackService {
    bus: Addr<EventBus<FeedbackEvent>>,
    adapter: Arc<dyn HomomorphicAdapter>,
    clock: Arc<dyn Clock>,
    oracle_signer: Option<Address>,
    registry: SessionRegistry,
    rejections: u64,
}

impl FeedbackService {
    pub fn new(params: FeedbackServiceParams) -> Self {
        Self {
            bus: params.bus,
            adapter: params.adapter,
            clock: params.clock,
            oracle_signer: params.oracle_signer,
            registry: params.registry,
            rejections: 0,
        }
    }

    /// Start the service and listen for published decryptions on `bus`.
    pub fn attach(params: FeedbackServiceParams) -> Addr<Self> {
        let bus = params.bus.clone();
        let addr = FeedbackService::new(params).start();
        bus.do_send(Subscribe::new("DecryptionPublished", addr.clone().recipient()));
        addr
    }

    fn publish(&self, event: impl Into<FeedbackEvent>) {
        self.bus.do_send(event.into());
    }

    fn reject(&mut self, session_id: Option<SessionId>, operation: Operation, err: &FeedbackError) {
        if err.is_external() {
            error!(operation = %operation, session_id = ?session_id, "{err}");
        } else {
            warn!(operation = %operation, session_id = ?session_id, "{err}");
        }
        let seq = self.rejections;
        self.rejections += 1;
        self.publish(OperationRejected::new(
            seq,
            session_id,
            operation,
            &err.to_string(),
        ));
    }

    fn apply_callback(
        &mut self,
        session_id: SessionId,
        decrypted_total: u64,
        attestation: &DecryptionAttestation,
    ) -> Result<FeedbackResults, FeedbackError> {
        let result = self.registry.on_decryption_callback(
            session_id,
            decrypted_total,
            attestation,
            self.oracle_signer,
        );
        match &result {
            Ok(results) => self.publish(Finalized {
                session_id,
                total_score: results.total_score,
                feedback_count: results.feedback_count,
                average_score: results.average_score,
            }),
            Err(err) => self.reject(Some(session_id), Operation::DecryptionCallback, err),
        }
        result
    }
}

impl Actor for FeedbackService {
    type Context = Context<Self>;
}

impl Handler<FeedbackEvent> for FeedbackService {
    type Result = ();
    fn handle(&mut self, msg: FeedbackEvent, ctx: &mut Self::Context) -> Self::Result {
        if let FeedbackEvent::DecryptionPublished { data, .. } = msg {
            <Self as Handler<DecryptionPublished>>::handle(self, data, ctx)
        }
    }
}

impl Handler<DecryptionPublished> for FeedbackService {
    type Result = ();
    fn handle(&mut self, msg: DecryptionPublished, _: &mut Self::Context) -> Self::Result {
        let attestation = msg.attestation;
        let payload = &attestation.payload;
        info!(
            session_id = %payload.session_id,
            request_id = payload.request_id,
            "Decryption published"
        );
        // Outcome is reported on the bus
        let _ = self.apply_callback(payload.session_id, payload.total, &attestation);
    }
}

impl Handler<CreateSession> for FeedbackService {
    type Result = Result<SessionId, FeedbackError>;
    fn handle(&mut self, msg: CreateSession, _: &mut Self::Context) -> Self::Result {
        match self.registry.create_session(
            &msg.title,
            &msg.description,
            msg.start_time,
            msg.end_time,
            msg.creator,
        ) {
            Ok(session_id) => {
                info!(session_id = %session_id, creator = %msg.creator, "Session created");
                self.publish(SessionCreated {
                    session_id,
                    creator: msg.creator,
                    title: msg.title,
                    start_time: msg.start_time,
                    end_time: msg.end_time,
                });
                Ok(session_id)
            }
            Err(err) => {
                self.reject(None, Operation::CreateSession, &err);
                Err(err)
            }
        }
    }
}

impl Handler<GetSessionCount> for FeedbackService {
    type Result = u64;
    fn handle(&mut self, _: GetSessionCount, _: &mut Self::Context) -> Self::Result {
        self.registry.session_count()
    }
}

impl Handler<GetSessionInfo> for FeedbackService {
    type Result = Result<SessionInfo, FeedbackError>;
    fn handle(&mut self, msg: GetSessionInfo, _: &mut Self::Context) -> Self::Result {
        self.registry.session_info(msg.session_id)
    }
}

impl Handler<ListSessions> for FeedbackService {
    type Result = Vec<(SessionId, SessionInfo)>;
    fn handle(&mut self, _: ListSessions, _: &mut Self::Context) -> Self::Result {
        self.registry.list_sessions()
    }
}

impl Handler<SubmitFeedback> for FeedbackService {
    type Result = Result<u64, FeedbackError>;
    fn handle(&mut self, msg: SubmitFeedback, _: &mut Self::Context) -> Self::Result {
        let now = self.clock.now();
        let result = self.registry.submit_feedback(
            &*self.adapter,
            msg.session_id,
            msg.encrypted_score,
            &msg.proof,
            msg.submitter,
            now,
        );
        match &result {
            Ok(feedback_count) => {
                info!(
                    session_id = %msg.session_id,
                    submitter = %msg.submitter,
                    feedback_count,
                    "Feedback accepted"
                );
                self.publish(FeedbackSubmitted {
                    session_id: msg.session_id,
                    submitter: msg.submitter,
                    feedback_count: *feedback_count,
                });
            }
            Err(err) => self.reject(Some(msg.session_id), Operation::SubmitFeedback, err),
        }
        result
    }
}

impl Handler<HasMemberSubmitted> for FeedbackService {
    type Result = Result<bool, FeedbackError>;
    fn handle(&mut self, msg: HasMemberSubmitted, _: &mut Self::Context) -> Self::Result {
        self.registry.has_member_submitted(msg.session_id, &msg.member)
    }
}

impl Handler<GetEncryptedTotalScore> for FeedbackService {
    type Result = Result<Option<Ciphertext>, FeedbackError>;
    fn handle(&mut self, msg: GetEncryptedTotalScore, _: &mut Self::Context) -> Self::Result {
        self.registry.encrypted_total_score(msg.session_id)
    }
}

impl Handler<IsSessionActive> for FeedbackService {
    type Result = Result<bool, FeedbackError>;
    fn handle(&mut self, msg: IsSessionActive, _: &mut Self::Context) -> Self::Result {
        self.registry.is_session_active(msg.session_id, self.clock.now())
    }
}

impl Handler<RequestFinalize> for FeedbackService {
    type Result = Result<u64, FeedbackError>;
    fn handle(&mut self, msg: RequestFinalize, _: &mut Self::Context) -> Self::Result {
        match self.registry.request_finalize(msg.session_id) {
            Ok(request) => {
                let request_id = request.request_id;
                info!(
                    session_id = %msg.session_id,
                    request_id,
                    attempt = request.attempt,
                    handle = %request.handle,
                    "Decryption requested"
                );
                self.publish(request);
                Ok(request_id)
            }
            Err(err) => {
                self.reject(Some(msg.session_id), Operation::RequestFinalize, &err);
                Err(err)
            }
        }
    }
}

impl Handler<DecryptionCallback> for FeedbackService {
    type Result = Result<FeedbackResults, FeedbackError>;
    fn handle(&mut self, msg: DecryptionCallback, _: &mut Self::Context) -> Self::Result {
        self.apply_callback(msg.session_id, msg.decrypted_total, &msg.attestation)
    }
}

impl Handler<GetResults> for FeedbackService {
    type Result = Result<FeedbackResults, FeedbackError>;
    fn handle(&mut self, msg: GetResults, _: &mut Self::Context) -> Self::Result {
        self.registry.get_results(msg.session_id)
    }
}

impl Handler<GetFinalizationState> for FeedbackService {
    type Result = Result<FinalizationState, FeedbackError>;
    fn handle(&mut self, msg: GetFinalizationState, _: &mut Self::Context) -> Self::Result {
        self.registry.finalization_state(msg.session_id)
    }
}

impl Handler<GetSnapshot> for FeedbackService {
    type Result = anyhow::Result<Vec<u8>>;
    fn handle(&mut self, _: GetSnapshot, _: &mut Self::Context) -> Self::Result {
        self.registry.to_bytes()
    }
}
