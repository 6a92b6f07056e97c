// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{FeedbackError, FeedbackResults, FinalizationState, PendingRequest, SessionRegistry};
use alloy::primitives::Address;
use gf_events::{DecryptionAttestation, FinalizationRequested, SessionId};
use tracing::{info, warn};

impl SessionRegistry {
    /// Grant the decryption service access to the session total and ask for it to be revealed.
    ///
    /// Calling this again while a request is outstanding is not an error: the same request is
    /// announced again with a higher `attempt`. If contributions arrived since the request was
    /// issued its handle no longer matches the accumulator, so a new request replaces it.
    pub fn request_finalize(
        &mut self,
        session_id: SessionId,
    ) -> Result<FinalizationRequested, FeedbackError> {
        let session = self.get(session_id)?;
        if session.state == FinalizationState::Finalized {
            return Err(FeedbackError::AlreadyFinalized);
        }
        if session.feedback_count == 0 {
            return Err(FeedbackError::NoFeedback);
        }
        let Some(accumulated) = session.accumulated_score.clone() else {
            return Err(FeedbackError::NoFeedback);
        };

        let handle = accumulated.handle();
        let feedback_count = session.feedback_count;
        let reusable = session
            .pending
            .as_ref()
            .filter(|p| p.handle == handle && p.feedback_count == feedback_count)
            .map(|p| (p.request_id, p.attempt.saturating_add(1)));

        let (request_id, attempt) = match reusable {
            Some(existing) => existing,
            None => (self.issue_request_id(), 0),
        };

        let session = self.get_mut(session_id)?;
        session.pending = Some(PendingRequest {
            request_id,
            handle,
            feedback_count,
            attempt,
        });
        session.state = FinalizationState::FinalizationRequested;

        Ok(FinalizationRequested {
            session_id,
            request_id,
            attempt,
            handle,
            ciphertext: accumulated.to_arc_bytes(),
            feedback_count,
        })
    }

    /// Alias of [`SessionRegistry::request_finalize`].
    pub fn grant_decryption_access(
        &mut self,
        session_id: SessionId,
    ) -> Result<FinalizationRequested, FeedbackError> {
        self.request_finalize(session_id)
    }

    /// Apply an attested decryption of the session total.
    ///
    /// The attestation must be signed by `oracle_signer` and name this contract and session.
    /// Once a session is finalized every further callback is `AlreadyFinalized`. Otherwise the
    /// attestation has to answer the outstanding request exactly (same request id and handle,
    /// no contributions since) and carry `decrypted_total`.
    pub fn on_decryption_callback(
        &mut self,
        session_id: SessionId,
        decrypted_total: u64,
        attestation: &DecryptionAttestation,
        oracle_signer: Option<Address>,
    ) -> Result<FeedbackResults, FeedbackError> {
        let contract = self.contract();
        let session = self.get_mut(session_id)?;
        let payload = &attestation.payload;

        let Some(oracle_signer) = oracle_signer else {
            warn!(session_id = %session_id, "No decryption signer configured, refusing callback");
            return Err(FeedbackError::UnauthorizedCallback);
        };
        if !attestation.is_signed_by(&oracle_signer)
            || payload.session_id != session_id
            || payload.contract != contract
        {
            return Err(FeedbackError::UnauthorizedCallback);
        }

        if session.state == FinalizationState::Finalized {
            return Err(FeedbackError::AlreadyFinalized);
        }

        let Some(pending) = session.pending.as_ref() else {
            return Err(FeedbackError::UnauthorizedCallback);
        };
        let current_handle = session.accumulated_score.as_ref().map(|ct| ct.handle());
        if payload.request_id != pending.request_id
            || payload.handle != pending.handle
            || current_handle != Some(pending.handle)
            || pending.feedback_count != session.feedback_count
            || payload.total != decrypted_total
        {
            return Err(FeedbackError::UnauthorizedCallback);
        }

        let results = FeedbackResults::from_total(decrypted_total, pending.feedback_count)
            .ok_or(FeedbackError::NoFeedback)?;

        session.results = Some(results);
        session.pending = None;
        session.state = FinalizationState::Finalized;
        info!(
            session_id = %session_id,
            request_id = payload.request_id,
            total = results.total_score,
            count = results.feedback_count,
            "Session finalized"
        );

        Ok(results)
    }

    pub fn get_results(&self, session_id: SessionId) -> Result<FeedbackResults, FeedbackError> {
        let session = self.get(session_id)?;
        match (session.state, session.results) {
            (FinalizationState::Finalized, Some(results)) => Ok(results),
            _ => Err(FeedbackError::NotFinalized),
        }
    }

    pub fn finalization_state(
        &self,
        session_id: SessionId,
    ) -> Result<FinalizationState, FeedbackError> {
        Ok(self.get(session_id)?.state)
    }
}
