// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{FeedbackError, SessionRegistry};
use alloy::primitives::Address;
use gf_events::SessionId;
use gf_fhe::{Ciphertext, HomomorphicAdapter, InputProof};
use tracing::warn;

impl SessionRegistry {
    /// Fold one participant's encrypted score into the session total.
    ///
    /// Checked in order: the session exists, `now` is inside the window, the submitter has not
    /// contributed yet and the adapter accepts the proof. The new accumulator is computed before
    /// anything is written so a failing addition leaves the session as it was.
    /// Returns the updated contribution count.
    pub fn submit_feedback<A: HomomorphicAdapter + ?Sized>(
        &mut self,
        adapter: &A,
        session_id: SessionId,
        encrypted_score: Ciphertext,
        proof: &InputProof,
        submitter: Address,
        now: u64,
    ) -> Result<u64, FeedbackError> {
        let context = self.input_context(session_id);
        let session = self.get_mut(session_id)?;

        if !session.is_within_window(now) {
            return Err(FeedbackError::OutsideWindow);
        }

        if session.participants.contains(&submitter) {
            return Err(FeedbackError::AlreadySubmitted);
        }

        match adapter.validate(&encrypted_score, proof, &submitter, &context) {
            Ok(true) => (),
            Ok(false) => return Err(FeedbackError::InvalidProof),
            Err(e) => {
                warn!(
                    session_id = %session_id,
                    submitter = %submitter,
                    adapter = adapter.name(),
                    "Could not validate encrypted input: {e}"
                );
                return Err(FeedbackError::InvalidProof);
            }
        }

        let accumulated = match &session.accumulated_score {
            Some(total) => adapter
                .add(total, &encrypted_score)
                .map_err(|e| FeedbackError::Homomorphic(e.to_string()))?,
            None => encrypted_score,
        };

        session.participants.insert(submitter);
        session.accumulated_score = Some(accumulated);
        session.feedback_count += 1;

        Ok(session.feedback_count)
    }

    pub fn has_member_submitted(
        &self,
        session_id: SessionId,
        member: &Address,
    ) -> Result<bool, FeedbackError> {
        Ok(self.get(session_id)?.participants.contains(member))
    }

    /// Current accumulator, `None` before the first contribution.
    pub fn encrypted_total_score(
        &self,
        session_id: SessionId,
    ) -> Result<Option<Ciphertext>, FeedbackError> {
        Ok(self.get(session_id)?.accumulated_score.clone())
    }

    pub fn is_session_active(
        &self,
        session_id: SessionId,
        now: u64,
    ) -> Result<bool, FeedbackError> {
        Ok(self.get(session_id)?.is_within_window(now))
    }
}
