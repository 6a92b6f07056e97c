// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Result};
use gf_events::{FeedbackEvent, Operation};
use gf_feedback::{
    DecryptionCallback, FeedbackError, FinalizationState, GetFinalizationState, GetResults,
    RequestFinalize,
};
use gf_oracle::{PauseOracle, ResumeOracle};
use gf_test_helpers::{dev_signer, member, FeedbackSystemBuilder};
use std::time::Duration;

#[actix::test]
async fn test_duplicate_callback_is_rejected() -> Result<()> {
    let system = FeedbackSystemBuilder::new()
        .with_oracle()
        .with_history()
        .with_errors()
        .build()
        .await?;
    let session_id = system.open_session("Duplicate", 3600).await?;
    for (n, score) in [(1, 3), (2, 5)] {
        system.submit_score(session_id, score, member(n)).await??;
    }
    system
        .service()
        .send(RequestFinalize { session_id })
        .await??;

    let history = system.take_history(6).await?;
    let published = history.filter_by_event_type("DecryptionPublished");
    let Some(FeedbackEvent::DecryptionPublished { data, .. }) = published.first() else {
        bail!("Expected a DecryptionPublished event");
    };

    let replay = system
        .service()
        .send(DecryptionCallback {
            session_id,
            decrypted_total: data.attestation.payload.total,
            attestation: data.attestation.clone(),
        })
        .await?;
    assert_eq!(replay, Err(FeedbackError::AlreadyFinalized));

    let again = system.service().send(RequestFinalize { session_id }).await?;
    assert_eq!(again, Err(FeedbackError::AlreadyFinalized));

    let results = system.service().send(GetResults { session_id }).await??;
    assert_eq!(results.total_score, 8);
    assert_eq!(results.average_score, 4);

    let errors = system.get_errors().await?;
    let ops: Vec<_> = errors.iter().map(|e| e.operation).collect();
    assert_eq!(
        ops,
        vec![Operation::DecryptionCallback, Operation::RequestFinalize]
    );
    Ok(())
}

#[actix::test]
async fn test_callback_from_unknown_signer_is_unauthorized() -> Result<()> {
    let system = FeedbackSystemBuilder::new()
        .with_oracle()
        .with_oracle_key(dev_signer(2)?)
        .with_history()
        .with_errors()
        .build()
        .await?;
    let session_id = system.open_session("Forged", 3600).await?;
    system.submit_score(session_id, 7, member(1)).await??;
    system
        .service()
        .send(RequestFinalize { session_id })
        .await??;

    // SessionCreated, FeedbackSubmitted, FinalizationRequested, DecryptionPublished,
    // OperationRejected
    let history = system.take_history(5).await?;
    assert_eq!(
        history.event_types().last().map(String::as_str),
        Some("OperationRejected")
    );

    let errors = system.get_errors().await?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].operation, Operation::DecryptionCallback);
    assert_eq!(errors[0].session_id, Some(session_id));

    assert_eq!(
        system
            .service()
            .send(GetFinalizationState { session_id })
            .await??,
        FinalizationState::FinalizationRequested
    );
    assert_eq!(
        system.service().send(GetResults { session_id }).await?,
        Err(FeedbackError::NotFinalized)
    );
    Ok(())
}

#[actix::test]
async fn test_callbacks_refused_without_trusted_signer() -> Result<()> {
    let system = FeedbackSystemBuilder::new()
        .with_oracle()
        .with_trusted_signer(None)
        .with_errors()
        .with_history()
        .build()
        .await?;
    let session_id = system.open_session("No signer", 3600).await?;
    system.submit_score(session_id, 2, member(1)).await??;
    system
        .service()
        .send(RequestFinalize { session_id })
        .await??;

    system.take_history(5).await?;
    let errors = system.get_errors().await?;
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        FeedbackError::UnauthorizedCallback.to_string()
    );
    Ok(())
}

#[actix::test]
async fn test_contribution_during_request_makes_it_stale() -> Result<()> {
    let system = FeedbackSystemBuilder::new()
        .with_oracle()
        .with_oracle_delay(Duration::from_millis(200))
        .with_history()
        .with_errors()
        .build()
        .await?;
    let session_id = system.open_session("Stale", 3600).await?;
    system.submit_score(session_id, 5, member(1)).await??;
    system.submit_score(session_id, 5, member(2)).await??;

    let first = system
        .service()
        .send(RequestFinalize { session_id })
        .await??;
    // lands before the oracle answers
    system.submit_score(session_id, 8, member(3)).await??;

    // SessionCreated, 3 x FeedbackSubmitted, FinalizationRequested, DecryptionPublished,
    // OperationRejected
    system.take_history(7).await?;
    let errors = system.get_errors().await?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].operation, Operation::DecryptionCallback);

    let second = system
        .service()
        .send(RequestFinalize { session_id })
        .await??;
    assert_ne!(first, second);

    // FinalizationRequested, DecryptionPublished, Finalized
    system.take_history(3).await?;
    let results = system.service().send(GetResults { session_id }).await??;
    assert_eq!(results.total_score, 18);
    assert_eq!(results.feedback_count, 3);
    assert_eq!(results.average_score, 6);
    Ok(())
}

#[actix::test]
async fn test_rerequest_prompts_a_fresh_attempt() -> Result<()> {
    let system = FeedbackSystemBuilder::new()
        .with_oracle()
        .with_history()
        .build()
        .await?;
    let Some(oracle) = system.oracle() else {
        bail!("Expected an oracle");
    };
    let session_id = system.open_session("Retry", 3600).await?;
    system.submit_score(session_id, 10, member(1)).await??;
    system.submit_score(session_id, 9, member(2)).await??;

    // the decryption service drops the first request
    oracle.send(PauseOracle).await?;
    let first = system
        .service()
        .send(RequestFinalize { session_id })
        .await??;
    system.take_history(4).await?;
    oracle.send(ResumeOracle).await?;

    let second = system
        .service()
        .send(RequestFinalize { session_id })
        .await??;
    assert_eq!(first, second);

    // FinalizationRequested (attempt 1), DecryptionPublished, Finalized
    let history = system.take_history(3).await?;
    let Some(FeedbackEvent::FinalizationRequested { data, .. }) = history.first() else {
        bail!("Expected a FinalizationRequested event");
    };
    assert_eq!(data.attempt, 1);

    let results = system.service().send(GetResults { session_id }).await??;
    assert_eq!((results.total_score, results.average_score), (19, 9));
    Ok(())
}
