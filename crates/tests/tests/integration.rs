// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Result};
use gf_events::{FeedbackEvent, Operation};
use gf_feedback::{
    CreateSession, FeedbackError, FeedbackResults, FinalizationState, GetFinalizationState,
    GetResults, GetSessionCount, GetSessionInfo, HasMemberSubmitted, ListSessions,
    RequestFinalize, SessionInfo,
};
use gf_logger::try_setup_env_tracing;
use gf_test_helpers::{member, FeedbackSystemBuilder, DEFAULT_NOW};
use std::time::Duration;
use tracing::Level;

/// Plaintext scheme, local oracle answering immediately
#[actix::test]
async fn test_full_feedback_lifecycle() -> Result<()> {
    try_setup_env_tracing(Level::INFO);

    let system = FeedbackSystemBuilder::new()
        .with_history()
        .with_errors()
        .with_logging()
        .with_oracle()
        .build()
        .await?;

    let session_id = system.open_session("Treasury proposal", 86_400).await?;

    for (n, score) in [(1, 8), (2, 9), (3, 7), (4, 10), (5, 6)] {
        assert_eq!(
            system.submit_score(session_id, score, member(n)).await??,
            n as u64
        );
    }

    system
        .service()
        .send(RequestFinalize { session_id })
        .await??;

    let history = system.take_history(9).await?;
    assert_eq!(
        history.event_types(),
        vec![
            "SessionCreated",
            "FeedbackSubmitted",
            "FeedbackSubmitted",
            "FeedbackSubmitted",
            "FeedbackSubmitted",
            "FeedbackSubmitted",
            "FinalizationRequested",
            "DecryptionPublished",
            "Finalized"
        ]
    );

    let Some(FeedbackEvent::Finalized { data, .. }) = history.last() else {
        bail!("Expected a Finalized event");
    };
    assert_eq!(data.total_score, 40);
    assert_eq!(data.feedback_count, 5);
    assert_eq!(data.average_score, 8);

    let results = system.service().send(GetResults { session_id }).await??;
    assert_eq!(
        results,
        FeedbackResults {
            total_score: 40,
            feedback_count: 5,
            average_score: 8
        }
    );
    // Reads are stable
    assert_eq!(
        system.service().send(GetResults { session_id }).await??,
        results
    );

    let info = system.service().send(GetSessionInfo { session_id }).await??;
    assert!(info.finalized);
    assert_eq!(info.feedback_count, 5);
    assert!(system.get_errors().await?.is_empty());

    Ok(())
}

#[actix::test]
async fn test_session_creation_rules() -> Result<()> {
    let system = FeedbackSystemBuilder::new().with_errors().build().await?;
    let creator = member(42);

    let session_id = system
        .service()
        .send(CreateSession {
            title: "T".to_string(),
            description: "D".to_string(),
            start_time: DEFAULT_NOW + 3600,
            end_time: DEFAULT_NOW + 90_000,
            creator,
        })
        .await??;

    assert_eq!(
        system.service().send(GetSessionInfo { session_id }).await??,
        SessionInfo {
            title: "T".to_string(),
            description: "D".to_string(),
            start_time: DEFAULT_NOW + 3600,
            end_time: DEFAULT_NOW + 90_000,
            creator,
            finalized: false,
            feedback_count: 0,
        }
    );

    let empty_title = system
        .service()
        .send(CreateSession {
            title: String::new(),
            description: "D".to_string(),
            start_time: DEFAULT_NOW,
            end_time: DEFAULT_NOW + 10,
            creator,
        })
        .await?;
    assert_eq!(empty_title, Err(FeedbackError::InvalidTitle));

    let reversed = system
        .service()
        .send(CreateSession {
            title: "T".to_string(),
            description: "D".to_string(),
            start_time: DEFAULT_NOW + 10,
            end_time: DEFAULT_NOW,
            creator,
        })
        .await?;
    assert_eq!(reversed, Err(FeedbackError::InvalidTimeRange));

    assert_eq!(system.service().send(GetSessionCount).await?, 1);
    let listed = system.service().send(ListSessions).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].0, session_id);

    actix::clock::sleep(Duration::from_millis(20)).await;
    let errors = system.get_errors().await?;
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.operation == Operation::CreateSession));

    Ok(())
}

#[actix::test]
async fn test_one_contribution_per_member() -> Result<()> {
    let system = FeedbackSystemBuilder::new().build().await?;
    let session_id = system.open_session("Grants round", 3600).await?;

    for (n, score) in [(1, 8), (2, 9), (3, 7)] {
        system.submit_score(session_id, score, member(n)).await??;
    }

    let again = system.submit_score(session_id, 10, member(1)).await?;
    assert_eq!(again, Err(FeedbackError::AlreadySubmitted));

    let info = system.service().send(GetSessionInfo { session_id }).await??;
    assert_eq!(info.feedback_count, 3);
    assert!(
        system
            .service()
            .send(HasMemberSubmitted {
                session_id,
                member: member(3)
            })
            .await??
    );
    assert!(
        !system
            .service()
            .send(HasMemberSubmitted {
                session_id,
                member: member(4)
            })
            .await??
    );

    Ok(())
}

#[actix::test]
async fn test_simultaneous_submissions_from_one_member() -> Result<()> {
    let system = FeedbackSystemBuilder::new().build().await?;
    let session_id = system.open_session("Race", 3600).await?;
    let voter = member(7);

    // every message is queued before any answer is awaited
    let requests = (1..=8)
        .map(|score| Ok(system.service().send(system.submission(session_id, score, voter)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut accepted = 0;
    for request in requests {
        match request.await? {
            Ok(count) => {
                assert_eq!(count, 1);
                accepted += 1;
            }
            Err(err) => assert_eq!(err, FeedbackError::AlreadySubmitted),
        }
    }
    assert_eq!(accepted, 1);

    let info = system.service().send(GetSessionInfo { session_id }).await??;
    assert_eq!(info.feedback_count, 1);

    Ok(())
}

#[actix::test]
async fn test_window_and_late_submissions() -> Result<()> {
    let system = FeedbackSystemBuilder::new()
        .with_oracle()
        .with_history()
        .with_errors()
        .build()
        .await?;
    let session_id = system.open_session("Short poll", 60).await?;
    system.submit_score(session_id, 4, member(1)).await??;
    system.submit_score(session_id, 6, member(2)).await??;

    // finalizing early is allowed
    system
        .service()
        .send(RequestFinalize { session_id })
        .await??;
    system.take_history(6).await?;
    assert_eq!(
        system
            .service()
            .send(GetFinalizationState { session_id })
            .await??,
        FinalizationState::Finalized
    );

    // still inside the window: accepted even though finalized, results unchanged
    assert_eq!(system.submit_score(session_id, 9, member(3)).await??, 3);
    let results = system.service().send(GetResults { session_id }).await??;
    assert_eq!((results.total_score, results.feedback_count), (10, 2));

    system.clock().advance(61);
    let late = system.submit_score(session_id, 9, member(4)).await?;
    assert_eq!(late, Err(FeedbackError::OutsideWindow));
    let also_late = system.submit_score(session_id, 9, member(5)).await?;
    assert_eq!(also_late, Err(FeedbackError::OutsideWindow));

    // each member's rejection is reported, not just the first
    actix::clock::sleep(Duration::from_millis(20)).await;
    let errors = system.get_errors().await?;
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| e.operation == Operation::SubmitFeedback && e.session_id == Some(session_id)));

    Ok(())
}

#[actix::test]
async fn test_results_and_finalization_guards() -> Result<()> {
    let system = FeedbackSystemBuilder::new().build().await?;
    let session_id = system.open_session("Open session", 3600).await?;

    assert_eq!(
        system.service().send(GetResults { session_id }).await?,
        Err(FeedbackError::NotFinalized)
    );
    assert_eq!(
        system.service().send(RequestFinalize { session_id }).await?,
        Err(FeedbackError::NoFeedback)
    );

    let missing = gf_events::SessionId::new(99);
    assert_eq!(
        system
            .service()
            .send(RequestFinalize {
                session_id: missing
            })
            .await?,
        Err(FeedbackError::SessionNotFound)
    );
    assert_eq!(
        system
            .service()
            .send(GetSessionInfo {
                session_id: missing
            })
            .await?,
        Err(FeedbackError::SessionNotFound)
    );

    // no oracle running: the request stays outstanding
    system.submit_score(session_id, 5, member(1)).await??;
    system
        .service()
        .send(RequestFinalize { session_id })
        .await??;
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
