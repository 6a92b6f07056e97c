// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Result};
use gf_config::load_config;
use gf_events::FeedbackEvent;
use gf_feedback::{GetEncryptedTotalScore, GetResults, RequestFinalize};
use gf_fhe::BfvParamSet;
use gf_test_helpers::{member, oracle_signer, FeedbackSystemBuilder};
use std::io::Write;

#[actix::test]
async fn test_bfv_scores_are_summed_under_encryption() -> Result<()> {
    let system = FeedbackSystemBuilder::new()
        .with_bfv()
        .with_oracle()
        .with_history()
        .with_errors()
        .build()
        .await?;
    let session_id = system.open_session("Encrypted", 3600).await?;

    let mut handles = vec![];
    for (n, score) in [(1, 8), (2, 9), (3, 7), (4, 10), (5, 6)] {
        system.submit_score(session_id, score, member(n)).await??;
        let Some(total) = system
            .service()
            .send(GetEncryptedTotalScore { session_id })
            .await??
        else {
            bail!("Expected an accumulated ciphertext");
        };
        handles.push(total.handle());
    }
    // every contribution produces a new accumulator
    handles.dedup();
    assert_eq!(handles.len(), 5);

    system
        .service()
        .send(RequestFinalize { session_id })
        .await??;
    let history = system.take_history(9).await?;
    let Some(FeedbackEvent::Finalized { data, .. }) = history.last() else {
        bail!("Expected a Finalized event, got {:?}", history.event_types());
    };
    assert_eq!(
        (data.total_score, data.feedback_count, data.average_score),
        (40, 5, 8)
    );
    assert!(system.get_errors().await?.is_empty());
    Ok(())
}

#[actix::test]
async fn test_bfv_average_is_floored() -> Result<()> {
    let system = FeedbackSystemBuilder::new()
        .with_bfv()
        .with_oracle()
        .with_history()
        .build()
        .await?;
    let session_id = system.open_session("Floor", 3600).await?;

    // out of range scores never leave the participant
    assert!(system.submit_score(session_id, 11, member(1)).await.is_err());
    assert!(system.submit_score(session_id, 0, member(1)).await.is_err());

    for (n, score) in [(1, 10), (2, 10), (3, 9)] {
        system.submit_score(session_id, score, member(n)).await??;
    }

    system
        .service()
        .send(RequestFinalize { session_id })
        .await??;
    system.take_history(7).await?;

    let results = system.service().send(GetResults { session_id }).await??;
    assert_eq!(results.total_score, 29);
    assert_eq!(results.average_score, 9);
    Ok(())
}

#[actix::test]
#[serial_test::serial]
async fn test_system_from_config_file() -> Result<()> {
    let signer = oracle_signer()?.address();
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    writeln!(
        file,
        r#"
name: "integration"
contract: "0x00000000000000000000000000000000000000c0"
oracle_signer: "{signer}"
max_score: 20
bfv:
  degree: 512
  plaintext_modulus: 1032193
  moduli: [68719403009, 68719230977]
"#
    )?;

    let config = load_config(
        "integration",
        Some(file.path().to_string_lossy().into_owned()),
    )?;
    assert_eq!(config.bfv(), &BfvParamSet::insecure_512());
    assert_eq!(config.oracle_signer(), Some(signer));

    let system = FeedbackSystemBuilder::from_config(&config)
        .with_oracle()
        .with_history()
        .build()
        .await?;
    assert_eq!(system.contract(), config.contract());

    let session_id = system.open_session("Configured", 3600).await?;
    for (n, score) in [(1, 20), (2, 13), (3, 7)] {
        system.submit_score(session_id, score, member(n)).await??;
    }
    system
        .service()
        .send(RequestFinalize { session_id })
        .await??;
    system.take_history(7).await?;

    let results = system.service().send(GetResults { session_id }).await??;
    assert_eq!(
        (results.total_score, results.feedback_count, results.average_score),
        (40, 3, 13)
    );
    Ok(())
}
