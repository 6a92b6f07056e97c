// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{oracle_signer, BfvFixture, FeedbackSystem, SchemeEncryptor};
use actix::Actor;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use anyhow::Result;
use gf_config::FeedbackConfig;
use gf_events::{EventBus, EventBusConfig, FeedbackEvent};
use gf_feedback::{FeedbackService, FeedbackServiceParams, ManualClock, SessionRegistry};
use gf_fhe::{
    BfvAdapter, BfvEncryptor, BfvParamSet, HomomorphicAdapter, PlaintextAdapter, ScoreEncryptor,
    DEFAULT_MAX_SCORE,
};
use gf_logger::SimpleLogger;
use gf_oracle::{
    BfvDecryptor, DecryptionOracle, DecryptionOracleParams, Decryptor, PlaintextDecryptor,
};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_NOW: u64 = 1_700_000_000;
const BFV_SEED: u64 = 42;

enum Scheme {
    Plaintext,
    Bfv(BfvParamSet),
}

/// Build an in process feedback system: bus, service and optionally a local decryption oracle.
pub struct FeedbackSystemBuilder {
    contract: Address,
    deduplicate: bool,
    max_score: u64,
    history: bool,
    errors: bool,
    logging: bool,
    oracle: bool,
    oracle_delay: Option<Duration>,
    oracle_key: Option<PrivateKeySigner>,
    trusted_signer: Option<Option<Address>>,
    scheme: Scheme,
}

impl FeedbackSystemBuilder {
    pub fn new() -> Self {
        Self {
            contract: Address::repeat_byte(0xcc),
            deduplicate: true,
            max_score: DEFAULT_MAX_SCORE,
            history: false,
            errors: false,
            logging: false,
            oracle: false,
            oracle_delay: None,
            oracle_key: None,
            trusted_signer: None,
            scheme: Scheme::Plaintext,
        }
    }

    /// Take contract, trusted signer, bus and BFV settings from a loaded configuration.
    pub fn from_config(config: &FeedbackConfig) -> Self {
        let mut builder = Self::new();
        builder.contract = config.contract();
        builder.deduplicate = config.bus().deduplicate;
        builder.max_score = config.max_score();
        builder.scheme = Scheme::Bfv(config.bfv().clone());
        if let Some(signer) = config.oracle_signer() {
            builder.trusted_signer = Some(Some(signer));
        }
        builder
    }

    pub fn with_history(mut self) -> Self {
        self.history = true;
        self
    }

    pub fn with_errors(mut self) -> Self {
        self.errors = true;
        self
    }

    pub fn with_logging(mut self) -> Self {
        self.logging = true;
        self
    }

    /// Run a local decryption oracle that answers finalization requests.
    pub fn with_oracle(mut self) -> Self {
        self.oracle = true;
        self
    }

    pub fn with_oracle_delay(mut self, delay: Duration) -> Self {
        self.oracle_delay = Some(delay);
        self
    }

    /// Key the local oracle signs with. The service still trusts the default oracle address
    /// unless [`Self::with_trusted_signer`] says otherwise.
    pub fn with_oracle_key(mut self, key: PrivateKeySigner) -> Self {
        self.oracle_key = Some(key);
        self
    }

    /// Address the service accepts attestations from. `None` refuses every callback.
    pub fn with_trusted_signer(mut self, signer: Option<Address>) -> Self {
        self.trusted_signer = Some(signer);
        self
    }

    pub fn with_bfv(mut self) -> Self {
        self.scheme = Scheme::Bfv(BfvParamSet::insecure_512());
        self
    }

    pub async fn build(self) -> Result<FeedbackSystem> {
        let bus = EventBus::<FeedbackEvent>::new(EventBusConfig {
            deduplicate: self.deduplicate,
        })
        .start();

        // History collector for taking historical events for analysis
        let history = self.history.then(|| EventBus::history(&bus));
        let errors = self.errors.then(|| EventBus::<FeedbackEvent>::error(&bus));

        if self.logging {
            SimpleLogger::<FeedbackEvent>::attach("feedback", bus.clone());
        }

        let (adapter, decryptor, encryptor): (
            Arc<dyn HomomorphicAdapter>,
            Arc<dyn Decryptor>,
            SchemeEncryptor,
        ) = match &self.scheme {
            Scheme::Plaintext => (
                Arc::new(PlaintextAdapter),
                Arc::new(PlaintextDecryptor),
                SchemeEncryptor::Plaintext(PlaintextAdapter),
            ),
            Scheme::Bfv(param_set) => {
                let fixture = BfvFixture::generate(param_set, BFV_SEED)?;
                (
                    Arc::new(BfvAdapter::new(fixture.params.clone())),
                    Arc::new(BfvDecryptor::new(fixture.params.clone(), fixture.secret_key)),
                    SchemeEncryptor::Bfv(BfvEncryptor::new(fixture.params, fixture.public_key)),
                )
            }
        };

        let oracle_key = match self.oracle_key {
            Some(key) => key,
            None => oracle_signer()?,
        };
        let trusted_signer = match self.trusted_signer {
            Some(signer) => signer,
            None => Some(oracle_signer()?.address()),
        };

        let clock = ManualClock::new(DEFAULT_NOW);
        let service = FeedbackService::attach(FeedbackServiceParams {
            bus: bus.clone(),
            adapter,
            clock: Arc::new(clock.clone()),
            oracle_signer: trusted_signer,
            registry: SessionRegistry::new(self.contract),
        });

        let oracle = self.oracle.then(|| {
            DecryptionOracle::attach(DecryptionOracleParams {
                bus: bus.clone(),
                decryptor,
                signer: oracle_key.clone(),
                contract: self.contract,
                delay: self.oracle_delay,
            })
        });

        Ok(FeedbackSystem::new(
            bus,
            service,
            oracle,
            oracle_key,
            history,
            errors,
            clock,
            self.contract,
            ScoreEncryptor::with_max_score(encryptor, self.max_score),
        ))
    }
}

impl Default for FeedbackSystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}
