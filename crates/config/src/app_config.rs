// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{find_in_parent, resolve_config_path};
use crate::validation::validate;
use crate::yaml::load_yaml_with_env;
use alloy_primitives::Address;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use gf_fhe::{BfvParamSet, DEFAULT_MAX_SCORE};
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_NAME: &str = "feedback.config.yaml";
pub const ENV_PREFIX: &str = "GF_";

/// Event bus settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BusConfig {
    /// Drop events whose content id has been seen before
    pub deduplicate: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self { deduplicate: true }
    }
}

/// Configuration for a feedback node
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct FeedbackConfig {
    /// Node name used in logs
    name: String,
    /// Contract context that input proofs and decryption attestations are bound to
    contract: Address,
    /// Address the decryption service signs results with. Callbacks are refused until set.
    oracle_signer: Option<Address>,
    /// Upper bound for participant scores
    max_score: u64,
    bus: BusConfig,
    bfv: BfvParamSet,
    /// Path the configuration was read from, if any
    #[serde(skip)]
    config_file: Option<PathBuf>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            name: "_default".to_string(),
            contract: Address::ZERO,
            oracle_signer: None,
            max_score: DEFAULT_MAX_SCORE,
            bus: BusConfig::default(),
            bfv: BfvParamSet::default(),
            config_file: None,
        }
    }
}

impl FeedbackConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn oracle_signer(&self) -> Option<Address> {
        self.oracle_signer
    }

    pub fn max_score(&self) -> u64 {
        self.max_score
    }

    pub fn bus(&self) -> &BusConfig {
        &self.bus
    }

    pub fn bfv(&self) -> &BfvParamSet {
        &self.bfv
    }

    pub fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

pub struct OsDirs;
impl OsDirs {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("governance-feedback")
    }
}

/// Load the configuration for the node called `name`.
///
/// Layers, lowest priority first: built-in defaults, the yaml file (explicit path, else the
/// nearest `feedback.config.yaml` above the cwd, else the OS config dir), then `GF_*`
/// environment variables (`GF_BUS__DEDUPLICATE=false`). An explicitly given file must exist;
/// the implicit one is optional.
pub fn load_config(name: &str, config_file: Option<String>) -> Result<FeedbackConfig> {
    let explicit = config_file.is_some();
    let resolved_config_path = resolve_config_path(
        find_in_parent,
        env::current_dir()?,
        OsDirs::config_dir(),
        DEFAULT_CONFIG_NAME,
        config_file.map(PathBuf::from),
    );

    let mut figment = Figment::from(Serialized::defaults(
        FeedbackConfig::default().with_name(name),
    ));

    let found = if explicit || resolved_config_path.exists() {
        let loaded_yaml =
            load_yaml_with_env(&resolved_config_path).context("Configuration file not found")?;
        figment = figment.merge(Yaml::string(&loaded_yaml));
        Some(resolved_config_path)
    } else {
        None
    };

    let mut config: FeedbackConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("Could not parse configuration")?;
    config.config_file = found;

    validate(&config)?;
    info!(name = %config.name, file = ?config.config_file, "Configuration loaded");
    Ok(config)
}
