// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, Result};
use std::{fs, path::Path};

/// Read a yaml file substituting `$VAR` / `${VAR}` references from the environment.
pub fn load_yaml_with_env(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)?;
    let expanded = shellexpand::env(&raw)
        .map_err(|e| anyhow!("Could not expand environment in {}: {e}", path.display()))?;
    Ok(expanded.into_owned())
}
