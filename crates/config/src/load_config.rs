// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::{Path, PathBuf};

use path_clean::clean;

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

/// Walk up from `path` looking for `filename`
pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = PathBuf::from(path);

    loop {
        let file_path = current.join(filename);
        if file_path.exists() {
            return Some(file_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Resolve which config file to read: an explicit path wins (made absolute against `cwd`),
/// then the nearest file named `default_filename` above `cwd`, then the default config dir.
pub fn resolve_config_path<P: Into<PathBuf>>(
    find_in_parent: FindInParent,
    cwd: P,
    default_config_dir: P,
    default_filename: &str,
    cli_file: Option<P>,
) -> PathBuf {
    let cli_file: Option<PathBuf> = cli_file.map(Into::into);
    let default_config_dir = default_config_dir.into();
    let cwd = cwd.into();

    if let Some(cli_file) = cli_file {
        if cli_file.is_absolute() {
            return cli_file;
        }

        return clean(cwd.join(cli_file));
    }

    if let Some(found) = find_in_parent(&cwd, default_filename) {
        return found;
    }

    clean(default_config_dir.join(default_filename))
}
