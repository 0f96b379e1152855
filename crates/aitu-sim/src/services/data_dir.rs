// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution for the simulator.

use std::path::{Path, PathBuf};

/// Return the simulator data directory, creating it if needed.
///
/// `AITU_SIM_DATA_DIR` overrides the conventional location.
pub fn data_dir() -> PathBuf {
    let dir = match std::env::var_os("AITU_SIM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs_fallback().join("aitu-sim"),
    };
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Location of the persisted parent-origin cache inside `dir`.
pub fn origin_store_path(dir: &Path) -> PathBuf {
    dir.join("origin.json")
}

fn dirs_fallback() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_store_lives_in_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(origin_store_path(dir.path()), dir.path().join("origin.json"));
    }
}
