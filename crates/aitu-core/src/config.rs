// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::types::SuccessRule;

/// Settings fixed at bridge construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Query-string parameter carrying the parent window origin.
    pub origin_param: String,
    /// Storage key under which the resolved origin is persisted.
    pub origin_storage_key: String,
    /// `source` tag stamped on every cross-window message.
    pub message_source: String,
    /// How inbound replies are classified as success or failure.
    pub success_rule: SuccessRule,
    /// Reject calls that have not been answered after this many
    /// milliseconds. `None` leaves calls pending forever. Calls the host
    /// surface cannot take at all stay pending regardless. Requires a tokio
    /// runtime when awaiting.
    pub default_timeout_ms: Option<u64>,
    /// Maximum number of header menu items the host accepts.
    pub max_header_menu_items: usize,
    /// Upper bound on the summed duration of a vibration pattern.
    pub max_vibration_total_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            origin_param: "__aitu-domain".into(),
            origin_storage_key: "mini-app-domain".into(),
            message_source: "aitu-bridge".into(),
            success_rule: SuccessRule::ErrorAbsent,
            default_timeout_ms: None,
            max_header_menu_items: 3,
            max_vibration_total_ms: 10_000,
        }
    }
}

impl BridgeConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.origin_param.is_empty() {
            return Err(BridgeError::Config("origin_param must not be empty".into()));
        }
        if self.message_source.is_empty() {
            return Err(BridgeError::Config("message_source must not be empty".into()));
        }
        if self.default_timeout_ms == Some(0) {
            return Err(BridgeError::Config(
                "default_timeout_ms must be positive when set".into(),
            ));
        }
        Ok(())
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "default_timeout_ms": 1500, "success_rule": "DataPresent" }}"#)
            .expect("write");

        let config = BridgeConfig::load(file.path()).expect("load");
        assert_eq!(config.default_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.success_rule, SuccessRule::DataPresent);
        assert_eq!(config.origin_param, "__aitu-domain");
        assert_eq!(config.max_header_menu_items, 3);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = BridgeConfig {
            default_timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BridgeError::Config(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BridgeConfig::load(Path::new("/nonexistent/aitu.json")).unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
    }
}
