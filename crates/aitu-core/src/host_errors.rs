// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Classification of host-reported errors.
//
// The correlation engine hands host errors to the caller verbatim. This module
// is the optional layer on top that lets application code tell a permission
// denial apart from everything else without string-matching on its own.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

const PERMISSION_DENY_PREFIX: &str = "permission deny";
const PERMISSION_SECURITY_DENY_PREFIX: &str = "permission security deny";

/// Coarse category of a host error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostErrorKind {
    /// The user refused a permission prompt.
    PermissionDenied,
    /// The host refused on security grounds (e.g. app not trusted).
    PermissionSecurityDenied,
    /// Anything else, including payloads without a `msg`.
    Other,
}

/// Typed view of the common `{ code, msg, meta }` error shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub meta: Option<HostErrorMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostErrorMeta {
    #[serde(default)]
    pub can_retry: bool,
}

/// Well-known `code` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostErrorCode {
    PermissionDenied,
    UrlDoesNotMatch,
    /// Passport data did not match the requested number / dates.
    NfcPassportMismatch,
    NfcDocumentReadFailure,
    NfcSessionTimeout,
    /// NFC refused by the user, or the device has no NFC chip.
    NfcPermissionDenied,
    NfcSessionCancelled,
}

impl HostErrorCode {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "permission_denied" => Some(Self::PermissionDenied),
            "url_does_not_match" => Some(Self::UrlDoesNotMatch),
            "nfc_passport_mismatch" => Some(Self::NfcPassportMismatch),
            "nfc_document_read_failure" => Some(Self::NfcDocumentReadFailure),
            "nfc_session_timeout" => Some(Self::NfcSessionTimeout),
            "nfc_permission_denied" => Some(Self::NfcPermissionDenied),
            "nfc_session_cancelled" => Some(Self::NfcSessionCancelled),
            _ => None,
        }
    }
}

impl HostError {
    /// Parse a raw host error payload. Non-object payloads yield `None`.
    pub fn from_value(payload: &Value) -> Option<Self> {
        if !payload.is_object() {
            return None;
        }
        serde_json::from_value(payload.clone()).ok()
    }

    pub fn known_code(&self) -> Option<HostErrorCode> {
        self.code.as_deref().and_then(HostErrorCode::parse)
    }

    /// Whether the host says the same call may succeed if retried.
    pub fn can_retry(&self) -> bool {
        self.meta.as_ref().is_some_and(|m| m.can_retry)
    }
}

/// Classify a raw host error payload by its `msg` prefix.
pub fn classify_host_error(payload: &Value) -> HostErrorKind {
    let Some(msg) = payload.get("msg").and_then(Value::as_str) else {
        return HostErrorKind::Other;
    };

    if msg.starts_with(PERMISSION_DENY_PREFIX) {
        HostErrorKind::PermissionDenied
    } else if msg.starts_with(PERMISSION_SECURITY_DENY_PREFIX) {
        HostErrorKind::PermissionSecurityDenied
    } else {
        HostErrorKind::Other
    }
}

impl BridgeError {
    /// Host error category; every non-host error is [`HostErrorKind::Other`].
    pub fn host_kind(&self) -> HostErrorKind {
        self.host_payload()
            .map(classify_host_error)
            .unwrap_or(HostErrorKind::Other)
    }
}
