// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Aitu bridge client: correlation ids, the inbound
// event envelope, and the payload shapes exchanged with the host.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Correlation identifier tying an outbound request to its inbound reply.
///
/// Rendered as `<namespace><sequence>`, e.g. `getQr:1` or `GetMe:invoke:3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reply envelope delivered by the host on the shared event channel.
///
/// ```json
/// { "reqId": "getQr:1", "data": "https://example.com/qr", "error": null }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "reqId")]
    pub req_id: RequestId,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<Value>,
}

impl InboundEvent {
    /// Extract an envelope from a raw event payload.
    ///
    /// Returns `None` when the payload is not an object, carries no `reqId`
    /// field, or the id is empty or not a string. Such events are not
    /// addressed to the correlation engine and must be ignored.
    pub fn from_detail(detail: &Value) -> Option<Self> {
        let object = detail.as_object()?;
        let req_id = object.get("reqId")?.as_str()?;
        if req_id.is_empty() {
            return None;
        }

        let error = match object.get("error") {
            None | Some(Value::Null) => None,
            Some(other) => Some(other.clone()),
        };

        Some(Self {
            req_id: RequestId::from(req_id),
            data: object.get("data").cloned().unwrap_or(Value::Null),
            error,
        })
    }
}

/// Rule deciding whether an inbound reply resolves or rejects its call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuccessRule {
    /// Failure iff `error` is present and non-null. Falsy payloads such as
    /// `false`, `0` or `""` still resolve.
    #[default]
    ErrorAbsent,
    /// Success iff `data` is present and non-null.
    DataPresent,
}

impl SuccessRule {
    pub fn is_success(self, data: &Value, error: Option<&Value>) -> bool {
        match self {
            SuccessRule::ErrorAbsent => error.is_none_or(Value::is_null),
            SuccessRule::DataPresent => !data.is_null(),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload shapes
// ---------------------------------------------------------------------------

/// Icons the host can render in the header menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderMenuIcon {
    Search,
    ShoppingCart,
    Menu,
    Share,
    Notifications,
    Help,
    Error,
    Person,
    Sort,
    Filter,
}

/// One entry of the header menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMenuItem {
    pub id: String,
    pub icon: HeaderMenuIcon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

/// What the host shows in the navigation item slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationItemMode {
    SystemBackArrow,
    CustomBackArrow,
    NoItem,
    UserProfile,
}

/// `'success' | 'failed'` acknowledgement returned by most setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ack {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPhoneResponse {
    pub phone: String,
    pub sign: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMeResponse {
    pub name: String,
    pub lastname: String,
    pub id: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub avatar_thumb: Option<String>,
    pub sign: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetGeoResponse {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetContactsResponse {
    pub contacts: Vec<Contact>,
    pub sign: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectContactResponse {
    pub phone: String,
    pub name: String,
    pub lastname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserProfileResponse {
    pub name: String,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub avatar_thumb: Option<String>,
}
