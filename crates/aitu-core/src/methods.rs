// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Catalogue of host methods.
//
// The correlation engine only needs a method name, but the message-post
// transport also needs to know how positional arguments map to the named
// fields the host expects. That mapping lives here so every transport reads
// the same table.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declares the [`Method`] enum together with its wire name and the
/// message-post field names for each positional argument.
macro_rules! methods {
    ($( $variant:ident => $wire:literal [$($field:literal),*] ),+ $(,)?) => {
        /// Request methods understood by the host.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Method {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl Method {
            /// Every method in the catalogue.
            pub const ALL: &'static [Method] = &[$(Method::$variant),+];

            /// Name used on every transport.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Method::$variant => $wire,)+
                }
            }

            /// Named fields for the message-post transport, one per
            /// positional argument.
            pub fn message_fields(self) -> &'static [&'static str] {
                match self {
                    $(Method::$variant => &[$($field),*],)+
                }
            }
        }

        impl FromStr for Method {
            type Err = UnknownMethod;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Method::$variant),)+
                    other => Err(UnknownMethod(other.to_owned())),
                }
            }
        }
    };
}

methods! {
    CopyToClipboard => "copyToClipboard" ["text"],
    Invoke => "invoke" ["method", "data"],
    Storage => "storage" ["method", "data"],
    Share => "share" ["text"],
    GetGeo => "getGeo" [],
    GetQr => "getQr" [],
    GetSmsCode => "getSMSCode" [],
    SelectContact => "selectContact" [],
    OpenSettings => "openSettings" [],
    CloseApplication => "closeApplication" [],
    SetTitle => "setTitle" ["text"],
    EnableScreenCapture => "enableScreenCapture" [],
    DisableScreenCapture => "disableScreenCapture" [],
    Vibrate => "vibrate" ["pattern"],
    SetHeaderMenuItems => "setHeaderMenuItems" ["itemsJsonArray"],
    ShareFile => "shareFile" ["text", "filename", "base64Data"],
    GetUserStepInfo => "getUserStepInfo" [],
    GetCustomBackArrowMode => "getCustomBackArrowMode" [],
    SetCustomBackArrowMode => "setCustomBackArrowMode" ["enabled"],
    SetCustomBackArrowVisible => "setCustomBackArrowVisible" ["visible"],
    OpenPayment => "openPayment" ["transactionId"],
    CheckBiometry => "checkBiometry" [],
    OpenExternalUrl => "openExternalUrl" ["url"],
    EnableSwipeBack => "enableSwipeBack" [],
    DisableSwipeBack => "disableSwipeBack" [],
    SetNavigationItemMode => "setNavigationItemMode" ["mode"],
    GetNavigationItemMode => "getNavigationItemMode" [],
    IsESimSupported => "isESimSupported" [],
    ActivateESim => "activateESim" ["activationCode"],
    ReadNfcData => "readNFCData" [],
    ReadNfcPassport => "readNFCPassport" ["passportNumber", "dateOfBirth", "expirationDate"],
    SubscribeUserStepInfo => "subscribeUserStepInfo" [],
    UnsubscribeUserStepInfo => "unsubscribeUserStepInfo" [],
    OpenUserProfile => "openUserProfile" [],
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method name not present in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bridge method: {0}")]
pub struct UnknownMethod(pub String);

/// Sub-methods reachable through [`Method::Invoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvokeRequest {
    GetMe,
    GetPhone,
    GetContacts,
    GetUserProfile,
    #[serde(rename = "AllowNotifications")]
    EnableNotifications,
    DisableNotifications,
    EnablePrivateMessaging,
    DisablePrivateMessaging,
}

impl InvokeRequest {
    pub fn as_str(self) -> &'static str {
        match self {
            InvokeRequest::GetMe => "GetMe",
            InvokeRequest::GetPhone => "GetPhone",
            InvokeRequest::GetContacts => "GetContacts",
            InvokeRequest::GetUserProfile => "GetUserProfile",
            InvokeRequest::EnableNotifications => "AllowNotifications",
            InvokeRequest::DisableNotifications => "DisableNotifications",
            InvokeRequest::EnablePrivateMessaging => "EnablePrivateMessaging",
            InvokeRequest::DisablePrivateMessaging => "DisablePrivateMessaging",
        }
    }
}

impl std::fmt::Display for InvokeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurring host callbacks. These never go through the correlation engine:
/// the app registers a handler once and the host fires it any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallbackSlot {
    #[serde(rename = "setShakeHandler")]
    Shake,
    #[serde(rename = "setTabActiveHandler")]
    TabActive,
    #[serde(rename = "setHeaderMenuItemClickHandler")]
    HeaderMenuItemClick,
    #[serde(rename = "setCustomBackArrowOnClickHandler")]
    BackArrowClick,
}

impl CallbackSlot {
    /// Name of the registration method on the host protocol.
    pub fn registration_method(self) -> &'static str {
        match self {
            CallbackSlot::Shake => "setShakeHandler",
            CallbackSlot::TabActive => "setTabActiveHandler",
            CallbackSlot::HeaderMenuItemClick => "setHeaderMenuItemClickHandler",
            CallbackSlot::BackArrowClick => "setCustomBackArrowOnClickHandler",
        }
    }

    /// Reverse of [`CallbackSlot::registration_method`].
    pub fn from_registration_method(method: &str) -> Option<Self> {
        match method {
            "setShakeHandler" => Some(CallbackSlot::Shake),
            "setTabActiveHandler" => Some(CallbackSlot::TabActive),
            "setHeaderMenuItemClickHandler" => Some(CallbackSlot::HeaderMenuItemClick),
            "setCustomBackArrowOnClickHandler" => Some(CallbackSlot::BackArrowClick),
            _ => None,
        }
    }
}
