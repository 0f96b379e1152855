// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed operations over the generic call path.
//
// Each operation is a thin wrapper: it shapes its positional arguments, calls
// through the facade and, where the reply shape is known, decodes it. The few
// operations that validate input reject their reply without dispatching.

use serde_json::{Value, json};

use aitu_core::error::BridgeError;
use aitu_core::{
    Ack, CallbackSlot, GetContactsResponse, GetGeoResponse, GetMeResponse, GetPhoneResponse,
    GetUserProfileResponse, HeaderMenuItem, InvokeRequest, Method, NavigationItemMode,
    SelectContactResponse,
};

use crate::callbacks::CallbackHandler;
use crate::facade::Bridge;
use crate::reply::{PendingReply, TypedReply};

fn text(value: &str) -> Value {
    Value::String(value.to_owned())
}

impl Bridge {
    fn request(&self, method: Method, args: Vec<Value>) -> PendingReply {
        self.call(method.as_str(), args)
    }

    fn invoke_request(&self, request: InvokeRequest, props: Value) -> PendingReply {
        self.invoke(request.as_str(), props)
    }

    // -- Device capabilities ------------------------------------------------

    pub fn get_qr(&self) -> TypedReply<String> {
        self.request(Method::GetQr, vec![]).decode()
    }

    pub fn get_geo(&self) -> TypedReply<GetGeoResponse> {
        self.request(Method::GetGeo, vec![]).decode()
    }

    pub fn get_sms_code(&self) -> TypedReply<String> {
        self.request(Method::GetSmsCode, vec![]).decode()
    }

    pub fn select_contact(&self) -> TypedReply<SelectContactResponse> {
        self.request(Method::SelectContact, vec![]).decode()
    }

    /// Vibrate with `pattern` (milliseconds per step).
    ///
    /// Every step must be at least 1 ms and the total must not exceed the
    /// configured maximum; otherwise nothing is dispatched and the reply
    /// rejects with [`BridgeError::InvalidArgument`].
    pub fn vibrate(&self, pattern: &[u32]) -> TypedReply<Ack> {
        if let Err(e) = validate_vibration(pattern, self.config().max_vibration_total_ms) {
            return self.reject(e).decode();
        }
        self.request(Method::Vibrate, vec![json!(pattern)]).decode()
    }

    pub fn check_biometry(&self) -> PendingReply {
        self.request(Method::CheckBiometry, vec![])
    }

    pub fn read_nfc_data(&self) -> PendingReply {
        self.request(Method::ReadNfcData, vec![])
    }

    pub fn read_nfc_passport(
        &self,
        passport_number: &str,
        date_of_birth: &str,
        expiration_date: &str,
    ) -> PendingReply {
        self.request(
            Method::ReadNfcPassport,
            vec![text(passport_number), text(date_of_birth), text(expiration_date)],
        )
    }

    pub fn is_esim_supported(&self) -> PendingReply {
        self.request(Method::IsESimSupported, vec![])
    }

    pub fn activate_esim(&self, activation_code: &str) -> PendingReply {
        self.request(Method::ActivateESim, vec![text(activation_code)])
    }

    // -- Sharing ------------------------------------------------------------

    pub fn share(&self, message: &str) -> TypedReply<Ack> {
        self.request(Method::Share, vec![text(message)]).decode()
    }

    pub fn share_file(&self, message: &str, filename: &str, base64_data: &str) -> TypedReply<Ack> {
        self.request(
            Method::ShareFile,
            vec![text(message), text(filename), text(base64_data)],
        )
        .decode()
    }

    /// Share an image given as a `data:` URL. The file name is derived from
    /// the MIME subtype, e.g. `data:image/png;base64,...` becomes `image.png`.
    pub fn share_image(&self, message: &str, data_url: &str) -> TypedReply<Ack> {
        match split_data_url(data_url) {
            Ok((filename, base64_data)) => self.share_file(message, &filename, base64_data),
            Err(e) => self.reject(e).decode(),
        }
    }

    pub fn copy_to_clipboard(&self, value: &str) -> TypedReply<Ack> {
        self.request(Method::CopyToClipboard, vec![text(value)]).decode()
    }

    // -- App chrome ---------------------------------------------------------

    pub fn set_title(&self, title: &str) -> TypedReply<Ack> {
        self.request(Method::SetTitle, vec![text(title)]).decode()
    }

    /// Replace the header menu. The items travel as one JSON string argument
    /// on every transport.
    pub fn set_header_menu_items(&self, items: &[HeaderMenuItem]) -> TypedReply<Ack> {
        let max = self.config().max_header_menu_items;
        if items.len() > max {
            return self
                .reject(BridgeError::InvalidArgument(format!(
                    "header menu takes at most {max} items, got {}",
                    items.len()
                )))
                .decode();
        }
        let items_json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => return self.reject(e.into()).decode(),
        };
        self.request(Method::SetHeaderMenuItems, vec![Value::String(items_json)])
            .decode()
    }

    pub fn set_custom_back_arrow_mode(&self, enabled: bool) -> TypedReply<Ack> {
        self.request(Method::SetCustomBackArrowMode, vec![Value::Bool(enabled)])
            .decode()
    }

    pub fn get_custom_back_arrow_mode(&self) -> TypedReply<bool> {
        self.request(Method::GetCustomBackArrowMode, vec![]).decode()
    }

    pub fn set_custom_back_arrow_visible(&self, visible: bool) -> TypedReply<Ack> {
        self.request(Method::SetCustomBackArrowVisible, vec![Value::Bool(visible)])
            .decode()
    }

    pub fn set_navigation_item_mode(&self, mode: NavigationItemMode) -> TypedReply<Ack> {
        self.request(Method::SetNavigationItemMode, vec![json!(mode)])
            .decode()
    }

    pub fn get_navigation_item_mode(&self) -> TypedReply<NavigationItemMode> {
        self.request(Method::GetNavigationItemMode, vec![]).decode()
    }

    pub fn enable_screen_capture(&self) -> PendingReply {
        self.request(Method::EnableScreenCapture, vec![])
    }

    pub fn disable_screen_capture(&self) -> PendingReply {
        self.request(Method::DisableScreenCapture, vec![])
    }

    pub fn enable_swipe_back(&self) -> PendingReply {
        self.request(Method::EnableSwipeBack, vec![])
    }

    pub fn disable_swipe_back(&self) -> PendingReply {
        self.request(Method::DisableSwipeBack, vec![])
    }

    // -- Navigation ---------------------------------------------------------

    pub fn open_settings(&self) -> TypedReply<Ack> {
        self.request(Method::OpenSettings, vec![]).decode()
    }

    pub fn close_application(&self) -> TypedReply<Ack> {
        self.request(Method::CloseApplication, vec![]).decode()
    }

    pub fn open_user_profile(&self) -> PendingReply {
        self.request(Method::OpenUserProfile, vec![])
    }

    pub fn open_external_url(&self, url: &str) -> PendingReply {
        self.request(Method::OpenExternalUrl, vec![text(url)])
    }

    pub fn open_payment(&self, transaction_id: &str) -> PendingReply {
        self.request(Method::OpenPayment, vec![text(transaction_id)])
    }

    // -- Step counter -------------------------------------------------------

    pub fn get_user_step_info(&self) -> PendingReply {
        self.request(Method::GetUserStepInfo, vec![])
    }

    pub fn subscribe_user_step_info(&self) -> PendingReply {
        self.request(Method::SubscribeUserStepInfo, vec![])
    }

    pub fn unsubscribe_user_step_info(&self) -> PendingReply {
        self.request(Method::UnsubscribeUserStepInfo, vec![])
    }

    // -- Invoke sub-methods -------------------------------------------------

    pub fn get_me(&self) -> TypedReply<GetMeResponse> {
        self.invoke_request(InvokeRequest::GetMe, json!({})).decode()
    }

    pub fn get_phone(&self) -> TypedReply<GetPhoneResponse> {
        self.invoke_request(InvokeRequest::GetPhone, json!({})).decode()
    }

    pub fn get_contacts(&self) -> TypedReply<GetContactsResponse> {
        self.invoke_request(InvokeRequest::GetContacts, json!({})).decode()
    }

    pub fn get_user_profile(&self, user_id: &str) -> TypedReply<GetUserProfileResponse> {
        self.invoke_request(InvokeRequest::GetUserProfile, json!({ "id": user_id }))
            .decode()
    }

    pub fn enable_notifications(&self) -> PendingReply {
        self.invoke_request(InvokeRequest::EnableNotifications, json!({}))
    }

    pub fn disable_notifications(&self) -> PendingReply {
        self.invoke_request(InvokeRequest::DisableNotifications, json!({}))
    }

    pub fn enable_private_messaging(&self, app_id: &str) -> PendingReply {
        self.invoke_request(InvokeRequest::EnablePrivateMessaging, json!({ "appId": app_id }))
    }

    pub fn disable_private_messaging(&self, app_id: &str) -> PendingReply {
        self.invoke_request(InvokeRequest::DisablePrivateMessaging, json!({ "appId": app_id }))
    }

    // -- Callback slots -----------------------------------------------------

    pub fn set_shake_handler(&self, handler: Option<CallbackHandler>) {
        self.set_callback(CallbackSlot::Shake, handler);
    }

    /// The handler receives the tab name.
    pub fn set_tab_active_handler(&self, handler: Option<CallbackHandler>) {
        self.set_callback(CallbackSlot::TabActive, handler);
    }

    /// The handler receives the clicked item id.
    pub fn set_header_menu_item_click_handler(&self, handler: Option<CallbackHandler>) {
        self.set_callback(CallbackSlot::HeaderMenuItemClick, handler);
    }

    pub fn set_custom_back_arrow_on_click_handler(&self, handler: Option<CallbackHandler>) {
        self.set_callback(CallbackSlot::BackArrowClick, handler);
    }
}

fn validate_vibration(pattern: &[u32], max_total_ms: u64) -> Result<(), BridgeError> {
    if pattern.is_empty() {
        return Err(BridgeError::InvalidArgument(
            "vibration pattern is empty".into(),
        ));
    }
    if pattern.contains(&0) {
        return Err(BridgeError::InvalidArgument(
            "vibration steps must be positive".into(),
        ));
    }
    let total: u64 = pattern.iter().map(|&step| u64::from(step)).sum();
    if total > max_total_ms {
        return Err(BridgeError::InvalidArgument(format!(
            "vibration pattern lasts {total} ms, limit is {max_total_ms} ms"
        )));
    }
    Ok(())
}

/// Split `data:<mime>;base64,<body>` into `image.<subtype>` and the body.
fn split_data_url(data_url: &str) -> Result<(String, &str), BridgeError> {
    let header_and_body = data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','));
    let Some((header, body)) = header_and_body else {
        return Err(BridgeError::InvalidArgument(
            "image is not a data URL".into(),
        ));
    };

    let mime = header.split(';').next().unwrap_or_default();
    let extension = mime.split('/').nth(1).unwrap_or_default();
    Ok((format!("image.{extension}"), body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use aitu_core::{BridgeConfig, HeaderMenuIcon, RequestId};
    use aitu_transport::NativeArg;
    use std::sync::{Arc, Mutex};

    fn direct_bridge() -> (Bridge, Arc<RecordingDirectHost>) {
        let host = RecordingDirectHost::accepting_all();
        (Bridge::detect(&TestEnv::direct(host.clone())), host)
    }

    fn message_bridge() -> (Bridge, Arc<RecordingMessageHost>) {
        let host = RecordingMessageHost::accepting_all();
        (Bridge::detect(&TestEnv::message(host.clone())), host)
    }

    #[tokio::test]
    async fn get_qr_decodes_string() {
        let (bridge, host) = direct_bridge();
        let reply = bridge.get_qr();
        assert_eq!(host.calls()[0].1, "getQr:1");

        bridge.deliver(json!({ "reqId": "getQr:1", "data": "https://example.com/qr", "error": null }));
        assert_eq!(reply.await.expect("ok"), "https://example.com/qr");
    }

    #[tokio::test]
    async fn get_geo_decodes_coordinates() {
        let (bridge, _host) = direct_bridge();
        let reply = bridge.get_geo();
        bridge.deliver(json!({ "reqId": "getGeo:1", "data": { "latitude": 43.2, "longitude": 76.9 } }));

        let geo = reply.await.expect("ok");
        assert_eq!(geo.latitude, 43.2);
        assert_eq!(geo.longitude, 76.9);
    }

    #[tokio::test]
    async fn share_uses_named_field_on_message_post() {
        let (bridge, host) = message_bridge();
        let reply = bridge.share("hello");

        let (method, message) = host.messages().remove(0);
        assert_eq!(method, "share");
        assert_eq!(Value::Object(message), json!({ "reqId": "share:1", "text": "hello" }));

        bridge.deliver(json!({ "reqId": "share:1", "data": "success" }));
        assert_eq!(reply.await.expect("ok"), Ack::Success);
    }

    #[test]
    fn share_image_splits_data_url() {
        let (bridge, host) = message_bridge();
        let _reply = bridge.share_image("look", "data:image/png;base64,iVBORw0KGgo=");

        let (method, message) = host.messages().remove(0);
        assert_eq!(method, "shareFile");
        assert_eq!(message["text"], json!("look"));
        assert_eq!(message["filename"], json!("image.png"));
        assert_eq!(message["base64Data"], json!("iVBORw0KGgo="));
    }

    #[tokio::test]
    async fn share_image_rejects_non_data_url() {
        let (bridge, host) = direct_bridge();
        let reply = bridge.share_image("look", "https://example.com/cat.png");
        assert!(matches!(reply.await, Err(BridgeError::InvalidArgument(_))));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn vibrate_serializes_pattern_for_direct_call() {
        let (bridge, host) = direct_bridge();
        let _reply = bridge.vibrate(&[100, 50, 100]);

        let (method, req_id, args) = host.calls().remove(0);
        assert_eq!(method, "vibrate");
        assert_eq!(req_id, "vibrate:1");
        assert_eq!(args, vec![NativeArg::Text("[100,50,100]".into())]);
    }

    #[test]
    fn vibrate_keeps_pattern_structured_for_message_post() {
        let (bridge, host) = message_bridge();
        let _reply = bridge.vibrate(&[200]);
        assert_eq!(host.messages()[0].1["pattern"], json!([200]));
    }

    #[tokio::test]
    async fn invalid_vibration_patterns_are_never_dispatched() {
        let (bridge, host) = direct_bridge();

        for pattern in [&[][..], &[0, 100][..], &[6_000, 4_001][..]] {
            let reply = bridge.vibrate(pattern);
            assert!(reply.req_id().is_none());
            assert!(matches!(reply.await, Err(BridgeError::InvalidArgument(_))));
        }
        assert!(host.calls().is_empty());

        let reply = bridge.vibrate(&[5_000, 5_000]);
        assert_eq!(reply.req_id().map(RequestId::as_str), Some("vibrate:1"));
    }

    #[test]
    fn vibration_limit_follows_config() {
        let config = BridgeConfig {
            max_vibration_total_ms: 500,
            ..Default::default()
        };
        let host = RecordingDirectHost::accepting_all();
        let bridge = Bridge::new(&TestEnv::direct(host.clone()), config);

        let _reply = bridge.vibrate(&[600]);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn header_menu_items_travel_as_json_string() {
        let (bridge, host) = message_bridge();
        let items = vec![HeaderMenuItem {
            id: "cart".into(),
            icon: HeaderMenuIcon::ShoppingCart,
            badge: None,
        }];
        let _reply = bridge.set_header_menu_items(&items);

        let (method, message) = host.messages().remove(0);
        assert_eq!(method, "setHeaderMenuItems");
        assert_eq!(
            message["itemsJsonArray"],
            json!(r#"[{"id":"cart","icon":"ShoppingCart"}]"#)
        );
    }

    #[tokio::test]
    async fn too_many_header_menu_items_rejects() {
        let (bridge, host) = direct_bridge();
        let item = HeaderMenuItem {
            id: "x".into(),
            icon: HeaderMenuIcon::Menu,
            badge: None,
        };
        let reply = bridge.set_header_menu_items(&vec![item; 4]);
        assert!(matches!(reply.await, Err(BridgeError::InvalidArgument(_))));
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn get_user_profile_passes_id_through_invoke() {
        let (bridge, host) = message_bridge();
        let reply = bridge.get_user_profile("42");

        let (method, message) = host.messages().remove(0);
        assert_eq!(method, "invoke");
        assert_eq!(message["reqId"], json!("GetUserProfile:invoke:1"));
        assert_eq!(message["method"], json!("GetUserProfile"));
        assert_eq!(message["data"], json!({ "id": "42" }));

        bridge.deliver(json!({
            "reqId": "GetUserProfile:invoke:1",
            "data": { "name": "Aigerim" }
        }));
        let profile = reply.await.expect("ok");
        assert_eq!(profile.name, "Aigerim");
        assert!(profile.lastname.is_none());
    }

    #[test]
    fn enable_notifications_uses_allow_wire_name() {
        let (bridge, host) = direct_bridge();
        let reply = bridge.enable_notifications();
        assert_eq!(
            reply.req_id().map(RequestId::as_str),
            Some("AllowNotifications:invoke:1")
        );
        assert_eq!(host.calls()[0].2[0], NativeArg::Text("AllowNotifications".into()));
    }

    #[test]
    fn read_nfc_passport_names_all_fields() {
        let (bridge, host) = message_bridge();
        let _reply = bridge.read_nfc_passport("N123", "1990-01-01", "2030-01-01");
        let (_, message) = host.messages().remove(0);
        assert_eq!(message["passportNumber"], json!("N123"));
        assert_eq!(message["dateOfBirth"], json!("1990-01-01"));
        assert_eq!(message["expirationDate"], json!("2030-01-01"));
    }

    #[tokio::test]
    async fn navigation_item_mode_round_trips_as_variant_name() {
        let (bridge, host) = direct_bridge();
        let _set = bridge.set_navigation_item_mode(NavigationItemMode::UserProfile);
        assert_eq!(host.calls()[0].2, vec![NativeArg::Text("UserProfile".into())]);

        let get = bridge.get_navigation_item_mode();
        bridge.deliver(json!({ "reqId": "getNavigationItemMode:1", "data": "NoItem" }));
        assert_eq!(get.await.expect("ok"), NavigationItemMode::NoItem);
    }

    #[test]
    fn callback_setters_fill_their_slots() {
        let (bridge, _host) = direct_bridge();
        let tabs = Arc::new(Mutex::new(Vec::new()));
        let sink = tabs.clone();
        bridge.set_tab_active_handler(Some(Arc::new(move |tab| {
            sink.lock().expect("lock").push(tab);
        })));

        assert!(bridge.trigger_callback(CallbackSlot::TabActive, Some(json!("home"))));
        assert!(!bridge.trigger_callback(CallbackSlot::Shake, None));

        bridge.set_tab_active_handler(None);
        assert!(!bridge.trigger_callback(CallbackSlot::TabActive, Some(json!("feed"))));
        assert_eq!(*tabs.lock().expect("lock"), vec![Some(json!("home"))]);
    }

    #[test]
    fn data_url_without_subtype_yields_bare_extension() {
        let (filename, body) = split_data_url("data:;base64,AAAA").expect("split");
        assert_eq!(filename, "image.");
        assert_eq!(body, "AAAA");
    }
}
