//! # Apipedia Client
//!
//! Request dispatcher for the Apipedia messaging API: WhatsApp, Telegram,
//! SMS, AI chat, presence, profile, message status and device lookups.
//!
//! Every method issues exactly one request and returns the decoded body as
//! an [`ApiResult`]. Relay methods (`to_whatsapp`, `to_telegram`, `to_sms`)
//! take a previous result, extract its display text and send it on.
//!
//! ```rust,ignore
//! use apipedia_client::Apipedia;
//! use apipedia_core::ChatFormat;
//!
//! let client = Apipedia::new("appkey", "authkey");
//! let reply = client.ai_chat("Hello", "agent-1", ChatFormat::Text).await?;
//! client.to_whatsapp(&reply, "628123456789", "Bot: ").await?;
//! ```
//!
//! The client holds no per-call state, so clones can be used from several
//! tasks at once. [`Session`] offers chaining over a recorded last result.

use std::fmt;

use apipedia_core::relay::relay_text;
use apipedia_core::{
    ApiRequest, ApiResult, ApipediaError, Button, ChatFormat, Endpoint, FieldValue, Form, Media,
    OneOrMany, SmsTier, Transport, DEFAULT_BASE_URL,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod session;
#[cfg(feature = "reqwest")]
mod transport;

pub use session::Session;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;

/// Apipedia API client.
#[derive(Clone)]
pub struct Apipedia<T> {
    appkey: String,
    authkey: String,
    base_url: String,
    transport: T,
}

#[cfg(feature = "reqwest")]
impl Apipedia<ReqwestTransport> {
    pub fn new<S: Into<String>>(appkey: S, authkey: S) -> Self {
        Self::with_transport(appkey, authkey, ReqwestTransport::new())
    }
}

impl<T> fmt::Debug for Apipedia<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Apipedia")
            .field("appkey", &self.appkey)
            .field("authkey", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// JSON payload with the credentials in front.
#[derive(Serialize)]
struct Authed<'a, P> {
    appkey: &'a str,
    authkey: &'a str,
    #[serde(flatten)]
    payload: P,
}

#[derive(Serialize)]
struct NoFields {}

#[derive(Serialize)]
struct BulkPayload {
    to: String,
    message: String,
}

#[derive(Serialize)]
struct SmsPayload<'a> {
    to: &'a str,
    msg: &'a str,
}

#[derive(Serialize)]
struct ChatPayload<'a> {
    message: &'a str,
    agent_id: &'a str,
    format: &'static str,
}

#[derive(Serialize)]
struct PresencePayload<'a> {
    receiver: &'a str,
    presence: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,
}

#[derive(Serialize)]
struct MessageIdPayload<'a> {
    message_id: &'a str,
}

impl<T: Transport> Apipedia<T> {
    pub fn with_transport<S: Into<String>>(appkey: S, authkey: S, transport: T) -> Self {
        Self {
            appkey: appkey.into(),
            authkey: authkey.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            transport,
        }
    }

    /// Override the API base URL; useful for testing/mocking.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn appkey(&self) -> &str {
        &self.appkey
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Start a chain that remembers the last result.
    pub fn session(&self) -> Session<'_, T> {
        Session::new(self)
    }

    // ---- WhatsApp ----

    /// Send a WhatsApp message, optionally with an attachment.
    pub async fn whatsapp(
        &self,
        to: &str,
        message: &str,
        media: Option<Media>,
    ) -> Result<ApiResult, ApipediaError> {
        let mut form = self.form().text("to", to).text("message", message);
        if let Some(media) = media {
            form = form.field("file", media_field(media)?);
        }
        self.send_form(Endpoint::CreateMessage, form).await
    }

    /// Same message to one or more recipients.
    pub async fn bulk_v1(
        &self,
        to: impl Into<OneOrMany>,
        message: &str,
    ) -> Result<ApiResult, ApipediaError> {
        let payload = BulkPayload {
            to: to.into().joined(),
            message: message.to_string(),
        };
        self.send_json(Endpoint::BulkV1, payload).await
    }

    /// Different messages to one or more recipients, matched by position.
    pub async fn bulk_v2(
        &self,
        to: impl Into<OneOrMany>,
        messages: impl Into<OneOrMany>,
    ) -> Result<ApiResult, ApipediaError> {
        let payload = BulkPayload {
            to: to.into().joined(),
            message: messages.into().joined(),
        };
        self.send_json(Endpoint::BulkV2, payload).await
    }

    // ---- Telegram ----

    pub async fn telegram_send_message(
        &self,
        receiver: &str,
        body: &str,
    ) -> Result<ApiResult, ApipediaError> {
        let form = self.form().text("receiver", receiver).text("body", body);
        self.send_form(Endpoint::TelegramMessage, form).await
    }

    pub async fn telegram_send_image(
        &self,
        receiver: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<ApiResult, ApipediaError> {
        let form = self
            .form()
            .text("receiver", receiver)
            .text("image_url", image_url)
            .optional("caption", caption);
        self.send_form(Endpoint::TelegramImage, form).await
    }

    pub async fn telegram_send_location(
        &self,
        receiver: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<ApiResult, ApipediaError> {
        let form = self
            .form()
            .text("receiver", receiver)
            .text("latitude", latitude.to_string())
            .text("longitude", longitude.to_string());
        self.send_form(Endpoint::TelegramLocation, form).await
    }

    /// Message with an inline keyboard, given as rows of buttons.
    pub async fn telegram_send_buttons(
        &self,
        receiver: &str,
        body: &str,
        buttons: &[Vec<Button>],
    ) -> Result<ApiResult, ApipediaError> {
        let form = button_fields(
            self.form().text("receiver", receiver).text("body", body),
            buttons,
        );
        self.send_form(Endpoint::TelegramButtons, form).await
    }

    pub async fn telegram_send_document(
        &self,
        receiver: &str,
        document_url: &str,
        caption: Option<&str>,
        filename: Option<&str>,
    ) -> Result<ApiResult, ApipediaError> {
        let form = self
            .form()
            .text("receiver", receiver)
            .text("document_url", document_url)
            .optional("caption", caption)
            .optional("filename", filename);
        self.send_form(Endpoint::TelegramDocument, form).await
    }

    // ---- SMS ----

    pub async fn sms(
        &self,
        tier: SmsTier,
        to: &str,
        msg: &str,
    ) -> Result<ApiResult, ApipediaError> {
        self.send_json(Endpoint::Sms(tier), SmsPayload { to, msg })
            .await
    }

    pub async fn sms_regular(&self, to: &str, msg: &str) -> Result<ApiResult, ApipediaError> {
        self.sms(SmsTier::Regular, to, msg).await
    }

    pub async fn sms_vip(&self, to: &str, msg: &str) -> Result<ApiResult, ApipediaError> {
        self.sms(SmsTier::Vip, to, msg).await
    }

    pub async fn sms_otp(&self, to: &str, msg: &str) -> Result<ApiResult, ApipediaError> {
        self.sms(SmsTier::Otp, to, msg).await
    }

    pub async fn sms_vvip(&self, to: &str, msg: &str) -> Result<ApiResult, ApipediaError> {
        self.sms(SmsTier::Vvip, to, msg).await
    }

    // ---- AI chat ----

    /// Ask an AI agent; the reply can be relayed with `to_*`.
    pub async fn ai_chat(
        &self,
        message: &str,
        agent_id: &str,
        format: ChatFormat,
    ) -> Result<ApiResult, ApipediaError> {
        let payload = ChatPayload {
            message,
            agent_id,
            format: format.as_str(),
        };
        self.send_json(Endpoint::AiChat, payload).await
    }

    // ---- Profile, presence, status ----

    pub async fn get_profile(&self) -> Result<ApiResult, ApipediaError> {
        self.send_json(Endpoint::Profile, NoFields {}).await
    }

    /// `duration` is sent whenever given, including zero.
    pub async fn update_presence(
        &self,
        receiver: &str,
        presence: &str,
        duration: Option<u64>,
    ) -> Result<ApiResult, ApipediaError> {
        let payload = PresencePayload {
            receiver,
            presence,
            duration,
        };
        self.send_json(Endpoint::Presence, payload).await
    }

    pub async fn get_message_status_all(
        &self,
        message_id: &str,
    ) -> Result<ApiResult, ApipediaError> {
        self.send_json(Endpoint::MessageStatusAll, MessageIdPayload { message_id })
            .await
    }

    pub async fn get_last_status(&self, message_id: &str) -> Result<ApiResult, ApipediaError> {
        self.send_json(Endpoint::LastStatus, MessageIdPayload { message_id })
            .await
    }

    pub async fn get_last_receipt_status(
        &self,
        message_id: &str,
    ) -> Result<ApiResult, ApipediaError> {
        self.send_json(Endpoint::LastReceiptStatus, MessageIdPayload { message_id })
            .await
    }

    // ---- Device and session ----

    pub async fn check_contact_number(
        &self,
        device_id: &str,
        phone: &str,
    ) -> Result<ApiResult, ApipediaError> {
        let form = self
            .form()
            .text("device_id", device_id)
            .text("phone", phone);
        self.send_form(Endpoint::ContactCheck, form).await
    }

    pub async fn get_session_status(&self, device_id: &str) -> Result<ApiResult, ApipediaError> {
        self.send_device(Endpoint::SessionStatus, device_id).await
    }

    pub async fn get_last_webhook_update(
        &self,
        device_id: &str,
    ) -> Result<ApiResult, ApipediaError> {
        self.send_device(Endpoint::WebhookLastUpdate, device_id)
            .await
    }

    pub async fn get_newsletter_id(&self, device_id: &str) -> Result<ApiResult, ApipediaError> {
        self.send_device(Endpoint::NewsletterId, device_id).await
    }

    // ---- Relays ----

    /// Forward the text of `previous` as a WhatsApp message.
    pub async fn to_whatsapp(
        &self,
        previous: &ApiResult,
        to: &str,
        prefix: &str,
    ) -> Result<ApiResult, ApipediaError> {
        let text = relay_text(previous, prefix)?;
        info!("Relaying {} result to WhatsApp", previous.endpoint.path());
        self.whatsapp(to, &text, None).await
    }

    /// Forward the text of `previous` as a Telegram message.
    pub async fn to_telegram(
        &self,
        previous: &ApiResult,
        receiver: &str,
        prefix: &str,
    ) -> Result<ApiResult, ApipediaError> {
        let text = relay_text(previous, prefix)?;
        info!("Relaying {} result to Telegram", previous.endpoint.path());
        self.telegram_send_message(receiver, &text).await
    }

    /// Forward the text of `previous` as a regular SMS.
    pub async fn to_sms(
        &self,
        previous: &ApiResult,
        to: &str,
        prefix: &str,
    ) -> Result<ApiResult, ApipediaError> {
        let text = relay_text(previous, prefix)?;
        info!("Relaying {} result to SMS", previous.endpoint.path());
        self.sms_regular(to, &text).await
    }

    // ---- plumbing ----

    fn form(&self) -> Form {
        Form::new()
            .text("appkey", self.appkey.as_str())
            .text("authkey", self.authkey.as_str())
    }

    async fn send_form(&self, endpoint: Endpoint, form: Form) -> Result<ApiResult, ApipediaError> {
        self.dispatch(ApiRequest::form(endpoint, &self.base_url, form))
            .await
    }

    async fn send_device(
        &self,
        endpoint: Endpoint,
        device_id: &str,
    ) -> Result<ApiResult, ApipediaError> {
        let form = self.form().text("device_id", device_id);
        self.send_form(endpoint, form).await
    }

    async fn send_json<P: Serialize>(
        &self,
        endpoint: Endpoint,
        payload: P,
    ) -> Result<ApiResult, ApipediaError> {
        let body = serde_json::to_value(Authed {
            appkey: &self.appkey,
            authkey: &self.authkey,
            payload,
        })
        .map_err(|e| ApipediaError::Request(format!("payload encode: {}", e)))?;
        self.dispatch(ApiRequest::json(endpoint, &self.base_url, body))
            .await
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<ApiResult, ApipediaError> {
        let endpoint = request.endpoint;
        let request_id = Uuid::new_v4();
        debug!(
            "Sending {:?} {} [{}]",
            request.method,
            endpoint.path(),
            request_id
        );

        let raw = self.transport.execute(request).await.map_err(|e| {
            warn!("Apipedia {} failed [{}]: {:?}", endpoint.path(), request_id, e);
            e
        })?;

        if !raw.is_success() {
            let err = raw.into_api_error();
            warn!("Apipedia {} rejected [{}]: {}", endpoint.path(), request_id, err);
            return Err(err);
        }

        debug!(
            "Apipedia {} answered {} [{}]",
            endpoint.path(),
            raw.status,
            request_id
        );
        Ok(ApiResult {
            request_id,
            endpoint,
            status: raw.status,
            received_at: OffsetDateTime::now_utc(),
            body: raw.decode_body(),
        })
    }
}

fn media_field(media: Media) -> Result<FieldValue, ApipediaError> {
    match media {
        Media::Url(url) => Ok(FieldValue::Text(url)),
        Media::Path(path) => {
            if !path.exists() {
                return Err(ApipediaError::Validation(path));
            }
            Ok(FieldValue::File(path))
        }
        Media::Bytes { data, file_name } => Ok(FieldValue::Bytes { data, file_name }),
    }
}

/// Flatten button rows into `buttons[row][col][field]` entries.
fn button_fields(mut form: Form, buttons: &[Vec<Button>]) -> Form {
    for (i, row) in buttons.iter().enumerate() {
        for (j, button) in row.iter().enumerate() {
            form = form
                .text(format!("buttons[{i}][{j}][text]"), button.text.as_str())
                .optional(
                    format!("buttons[{i}][{j}][callback_data]"),
                    button.callback_data.as_deref(),
                )
                .optional(format!("buttons[{i}][{j}][url]"), button.url.as_deref());
        }
    }
    form
}
