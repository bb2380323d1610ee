//! Request model handed to a [`Transport`](crate::Transport).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::SmsTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
}

/// Every remote operation the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    CreateMessage,
    BulkV1,
    BulkV2,
    TelegramMessage,
    TelegramImage,
    TelegramLocation,
    TelegramButtons,
    TelegramDocument,
    Sms(SmsTier),
    AiChat,
    Profile,
    Presence,
    MessageStatusAll,
    LastStatus,
    LastReceiptStatus,
    ContactCheck,
    SessionStatus,
    WebhookLastUpdate,
    NewsletterId,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CreateMessage => "create-message",
            Endpoint::BulkV1 => "bulk-messagev1",
            Endpoint::BulkV2 => "bulk-messagev2",
            Endpoint::TelegramMessage => "telegram/send_message",
            Endpoint::TelegramImage => "telegram/send_image",
            Endpoint::TelegramLocation => "telegram/send_location",
            Endpoint::TelegramButtons => "telegram/send_buttons",
            Endpoint::TelegramDocument => "telegram/send_document",
            Endpoint::Sms(SmsTier::Regular) => "sms/send-reguler",
            Endpoint::Sms(SmsTier::Vip) => "sms/send-vip",
            Endpoint::Sms(SmsTier::Otp) => "sms/send-otp",
            Endpoint::Sms(SmsTier::Vvip) => "sms/send-vvip",
            Endpoint::AiChat => "chat-ai/send-message",
            Endpoint::Profile => "profile/raw",
            Endpoint::Presence => "presence/update",
            Endpoint::MessageStatusAll => "messages/status/all",
            Endpoint::LastStatus => "status/last",
            Endpoint::LastReceiptStatus => "messages/status/last/receipt",
            Endpoint::ContactCheck => "device/contact/check",
            Endpoint::SessionStatus => "device/session/status",
            Endpoint::WebhookLastUpdate => "device/webhook/last-update",
            Endpoint::NewsletterId => "device/webhook/newsletter-id",
        }
    }

    /// Profile and status lookups are GETs carrying a JSON body.
    pub fn method(self) -> Method {
        match self {
            Endpoint::Profile
            | Endpoint::MessageStatusAll
            | Endpoint::LastStatus
            | Endpoint::LastReceiptStatus => Method::Get,
            _ => Method::Post,
        }
    }

    pub fn url(self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Local file, read by the transport when the request is sent.
    File(PathBuf),
    Bytes {
        data: Vec<u8>,
        file_name: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
}

/// Ordered multipart form fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form {
    fields: Vec<FormField>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, FieldValue::Text(value.into()));
        self
    }

    /// Adds the field only when the value is present and non-empty.
    pub fn optional(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.text(name, v),
            _ => self,
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.push(name, value);
        self
    }

    fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push(FormField {
            name: name.into(),
            value,
        });
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Text value of the first field with this name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).and_then(|f| match &f.value {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn into_fields(self) -> Vec<FormField> {
        self.fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(Form),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub method: Method,
    pub url: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn json(endpoint: Endpoint, base_url: &str, body: serde_json::Value) -> Self {
        Self {
            endpoint,
            method: endpoint.method(),
            url: endpoint.url(base_url),
            body: RequestBody::Json(body),
        }
    }

    pub fn form(endpoint: Endpoint, base_url: &str, form: Form) -> Self {
        Self {
            endpoint,
            method: endpoint.method(),
            url: endpoint.url(base_url),
            body: RequestBody::Form(form),
        }
    }

    /// Field lookup across both encodings, handy for assertions and logs.
    pub fn field(&self, name: &str) -> Option<String> {
        match &self.body {
            RequestBody::Json(v) => v.get(name).map(|f| match f {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            RequestBody::Form(form) => form.get(name).map(str::to_string),
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        match &self.body {
            RequestBody::Json(v) => v.get(name).is_some(),
            RequestBody::Form(form) => form.fields().iter().any(|f| f.name == name),
        }
    }
}
