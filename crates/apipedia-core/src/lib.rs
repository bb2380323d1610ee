//! # Apipedia Core
//!
//! Core traits and types shared by the Apipedia client crates.
//!
//! This crate provides the building blocks every operation goes through:
//! - [`Transport`] trait, the single seam where requests leave the process
//! - [`ApiRequest`] / [`RawResponse`] describing one round trip
//! - [`ApiResult`] holding a decoded response body
//! - [`ApipediaError`], the error taxonomy shared by every call
//! - [`relay`] for pulling display text out of heterogeneous responses
//!
//! ## Example
//!
//! ```rust,ignore
//! use apipedia_core::{relay::ResponseShape, ApiResult};
//!
//! let shape = ResponseShape::parse(result.body());
//! println!("{}", shape.into_text());
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub mod relay;
pub mod request;
pub mod types;

pub use request::{ApiRequest, Endpoint, FieldValue, Form, FormField, Method, RequestBody};
pub use types::{Button, ChatFormat, Media, OneOrMany, SmsTier};

/// Production host every endpoint lives under.
pub const DEFAULT_BASE_URL: &str = "https://waconsole.apipedia.id/api";

/// Errors that can occur during Apipedia operations
#[derive(Debug, thiserror::Error)]
pub enum ApipediaError {
    /// The API answered with a non-2xx status
    #[error("API Error: {status} - {message}")]
    Api { status: u16, message: String },
    /// The request went out but no response came back
    #[error("Network Error: No response received from API")]
    Network { detail: String },
    /// The request could not be built or sent
    #[error("Request Error: {0}")]
    Request(String),
    /// A local media path does not exist
    #[error("File does not exist: {}", .0.display())]
    Validation(PathBuf),
    /// A relay was attempted without a previous result
    #[error("No previous result to send")]
    NoResult,
}

impl ApipediaError {
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            detail: detail.into(),
        }
    }

    /// HTTP status for remote errors, `None` for every local kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the failure happened before anything reached the server.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Request(_) | Self::Validation(_) | Self::NoResult
        )
    }
}

/// What a transport hands back once a response has been received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Canonical reason phrase for the status, e.g. "Bad Request".
    pub reason: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: None,
            body: body.into(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode a successful body. Non-JSON text is kept as a JSON string and
    /// an empty body becomes `null`.
    pub fn decode_body(&self) -> serde_json::Value {
        if self.body.trim().is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_str(&self.body)
            .unwrap_or_else(|_| serde_json::Value::String(self.body.clone()))
    }

    /// Turn a non-2xx response into [`ApipediaError::Api`]: the body's
    /// `message` field when present, otherwise the reason phrase.
    pub fn into_api_error(self) -> ApipediaError {
        let from_body = serde_json::from_str::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|v| match v.get("message") {
                Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(serde_json::Value::Null) | Some(serde_json::Value::String(_)) | None => None,
                Some(other) => Some(other.to_string()),
            });
        let message = from_body
            .or(self.reason)
            .unwrap_or_else(|| "Unknown Status".to_string());
        ApipediaError::Api {
            status: self.status,
            message,
        }
    }
}

/// Decoded result of one successful API call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResult {
    /// Local correlation id, also attached to the tracing span of the call.
    pub request_id: Uuid,
    pub endpoint: Endpoint,
    pub status: u16,
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
    /// Raw payload as returned by the API.
    pub body: serde_json::Value,
}

impl ApiResult {
    pub fn new(endpoint: Endpoint, status: u16, body: serde_json::Value) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            endpoint,
            status,
            received_at: OffsetDateTime::now_utc(),
            body,
        }
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    pub fn into_body(self) -> serde_json::Value {
        self.body
    }

    /// A result with nothing in it cannot be relayed.
    pub fn is_empty(&self) -> bool {
        match &self.body {
            serde_json::Value::Null => true,
            serde_json::Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Display text extracted from the body, see [`relay::ResponseShape`].
    pub fn text(&self) -> String {
        relay::ResponseShape::parse(&self.body).into_text()
    }
}

/// HTTP collaborator used by the dispatcher.
///
/// A transport returns `Ok` whenever a response was received, whatever its
/// status; status translation is done by the caller so that every
/// transport surfaces the same errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApipediaError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApipediaError> {
        (**self).execute(request).await
    }
}
