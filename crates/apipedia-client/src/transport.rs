use std::io::ErrorKind;
use std::time::Duration;

use apipedia_core::{
    ApiRequest, ApipediaError, FieldValue, Form, Method, RawResponse, RequestBody, Transport,
};
use async_trait::async_trait;
use reqwest::multipart;

/// [`Transport`] backed by `reqwest`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ApipediaError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApipediaError::Request(format!("http client build: {}", e)))?;
        Ok(Self { http })
    }

    /// Use a preconfigured client (proxy, TLS settings, ...).
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApipediaError> {
        let builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
        };
        let builder = match request.body {
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(form) => builder.multipart(multipart_form(form).await?),
        };

        let res = builder.send().await.map_err(classify)?;
        let status = res.status();
        let reason = status.canonical_reason().map(str::to_string);
        let body = res
            .text()
            .await
            .map_err(|e| ApipediaError::network(e.to_string()))?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

fn classify(e: reqwest::Error) -> ApipediaError {
    if e.is_builder() {
        ApipediaError::Request(e.to_string())
    } else {
        ApipediaError::network(e.to_string())
    }
}

async fn multipart_form(form: Form) -> Result<multipart::Form, ApipediaError> {
    let mut out = multipart::Form::new();
    for field in form.into_fields() {
        out = match field.value {
            FieldValue::Text(text) => out.text(field.name, text),
            FieldValue::File(path) => {
                let data = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
                    ErrorKind::NotFound => ApipediaError::Validation(path.clone()),
                    _ => ApipediaError::Request(format!("read {}: {}", path.display(), e)),
                })?;
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("upload")
                    .to_string();
                out.part(field.name, multipart::Part::bytes(data).file_name(file_name))
            }
            FieldValue::Bytes { data, file_name } => {
                let part = multipart::Part::bytes(data);
                let part = match file_name {
                    Some(name) => part.file_name(name),
                    None => part,
                };
                out.part(field.name, part)
            }
        };
    }
    Ok(out)
}
