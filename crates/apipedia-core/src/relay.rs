//! Display text extraction for forwarding one response into another send.
//!
//! Sub-services of the API answer with different shapes: plain text,
//! `{message}`, `{data: string | object}`, `{response}`. [`ResponseShape`]
//! classifies a body into one of those, with an [`ResponseShape::Opaque`]
//! fallback so extraction never fails.

use serde_json::Value;

use crate::{ApiResult, ApipediaError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// Body was not an object.
    Primitive(String),
    Text(String),
    Message(String),
    Data(DataShape),
    Response(String),
    /// Nothing recognizable; the serialized body.
    Opaque(String),
}

/// Shape of a `data` field that was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataShape {
    Plain(String),
    Text(String),
    Response(String),
    Opaque(String),
}

impl ResponseShape {
    pub fn parse(body: &Value) -> Self {
        let obj = match body {
            Value::Object(map) => map,
            Value::Array(_) => return ResponseShape::Opaque(body.to_string()),
            other => return ResponseShape::Primitive(render(other)),
        };

        if let Some(v) = present(obj.get("text")) {
            ResponseShape::Text(render(v))
        } else if let Some(v) = present(obj.get("message")) {
            ResponseShape::Message(render(v))
        } else if let Some(v) = present(obj.get("data")) {
            ResponseShape::Data(DataShape::parse(v))
        } else if let Some(v) = present(obj.get("response")) {
            ResponseShape::Response(render(v))
        } else {
            ResponseShape::Opaque(body.to_string())
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ResponseShape::Primitive(s)
            | ResponseShape::Text(s)
            | ResponseShape::Message(s)
            | ResponseShape::Response(s)
            | ResponseShape::Opaque(s) => s,
            ResponseShape::Data(data) => data.into_text(),
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(
            self,
            ResponseShape::Opaque(_) | ResponseShape::Data(DataShape::Opaque(_))
        )
    }
}

impl DataShape {
    fn parse(data: &Value) -> Self {
        if let Value::String(s) = data {
            return DataShape::Plain(s.clone());
        }
        if let Some(v) = present(data.get("text")) {
            DataShape::Text(render(v))
        } else if let Some(v) = present(data.get("response")) {
            DataShape::Response(render(v))
        } else {
            DataShape::Opaque(data.to_string())
        }
    }

    pub fn into_text(self) -> String {
        match self {
            DataShape::Plain(s)
            | DataShape::Text(s)
            | DataShape::Response(s)
            | DataShape::Opaque(s) => s,
        }
    }
}

/// Text to send onward: `prefix` followed by the extracted text.
///
/// Fails with [`ApipediaError::NoResult`] when the previous result carries
/// nothing (`null` or an empty string).
pub fn relay_text(previous: &ApiResult, prefix: &str) -> Result<String, ApipediaError> {
    if previous.is_empty() {
        return Err(ApipediaError::NoResult);
    }
    Ok(format!("{}{}", prefix, previous.text()))
}

// null, false, 0 and "" count as missing
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
