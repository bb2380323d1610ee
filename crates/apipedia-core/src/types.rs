use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Attachment for a WhatsApp message. The caller decides which kind it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    /// Remote reference, sent as-is without being downloaded.
    Url(String),
    /// Local file; must exist when the message is sent.
    Path(PathBuf),
    /// Content already in memory.
    Bytes {
        data: Vec<u8>,
        file_name: Option<String>,
    },
}

impl Media {
    /// Classify a string by prefix: `http://` and `https://` are URLs,
    /// everything else is a local path.
    pub fn infer(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Media::Url(value.to_string())
        } else {
            Media::Path(PathBuf::from(value))
        }
    }

    pub fn bytes(data: impl Into<Vec<u8>>, file_name: Option<String>) -> Self {
        Media::Bytes {
            data: data.into(),
            file_name,
        }
    }
}

/// A single value or a list, serialized as one `|`-joined string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn joined(&self) -> String {
        match self {
            OneOrMany::One(s) => s.clone(),
            OneOrMany::Many(items) => items.join("|"),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for OneOrMany {
    fn from(s: &str) -> Self {
        OneOrMany::One(s.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(s: String) -> Self {
        OneOrMany::One(s)
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(v: Vec<String>) -> Self {
        OneOrMany::Many(v)
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(v: Vec<&str>) -> Self {
        OneOrMany::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for OneOrMany {
    fn from(v: &[&str]) -> Self {
        OneOrMany::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany {
    fn from(v: [&str; N]) -> Self {
        OneOrMany::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

impl fmt::Display for OneOrMany {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Inline keyboard button for Telegram messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn callback(mut self, data: impl Into<String>) -> Self {
        self.callback_data = Some(data.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Delivery tiers offered by the SMS gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsTier {
    Regular,
    Vip,
    Otp,
    Vvip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatFormat {
    #[default]
    Text,
    Json,
}

impl ChatFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatFormat::Text => "text",
            ChatFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_media_kind() {
        assert_eq!(
            Media::infer("https://example.com/a.jpg"),
            Media::Url("https://example.com/a.jpg".into())
        );
        assert_eq!(
            Media::infer("http://example.com/a.jpg"),
            Media::Url("http://example.com/a.jpg".into())
        );
        assert_eq!(
            Media::infer("./photos/a.jpg"),
            Media::Path(PathBuf::from("./photos/a.jpg"))
        );
        // scheme match is case sensitive
        assert!(matches!(Media::infer("HTTPS://example.com"), Media::Path(_)));
    }

    #[test]
    fn pipe_join() {
        assert_eq!(OneOrMany::from(["111", "222"]).joined(), "111|222");
        assert_eq!(OneOrMany::from("111").joined(), "111");
        assert_eq!(OneOrMany::from(Vec::<String>::new()).joined(), "");
        assert!(OneOrMany::Many(vec![]).is_empty());
    }

    #[test]
    fn button_builder() {
        let b = Button::new("Open").url("https://example.com");
        assert_eq!(b.text, "Open");
        assert_eq!(b.url.as_deref(), Some("https://example.com"));
        assert!(b.callback_data.is_none());
    }
}
