//! # Apipedia
//!
//! Rust client for the Apipedia messaging API.
//!
//! ## Features
//!
//! - **WhatsApp**: single messages with URL, file or in-memory attachments, bulk sends
//! - **Telegram**: text, images, locations, documents and inline keyboards
//! - **SMS**: regular, VIP, OTP and VVIP tiers
//! - **AI chat**: ask an agent and relay its reply to any channel
//! - **Status lookups**: profile, presence, message status, device and session queries
//! - **Uniform errors**: remote, network, request and validation failures stay distinct
//! - **Configuration**: file and environment based, with structured logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use apipedia::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Apipedia::new("your_appkey", "your_authkey");
//!
//!     let reply = client.ai_chat("Summarize today's orders", "agent-1", ChatFormat::Text).await?;
//!     client.to_whatsapp(&reply, "628123456789", "Bot: ").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust,ignore
//! use apipedia::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! apipedia::init_logging(&config.logging)?;
//! let client = config.client()?;
//! ```

pub mod config;
pub mod logging;

pub use crate::config::*;
pub use logging::init_logging;

/// Common imports for Apipedia usage
pub mod prelude {
    pub use crate::config::{ApiConfig, AppConfig, CredentialsConfig, LoggingConfig};
    pub use crate::logging::init_logging;
    pub use apipedia_client::{Apipedia, ReqwestTransport, Session};
    pub use apipedia_core::relay::{DataShape, ResponseShape};
    pub use apipedia_core::*;
}
