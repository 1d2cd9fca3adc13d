//! # sec4dev
//!
//! Client for the Sec4Dev Security Checks API: disposable email detection and
//! IP address classification.
//!
//! ```no_run
//! use sec4dev::{ClientConfig, Sec4DevClient};
//!
//! # async fn run() -> sec4dev::Result<()> {
//! let client = Sec4DevClient::new(
//!     ClientConfig::new("sec4_your_key")
//!         .with_rate_limit_observer(|info| println!("{} requests left", info.remaining)),
//! )?;
//!
//! if client.email().is_disposable("user@tempmail.com").await? {
//!     println!("disposable address");
//! }
//!
//! let ip = client.ip().check("203.0.113.42").await?;
//! println!("{} ({:.0}%)", ip.classification, ip.confidence * 100.0);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod email;
pub mod error;
pub mod http;
pub mod ip;
pub mod models;
pub mod validation;

pub use client::Sec4DevClient;
pub use config::{API_KEY_PREFIX, ClientConfig, DEFAULT_BASE_URL};
pub use email::EmailService;
pub use error::{ApiError, Error, ErrorKind, Result, RetryMetadata};
pub use http::{RateLimitInfo, RateLimitObserver};
pub use ip::IpService;
pub use models::{EmailCheckResult, IpCheckResult, IpClassification, IpGeo, IpNetwork, IpSignals};
pub use validation::{validate_email, validate_ip};

/// Crate version, sent in the user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
