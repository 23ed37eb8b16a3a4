//! Signed fetch for SigV4-compatible services.
//!
//! `sigfetch` wraps an HTTP transport so every request goes out carrying an
//! AWS Signature Version 4 header set. Use [`SignedFetcher`] as a drop-in
//! signed request client, or [`aws::sign_request`] to sign a request and
//! dispatch it with your own client.
//!
//! ## Example
//!
//! ```no_run
//! use sigfetch::aws::{SigningOptions, StaticCredentialProvider};
//! use sigfetch::{RequestOverrides, SignedFetcher};
//!
//! # async fn example() -> sigfetch::Result<()> {
//! let fetcher = SignedFetcher::new(
//!     SigningOptions::new("execute-api")
//!         .with_region("eu-west-1")
//!         .with_credentials(StaticCredentialProvider::new("akid", "secret")),
//! )?;
//!
//! let resp = fetcher
//!     .fetch(
//!         "https://api.example.com/items",
//!         RequestOverrides::new().method("POST").body(r#"{"a":1}"#),
//!     )
//!     .await?;
//! assert!(resp.status().is_success());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use sigfetch_core::*;

/// AWS SigV4 signing types.
pub mod aws {
    pub use sigfetch_aws_v4::*;
}

mod fetch;
pub use fetch::SignedFetcher;

#[cfg(feature = "default-transport")]
mod http_send_reqwest;
#[cfg(feature = "default-transport")]
pub use http_send_reqwest::ReqwestHttpSend;
