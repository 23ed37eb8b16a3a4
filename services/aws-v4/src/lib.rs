//! AWS SigV4 request signing.
//!
//! This crate plugs the AWS Signature Version 4 algorithm into the
//! `sigfetch-core` pipeline: [`RequestSigner`] implements the signature
//! computation, [`StaticCredentialProvider`] and [`ProvideCredentialFn`]
//! cover the two credential forms, and [`sign_request`] is the one-call
//! surface for signing a request without dispatching it.
//!
//! ```no_run
//! use sigfetch_aws_v4::{sign_request, SigningOptions, StaticCredentialProvider};
//!
//! # async fn example() -> sigfetch_core::Result<()> {
//! let options = SigningOptions::new("execute-api")
//!     .with_region("eu-west-1")
//!     .with_credentials(StaticCredentialProvider::new("akid", "secret"));
//!
//! let signed = sign_request("https://api.example.com/items", None, options).await?;
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::DEFAULT_REGION;
pub use constants::UNSIGNED_PAYLOAD;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::ProvideCredentialFn;
pub use provide_credential::StaticCredentialProvider;

mod rfc3986;
pub use rfc3986::encode_rfc3986;

mod sign_request;
pub use sign_request::sign_request;
pub use sign_request::RequestSigner;
pub use sign_request::SigningOptions;
