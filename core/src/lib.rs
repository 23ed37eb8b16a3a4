//! Core components for building signed HTTP requests.
//!
//! This crate provides the request-normalization and signing pipeline that
//! the sigfetch ecosystem is built on. It knows nothing about any concrete
//! signature algorithm; services plug one in behind the [`SignRequest`]
//! trait.
//!
//! ## Overview
//!
//! The pipeline is three steps, composed by [`Signer`]:
//!
//! - [`parse_request`] resolves a polymorphic input (URL string, [`http::Uri`],
//!   or a full request) plus optional [`RequestOverrides`] into one
//!   [`ParsedRequest`] record.
//! - [`ProvideCredential`] resolves the credential, lazily, on every call.
//! - [`SignRequest`] rewrites the request into its signed form.
//!
//! Transports implement [`HttpSend`] to dispatch the signed result.
//!
//! ## Example
//!
//! ```no_run
//! use sigfetch_core::{ParsedRequest, ProvideCredential, Result, Signer, SignRequest, SigningCredential};
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait::async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! #[async_trait::async_trait]
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _req: &mut ParsedRequest,
//!         _credential: &Self::Credential,
//!     ) -> Result<()> {
//!         // Attach the authentication headers here.
//!         todo!()
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(MySigner).with_credential_provider(MyProvider);
//! let signed = signer.sign("https://example.com/resource", None).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;

mod body;
pub use body::serialize_form;
pub use body::Body;
pub use body::BodyStream;
pub use body::Multipart;
pub use body::Part;

mod headers;
pub use headers::Headers;

mod request;
pub use request::parse_request;
pub use request::ParsedRequest;
pub use request::RequestInput;
pub use request::RequestOverrides;

mod signing;
pub use signing::SigningRequest;

mod api;
pub use api::ProvideCredential;
pub use api::SignRequest;
pub use api::SigningCredential;

mod signer;
pub use signer::Signer;

mod http;
pub use crate::http::HttpSend;
