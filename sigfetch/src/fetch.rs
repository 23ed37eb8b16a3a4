use std::sync::Arc;

use bytes::Bytes;
use log::debug;

use sigfetch_aws_v4::Credential;
use sigfetch_aws_v4::SigningOptions;
use sigfetch_core::HttpSend;
use sigfetch_core::RequestInput;
use sigfetch_core::RequestOverrides;
use sigfetch_core::Result;
use sigfetch_core::Signer;

#[cfg(not(feature = "default-transport"))]
use sigfetch_core::Error;

/// A fetch-style client that signs every request before dispatch.
///
/// The transport is fixed at construction: an explicit [`HttpSend`] always
/// wins, otherwise the built-in reqwest transport is used when the
/// `default-transport` feature is enabled.
#[derive(Clone, Debug)]
pub struct SignedFetcher {
    signer: Signer<Credential>,
    http: Arc<dyn HttpSend>,
}

impl SignedFetcher {
    /// Create a fetcher using the built-in transport.
    ///
    /// Fails with a transport error when the crate is compiled without the
    /// `default-transport` feature; supply a transport via
    /// [`SignedFetcher::with_http_send`] in that case.
    pub fn new(options: SigningOptions) -> Result<Self> {
        Ok(Self {
            signer: options.into_signer(),
            http: default_http_send()?,
        })
    }

    /// Create a fetcher with an explicit transport.
    pub fn with_http_send(options: SigningOptions, http: impl HttpSend) -> Self {
        Self {
            signer: options.into_signer(),
            http: Arc::new(http),
        }
    }

    /// Sign and dispatch one request.
    ///
    /// A failed sign never reaches the transport; transport failures,
    /// including cancellation, surface to the caller unchanged. The response
    /// is returned untouched.
    pub async fn fetch(
        &self,
        input: impl Into<RequestInput>,
        overrides: impl Into<Option<RequestOverrides>>,
    ) -> Result<http::Response<Bytes>> {
        let signed = self.signer.sign(input, overrides).await?;
        debug!("dispatching signed {} {}", signed.method, signed.uri);

        self.http.http_send(signed.into_http()).await
    }
}

#[cfg(feature = "default-transport")]
fn default_http_send() -> Result<Arc<dyn HttpSend>> {
    Ok(Arc::new(crate::ReqwestHttpSend::default()))
}

#[cfg(not(feature = "default-transport"))]
fn default_http_send() -> Result<Arc<dyn HttpSend>> {
    Err(Error::transport_missing(
        "no transport available: enable the default-transport feature or supply one with with_http_send",
    ))
}
