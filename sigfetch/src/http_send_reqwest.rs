use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::Client;
use reqwest::Request;

use sigfetch_core::Body;
use sigfetch_core::Error;
use sigfetch_core::HttpSend;
use sigfetch_core::Result;

/// HttpSend backed by a `reqwest::Client`.
///
/// Timeout, TLS, proxy, and redirect policy come from the client the caller
/// supplies; dropping the returned future cancels the request.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a configured `reqwest::Client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Body>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        let req = http::Request::from_parts(parts, into_reqwest_body(body));
        let req = Request::try_from(req)
            .map_err(|e| Error::unexpected("failed to build transport request").with_source(e))?;

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::unexpected("transport request failed").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

fn into_reqwest_body(body: Body) -> reqwest::Body {
    match body {
        Body::Empty => reqwest::Body::from(Bytes::new()),
        Body::Text(s) => reqwest::Body::from(s),
        Body::Bytes(bs) => reqwest::Body::from(bs),
        // Serialized here with the same routine the signer hashed, so the
        // transmitted bytes match the signed digest.
        Body::Form(fields) => reqwest::Body::from(sigfetch_core::serialize_form(&fields)),
        Body::Multipart(m) => reqwest::Body::from(m.to_bytes()),
        Body::Stream(s) => reqwest::Body::wrap_stream(s),
    }
}
