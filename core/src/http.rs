use std::fmt::Debug;

use bytes::Bytes;

use crate::Body;
use crate::Result;

/// HttpSend dispatches one signed request and returns its response.
///
/// This is the transport seam of the pipeline: implement it over whatever
/// HTTP client you use. Streaming bodies must be consumed exactly once, and
/// cancellation and timeout policy belong to the implementation.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send the request and return the response.
    async fn http_send(&self, req: http::Request<Body>) -> Result<http::Response<Bytes>>;
}
