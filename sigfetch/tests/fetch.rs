//! Adapter tests against a recording mock transport. No network involved.

use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use http::HeaderMap;
use http::Method;
use http::StatusCode;
use http::Uri;

use sigfetch::aws::SigningOptions;
use sigfetch::aws::StaticCredentialProvider;
use sigfetch::Body;
use sigfetch::Error;
use sigfetch::ErrorKind;
use sigfetch::HttpSend;
use sigfetch::RequestOverrides;
use sigfetch::SignedFetcher;

#[derive(Debug, Clone)]
struct Dispatched {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
}

#[derive(Debug, Default, Clone)]
struct MockHttpSend {
    calls: Arc<Mutex<Vec<Dispatched>>>,
    fail: bool,
}

impl MockHttpSend {
    fn failing() -> Self {
        Self {
            calls: Arc::default(),
            fail: true,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn last_call(&self) -> Dispatched {
        self.calls.lock().unwrap().last().cloned().expect("a call must be recorded")
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Body>) -> sigfetch::Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        self.calls.lock().unwrap().push(Dispatched {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body: body.replayable_bytes(),
        });

        if self.fail {
            return Err(Error::unexpected("mock transport refused the request"));
        }

        Ok(http::Response::builder()
            .status(StatusCode::OK)
            .header("x-served-by", "mock")
            .body(Bytes::from_static(b"ok"))
            .expect("response must build"))
    }
}

fn options() -> SigningOptions {
    SigningOptions::new("s3")
        .with_region("us-east-1")
        .with_credentials(StaticCredentialProvider::new("akid", "secret"))
}

#[tokio::test]
async fn test_fetch_signs_and_dispatches_once() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let transport = MockHttpSend::default();
    let fetcher = SignedFetcher::with_http_send(options(), transport.clone());

    let resp = fetcher
        .fetch("https://bucket.s3.amazonaws.com/object", None)
        .await?;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body(), &Bytes::from_static(b"ok"));
    assert_eq!(resp.headers().get("x-served-by").unwrap(), "mock");

    assert_eq!(transport.call_count(), 1);
    let call = transport.last_call();
    assert_eq!(call.method, Method::GET);
    assert_eq!(call.uri.host(), Some("bucket.s3.amazonaws.com"));
    assert!(call.headers.contains_key("authorization"));
    assert!(call.headers.contains_key("x-amz-date"));
    assert!(call.headers.contains_key("x-amz-content-sha256"));
    assert_eq!(call.headers.get("host").unwrap(), "bucket.s3.amazonaws.com");

    Ok(())
}

#[tokio::test]
async fn test_fetch_body_digest_matches_transmitted_bytes() -> Result<()> {
    let transport = MockHttpSend::default();
    let fetcher = SignedFetcher::with_http_send(options(), transport.clone());

    fetcher
        .fetch(
            "https://bucket.s3.amazonaws.com/object",
            RequestOverrides::new().method("PUT").body("exact bytes"),
        )
        .await?;

    let call = transport.last_call();
    let sent = call.body.expect("body must be replayable");
    assert_eq!(sent, Bytes::from_static(b"exact bytes"));
    assert_eq!(
        call.headers.get("x-amz-content-sha256").unwrap(),
        sigfetch::hash::hex_sha256(&sent).as_str()
    );

    Ok(())
}

#[tokio::test]
async fn test_failed_sign_never_reaches_transport() {
    let transport = MockHttpSend::default();
    let fetcher =
        SignedFetcher::with_http_send(SigningOptions::new("s3"), transport.clone());

    let err = fetcher
        .fetch("https://bucket.s3.amazonaws.com/object", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_transport_error_propagates_unchanged() {
    let transport = MockHttpSend::failing();
    let fetcher = SignedFetcher::with_http_send(options(), transport.clone());

    let err = fetcher
        .fetch("https://bucket.s3.amazonaws.com/object", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.to_string().contains("mock transport refused the request"));
    // The request was signed and dispatched exactly once, no retries.
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_streaming_body_reaches_transport_unbuffered() -> Result<()> {
    use futures::stream;

    let transport = MockHttpSend::default();
    let fetcher = SignedFetcher::with_http_send(options(), transport.clone());

    let body = Body::stream(stream::iter(vec![Ok(Bytes::from_static(b"chunk"))]));
    fetcher
        .fetch(
            "https://bucket.s3.amazonaws.com/upload",
            RequestOverrides::new().method("PUT").body(body),
        )
        .await?;

    let call = transport.last_call();
    assert!(call.body.is_none());
    assert_eq!(
        call.headers.get("x-amz-content-sha256").unwrap(),
        "UNSIGNED-PAYLOAD"
    );

    Ok(())
}
