use http::header;
use http::Extensions;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;

use crate::Body;
use crate::Error;
use crate::Headers;
use crate::Result;

/// Polymorphic request input accepted by [`parse_request`].
///
/// The three shapes are resolved exactly once, at the normalization
/// boundary; everything after it works on a [`ParsedRequest`].
#[derive(Debug)]
pub enum RequestInput {
    /// A bare URL string.
    Url(String),
    /// A parsed URL.
    Uri(Uri),
    /// A full request with method, headers, and body already attached.
    Request(http::Request<Body>),
}

impl From<&str> for RequestInput {
    fn from(value: &str) -> Self {
        RequestInput::Url(value.to_string())
    }
}

impl From<String> for RequestInput {
    fn from(value: String) -> Self {
        RequestInput::Url(value)
    }
}

impl From<Uri> for RequestInput {
    fn from(value: Uri) -> Self {
        RequestInput::Uri(value)
    }
}

impl<B: Into<Body>> From<http::Request<B>> for RequestInput {
    fn from(value: http::Request<B>) -> Self {
        RequestInput::Request(value.map(Into::into))
    }
}

/// A partial request description whose fields win over the input request.
///
/// Each field overrides independently. An overriding header set replaces the
/// base set wholesale; there is no per-key merge.
#[derive(Debug, Default)]
pub struct RequestOverrides {
    method: Option<String>,
    headers: Option<Headers>,
    body: Option<Body>,
}

impl RequestOverrides {
    /// Create an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the HTTP method. Uppercased during normalization.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Replace the entire header set.
    pub fn headers(mut self, headers: impl Into<Headers>) -> Self {
        self.headers = Some(headers.into());
        self
    }

    /// Replace the body.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// The canonical request record produced by [`parse_request`].
///
/// Invariants: the URI is absolute with a non-empty host, the method is
/// uppercase, and header names are lowercase and unique (guaranteed by
/// [`HeaderMap`] itself).
#[derive(Debug)]
pub struct ParsedRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URI.
    pub uri: Uri,
    /// Headers, lowercase-keyed.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Body,
    /// Opaque passthrough for transport options. Never inspected by signing.
    pub extensions: Extensions,
}

impl ParsedRequest {
    /// Whether the body is a one-shot stream the transport must consume.
    pub fn is_streaming(&self) -> bool {
        self.body.is_streaming()
    }

    /// Convert into an `http::Request`, extensions included.
    pub fn into_http(self) -> http::Request<Body> {
        let mut req = http::Request::new(self.body);
        *req.method_mut() = self.method;
        *req.uri_mut() = self.uri;
        *req.headers_mut() = self.headers;
        *req.extensions_mut() = self.extensions;
        req
    }
}

/// Normalize a polymorphic request input into a [`ParsedRequest`].
///
/// `overrides` fields win over whatever the input carries; see
/// [`RequestOverrides`] for the replacement semantics.
pub fn parse_request(
    input: impl Into<RequestInput>,
    overrides: impl Into<Option<RequestOverrides>>,
) -> Result<ParsedRequest> {
    let overrides = overrides.into().unwrap_or_default();

    let (uri, base_method, base_headers, base_body, extensions) = match input.into() {
        RequestInput::Url(s) => {
            if s.is_empty() {
                return Err(Error::request_invalid("request url is empty"));
            }
            (s.parse::<Uri>()?, None, None, Body::Empty, Extensions::new())
        }
        RequestInput::Uri(uri) => (uri, None, None, Body::Empty, Extensions::new()),
        RequestInput::Request(req) => {
            let (parts, body) = req.into_parts();
            (
                parts.uri,
                Some(parts.method),
                Some(parts.headers),
                body,
                parts.extensions,
            )
        }
    };

    if uri.scheme().is_none() {
        return Err(Error::request_invalid(format!(
            "request url must be absolute, got {uri}"
        )));
    }
    if uri.host().map_or(true, str::is_empty) {
        return Err(Error::request_invalid(format!(
            "request url has no host, got {uri}"
        )));
    }

    // Method must always be uppercase. Resolution order: override, then the
    // input request's own method, then GET.
    let method = match (&overrides.method, base_method) {
        (Some(m), _) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())?,
        (None, Some(m)) => Method::from_bytes(m.as_str().to_ascii_uppercase().as_bytes())?,
        (None, None) => Method::GET,
    };

    let headers = match overrides.headers {
        // An overriding header set replaces the base set entirely.
        Some(h) => h.into_header_map()?,
        None => base_headers.unwrap_or_default(),
    };

    let body = overrides.body.unwrap_or(base_body);

    let mut req = ParsedRequest {
        method,
        uri,
        headers,
        body,
        extensions,
    };

    // The body shape may imply a content-type; an explicit header wins.
    if !req.headers.contains_key(header::CONTENT_TYPE) {
        if let Some(content_type) = req.body.content_type() {
            req.headers
                .insert(header::CONTENT_TYPE, HeaderValue::try_from(content_type)?);
        }
    }

    Ok(req)
}
