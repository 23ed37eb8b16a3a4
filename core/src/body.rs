use std::fmt;
use std::fmt::Write;
use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::Stream;
use futures::StreamExt;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::hash::hex_sha256;

/// A one-shot stream of body bytes.
///
/// Consumed at most once, and only by the transport. Signing never reads it.
pub type BodyStream = BoxStream<'static, io::Result<Bytes>>;

/// Request body in one of the shapes the signing pipeline supports.
///
/// `Empty` means the request carries no body at all, which is distinct from
/// a present-but-zero-length `Bytes` payload.
pub enum Body {
    /// No body.
    Empty,
    /// UTF-8 text.
    Text(String),
    /// A raw byte buffer.
    Bytes(Bytes),
    /// URL-encoded form fields, serialized as `k=v&k2=v2` on the wire.
    Form(Vec<(String, String)>),
    /// A multi-part form payload.
    Multipart(Multipart),
    /// A live byte stream.
    Stream(BodyStream),
}

impl Body {
    /// Wrap a stream of bytes into a streaming body.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Body::Stream(stream.boxed())
    }

    /// Whether this body is a one-shot stream.
    ///
    /// Streaming bodies are handed to the transport untouched; transports
    /// that need a duplex hint for streamed uploads take it from here.
    pub fn is_streaming(&self) -> bool {
        matches!(self, Body::Stream(_))
    }

    /// The exact bytes the transport will send, for bodies that can be
    /// replayed.
    ///
    /// Multipart and stream bodies return `None`: their contents are not
    /// re-readable before transmission without buffering the whole upload.
    pub fn replayable_bytes(&self) -> Option<Bytes> {
        match self {
            Body::Empty => Some(Bytes::new()),
            Body::Text(s) => Some(Bytes::copy_from_slice(s.as_bytes())),
            Body::Bytes(bs) => Some(bs.clone()),
            Body::Form(fields) => Some(Bytes::from(serialize_form(fields).into_bytes())),
            Body::Multipart(_) | Body::Stream(_) => None,
        }
    }

    /// Hex encoded SHA256 digest of the transmitted bytes.
    ///
    /// `None` means the body must go out unbuffered and the signature has to
    /// fall back to an unsigned-payload marker.
    pub fn sha256_hex(&self) -> Option<String> {
        self.replayable_bytes().map(|bs| hex_sha256(&bs))
    }

    /// The `content-type` implied by the body shape, if any.
    pub fn content_type(&self) -> Option<String> {
        match self {
            Body::Text(_) => Some("text/plain;charset=UTF-8".to_string()),
            Body::Form(_) => Some("application/x-www-form-urlencoded".to_string()),
            Body::Multipart(m) => Some(m.content_type()),
            _ => None,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Empty
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Text(s) => f.debug_tuple("Text").field(&s.len()).finish(),
            Body::Bytes(bs) => f.debug_tuple("Bytes").field(&bs.len()).finish(),
            Body::Form(fields) => f.debug_tuple("Form").field(&fields.len()).finish(),
            Body::Multipart(m) => f.debug_tuple("Multipart").field(&m.parts.len()).finish(),
            Body::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Body::Empty
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Body::Text(value.to_string())
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Text(value)
    }
}

impl From<&[u8]> for Body {
    fn from(value: &[u8]) -> Self {
        Body::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(value))
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::Bytes(value)
    }
}

impl From<Vec<(String, String)>> for Body {
    fn from(value: Vec<(String, String)>) -> Self {
        Body::Form(value)
    }
}

impl From<Multipart> for Body {
    fn from(value: Multipart) -> Self {
        Body::Multipart(value)
    }
}

/// Serialize form fields into the URL-encoded wire format.
///
/// Both the content hash and the transport use this, so the signed digest
/// always matches the transmitted bytes.
pub fn serialize_form(fields: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

/// A `multipart/form-data` payload.
#[derive(Debug, Clone)]
pub struct Multipart {
    boundary: String,
    parts: Vec<Part>,
}

impl Multipart {
    /// Create an empty multipart payload with a random boundary.
    pub fn new() -> Self {
        let boundary: String = rand::thread_rng()
            .sample_iter(Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        Self::with_boundary(boundary)
    }

    /// Create an empty multipart payload with an explicit boundary.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// Append a part.
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// The boundary separating parts on the wire.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The `content-type` announcing this payload, boundary included.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Serialize the payload into its wire form.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = Vec::new();

        for part in &self.parts {
            let mut head = format!(
                "--{}\r\ncontent-disposition: form-data; name=\"{}\"",
                self.boundary, part.name
            );
            if let Some(file_name) = &part.file_name {
                write!(head, "; filename=\"{file_name}\"").expect("write to string must succeed");
            }
            head.push_str("\r\n");
            if let Some(content_type) = &part.content_type {
                write!(head, "content-type: {content_type}\r\n")
                    .expect("write to string must succeed");
            }
            head.push_str("\r\n");

            buf.extend_from_slice(head.as_bytes());
            buf.extend_from_slice(&part.value);
            buf.extend_from_slice(b"\r\n");
        }

        buf.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Bytes::from(buf)
    }
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}

/// One part of a [`Multipart`] payload.
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    value: Bytes,
}

impl Part {
    /// Create a part with a field name and its content.
    pub fn new(name: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: None,
            value: value.into(),
        }
    }

    /// Attach a file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Attach a content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}
