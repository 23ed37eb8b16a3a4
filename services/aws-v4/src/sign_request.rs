use std::borrow::Cow;
use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use http::header;
use http::HeaderValue;
use log::debug;
use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;

use sigfetch_core::hash::hex_hmac_sha256;
use sigfetch_core::hash::hex_sha256;
use sigfetch_core::hash::hmac_sha256;
use sigfetch_core::time::format_date;
use sigfetch_core::time::format_iso8601;
use sigfetch_core::time::now;
use sigfetch_core::time::DateTime;
use sigfetch_core::Error;
use sigfetch_core::ParsedRequest;
use sigfetch_core::ProvideCredential;
use sigfetch_core::RequestInput;
use sigfetch_core::RequestOverrides;
use sigfetch_core::Result;
use sigfetch_core::SignRequest;
use sigfetch_core::Signer;
use sigfetch_core::SigningRequest;

use crate::constants::AWS_QUERY_ENCODE_SET;
use crate::constants::AWS_URI_ENCODE_SET;
use crate::constants::DEFAULT_REGION;
use crate::constants::UNSIGNED_PAYLOAD;
use crate::constants::X_AMZ_CONTENT_SHA_256;
use crate::constants::X_AMZ_DATE;
use crate::constants::X_AMZ_SECURITY_TOKEN;
use crate::rfc3986::encode_rfc3986;
use crate::Credential;

/// RequestSigner that implements AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,
    rfc3986_encoding: bool,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a signer for the given service, in the default region.
    pub fn new(service: &str) -> Self {
        Self {
            service: service.into(),
            region: DEFAULT_REGION.into(),
            rfc3986_encoding: false,

            time: None,
        }
    }

    /// Specify the signing region.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.into();
        self
    }

    /// Percent-encode `! ' ( ) *` in the outgoing path, for targets that
    /// reject the platform-default encoding.
    pub fn with_rfc3986_encoding(mut self, enable: bool) -> Self {
        self.rfc3986_encoding = enable;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(&self, req: &mut ParsedRequest, cred: &Self::Credential) -> Result<()> {
        let now = self.time.unwrap_or_else(now);

        // The hash policy is decided while the body is still at hand:
        // replayable bodies get a real digest of the bytes the transport
        // will send, one-shot bodies keep the unsigned-payload sentinel.
        let payload_hash = match req.body.sha256_hex() {
            Some(digest) => HeaderValue::try_from(digest)?,
            None => HeaderValue::from_static(UNSIGNED_PAYLOAD),
        };

        let mut signed_req = SigningRequest::build(req)?;

        if self.rfc3986_encoding {
            // The query is re-encoded strictly during canonicalization; only
            // the path needs the extra pass.
            if let Cow::Owned(path) = encode_rfc3986(&signed_req.path) {
                signed_req.path = path;
            }
        }

        canonicalize_header(&mut signed_req, cred, payload_hash, now)?;
        canonicalize_query(&mut signed_req);

        // Build canonical request and string to sign.
        let creq = canonical_request_string(&signed_req)?;
        let encoded_req = hex_sha256(creq.as_bytes());

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!(
            "{}/{}/{}/aws4_request",
            format_date(now),
            self.region,
            self.service
        );
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "AWS4-HMAC-SHA256")?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{}", &scope)?;
            write!(f, "{}", &encoded_req)?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.access_key_id,
            scope,
            signed_req.header_name_to_vec_sorted().join(";"),
            signature
        ))?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(req)
    }
}

fn canonical_request_string(ctx: &SigningRequest) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", ctx.method)?;
    // Insert encoded path
    let path = percent_decode_str(&ctx.path)
        .decode_utf8()
        .map_err(|e| Error::request_invalid("request path is not valid utf-8").with_source(e))?;
    writeln!(f, "{}", utf8_percent_encode(&path, &AWS_URI_ENCODE_SET))?;
    // Insert query
    writeln!(
        f,
        "{}",
        ctx.query
            .iter()
            .map(|(k, v)| { format!("{k}={v}") })
            .collect::<Vec<_>>()
            .join("&")
    )?;
    // Insert signed headers
    let signed_headers = ctx.header_name_to_vec_sorted();
    for name in signed_headers.iter() {
        writeln!(f, "{}:{}", name, ctx.headers[*name].to_str()?)?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;
    write!(f, "{}", ctx.headers[X_AMZ_CONTENT_SHA_256].to_str()?)?;

    Ok(f)
}

fn canonicalize_header(
    ctx: &mut SigningRequest,
    cred: &Credential,
    payload_hash: HeaderValue,
    now: DateTime,
) -> Result<()> {
    // Header names and values need to be normalized according to Step 4 of https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html
    for (_, value) in ctx.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    // Insert HOST header if not present.
    if ctx.headers.get(header::HOST).is_none() {
        ctx.headers
            .insert(header::HOST, HeaderValue::try_from(ctx.host())?);
    }

    // Insert DATE header if not present.
    if ctx.headers.get(X_AMZ_DATE).is_none() {
        ctx.headers
            .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);
    }

    // Insert X_AMZ_CONTENT_SHA_256 header if not present: a caller that
    // precomputed the digest keeps it.
    if ctx.headers.get(X_AMZ_CONTENT_SHA_256).is_none() {
        ctx.headers.insert(X_AMZ_CONTENT_SHA_256, payload_hash);
    }

    // Insert X_AMZ_SECURITY_TOKEN header if security token exists.
    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token)?;
        // Set token value sensitive to avoid leaking.
        value.set_sensitive(true);

        ctx.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(())
}

fn canonicalize_query(ctx: &mut SigningRequest) {
    if ctx.query.is_empty() {
        return;
    }

    // Sort by param name
    ctx.query.sort();

    ctx.query = ctx
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
}

fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(&sign_date, region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(&sign_region, service.as_bytes());
    // Sign request
    hmac_sha256(&sign_service, b"aws4_request")
}

/// Options for [`sign_request`]: target service, region, credentials, and
/// encoding behavior.
#[derive(Debug, Clone)]
pub struct SigningOptions {
    service: String,
    region: String,
    credentials: Option<Arc<dyn ProvideCredential<Credential = Credential>>>,
    rfc3986_encoding: bool,
}

impl SigningOptions {
    /// Options for the target service, in the default `us-east-1` region.
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
            region: DEFAULT_REGION.to_string(),
            credentials: None,
            rfc3986_encoding: false,
        }
    }

    /// Set the signing region.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    /// Set the credential provider.
    ///
    /// Accepts a static provider, an async function wrapped in
    /// [`crate::ProvideCredentialFn`], or any other provider implementation.
    /// Without one, signing fails with a credential error.
    pub fn with_credentials(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        self.credentials = Some(Arc::new(provider));
        self
    }

    /// Enable strict RFC 3986 encoding of the outgoing path and query.
    pub fn with_rfc3986_encoding(mut self, enable: bool) -> Self {
        self.rfc3986_encoding = enable;
        self
    }

    /// Build a [`Signer`] from these options.
    pub fn into_signer(self) -> Signer<Credential> {
        let builder = RequestSigner::new(&self.service)
            .with_region(&self.region)
            .with_rfc3986_encoding(self.rfc3986_encoding);

        let mut signer = Signer::new(builder);
        if let Some(provider) = self.credentials {
            signer = signer.with_credential_provider(provider);
        }
        signer
    }
}

/// Sign a request without dispatching it.
///
/// `overrides` follows the replacement semantics of
/// [`sigfetch_core::parse_request`]; pass `None` to sign the input as-is.
/// The returned request carries the full signed header set and the original
/// body, ready to hand to any HTTP client.
pub async fn sign_request(
    input: impl Into<RequestInput>,
    overrides: impl Into<Option<RequestOverrides>>,
    options: SigningOptions,
) -> Result<ParsedRequest> {
    options.into_signer().sign(input, overrides).await
}
