//! Wall-clock signing tests exercising the public `sign_request` surface.

use anyhow::Result;
use http::Method;
use sigfetch_aws_v4::sign_request;
use sigfetch_aws_v4::ProvideCredentialFn;
use sigfetch_aws_v4::SigningOptions;
use sigfetch_aws_v4::StaticCredentialProvider;
use sigfetch_core::ErrorKind;
use sigfetch_core::RequestOverrides;

fn options() -> SigningOptions {
    SigningOptions::new("s3")
        .with_region("us-east-1")
        .with_credentials(StaticCredentialProvider::new("access_key_id", "secret_access_key"))
}

fn assert_signed_shape(authorization: &str) {
    assert!(
        authorization.starts_with("AWS4-HMAC-SHA256 Credential=access_key_id/"),
        "unexpected authorization: {authorization}"
    );
    assert!(authorization.contains("/us-east-1/s3/aws4_request, SignedHeaders="));

    let signature = authorization
        .rsplit("Signature=")
        .next()
        .expect("signature must be present");
    assert_eq!(signature.len(), 64);
    assert!(signature.bytes().all(|b| b.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_sign_url_string() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let signed = sign_request("https://bucket.s3.amazonaws.com/object", None, options()).await?;

    assert_eq!(signed.method, Method::GET);
    assert_eq!(
        signed.headers.get("host").unwrap(),
        "bucket.s3.amazonaws.com"
    );

    let date = signed.headers.get("x-amz-date").unwrap().to_str()?;
    assert_eq!(date.len(), 16);
    assert!(date.ends_with('Z'));
    assert_eq!(&date[8..9], "T");

    let digest = signed
        .headers
        .get("x-amz-content-sha256")
        .unwrap()
        .to_str()?;
    assert_eq!(digest.len(), 64);

    assert_signed_shape(signed.headers.get("authorization").unwrap().to_str()?);

    Ok(())
}

#[tokio::test]
async fn test_sign_with_overrides() -> Result<()> {
    let signed = sign_request(
        "https://bucket.s3.amazonaws.com/object",
        RequestOverrides::new().method("put").body("content"),
        options(),
    )
    .await?;

    assert_eq!(signed.method, Method::PUT);
    assert_signed_shape(signed.headers.get("authorization").unwrap().to_str()?);

    Ok(())
}

#[tokio::test]
async fn test_sign_with_resolver_fn() -> Result<()> {
    let options = SigningOptions::new("s3").with_credentials(ProvideCredentialFn::new(|| async {
        Ok(Some(
            sigfetch_aws_v4::Credential::new("access_key_id", "secret_access_key")
                .with_session_token("session"),
        ))
    }));

    let signed = sign_request("https://bucket.s3.amazonaws.com/", None, options).await?;

    assert_eq!(signed.headers.get("x-amz-security-token").unwrap(), "session");

    Ok(())
}

#[tokio::test]
async fn test_sign_without_credentials_fails() {
    let err = sign_request("https://bucket.s3.amazonaws.com/", None, SigningOptions::new("s3"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialMissing);
}

#[tokio::test]
async fn test_sign_invalid_input_fails() {
    let err = sign_request("", None, options()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
}
