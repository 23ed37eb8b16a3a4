use std::sync::Arc;

use crate::parse_request;
use crate::Error;
use crate::ParsedRequest;
use crate::ProvideCredential;
use crate::RequestInput;
use crate::RequestOverrides;
use crate::Result;
use crate::SignRequest;
use crate::SigningCredential;

/// Signer drives one sign operation: normalize, resolve a credential, and
/// delegate to the signature builder.
///
/// Credentials are resolved lazily on every call and never cached here;
/// a provider that wants caching owns that policy itself.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    provider: Option<Arc<dyn ProvideCredential<Credential = K>>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer from a signature builder.
    pub fn new(builder: impl SignRequest<Credential = K>) -> Self {
        Self {
            provider: None,
            builder: Arc::new(builder),
        }
    }

    /// Configure the credential provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = K>,
    ) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Normalize and sign a request.
    ///
    /// Fails with a credential error before any signing work when no usable
    /// credential can be resolved.
    pub async fn sign(
        &self,
        input: impl Into<RequestInput>,
        overrides: impl Into<Option<RequestOverrides>>,
    ) -> Result<ParsedRequest> {
        let mut req = parse_request(input, overrides)?;

        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| Error::credential_missing("no credentials configured"))?;
        let credential = provider
            .provide_credential()
            .await?
            .filter(K::is_valid)
            .ok_or_else(|| {
                Error::credential_missing("credential provider returned no usable credential")
            })?;

        self.builder.sign_request(&mut req, &credential).await?;

        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use http::HeaderValue;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    #[derive(Clone, Debug)]
    struct TestCredential {
        token: String,
    }

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            !self.token.is_empty()
        }
    }

    #[derive(Debug)]
    struct TestProvider {
        token: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl ProvideCredential for TestProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self) -> Result<Option<Self::Credential>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(TestCredential {
                token: self.token.to_string(),
            }))
        }
    }

    #[derive(Debug)]
    struct TestBuilder;

    #[async_trait::async_trait]
    impl SignRequest for TestBuilder {
        type Credential = TestCredential;

        async fn sign_request(
            &self,
            req: &mut ParsedRequest,
            credential: &Self::Credential,
        ) -> Result<()> {
            req.headers.insert(
                "x-test-signature",
                HeaderValue::try_from(credential.token.as_str())?,
            );
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sign_applies_builder() {
        let signer = Signer::new(TestBuilder).with_credential_provider(TestProvider {
            token: "secret",
            calls: Arc::new(AtomicUsize::new(0)),
        });

        let signed = signer.sign("https://example.com/", None).await.unwrap();
        assert_eq!(signed.headers.get("x-test-signature").unwrap(), "secret");
    }

    #[tokio::test]
    async fn test_missing_provider_fails() {
        let signer: Signer<TestCredential> = Signer::new(TestBuilder);

        let err = signer.sign("https://example.com/", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    }

    #[tokio::test]
    async fn test_invalid_credential_fails() {
        let signer = Signer::new(TestBuilder).with_credential_provider(TestProvider {
            token: "",
            calls: Arc::new(AtomicUsize::new(0)),
        });

        let err = signer.sign("https://example.com/", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    }

    #[tokio::test]
    async fn test_provider_resolved_once_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(TestBuilder).with_credential_provider(TestProvider {
            token: "secret",
            calls: calls.clone(),
        });

        signer.sign("https://example.com/", None).await.unwrap();
        signer.sign("https://example.com/", None).await.unwrap();

        // No caching between calls: one resolution each.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_input_fails_before_credentials() {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(TestBuilder).with_credential_provider(TestProvider {
            token: "secret",
            calls: calls.clone(),
        });

        let err = signer.sign("", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
