use std::fmt::Debug;
use std::fmt::Formatter;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use sigfetch_core::ProvideCredential;
use sigfetch_core::Result;

use crate::Credential;

type CredentialFuture = Pin<Box<dyn Future<Output = Result<Option<Credential>>> + Send>>;

/// ProvideCredentialFn adapts an async function into a credential provider.
///
/// The function is invoked on every sign operation; nothing is cached in
/// between, so expiring credentials can be refreshed inside the function.
#[derive(Clone)]
pub struct ProvideCredentialFn {
    f: Arc<dyn Fn() -> CredentialFuture + Send + Sync>,
}

impl ProvideCredentialFn {
    /// Wrap an async function returning a credential.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Credential>>> + Send + 'static,
    {
        Self {
            f: Arc::new(move || Box::pin(f())),
        }
    }
}

impl Debug for ProvideCredentialFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvideCredentialFn").finish_non_exhaustive()
    }
}

#[async_trait]
impl ProvideCredential for ProvideCredentialFn {
    type Credential = Credential;

    async fn provide_credential(&self) -> Result<Option<Self::Credential>> {
        (self.f)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_provide_credential_fn() -> anyhow::Result<()> {
        let provider = ProvideCredentialFn::new(|| async {
            Ok(Some(Credential::new("resolved_key", "resolved_secret")))
        });

        let cred = provider.provide_credential().await?.unwrap();
        assert_eq!(cred.access_key_id, "resolved_key");
        assert_eq!(cred.secret_access_key, "resolved_secret");

        Ok(())
    }
}
