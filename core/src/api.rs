use std::fmt::Debug;
use std::sync::Arc;

use crate::ParsedRequest;
use crate::Result;

/// Credential types that can report whether they are usable for signing.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

/// ProvideCredential resolves the credential used to sign requests.
///
/// An implementation may hold a static value or fetch one asynchronously.
/// The signer resolves at most once per sign operation and never caches the
/// result; any caching or refresh policy belongs to the provider.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Resolve the credential.
    ///
    /// Returns `Ok(None)` when no credential is available from this source.
    async fn provide_credential(&self) -> Result<Option<Self::Credential>>;
}

#[async_trait::async_trait]
impl<K: Send + Sync + Unpin + 'static> ProvideCredential
    for Arc<dyn ProvideCredential<Credential = K>>
{
    type Credential = K;

    async fn provide_credential(&self) -> Result<Option<Self::Credential>> {
        self.as_ref().provide_credential().await
    }
}

/// SignRequest computes and attaches the authentication material for one
/// request.
///
/// This is the boundary to the signature algorithm itself: the pipeline
/// knows nothing about what a signature looks like, only that this call
/// rewrites the request's headers (and possibly URL) into their signed form.
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign the request in place.
    async fn sign_request(
        &self,
        req: &mut ParsedRequest,
        credential: &Self::Credential,
    ) -> Result<()>;
}
