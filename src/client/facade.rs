//! Delegation seam for concrete API wrappers

use super::{ApiClient, Reply};
use crate::entity::Wrapped;
use crate::error::Result;
use crate::types::RequestOptions;
use async_trait::async_trait;

/// An API wrapper built around an [`ApiClient`].
///
/// Implementors only provide [`client`](Self::client); the verb and paging
/// methods forward to it.
///
/// ```rust,ignore
/// struct GitHub {
///     client: ApiClient,
/// }
///
/// impl ApiWrapper for GitHub {
///     fn client(&self) -> &ApiClient {
///         &self.client
///     }
/// }
///
/// impl GitHub {
///     async fn repos(&self, user: &str) -> Result<Vec<Wrapped>> {
///         self.get_paged(&format!("users/{user}/repos"), &RequestOptions::new()).await
///     }
/// }
/// ```
#[async_trait]
pub trait ApiWrapper: Send + Sync {
    /// The client requests go through
    fn client(&self) -> &ApiClient;

    async fn get(&self, path: &str, options: &RequestOptions) -> Result<Reply> {
        self.client().get(path, options).await
    }

    async fn post(&self, path: &str, options: &RequestOptions) -> Result<Reply> {
        self.client().post(path, options).await
    }

    async fn put(&self, path: &str, options: &RequestOptions) -> Result<Reply> {
        self.client().put(path, options).await
    }

    async fn delete(&self, path: &str, options: &RequestOptions) -> Result<Reply> {
        self.client().delete(path, options).await
    }

    async fn get_paged(&self, path: &str, options: &RequestOptions) -> Result<Vec<Wrapped>> {
        self.client().get_paged(path, options).await
    }

    async fn each_page<F>(&self, path: &str, options: &RequestOptions, consumer: F) -> Result<()>
    where
        F: FnMut(Wrapped) -> Result<()> + Send,
    {
        self.client().each_page(path, options, None, consumer).await
    }
}
