//! Registry port trait.

use async_trait::async_trait;

use super::error::RegistryPortResult;
use crate::domain::{ActiveSet, MutationRequest, MutationResult, ServerDetail, ServerSearchPage};

/// Port trait for the backend's active-set API and the server registry.
///
/// The implementation lives in `capdeck-registry`.
///
/// # Design
///
/// - Stateless: every call is exactly one request/response
/// - No retries and no caching; failures go straight back to the caller
/// - No fallback data: a failed detail lookup is an error, for every id
#[async_trait]
pub trait RegistryPort: Send + Sync {
    /// Ids of the currently active servers.
    ///
    /// `token` overrides any token the adapter was configured with.
    async fn list_active(&self, token: Option<&str>) -> RegistryPortResult<ActiveSet>;

    /// Submit an add/remove batch as one call.
    async fn mutate(&self, request: &MutationRequest) -> RegistryPortResult<MutationResult>;

    /// Fetch a server's detail (deployment URL, connection schemas).
    async fn fetch_detail(&self, qualified_name: &str) -> RegistryPortResult<ServerDetail>;

    /// Search the registry for servers to add to the catalog.
    async fn search_servers(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> RegistryPortResult<ServerSearchPage>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // Verify the trait is object-safe
    fn _assert_object_safe(_: Arc<dyn RegistryPort>) {}
}
