//! Port trait implementation for `RegistryClient`.
//!
//! Implements the core-owned `RegistryPort` trait and maps internal errors
//! to `RegistryPortError` at the boundary.

use async_trait::async_trait;
use capdeck_core::{
    ActiveSet, MutationRequest, MutationResult, RegistryPort, RegistryPortError,
    RegistryPortResult, ServerDetail, ServerSearchPage,
};
use tracing::warn;

use crate::client::RegistryClient;
use crate::error::RegistryError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `RegistryError` to core `RegistryPortError`.
fn map_error(err: RegistryError) -> RegistryPortError {
    match err {
        RegistryError::Transport {
            url,
            message,
            timed_out,
        } => RegistryPortError::Network {
            message: if timed_out {
                format!("request to {url} timed out")
            } else {
                message
            },
        },
        RegistryError::Status {
            status, message, ..
        } => RegistryPortError::status(status, message),
        RegistryError::Malformed { message, .. } => RegistryPortError::malformed(message),
        RegistryError::DetailNotFound { qualified_name, .. } => {
            RegistryPortError::NotFound { qualified_name }
        }
        RegistryError::InvalidUrl(e) => RegistryPortError::Configuration {
            message: e.to_string(),
        },
        RegistryError::ClientSetup { message } => RegistryPortError::Configuration { message },
    }
}

fn log_and_map(operation: &'static str) -> impl Fn(RegistryError) -> RegistryPortError {
    move |err| {
        warn!(operation, error = %err, "Registry request failed");
        map_error(err)
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend + Send + Sync> RegistryPort for RegistryClient<B> {
    async fn list_active(&self, token: Option<&str>) -> RegistryPortResult<ActiveSet> {
        self.fetch_active(token)
            .await
            .map_err(log_and_map("list_active"))
    }

    async fn mutate(&self, request: &MutationRequest) -> RegistryPortResult<MutationResult> {
        self.submit_update(request)
            .await
            .map_err(log_and_map("mutate"))
    }

    async fn fetch_detail(&self, qualified_name: &str) -> RegistryPortResult<ServerDetail> {
        self.fetch_server_detail(qualified_name)
            .await
            .map_err(log_and_map("fetch_detail"))
    }

    async fn search_servers(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> RegistryPortResult<ServerSearchPage> {
        self.search(query, page, page_size)
            .await
            .map_err(log_and_map("search_servers"))
    }
}
