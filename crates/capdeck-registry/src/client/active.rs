//! Active-set calls against the backend.

use capdeck_core::{ActiveSet, MutationRequest, MutationResult};
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::http::HttpBackend;
use crate::models::UpdateServersBody;
use crate::parsing::{error_message, parse_active_set, parse_mutation_result};
use crate::url::{build_tools_url, build_update_url};

use super::RegistryClient;

impl<B: HttpBackend> RegistryClient<B> {
    /// Fetch the ids of the active servers.
    ///
    /// `token` takes precedence over the configured token.
    pub(crate) async fn fetch_active(&self, token: Option<&str>) -> RegistryResult<ActiveSet> {
        let url = build_tools_url(&self.config);
        let bearer = token.or(self.config.token.as_deref());

        let response = self.backend.get(&url, bearer).await?;
        if !response.is_success() {
            return Err(RegistryError::Status {
                status: response.status,
                url: url.to_string(),
                message: error_message(response.status, &response.body),
            });
        }

        let active = parse_active_set(&response.body).map_err(|message| RegistryError::Malformed {
            url: url.to_string(),
            message,
        })?;
        debug!(count = active.len(), "Fetched active set");
        Ok(active)
    }

    /// Submit an add/remove batch.
    pub(crate) async fn submit_update(&self, request: &MutationRequest) -> RegistryResult<MutationResult> {
        let url = build_update_url(&self.config);
        let body = serde_json::to_value(UpdateServersBody::from(request)).map_err(|e| {
            RegistryError::Malformed {
                url: url.to_string(),
                message: format!("could not encode request: {e}"),
            }
        })?;
        debug!(
            add = request.servers_to_add.len(),
            remove = request.servers_to_remove.len(),
            "Submitting server update"
        );

        let response = self.backend.post_json(&url, &body).await?;
        if !response.is_success() {
            return Err(RegistryError::Status {
                status: response.status,
                url: url.to_string(),
                message: error_message(response.status, &response.body),
            });
        }

        parse_mutation_result(&response.body).map_err(|message| RegistryError::Malformed {
            url: url.to_string(),
            message,
        })
    }
}
