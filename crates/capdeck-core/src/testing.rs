//! In-memory registry for tests.
//!
//! `InMemoryRegistry` implements `RegistryPort` with the backend's update
//! semantics: removals run first and only count ids that were present,
//! additions are reported as `added` or `updated` depending on prior
//! membership, and ids configured to fail installation are reported under
//! `installation_failed` and left out of the active set.
//!
//! `list_active` snapshots the active set when the call starts and only then
//! sleeps for any configured delay, so a slow list call returns the state as
//! of its issue time like a real request would.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    ActiveSet, LaunchConfig, MutationRequest, MutationResult, ServerDescriptor, ServerDetail,
    ServerSearchPage,
};
use crate::ports::{RegistryPort, RegistryPortError, RegistryPortResult};

#[derive(Default)]
struct State {
    active: BTreeMap<String, Option<LaunchConfig>>,
    details: HashMap<String, ServerDetail>,
    catalog: Vec<ServerDescriptor>,
    failing_installs: HashSet<String>,
    list_failures: VecDeque<RegistryPortError>,
    mutate_failures: VecDeque<RegistryPortError>,
    list_delays: VecDeque<Duration>,
    detail_delays: HashMap<String, Duration>,
    seen_tokens: Vec<Option<String>>,
    last_request: Option<MutationRequest>,
    list_calls: usize,
    mutate_calls: usize,
    detail_calls: usize,
}

/// Registry double shared by the core, gui and cli test suites.
#[derive(Default)]
pub struct InMemoryRegistry {
    state: Mutex<State>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut State {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed the active set (without launch configs).
    #[must_use]
    pub fn with_active<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = self.state_mut();
        for id in ids {
            state.active.insert(id.into(), None);
        }
        self
    }

    /// Register a detail record served by `fetch_detail`.
    #[must_use]
    pub fn with_detail(mut self, detail: ServerDetail) -> Self {
        self.state_mut()
            .details
            .insert(detail.qualified_name.clone(), detail);
        self
    }

    /// Entries served by `search_servers`.
    #[must_use]
    pub fn with_catalog(mut self, servers: Vec<ServerDescriptor>) -> Self {
        self.state_mut().catalog = servers;
        self
    }

    /// Every future attempt to add `id` reports an installation failure.
    pub fn fail_installation_of(&self, id: impl Into<String>) {
        self.state().failing_installs.insert(id.into());
    }

    /// The next `list_active` call fails with `error`.
    pub fn fail_next_list(&self, error: RegistryPortError) {
        self.state().list_failures.push_back(error);
    }

    /// The next `mutate` call fails with `error` without touching the set.
    pub fn fail_next_mutate(&self, error: RegistryPortError) {
        self.state().mutate_failures.push_back(error);
    }

    /// Delay the next not-yet-delayed `list_active` call by `delay`.
    ///
    /// Delays are consumed in call order.
    pub fn push_list_delay(&self, delay: Duration) {
        self.state().list_delays.push_back(delay);
    }

    /// Delay every `fetch_detail` for `id`.
    pub fn set_detail_delay(&self, id: impl Into<String>, delay: Duration) {
        self.state().detail_delays.insert(id.into(), delay);
    }

    pub fn list_calls(&self) -> usize {
        self.state().list_calls
    }

    pub fn mutate_calls(&self) -> usize {
        self.state().mutate_calls
    }

    pub fn detail_calls(&self) -> usize {
        self.state().detail_calls
    }

    /// The most recent request passed to `mutate`.
    pub fn last_request(&self) -> Option<MutationRequest> {
        self.state().last_request.clone()
    }

    /// Tokens passed to `list_active`, in call order.
    pub fn seen_tokens(&self) -> Vec<Option<String>> {
        self.state().seen_tokens.clone()
    }

    /// Current server-side active ids.
    pub fn active_ids(&self) -> ActiveSet {
        self.state().active.keys().cloned().collect()
    }

    /// Launch config stored for `id`, if it was added through `mutate`.
    pub fn config_of(&self, id: &str) -> Option<LaunchConfig> {
        self.state().active.get(id).cloned().flatten()
    }
}

fn matches_query(server: &ServerDescriptor, query: &str) -> bool {
    let query = query.to_lowercase();
    [
        server.qualified_name.as_str(),
        server.display_name.as_str(),
        server.description.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}

#[async_trait]
impl RegistryPort for InMemoryRegistry {
    async fn list_active(&self, token: Option<&str>) -> RegistryPortResult<ActiveSet> {
        let (snapshot, delay) = {
            let mut state = self.state();
            state.list_calls += 1;
            state.seen_tokens.push(token.map(str::to_string));
            let delay = state.list_delays.pop_front();
            let snapshot = match state.list_failures.pop_front() {
                Some(error) => Err(error),
                None => Ok(state.active.keys().cloned().collect::<ActiveSet>()),
            };
            (snapshot, delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        snapshot
    }

    async fn mutate(&self, request: &MutationRequest) -> RegistryPortResult<MutationResult> {
        let mut state = self.state();
        state.mutate_calls += 1;
        state.last_request = Some(request.clone());

        if let Some(error) = state.mutate_failures.pop_front() {
            return Err(error);
        }

        let mut result = MutationResult {
            reload_success: Some(true),
            message: Some("MCP server configuration updated successfully".to_string()),
            ..MutationResult::default()
        };

        for id in &request.servers_to_remove {
            if state.active.remove(id).is_some() {
                result.removed.push(id.clone());
            }
        }

        for (id, launch) in &request.servers_to_add {
            if state.failing_installs.contains(id) {
                result.installation_failed.push(id.clone());
                continue;
            }
            if state.active.insert(id.clone(), Some(launch.clone())).is_some() {
                result.updated.push(id.clone());
            } else {
                result.added.push(id.clone());
            }
        }

        Ok(result)
    }

    async fn fetch_detail(&self, qualified_name: &str) -> RegistryPortResult<ServerDetail> {
        let (detail, delay) = {
            let mut state = self.state();
            state.detail_calls += 1;
            (
                state.details.get(qualified_name).cloned(),
                state.detail_delays.get(qualified_name).copied(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        detail.ok_or_else(|| RegistryPortError::NotFound {
            qualified_name: qualified_name.to_string(),
        })
    }

    async fn search_servers(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> RegistryPortResult<ServerSearchPage> {
        let matching: Vec<ServerDescriptor> = self
            .state()
            .catalog
            .iter()
            .filter(|server| matches_query(server, query))
            .cloned()
            .collect();

        let page = page.max(1);
        let page_size = page_size.max(1) as usize;
        let total_count = matching.len() as u64;
        let total_pages = matching.len().div_ceil(page_size) as u32;
        let servers = matching
            .into_iter()
            .skip((page as usize - 1) * page_size)
            .take(page_size)
            .collect();

        Ok(ServerSearchPage {
            servers,
            page,
            total_pages,
            total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn launch(id: &str) -> LaunchConfig {
        LaunchConfig::for_server(crate::DEFAULT_CLI_PACKAGE, id, &Map::new())
    }

    #[tokio::test]
    async fn test_update_bookkeeping() {
        let registry = InMemoryRegistry::new().with_active(["srvA"]);
        registry.fail_installation_of("srvD");

        let request = MutationRequest::new()
            .with_add("srvA", launch("srvA"))
            .with_add("srvC", launch("srvC"))
            .with_add("srvD", launch("srvD"))
            .with_remove("srvZ");
        let result = registry.mutate(&request).await.unwrap();

        assert_eq!(result.updated, vec!["srvA"]);
        assert_eq!(result.added, vec!["srvC"]);
        assert_eq!(result.installation_failed, vec!["srvD"]);
        assert!(result.removed.is_empty());
        assert_eq!(
            registry.active_ids().into_iter().collect::<Vec<_>>(),
            vec!["srvA", "srvC"]
        );
        assert_eq!(registry.config_of("srvC"), Some(launch("srvC")));
    }

    #[tokio::test]
    async fn test_queued_failures_are_consumed_once() {
        let registry = InMemoryRegistry::new().with_active(["srvA"]);
        registry.fail_next_list(RegistryPortError::network("offline"));

        assert!(registry.list_active(None).await.is_err());
        assert_eq!(registry.list_active(Some("t")).await.unwrap().len(), 1);
        assert_eq!(registry.seen_tokens(), vec![None, Some("t".to_string())]);
    }

    #[tokio::test]
    async fn test_unknown_detail_is_not_found() {
        let registry = InMemoryRegistry::new();
        let err = registry.fetch_detail("@acme/nope").await.unwrap_err();
        assert!(matches!(err, RegistryPortError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_search_pagination() {
        let servers = (0..5)
            .map(|i| ServerDescriptor::new(format!("@acme/tool-{i}"), format!("Tool {i}")))
            .collect();
        let registry = InMemoryRegistry::new().with_catalog(servers);

        let page = registry.search_servers("TOOL", 2, 2).await.unwrap();
        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.servers[0].qualified_name, "@acme/tool-2");
    }
}
