//! Registry lookups: server detail and discovery search.

use capdeck_core::{ServerDetail, ServerSearchPage};
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::http::HttpBackend;
use crate::parsing::{error_message, parse_detail, parse_search_page};
use crate::url::{build_detail_url, build_search_url};

use super::RegistryClient;

impl<B: HttpBackend> RegistryClient<B> {
    /// Fetch the detail record for `qualified_name`.
    ///
    /// Any non-2xx status means "not found"; there is no fallback record.
    pub(crate) async fn fetch_server_detail(&self, qualified_name: &str) -> RegistryResult<ServerDetail> {
        let url = build_detail_url(&self.config, qualified_name);
        let response = self.backend.get(&url, None).await?;

        if !response.is_success() {
            debug!(
                server_id = %qualified_name,
                status = response.status,
                "Detail lookup failed"
            );
            return Err(RegistryError::DetailNotFound {
                qualified_name: qualified_name.to_string(),
                status: response.status,
            });
        }

        parse_detail(&response.body, qualified_name).map_err(|message| RegistryError::Malformed {
            url: url.to_string(),
            message,
        })
    }

    /// Search the registry.
    pub(crate) async fn search(&self, query: &str, page: u32, page_size: u32) -> RegistryResult<ServerSearchPage> {
        let url = build_search_url(&self.config, query, page, page_size);
        let response = self.backend.get(&url, None).await?;

        if !response.is_success() {
            return Err(RegistryError::Status {
                status: response.status,
                url: url.to_string(),
                message: error_message(response.status, &response.body),
            });
        }

        parse_search_page(&response.body, page).map_err(|message| RegistryError::Malformed {
            url: url.to_string(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeBackend;
    use crate::models::RegistryConfig;
    use serde_json::json;

    fn client(backend: FakeBackend) -> RegistryClient<FakeBackend> {
        RegistryClient::with_backend(RegistryConfig::default(), backend)
    }

    #[tokio::test]
    async fn test_fetch_detail_parses_connections() {
        let client = client(FakeBackend::new().with_json(
            "/servers/%40smithery-ai%2Fgithub",
            200,
            &json!({
                "qualifiedName": "@smithery-ai/github",
                "displayName": "GitHub",
                "deploymentUrl": "https://server.smithery.ai/@smithery-ai/github",
                "connections": [{
                    "type": "stdio",
                    "configSchema": {
                        "type": "object",
                        "properties": {"githubPersonalAccessToken": {"type": "string"}},
                        "required": ["githubPersonalAccessToken"]
                    }
                }]
            }),
        ));

        let detail = client.fetch_server_detail("@smithery-ai/github").await.unwrap();
        assert_eq!(detail.display_name.as_deref(), Some("GitHub"));
        assert_eq!(detail.connections[0].kind, "stdio");
        assert!(detail.config_schema().is_some());
    }

    /// Every id is treated the same way on failure, with no stand-in record.
    #[tokio::test]
    async fn test_fetch_detail_non_2xx_is_not_found() {
        let client = client(FakeBackend::new().with_body("/servers/", 503, "unavailable"));

        for id in ["@smithery-ai/brave-search", "@pinkpixel-dev/spotify-mcp"] {
            let err = client.fetch_server_detail(id).await.unwrap_err();
            assert!(matches!(
                err,
                RegistryError::DetailNotFound { ref qualified_name, status: 503 } if qualified_name == id
            ));
        }
    }

    #[tokio::test]
    async fn test_search_returns_page() {
        let backend = FakeBackend::new().with_json(
            "/servers?q=github",
            200,
            &json!({
                "servers": [{"qualifiedName": "@smithery-ai/github", "displayName": "GitHub", "useCount": 15000}],
                "pagination": {"currentPage": 1, "pageSize": 10, "totalPages": 1, "totalCount": 1}
            }),
        );
        let client = client(backend);

        let page = client.search("github", 1, 10).await.unwrap();
        assert_eq!(page.servers.len(), 1);
        assert_eq!(page.total_count, 1);
        assert_eq!(page.servers[0].use_count_tier(), capdeck_core::UseCountTier::VeryHigh);
    }
}
