//! URL construction helpers.
//!
//! Pure functions over the internal config so every call builds its URL the
//! same way. Base URLs may carry a path prefix (e.g. a same-origin proxy
//! mounted at `/registry`); it is preserved.

use crate::models::RegistryConfig;
use url::Url;

/// Append `/`-separated segments to `base`'s path. Segments are used as-is,
/// so callers percent-encode anything that may contain `/` or `@`.
fn join_path(base: &Url, segments: &str) -> Url {
    let mut url = base.clone();
    let base_path = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{base_path}/{segments}"));
    url.set_query(None);
    url
}

/// `GET {backend}/tools`
pub fn build_tools_url(config: &RegistryConfig) -> Url {
    join_path(&config.backend_url, "tools")
}

/// `POST {backend}/tools/servers/update`
pub fn build_update_url(config: &RegistryConfig) -> Url {
    join_path(&config.backend_url, "tools/servers/update")
}

/// `GET {registry}/servers/{urlEncodedQualifiedName}`
pub fn build_detail_url(config: &RegistryConfig, qualified_name: &str) -> Url {
    let encoded = urlencoding::encode(qualified_name);
    join_path(&config.registry_url, &format!("servers/{encoded}"))
}

/// `GET {registry}/servers?q=&page=&pageSize=`
pub fn build_search_url(config: &RegistryConfig, query: &str, page: u32, page_size: u32) -> Url {
    let mut url = join_path(&config.registry_url, "servers");
    url.set_query(Some(&format!(
        "q={}&page={}&pageSize={}",
        urlencoding::encode(query.trim()),
        page.max(1),
        page_size.clamp(1, 100)
    )));
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> RegistryConfig {
        RegistryConfig::default()
    }

    #[test]
    fn test_build_tools_url() {
        let url = build_tools_url(&default_config());
        assert_eq!(url.as_str(), "http://localhost:8000/tools");
    }

    #[test]
    fn test_build_update_url_keeps_prefix() {
        let config = RegistryConfig {
            backend_url: Url::parse("http://host:8000/bridge/").unwrap(),
            ..default_config()
        };
        let url = build_update_url(&config);
        assert_eq!(url.as_str(), "http://host:8000/bridge/tools/servers/update");
    }

    #[test]
    fn test_build_detail_url_encodes_name() {
        let url = build_detail_url(&default_config(), "@smithery-ai/brave-search");
        assert_eq!(
            url.as_str(),
            "https://registry.smithery.ai/servers/%40smithery-ai%2Fbrave-search"
        );
    }

    #[test]
    fn test_build_search_url() {
        let url = build_search_url(&default_config(), " web search ", 0, 500);
        let url_str = url.as_str();

        assert!(url_str.starts_with("https://registry.smithery.ai/servers?"));
        assert!(url_str.contains("q=web%20search"));
        assert!(url_str.contains("page=1"));
        assert!(url_str.contains("pageSize=100"));
    }
}
