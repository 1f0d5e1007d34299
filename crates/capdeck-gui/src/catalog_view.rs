//! Pure view derivations over the catalog and the active-set mirror.
//!
//! Everything a list renderer needs is recomputed from
//! `(catalog, active set, search text)` on each call.

use capdeck_core::{ActiveSet, Catalog, ServerDescriptor, UseCountTier};
use serde::Serialize;

/// One row in the server list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerItem {
    pub descriptor: ServerDescriptor,
    pub is_active: bool,
    pub tier: UseCountTier,
}

impl ServerItem {
    fn new(descriptor: ServerDescriptor, is_active: bool) -> Self {
        let tier = descriptor.use_count_tier();
        Self {
            descriptor,
            is_active,
            tier,
        }
    }

    pub fn id(&self) -> &str {
        &self.descriptor.qualified_name
    }
}

/// Filtered list split into the "Active" and "Available" sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogView {
    pub active: Vec<ServerItem>,
    pub available: Vec<ServerItem>,
}

impl CatalogView {
    /// Items in navigation order: active section first, then available.
    pub fn ordered(&self) -> impl Iterator<Item = &ServerItem> {
        self.active.iter().chain(&self.available)
    }

    /// Item at `index` in navigation order.
    pub fn item_at(&self, index: usize) -> Option<&ServerItem> {
        self.ordered().nth(index)
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Case-insensitive substring match over label, id and description.
///
/// An empty (or all-whitespace) query matches everything.
pub fn matches_search(descriptor: &ServerDescriptor, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    [
        descriptor.label(),
        descriptor.qualified_name.as_str(),
        descriptor.description.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}

/// Partition the catalog by membership in `active`, keeping catalog order
/// within each section.
///
/// Active ids the catalog does not know still appear under "Active" with a
/// bare descriptor, so nothing the server reports is hidden.
pub fn build_catalog_view(catalog: &Catalog, active: &ActiveSet, query: &str) -> CatalogView {
    let mut view = CatalogView::default();

    for descriptor in catalog.iter() {
        if !matches_search(descriptor, query) {
            continue;
        }
        let is_active = active.contains(&descriptor.qualified_name);
        let item = ServerItem::new(descriptor.clone(), is_active);
        if is_active {
            view.active.push(item);
        } else {
            view.available.push(item);
        }
    }

    for id in active.iter().filter(|id| catalog.get(id).is_none()) {
        let descriptor = ServerDescriptor::new(id.clone(), String::new());
        if matches_search(&descriptor, query) {
            view.active.push(ServerItem::new(descriptor, true));
        }
    }

    view
}

/// Button text summarizing the active set.
pub fn summary_label(active_count: usize) -> String {
    match active_count {
        0 => "No servers active".to_string(),
        1 => "1 server active".to_string(),
        n => format!("{n} servers active"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            ServerDescriptor::new("srvA", "Alpha Search").with_description("Web search"),
            ServerDescriptor::new("srvB", "Beta Files").with_description("Filesystem access"),
            ServerDescriptor::new("srvC", "").with_description("Unnamed"),
        ])
        .unwrap()
    }

    fn active(ids: &[&str]) -> ActiveSet {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_partition_by_membership() {
        let view = build_catalog_view(&catalog(), &active(&["srvA", "srvB"]), "");
        let active_ids: Vec<&str> = view.active.iter().map(ServerItem::id).collect();
        let available_ids: Vec<&str> = view.available.iter().map(ServerItem::id).collect();

        assert_eq!(active_ids, vec!["srvA", "srvB"]);
        assert_eq!(available_ids, vec!["srvC"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_fields() {
        let catalog = catalog();
        let by_label = build_catalog_view(&catalog, &ActiveSet::new(), "ALPHA");
        let by_description = build_catalog_view(&catalog, &ActiveSet::new(), "filesystem");
        let by_id = build_catalog_view(&catalog, &ActiveSet::new(), "srvc");

        assert_eq!(by_label.item_at(0).map(ServerItem::id), Some("srvA"));
        assert_eq!(by_description.item_at(0).map(ServerItem::id), Some("srvB"));
        assert_eq!(by_id.len(), 1);
    }

    #[test]
    fn test_unknown_active_ids_are_listed() {
        let view = build_catalog_view(&catalog(), &active(&["@acme/unlisted"]), "");
        assert_eq!(view.active.len(), 1);
        assert_eq!(view.active[0].descriptor.label(), "@acme/unlisted");
        assert_eq!(view.available.len(), 3);
    }

    #[test]
    fn test_navigation_order_puts_active_first() {
        let view = build_catalog_view(&catalog(), &active(&["srvC"]), "");
        let order: Vec<&str> = view.ordered().map(ServerItem::id).collect();
        assert_eq!(order, vec!["srvC", "srvA", "srvB"]);
    }

    #[test]
    fn test_summary_label() {
        assert_eq!(summary_label(0), "No servers active");
        assert_eq!(summary_label(1), "1 server active");
        assert_eq!(summary_label(4), "4 servers active");
    }
}
