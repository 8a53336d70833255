//! Route table: URL path → page tag.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::mount::PageTag;

/// Normalizes a URL or path for lookup.
///
/// Query and fragment are dropped, an empty path becomes `/`, and a trailing
/// slash is removed from everything but the root.
pub fn normalize_path(raw: &str) -> String {
    let end = raw.find(|c: char| c == '?' || c == '#').unwrap_or(raw.len());
    let path = raw[..end].trim();

    if path.is_empty() || path == "/" {
        return "/".to_string();
    }

    let path = path.trim_end_matches('/');
    if path.is_empty() {
        return "/".to_string();
    }
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Static mapping of paths to page tags, filled once at startup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, PageTag>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `path` to `tag`.
    ///
    /// Registering a path twice keeps the later tag; the replaced tag is
    /// returned.
    pub fn register(&mut self, path: &str, tag: PageTag) -> Option<PageTag> {
        let path = normalize_path(path);
        let previous = self.routes.insert(path.clone(), tag.clone());

        match &previous {
            Some(old) if old != &tag => {
                warn!(%path, old = %old, new = %tag, "Route registered twice, overwriting")
            }
            Some(_) => debug!(%path, %tag, "Route re-registered with the same tag"),
            None => debug!(%path, %tag, "Route registered"),
        }
        previous
    }

    pub fn resolve(&self, path: &str) -> Option<&PageTag> {
        self.routes.get(&normalize_path(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered paths in sorted order.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/login?next=/cart"), "/login");
        assert_eq!(normalize_path("/catalog#top"), "/catalog");
        assert_eq!(normalize_path("/profile/"), "/profile");
        assert_eq!(normalize_path("about"), "/about");
        assert_eq!(normalize_path("?q=1"), "/");
    }

    #[test]
    fn test_register_and_resolve() {
        let mut table = RouteTable::new();
        assert!(table.register("/login", PageTag::from("login-page")).is_none());

        assert_eq!(
            table.resolve("/login?x=1").map(PageTag::as_str),
            Some("login-page")
        );
        assert!(table.resolve("/nope").is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_last_writer_wins() {
        let mut table = RouteTable::new();
        table.register("/about", PageTag::from("about-page"));
        let replaced = table.register("/about", PageTag::from("about-page-v2"));

        assert_eq!(replaced, Some(PageTag::from("about-page")));
        assert_eq!(
            table.resolve("/about").map(PageTag::as_str),
            Some("about-page-v2")
        );
        assert_eq!(table.len(), 1);
    }
}
