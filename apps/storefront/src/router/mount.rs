//! Page elements, the registry that builds them, and the mount point.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::state::{Store, StorefrontConfig};
use crate::view::View;

/// Tag rendered for unknown paths.
pub const NOT_FOUND_TAG: &str = "not-found-page";

/// Tag name a page element is registered under (`login-page`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageTag(String);

impl PageTag {
    pub fn new(tag: impl Into<String>) -> Self {
        PageTag(tag.into())
    }

    pub fn not_found() -> Self {
        PageTag::new(NOT_FOUND_TAG)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PageTag {
    fn from(tag: &str) -> Self {
        PageTag::new(tag)
    }
}

impl std::fmt::Display for PageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a page constructor gets to read from.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub store: Store,
    pub config: Arc<StorefrontConfig>,
    /// Path being rendered, after normalization.
    pub path: String,
}

impl RenderContext {
    pub fn new(store: Store, config: Arc<StorefrontConfig>) -> Self {
        RenderContext {
            store,
            config,
            path: "/".to_string(),
        }
    }

    pub fn at(&self, path: &str) -> Self {
        RenderContext {
            path: path.to_string(),
            ..self.clone()
        }
    }
}

/// A constructed page ready to be mounted.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: PageTag,
    pub view: View,
}

pub type Constructor = Arc<dyn Fn(&RenderContext) -> View + Send + Sync>;

/// Tag → constructor.
#[derive(Default, Clone)]
pub struct ElementRegistry {
    constructors: HashMap<PageTag, Constructor>,
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&str> = self.constructors.keys().map(PageTag::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("ElementRegistry").field("tags", &tags).finish()
    }
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines the constructor for `tag`. A later definition replaces the
    /// earlier one.
    pub fn define<F>(&mut self, tag: PageTag, constructor: F)
    where
        F: Fn(&RenderContext) -> View + Send + Sync + 'static,
    {
        if self
            .constructors
            .insert(tag.clone(), Arc::new(constructor))
            .is_some()
        {
            warn!(%tag, "Element redefined");
        } else {
            debug!(%tag, "Element defined");
        }
    }

    /// Builds an element, or `None` if the tag was never defined.
    pub fn create(&self, tag: &PageTag, ctx: &RenderContext) -> Option<Element> {
        self.constructors.get(tag).map(|constructor| Element {
            tag: tag.clone(),
            view: constructor(ctx),
        })
    }
}

/// The single place the active page is attached.
#[derive(Debug, Default)]
pub struct MountPoint {
    current: Option<Element>,
    mounts: usize,
}

impl MountPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `element`, returning the element it replaced.
    pub fn replace(&mut self, element: Element) -> Option<Element> {
        self.mounts += 1;
        self.current.replace(element)
    }

    pub fn clear(&mut self) -> Option<Element> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Element> {
        self.current.as_ref()
    }

    /// Number of elements attached right now (0 or 1).
    pub fn attached(&self) -> usize {
        usize::from(self.current.is_some())
    }

    /// Total number of mounts since creation.
    pub fn mount_count(&self) -> usize {
        self.mounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::el;

    fn ctx() -> RenderContext {
        RenderContext::new(Store::new(), Arc::new(StorefrontConfig::default()))
    }

    #[test]
    fn test_registry_creates_defined_elements() {
        let mut registry = ElementRegistry::new();
        registry.define(PageTag::from("about-page"), |ctx| {
            el("main").text(format!("about at {}", ctx.path))
        });

        let element = registry
            .create(&PageTag::from("about-page"), &ctx().at("/about"))
            .unwrap();
        assert_eq!(element.tag.as_str(), "about-page");
        assert_eq!(element.view.text_content(), "about at /about");

        assert!(registry.create(&PageTag::from("missing"), &ctx()).is_none());
    }

    #[test]
    fn test_mount_point_holds_one_element() {
        let mut mount = MountPoint::new();
        assert_eq!(mount.attached(), 0);

        let first = Element {
            tag: PageTag::from("main-page"),
            view: el("main"),
        };
        assert!(mount.replace(first.clone()).is_none());

        let previous = mount.replace(Element {
            tag: PageTag::from("cart-page"),
            view: el("main"),
        });
        assert_eq!(previous, Some(first));
        assert_eq!(mount.attached(), 1);
        assert_eq!(mount.mount_count(), 2);
        assert_eq!(mount.current().unwrap().tag.as_str(), "cart-page");
    }
}
