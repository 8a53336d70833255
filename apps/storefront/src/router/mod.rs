//! # Router
//!
//! Resolves paths to page tags and keeps exactly one page mounted.
//!
//! ## Navigation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Router Navigation                                 │
//! │                                                                         │
//! │  click(<a href="/cart">)  ──┐                                           │
//! │  go("/cart", true)  ────────┼──► normalize ──► RouteTable.resolve       │
//! │  back() / forward()  ───────┘                      │                    │
//! │                                          hit ──────┴────── miss         │
//! │                                           │                 │           │
//! │                                           ▼                 ▼           │
//! │                                      "cart-page"     "not-found-page"   │
//! │                                           │                 │           │
//! │                                           └──► ElementRegistry.create   │
//! │                                                      │                  │
//! │                                                      ▼                  │
//! │                                          MountPoint.replace(element)    │
//! │                                                      │                  │
//! │                            add_to_history? ──► History.push_state       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A same-page click still runs a full resolution. Unknown paths always
//! render the not-found page; there is no retry.

mod history;
mod mount;
mod table;

pub use history::{History, HistoryState};
pub use mount::{
    Constructor, Element, ElementRegistry, MountPoint, PageTag, RenderContext, NOT_FOUND_TAG,
};
pub use table::{normalize_path, RouteTable};

use tracing::{debug, info, warn};

use crate::view::{el, View};

/// Outcome of one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Normalized path that was resolved.
    pub path: String,
    /// Tag of the element now mounted.
    pub tag: PageTag,
    /// Whether the path was in the route table.
    pub found: bool,
}

/// An anchor as seen by the click interceptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub target: Option<String>,
    pub download: bool,
    /// Ctrl/Meta/Shift/Alt held during the click.
    pub modifier: bool,
}

impl Anchor {
    pub fn new(href: impl Into<String>) -> Self {
        Anchor {
            href: href.into(),
            ..Default::default()
        }
    }

    /// Reads an `<a>` element from a rendered view.
    pub fn from_view(view: &View) -> Option<Self> {
        if view.tag() != Some("a") {
            return None;
        }
        Some(Anchor {
            href: view.attr_value("href")?.to_string(),
            target: view.attr_value("target").map(str::to_string),
            download: view.attr_value("download").is_some(),
            modifier: false,
        })
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_download(mut self) -> Self {
        self.download = true;
        self
    }

    pub fn with_modifier(mut self) -> Self {
        self.modifier = true;
        self
    }

    /// True for links the router should handle itself.
    pub fn is_in_app(&self) -> bool {
        let same_origin = self.href.starts_with('/') && !self.href.starts_with("//");
        let same_window = matches!(self.target.as_deref(), None | Some("") | Some("_self"));
        same_origin && same_window && !self.download && !self.modifier
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The router navigated; the default action is suppressed.
    Intercepted(Navigation),
    /// Left to the browser (external, new tab, download, modifier key).
    PassThrough,
}

/// The page router.
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    registry: ElementRegistry,
    history: History,
    mount: MountPoint,
    context: RenderContext,
    current_path: Option<String>,
}

impl Router {
    pub fn new(context: RenderContext) -> Self {
        Router {
            table: RouteTable::new(),
            registry: ElementRegistry::new(),
            history: History::new(),
            mount: MountPoint::new(),
            context,
            current_path: None,
        }
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Maps `path` to `tag`. Last registration wins; returns the replaced tag.
    pub fn register_route(&mut self, path: &str, tag: impl Into<PageTag>) -> Option<PageTag> {
        self.table.register(path, tag.into())
    }

    /// Defines how the element for `tag` is built.
    pub fn define<F>(&mut self, tag: impl Into<PageTag>, constructor: F)
    where
        F: Fn(&RenderContext) -> View + Send + Sync + 'static,
    {
        self.registry.define(tag.into(), constructor);
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Resolves the initial URL and records it as the current history entry.
    pub fn init(&mut self, url: &str) -> Navigation {
        info!(url, routes = self.table.len(), "Router starting");
        let navigation = self.go(url, false);
        self.history
            .replace_state(HistoryState::new(navigation.path.clone()));
        navigation
    }

    /// Navigates to `path`, mounting its page in place of the current one.
    pub fn go(&mut self, path: &str, add_to_history: bool) -> Navigation {
        let path = normalize_path(path);

        let (tag, found) = match self.table.resolve(&path) {
            Some(tag) => (tag.clone(), true),
            None => {
                debug!(%path, "No route, rendering not-found page");
                (PageTag::not_found(), false)
            }
        };

        let element = self.build(&tag, &path);
        let mounted_tag = element.tag.clone();
        if let Some(previous) = self.mount.replace(element) {
            debug!(from = %previous.tag, to = %mounted_tag, "Page unmounted");
        }
        self.current_path = Some(path.clone());

        if add_to_history {
            self.history.push_state(HistoryState::new(path.clone()));
        }

        debug!(%path, tag = %mounted_tag, found, "Navigated");
        Navigation {
            path,
            tag: mounted_tag,
            found,
        }
    }

    /// Handles an anchor click.
    pub fn click(&mut self, anchor: &Anchor) -> ClickOutcome {
        if !anchor.is_in_app() {
            debug!(href = %anchor.href, "Click passed through");
            return ClickOutcome::PassThrough;
        }
        ClickOutcome::Intercepted(self.go(&anchor.href, true))
    }

    /// Replays the previous history entry.
    pub fn back(&mut self) -> Option<Navigation> {
        let route = self.history.back()?.route.clone();
        Some(self.go(&route, false))
    }

    /// Replays the next history entry.
    pub fn forward(&mut self) -> Option<Navigation> {
        let route = self.history.forward()?.route.clone();
        Some(self.go(&route, false))
    }

    /// Rebuilds the mounted page from current state, without touching history.
    pub fn refresh(&mut self) -> Option<Navigation> {
        let path = self.current_path.clone()?;
        Some(self.go(&path, false))
    }

    fn build(&self, tag: &PageTag, path: &str) -> Element {
        let ctx = self.context.at(path);
        if let Some(element) = self.registry.create(tag, &ctx) {
            return element;
        }

        if tag.as_str() != NOT_FOUND_TAG {
            warn!(%tag, %path, "Page tag has no constructor, rendering not-found page");
        }
        let not_found = PageTag::not_found();
        self.registry
            .create(&not_found, &ctx)
            .unwrap_or_else(|| Element {
                tag: not_found,
                view: fallback_not_found(path),
            })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn current(&self) -> Option<&Element> {
        self.mount.current()
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    pub fn mount_point(&self) -> &MountPoint {
        &self.mount
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }
}

/// Used when not even the not-found page is defined.
fn fallback_not_found(path: &str) -> View {
    el("main")
        .attr("class", "not-found")
        .child(el("h1").text("Page not found"))
        .child(el("p").text(format!("Nothing lives at {}", path)))
}
