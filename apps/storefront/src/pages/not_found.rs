//! Fallback page for paths with no route.
//!
//! Only the element is defined. The router reaches it through
//! [`NOT_FOUND_TAG`], never through the route table.

use crate::router::{RenderContext, Router, NOT_FOUND_TAG};
use crate::view::{el, View};

use super::{link, page};

pub const TAG: &str = NOT_FOUND_TAG;

pub fn register(router: &mut Router) {
    router.define(TAG, render);
}

pub fn render(ctx: &RenderContext) -> View {
    page(TAG, "Page not found")
        .child(el("p").attr("class", "status").text("404"))
        .child(el("p").text(format!("Nothing lives at {}.", ctx.path)))
        .child(link("/", "Back to the home page"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::ctx;
    use crate::state::Store;

    #[test]
    fn test_mentions_path_and_links_home() {
        let view = render(&ctx(&Store::new(), "/nope"));
        assert!(view.text_content().contains("Nothing lives at /nope."));
        assert!(view.find_by_attr("href", "/").is_some());
    }
}
