use crate::router::{RenderContext, Router};
use crate::view::{el, View};

use super::{link, page};

pub const PATH: &str = "/about";
pub const TAG: &str = "about-page";

pub fn register(router: &mut Router) {
    router.register_route(PATH, TAG);
    router.define(TAG, render);
}

pub fn render(ctx: &RenderContext) -> View {
    page(TAG, &format!("About {}", ctx.config.shop.name))
        .child(el("p").text(
            "A small storefront with a catalog, a cart that survives signing in, and a customer profile.",
        ))
        .child(el("p").text(format!(
            "Prices are shown in {}.",
            ctx.config.currency_code()
        )))
        .child(link("/catalog", "Start shopping"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::ctx;
    use crate::state::Store;

    #[test]
    fn test_about_names_shop_and_currency() {
        let view = render(&ctx(&Store::new(), PATH));
        let text = view.text_content();
        assert!(text.contains("About Storefront"));
        assert!(text.contains("USD"));
    }
}
