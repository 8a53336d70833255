//! Login page.

use crate::router::{RenderContext, Router};
use crate::view::{el, View};

use super::{input, link, page};

pub const PATH: &str = "/login";
pub const TAG: &str = "login-page";

pub fn register(router: &mut Router) {
    router.register_route(PATH, TAG);
    router.define(TAG, render);
}

pub fn render(ctx: &RenderContext) -> View {
    let user = ctx.store.user();

    if user.logged_in {
        return page(TAG, "Sign in")
            .child(el("p").attr("class", "already-signed-in").text(format!(
                "You are already signed in as {}.",
                user.email.as_deref().unwrap_or("a customer")
            )))
            .child(link("/profile", "Go to your profile"));
    }

    page(TAG, "Sign in")
        .child(
            el("form")
                .attr("name", "login")
                .attr("data-action", "login")
                .child(input("email", "Email", "email"))
                .child(input("password", "Password", "password"))
                .child(el("button").attr("type", "submit").text("Sign in")),
        )
        .child(
            el("p")
                .text("New here?")
                .child(link("/registration", "Create an account")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::{ctx, customer};
    use crate::state::Store;
    use storefront_core::UserState;

    #[test]
    fn test_renders_form_when_signed_out() {
        let store = Store::new();
        let view = render(&ctx(&store, PATH));

        let form = view.find("form").unwrap();
        assert_eq!(form.find_all("input").len(), 2);
        assert!(view.find_by_attr("href", "/registration").is_some());
    }

    #[test]
    fn test_signed_in_customer_sees_notice() {
        let store = Store::new();
        store.set_user(UserState::signed_in(&customer()));

        let view = render(&ctx(&store, PATH));
        assert!(view.find("form").is_none());
        assert!(view
            .text_content()
            .contains("already signed in as ada@example.com"));
    }
}
