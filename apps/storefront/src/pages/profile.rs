//! Profile page: personal info, address book and password change.

use storefront_core::{AddressKind, Customer};

use crate::router::{RenderContext, Router};
use crate::view::{el, View};

use super::{input, link, page};

pub const PATH: &str = "/profile";
pub const TAG: &str = "profile-page";

pub fn register(router: &mut Router) {
    router.register_route(PATH, TAG);
    router.define(TAG, render);
}

fn personal_info(customer: &Customer) -> View {
    let dob = customer
        .date_of_birth
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());

    el("section")
        .attr("class", "personal-info")
        .child(el("h2").text("Personal info"))
        .child(
            el("dl")
                .child(el("dt").text("Name"))
                .child(el("dd").text(customer.full_name()))
                .child(el("dt").text("Email"))
                .child(el("dd").text(customer.email.as_str()))
                .child(el("dt").text("Date of birth"))
                .child(el("dd").text(dob)),
        )
}

fn address_book(customer: &Customer) -> View {
    let items = customer.addresses.iter().map(|address| {
        let mut item = el("li")
            .attr("data-address-id", address.id.as_str())
            .text(address.one_line());

        for kind in [AddressKind::Shipping, AddressKind::Billing] {
            if customer.default_address(kind).map(|a| a.id.as_str()) == Some(address.id.as_str()) {
                item = item.child(
                    el("span")
                        .attr("class", "badge")
                        .text(format!("default {}", kind)),
                );
            }
        }
        item.child(
            el("button")
                .attr("data-action", "remove-address")
                .attr("data-address-id", address.id.as_str())
                .text("Remove"),
        )
    });

    let section = el("section")
        .attr("class", "addresses")
        .child(el("h2").text("Addresses"));
    if customer.addresses.is_empty() {
        section.child(el("p").attr("class", "empty").text("No saved addresses."))
    } else {
        section.child(el("ul").children(items))
    }
}

fn password_form() -> View {
    el("form")
        .attr("name", "change-password")
        .attr("data-action", "change-password")
        .child(el("h2").text("Change password"))
        .child(input("currentPassword", "Current password", "password"))
        .child(input("newPassword", "New password", "password"))
        .child(input("confirmPassword", "Confirm new password", "password"))
        .child(el("button").attr("type", "submit").text("Update password"))
}

pub fn render(ctx: &RenderContext) -> View {
    let customer = match ctx.store.customer() {
        Some(customer) if ctx.store.is_signed_in() => customer,
        _ => {
            return page(TAG, "Your profile")
                .child(el("p").text("Sign in to see your profile."))
                .child(link("/login", "Sign in"));
        }
    };

    page(TAG, "Your profile")
        .child(personal_info(&customer))
        .child(address_book(&customer))
        .child(password_form())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::{ctx, customer};
    use crate::state::Store;
    use storefront_core::UserState;

    #[test]
    fn test_signed_out_prompts_sign_in() {
        let store = Store::new();
        let view = render(&ctx(&store, PATH));

        assert!(view.find_by_attr("href", "/login").is_some());
        assert!(view.find_by_attr("class", "personal-info").is_none());
    }

    #[test]
    fn test_shows_customer_details_and_default_address() {
        let store = Store::new();
        let customer = customer();
        store.set_customer(Some(customer.clone()));
        store.set_user(UserState::signed_in(&customer));

        let view = render(&ctx(&store, PATH));
        assert!(view
            .find_by_attr("class", "personal-info")
            .unwrap()
            .text_content()
            .contains("Ada Lovelace"));

        let address = view.find_by_attr("data-address-id", "a-1").unwrap();
        let text = address.text_content();
        assert!(text.contains("default shipping"));
        assert!(!text.contains("default billing"));
        assert!(view.find_by_attr("name", "confirmPassword").is_some());
    }
}
