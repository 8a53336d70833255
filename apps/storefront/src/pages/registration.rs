//! Registration page: account details plus shipping and billing address.

use storefront_core::SUPPORTED_COUNTRIES;

use crate::router::{RenderContext, Router};
use crate::view::{el, View};

use super::{input, link, page};

pub const PATH: &str = "/registration";
pub const TAG: &str = "registration-page";

pub fn register(router: &mut Router) {
    router.register_route(PATH, TAG);
    router.define(TAG, render);
}

fn address_fieldset(prefix: &str, legend: &str, default_country: &str) -> View {
    let countries = SUPPORTED_COUNTRIES.iter().map(|code| {
        let option = el("option").attr("value", *code).text(*code);
        if *code == default_country {
            option.attr("selected", "selected")
        } else {
            option
        }
    });

    el("fieldset")
        .attr("name", prefix)
        .child(el("legend").text(legend))
        .child(input(&format!("{}.streetName", prefix), "Street", "text"))
        .child(input(&format!("{}.city", prefix), "City", "text"))
        .child(input(&format!("{}.postalCode", prefix), "Postal code", "text"))
        .child(
            el("label").text("Country").child(
                el("select")
                    .attr("name", format!("{}.country", prefix))
                    .children(countries),
            ),
        )
        .child(input(
            &format!("{}.default", prefix),
            &format!("Use as default {} address", prefix),
            "checkbox",
        ))
}

pub fn render(ctx: &RenderContext) -> View {
    if ctx.store.user().logged_in {
        return page(TAG, "Create an account")
            .child(el("p").attr("class", "already-signed-in").text(
                "You are already signed in. Sign out first to register a new account.",
            ))
            .child(link("/", "Back to the shop"));
    }

    let country = ctx.config.shop.default_country.as_str();
    let rules = ctx.config.account_rules();

    page(TAG, "Create an account").child(
        el("form")
            .attr("name", "registration")
            .attr("data-action", "register")
            .child(input("email", "Email", "email"))
            .child(input("password", "Password", "password"))
            .child(el("small").text(format!(
                "At least {} characters with upper and lower case letters and a digit.",
                rules.min_password_length
            )))
            .child(input("firstName", "First name", "text"))
            .child(input("lastName", "Last name", "text"))
            .child(input("dateOfBirth", "Date of birth", "date"))
            .child(el("small").text(format!(
                "You must be at least {} years old.",
                rules.min_customer_age
            )))
            .child(address_fieldset("shipping", "Shipping address", country))
            .child(input("sameAsShipping", "Bill to the shipping address", "checkbox"))
            .child(address_fieldset("billing", "Billing address", country))
            .child(el("button").attr("type", "submit").text("Register"))
            .child(
                el("p")
                    .text("Already have an account?")
                    .child(link("/login", "Sign in")),
            ),
    )
}
