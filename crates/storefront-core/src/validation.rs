//! # Validation Module
//!
//! Form field validators for the account pages.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Field validators (THIS MODULE)                               │
//! │  ├── One function per field kind (email, password, postal code, ...)   │
//! │  └── Returns ValidationError naming the field                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Form validators (THIS MODULE)                                │
//! │  ├── Run every field validator of a form                               │
//! │  └── Collect all failures into ValidationErrors                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Commerce platform                                            │
//! │  ├── Duplicate email                                                   │
//! │  └── Wrong current password, stale versions                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators that depend on the current date take `today` as an argument so
//! they stay deterministic.
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_email, validate_postal_code};
//!
//! assert!(validate_email("ada@example.com").is_ok());
//! assert!(validate_postal_code("US", "12345").is_ok());
//! assert!(validate_postal_code("US", "1234").is_err());
//! ```

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{ValidationError, ValidationErrors};
use crate::types::{AddressDraft, CustomerDraft, PersonalInfo};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY, MIN_CUSTOMER_AGE, MIN_PASSWORD_LENGTH, SUPPORTED_COUNTRIES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Tunable account rules (from the `[accounts]` config section).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRules {
    pub min_password_length: usize,
    pub min_customer_age: u32,
}

impl Default for AccountRules {
    fn default() -> Self {
        AccountRules {
            min_password_length: MIN_PASSWORD_LENGTH,
            min_customer_age: MIN_CUSTOMER_AGE,
        }
    }
}

// =============================================================================
// Patterns
// =============================================================================

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\p{L}+(?:[ '\-]\p{L}+)*$").expect("valid name regex"))
}

fn postal_re(country: &str) -> Option<&'static Regex> {
    static US: OnceLock<Regex> = OnceLock::new();
    static CA: OnceLock<Regex> = OnceLock::new();
    static GB: OnceLock<Regex> = OnceLock::new();
    static DE: OnceLock<Regex> = OnceLock::new();

    let (cell, pattern) = match country {
        "US" => (&US, r"^\d{5}(?:-\d{4})?$"),
        "CA" => (&CA, r"^[A-Za-z]\d[A-Za-z] ?\d[A-Za-z]\d$"),
        "GB" => (&GB, r"^[A-Za-z]{1,2}\d[A-Za-z\d]? ?\d[A-Za-z]{2}$"),
        "DE" => (&DE, r"^\d{5}$"),
        _ => return None,
    };
    Some(cell.get_or_init(|| Regex::new(pattern).expect("valid postal code regex")))
}

fn invalid(field: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - No leading or trailing whitespace
/// - Shape `local@domain.tld`
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(required("email"));
    }
    if email.trim() != email {
        return Err(invalid(
            "email",
            "must not contain leading or trailing whitespace",
        ));
    }
    if !email_re().is_match(email) {
        return Err(invalid("email", "must look like user@example.com"));
    }
    Ok(())
}

/// Validates a new password.
///
/// ## Rules
/// - At least `min_len` characters
/// - At least one uppercase letter, one lowercase letter and one digit
/// - No whitespace
pub fn validate_password(field: &str, password: &str, min_len: usize) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(required(field));
    }
    if password.chars().count() < min_len {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min: min_len,
        });
    }
    if password.chars().any(char::is_whitespace) {
        return Err(invalid(field, "must not contain whitespace"));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(invalid(field, "must contain an uppercase letter"));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(invalid(field, "must contain a lowercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid(field, "must contain a digit"));
    }
    Ok(())
}

/// Validates a person or place name (first name, last name, city).
///
/// Letters only; single spaces, hyphens and apostrophes are allowed between
/// letters ("Mary-Jane", "O'Neil", "New York").
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(required(field));
    }
    if value.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }
    if !name_re().is_match(value) {
        return Err(invalid(field, "must contain only letters"));
    }
    Ok(())
}

/// Validates a street line.
pub fn validate_street(field: &str, street: &str) -> ValidationResult<()> {
    let street = street.trim();
    if street.is_empty() {
        return Err(required(field));
    }
    if street.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }
    Ok(())
}

/// Validates a country code against the shipping countries.
pub fn validate_country(field: &str, country: &str) -> ValidationResult<()> {
    if country.trim().is_empty() {
        return Err(required(field));
    }
    if !SUPPORTED_COUNTRIES.contains(&country) {
        return Err(ValidationError::NotAllowed {
            field: field.to_string(),
            allowed: SUPPORTED_COUNTRIES.iter().map(|c| c.to_string()).collect(),
        });
    }
    Ok(())
}

/// Validates a postal code for the given country.
///
/// ## Formats
/// - US: `12345` or `12345-6789`
/// - CA: `A1A 1A1`
/// - GB: `SW1A 1AA`, `M1 1AE`, ...
/// - DE: `10115`
/// - Other countries: any non-empty value
pub fn validate_postal_code(country: &str, code: &str) -> ValidationResult<()> {
    let code = code.trim();
    if code.is_empty() {
        return Err(required("postalCode"));
    }
    match postal_re(country) {
        Some(re) if !re.is_match(code) => Err(invalid(
            "postalCode",
            &format!("is not a valid {} postal code", country),
        )),
        _ => Ok(()),
    }
}

/// Parses and validates a date of birth (`YYYY-MM-DD`).
///
/// ## Rules
/// - Must parse as a calendar date
/// - Must not be after `today`
/// - Customer must be at least `min_age` years old on `today`
pub fn validate_date_of_birth(value: &str, today: NaiveDate, min_age: u32) -> ValidationResult<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(required("dateOfBirth"));
    }
    let dob = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| invalid("dateOfBirth", "must be a date in YYYY-MM-DD format"))?;

    if dob > today {
        return Err(ValidationError::InFuture {
            field: "dateOfBirth".to_string(),
        });
    }
    if i64::from(age_on(dob, today)) < i64::from(min_age) {
        return Err(ValidationError::TooYoung {
            field: "dateOfBirth".to_string(),
            min_age,
        });
    }
    Ok(dob)
}

/// Whole years between `dob` and `today`.
fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
///
/// The cart command treats 0 as "remove the line" before calling this.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the number of lines before adding a new one.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates an address form. Field names are prefixed (`shipping.city`).
pub fn validate_address(prefix: &str, draft: &AddressDraft) -> Result<(), ValidationErrors> {
    let field = |name: &str| format!("{}.{}", prefix, name);
    let mut errors = ValidationErrors::new();

    errors.check(validate_street(&field("streetName"), &draft.street_name));
    errors.check(validate_name(&field("city"), &draft.city));
    let country_ok = errors
        .check(validate_country(&field("country"), &draft.country))
        .is_some();
    if country_ok {
        errors.check(validate_postal_code(&draft.country, &draft.postal_code).map_err(|e| {
            match e {
                ValidationError::Required { .. } => required(&field("postalCode")),
                ValidationError::InvalidFormat { reason, .. } => {
                    invalid(&field("postalCode"), &reason)
                }
                other => other,
            }
        }));
    }

    errors.into_result()
}

/// Validates the registration form. Returns the parsed date of birth.
pub fn validate_customer_draft(
    draft: &CustomerDraft,
    today: NaiveDate,
    rules: AccountRules,
) -> Result<NaiveDate, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_email(&draft.email));
    errors.check(validate_password("password", &draft.password, rules.min_password_length));
    errors.check(validate_name("firstName", &draft.first_name));
    errors.check(validate_name("lastName", &draft.last_name));
    let dob = errors.check(validate_date_of_birth(
        &draft.date_of_birth,
        today,
        rules.min_customer_age,
    ));

    if let Err(e) = validate_address("shipping", &draft.shipping_address) {
        errors.extend(e);
    }
    if let Some(billing) = &draft.billing_address {
        if let Err(e) = validate_address("billing", billing) {
            errors.extend(e);
        }
    }

    errors.into_result()?;
    // errors is empty, so the date parsed
    dob.ok_or_else(|| ValidationErrors::from(required("dateOfBirth")))
}

/// Validates the login form.
///
/// Only the shape of the email is checked; password rules are not re-applied
/// so customers with older passwords can still sign in.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(validate_email(email));
    if password.is_empty() {
        errors.push(required("password"));
    }
    errors.into_result()
}

/// Validates the password change form.
///
/// ## Rules
/// - Current password is required
/// - New password follows the password rules
/// - Confirmation equals the new password
/// - New password differs from the current one
pub fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
    rules: AccountRules,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if current.is_empty() {
        errors.push(required("currentPassword"));
    }
    errors.check(validate_password("newPassword", new, rules.min_password_length));
    if confirm != new {
        errors.push(ValidationError::Mismatch {
            field: "confirmPassword".to_string(),
            other: "newPassword".to_string(),
        });
    }
    if !current.is_empty() && current == new {
        errors.push(ValidationError::Unchanged {
            field: "newPassword".to_string(),
            other: "currentPassword".to_string(),
        });
    }

    errors.into_result()
}

/// Validates the personal info form. Returns the parsed date of birth.
pub fn validate_personal_info(
    info: &PersonalInfo,
    today: NaiveDate,
    rules: AccountRules,
) -> Result<NaiveDate, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_email(&info.email));
    errors.check(validate_name("firstName", &info.first_name));
    errors.check(validate_name("lastName", &info.last_name));
    let dob = errors.check(validate_date_of_birth(
        &info.date_of_birth,
        today,
        rules.min_customer_age,
    ));

    errors.into_result()?;
    dob.ok_or_else(|| ValidationErrors::from(required("dateOfBirth")))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn address() -> AddressDraft {
        AddressDraft {
            street_name: "1 Main St".into(),
            city: "Springfield".into(),
            postal_code: "12345".into(),
            country: "US".into(),
        }
    }

    fn draft() -> CustomerDraft {
        CustomerDraft {
            email: "ada@example.com".into(),
            password: "Secret123".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            date_of_birth: "1990-12-10".into(),
            shipping_address: address(),
            billing_address: None,
            default_shipping: true,
            default_billing: false,
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.co.uk").is_ok());

        assert!(matches!(validate_email(""), Err(ValidationError::Required { .. })));
        assert!(validate_email(" ada@example.com").is_err());
        assert!(validate_email("ada@example").is_err());
        assert!(validate_email("ada example.com").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password", "Secret123", 8).is_ok());

        assert!(matches!(
            validate_password("password", "Se1", 8),
            Err(ValidationError::TooShort { min: 8, .. })
        ));
        assert!(validate_password("password", "secret123", 8).is_err());
        assert!(validate_password("password", "SECRET123", 8).is_err());
        assert!(validate_password("password", "SecretOnly", 8).is_err());
        assert!(validate_password("password", "Secret 123", 8).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("firstName", "Ada").is_ok());
        assert!(validate_name("lastName", "O'Neil").is_ok());
        assert!(validate_name("city", "New York").is_ok());
        assert!(validate_name("city", "München").is_ok());

        assert!(validate_name("firstName", "").is_err());
        assert!(validate_name("firstName", "R2D2").is_err());
        assert!(validate_name("firstName", "Ada!").is_err());
    }

    #[test]
    fn test_validate_postal_code() {
        assert!(validate_postal_code("US", "12345").is_ok());
        assert!(validate_postal_code("US", "12345-6789").is_ok());
        assert!(validate_postal_code("CA", "K1A 0B1").is_ok());
        assert!(validate_postal_code("GB", "SW1A 1AA").is_ok());
        assert!(validate_postal_code("GB", "M1 1AE").is_ok());
        assert!(validate_postal_code("DE", "10115").is_ok());
        assert!(validate_postal_code("FR", "75001").is_ok());

        assert!(validate_postal_code("US", "1234").is_err());
        assert!(validate_postal_code("DE", "1011").is_err());
        assert!(validate_postal_code("CA", "123 456").is_err());
        assert!(validate_postal_code("FR", "").is_err());
    }

    #[test]
    fn test_validate_date_of_birth() {
        let dob = validate_date_of_birth("2000-01-31", today(), 13).unwrap();
        assert_eq!(dob, NaiveDate::from_ymd_opt(2000, 1, 31).unwrap());

        assert!(matches!(
            validate_date_of_birth("2030-01-01", today(), 13),
            Err(ValidationError::InFuture { .. })
        ));
        assert!(matches!(
            validate_date_of_birth("2015-01-01", today(), 13),
            Err(ValidationError::TooYoung { min_age: 13, .. })
        ));
        assert!(validate_date_of_birth("31/01/2000", today(), 13).is_err());
    }

    #[test]
    fn test_age_boundary_is_birthday() {
        // Turns 13 on 2024-06-15
        assert!(validate_date_of_birth("2011-06-15", today(), 13).is_ok());
        assert!(validate_date_of_birth("2011-06-16", today(), 13).is_err());
    }

    #[test]
    fn test_huge_min_age_rejects_everyone() {
        assert!(matches!(
            validate_date_of_birth("2024-01-01", today(), 3_000_000_000),
            Err(ValidationError::TooYoung { .. })
        ));
        assert!(validate_date_of_birth("1900-01-01", today(), u32::MAX).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_address_prefixes_fields() {
        let mut bad = address();
        bad.postal_code = "ABC".into();
        bad.city = String::new();

        let errors = validate_address("billing", &bad).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.for_field("billing.city").is_some());
        assert!(errors.for_field("billing.postalCode").is_some());
    }

    #[test]
    fn test_unsupported_country_skips_postal_check() {
        let mut bad = address();
        bad.country = "XX".into();
        let errors = validate_address("shipping", &bad).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.for_field("shipping.country").is_some());
    }

    #[test]
    fn test_validate_customer_draft() {
        let dob = validate_customer_draft(&draft(), today(), AccountRules::default()).unwrap();
        assert_eq!(dob, NaiveDate::from_ymd_opt(1990, 12, 10).unwrap());

        let mut bad = draft();
        bad.email = "nope".into();
        bad.password = "short".into();
        bad.billing_address = Some(AddressDraft::default());
        let errors = validate_customer_draft(&bad, today(), AccountRules::default()).unwrap_err();
        assert!(errors.for_field("email").is_some());
        assert!(errors.for_field("password").is_some());
        assert!(errors.for_field("billing.streetName").is_some());
        assert!(errors.for_field("firstName").is_none());
    }

    #[test]
    fn test_validate_password_change() {
        let rules = AccountRules::default();
        assert!(validate_password_change("OldSecret1", "NewSecret1", "NewSecret1", rules).is_ok());

        let errors =
            validate_password_change("OldSecret1", "NewSecret1", "NewSecret2", rules).unwrap_err();
        assert!(errors.for_field("confirmPassword").is_some());

        let errors =
            validate_password_change("OldSecret1", "OldSecret1", "OldSecret1", rules).unwrap_err();
        assert!(matches!(
            errors.for_field("newPassword"),
            Some(ValidationError::Unchanged { .. })
        ));
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login("ada@example.com", "x").is_ok());
        let errors = validate_login("ada", "").unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
