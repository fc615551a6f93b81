//! Checkout form and field validation.
//!
//! Card number and CVV are held as [`SecretString`] and only leave this module
//! as the sanitised [`SanitizedPayment`] (brand, last four digits, expiry,
//! cardholder name).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use satwa_core::CartLineItem;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::order::{CardBrand, SanitizedPayment, ShippingDetails};

/// Loose address check: something, `@`, something, `.`, something.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("Invalid regex"));

/// `MM/YY` with a real month.
static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("Invalid regex"));

/// Minimum card number length after stripping whitespace.
pub const MIN_CARD_DIGITS: usize = 16;

/// Minimum CVV length.
pub const MIN_CVV_LEN: usize = 3;

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutField {
    FirstName,
    LastName,
    Email,
    Address,
    City,
    State,
    Zip,
    CardNumber,
    ExpiryDate,
    Cvv,
    /// Form-level: the cart is empty.
    Items,
}

impl CheckoutField {
    /// Wire key (`"firstName"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::Zip => "zip",
            Self::CardNumber => "cardNumber",
            Self::ExpiryDate => "expiryDate",
            Self::Cvv => "cvv",
            Self::Items => "items",
        }
    }
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-scoped validation messages. Never empty when returned as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CheckoutErrors {
    fields: BTreeMap<CheckoutField, String>,
}

impl CheckoutErrors {
    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: CheckoutField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: CheckoutField) -> bool {
        self.fields.contains_key(&field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (CheckoutField, &str)> {
        self.fields.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn check(&mut self, ok: bool, field: CheckoutField, message: &str) {
        if !ok {
            self.fields.insert(field, message.to_string());
        }
    }
}

impl fmt::Display for CheckoutErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for CheckoutErrors {}

/// Raw checkout form input.
///
/// `Debug` shows the card number and CVV as redacted.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub card_number: SecretString,
    /// `MM/YY`.
    pub expiry_date: String,
    pub cvv: SecretString,
    /// Name on the card; defaults to the shipping name when blank.
    pub card_name: String,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            card_number: SecretString::from(""),
            expiry_date: String::new(),
            cvv: SecretString::from(""),
            card_name: String::new(),
        }
    }
}

/// A form that passed validation, reduced to what may leave the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub shipping: ShippingDetails,
    pub payment: SanitizedPayment,
}

impl CheckoutForm {
    /// Validate every field against the cart being checked out.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message; nothing short-circuits.
    pub fn validate(&self, cart: &[CartLineItem]) -> Result<ValidatedForm, CheckoutErrors> {
        use CheckoutField as F;

        let card_digits: String = self
            .card_number
            .expose_secret()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let expiry = self.expiry_date.trim();

        let mut errors = CheckoutErrors::default();
        errors.check(!cart.is_empty(), F::Items, "Your cart is empty");
        errors.check(
            !self.first_name.trim().is_empty(),
            F::FirstName,
            "First name is required",
        );
        errors.check(
            !self.last_name.trim().is_empty(),
            F::LastName,
            "Last name is required",
        );
        errors.check(
            EMAIL_RE.is_match(self.email.trim()),
            F::Email,
            "Valid email is required",
        );
        errors.check(!self.address.trim().is_empty(), F::Address, "Address is required");
        errors.check(!self.city.trim().is_empty(), F::City, "City is required");
        errors.check(!self.state.trim().is_empty(), F::State, "State is required");
        errors.check(!self.zip.trim().is_empty(), F::Zip, "ZIP code is required");
        errors.check(
            card_digits.len() >= MIN_CARD_DIGITS && card_digits.bytes().all(|b| b.is_ascii_digit()),
            F::CardNumber,
            "Valid card number is required",
        );
        errors.check(
            EXPIRY_RE.is_match(expiry),
            F::ExpiryDate,
            "Valid expiry date required (MM/YY)",
        );
        errors.check(
            self.cvv.expose_secret().trim().chars().count() >= MIN_CVV_LEN,
            F::Cvv,
            "Valid CVV is required",
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        let shipping = ShippingDetails {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip: self.zip.trim().to_string(),
        };
        let cardholder_name = match self.card_name.trim() {
            "" => format!("{} {}", shipping.first_name, shipping.last_name),
            name => name.to_string(),
        };
        let last4 = card_digits
            .get(card_digits.len() - 4..)
            .unwrap_or_default()
            .to_string();

        Ok(ValidatedForm {
            payment: SanitizedPayment {
                brand: CardBrand::detect(&card_digits),
                last4,
                expiry_date: expiry.to_string(),
                cardholder_name,
            },
            shipping,
        })
    }
}
