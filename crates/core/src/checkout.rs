//! Checkout aggregation: form validation, delivery pricing and the order
//! summary handed to the mail dispatcher.

use core::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use crate::cart::CartLedger;
use crate::region::{DEFAULT_REGION, DeliveryMethod, RegionTable};
use crate::types::{CURRENCY_CODE, Price};

/// Shop name printed in the order mail.
pub const SHOP_NAME: &str = "shopyZ";

/// Customer details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, alias = "homeAddress")]
    pub address: String,
    #[serde(default = "default_region", alias = "wilaya")]
    pub region: String,
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
}

fn default_region() -> String {
    DEFAULT_REGION.to_owned()
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            phone: String::new(),
            address: String::new(),
            region: default_region(),
            delivery_method: DeliveryMethod::default(),
        }
    }
}

/// Required checkout fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutField {
    FullName,
    Phone,
    Address,
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FullName => "full name",
            Self::Phone => "phone",
            Self::Address => "address",
        })
    }
}

/// Reasons a checkout submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("Please fill in all mandatory information (missing: {})", join_fields(.0))]
    MissingFields(Vec<CheckoutField>),
    #[error("the cart is empty")]
    EmptyCart,
}

fn join_fields(fields: &[CheckoutField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl CheckoutForm {
    /// Required fields that are blank after trimming, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<CheckoutField> {
        [
            (CheckoutField::FullName, &self.full_name),
            (CheckoutField::Phone, &self.phone),
            (CheckoutField::Address, &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Validation gate. No format checks beyond non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] naming every blank field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingFields(missing))
        }
    }
}

/// Totals for a cart delivered to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub subtotal: Price,
    pub delivery_cost: Price,
    pub total: Price,
}

/// Price a cart for a region and delivery method.
///
/// Unknown regions contribute no delivery cost.
#[must_use]
pub fn quote(
    cart: &CartLedger,
    regions: &RegionTable,
    region: &str,
    method: DeliveryMethod,
) -> Quote {
    let subtotal = cart.subtotal();
    let delivery_cost = regions.cost(region, method);
    Quote {
        subtotal,
        delivery_cost,
        total: subtotal + delivery_cost,
    }
}

/// One order line as it appears in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
}

/// Structured order record produced by a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub region: String,
    pub delivery_method: DeliveryMethod,
    pub items: Vec<OrderItem>,
    pub subtotal: Price,
    pub delivery_cost: Price,
    pub total: Price,
}

/// Run both checkout gates.
///
/// Nothing is mutated; the caller clears the cart once the summary has been
/// handed to the dispatcher.
///
/// # Errors
///
/// Returns [`CheckoutError::MissingFields`] if a required field is blank, or
/// [`CheckoutError::EmptyCart`] if there is nothing to order.
pub fn compose_order(
    form: &CheckoutForm,
    cart: &CartLedger,
    regions: &RegionTable,
) -> Result<OrderSummary, CheckoutError> {
    form.validate()?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let Quote {
        subtotal,
        delivery_cost,
        total,
    } = quote(cart, regions, &form.region, form.delivery_method);

    let items = cart
        .lines()
        .iter()
        .map(|line| OrderItem {
            name: line.product.name.clone(),
            quantity: line.quantity,
            unit_price: line.product.price,
        })
        .collect();

    Ok(OrderSummary {
        full_name: form.full_name.clone(),
        phone: form.phone.clone(),
        address: form.address.clone(),
        region: form.region.clone(),
        delivery_method: form.delivery_method,
        items,
        subtotal,
        delivery_cost,
        total,
    })
}

impl OrderSummary {
    /// Mail subject line.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("{SHOP_NAME} Order: {}", self.full_name)
    }

    /// Plain-text mail body.
    #[must_use]
    pub fn body(&self) -> String {
        let mut body = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_body(&mut body);
        body
    }

    fn write_body(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "New Order from {SHOP_NAME}")?;
        writeln!(out)?;
        writeln!(out, "Customer Details:")?;
        writeln!(out, "------------------")?;
        writeln!(out, "Name: {}", self.full_name)?;
        writeln!(out, "Phone: {}", self.phone)?;
        writeln!(out, "Wilaya: {}", self.region)?;
        writeln!(out, "Exact Delivery Address: {}", self.address)?;
        writeln!(out, "Delivery Type: {}", self.delivery_method.order_label())?;
        writeln!(out)?;
        writeln!(out, "Order Summary:")?;
        writeln!(out, "------------------")?;
        for item in &self.items {
            writeln!(
                out,
                "- {} (x{}) @ {} {CURRENCY_CODE}",
                item.name, item.quantity, item.unit_price
            )?;
        }
        writeln!(out)?;
        writeln!(out, "Subtotal: {} {CURRENCY_CODE}", self.subtotal)?;
        writeln!(out, "Delivery Cost: {} {CURRENCY_CODE}", self.delivery_cost)?;
        write!(out, "Total: {} {CURRENCY_CODE}", self.total)
    }
}
