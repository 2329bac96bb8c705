//! Order hand-off to the shopper's mail client.
//!
//! Orders are not stored or sent server-side. Checkout produces a `mailto:`
//! URL addressed to the shop, and the client opens it.

use serde::Serialize;
use tracing::info;

use shopyz_core::OrderSummary;

/// A composed order mail, ready for the client to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailHandoff {
    pub recipient: String,
    pub subject: String,
    pub mailto: String,
}

/// Composes order mails to a fixed recipient.
#[derive(Debug, Clone)]
pub struct MailDispatcher {
    recipient: String,
}

impl MailDispatcher {
    #[must_use]
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }

    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Compose the hand-off for an order. Never fails.
    #[must_use]
    pub fn dispatch(&self, order: &OrderSummary) -> MailHandoff {
        let subject = order.subject();
        let mailto = compose(&self.recipient, &subject, &order.body());
        info!(
            recipient = %self.recipient,
            items = order.items.len(),
            total = %order.total,
            "Order mail composed"
        );

        MailHandoff {
            recipient: self.recipient.clone(),
            subject,
            mailto,
        }
    }
}

/// Build a `mailto:` URL with percent-encoded subject and body.
#[must_use]
pub fn compose(recipient: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{recipient}?subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopyz_core::checkout::compose_order;
    use shopyz_core::seed::default_products;
    use shopyz_core::{CartLedger, CheckoutForm, DeliveryMethod, RegionTable};

    use super::*;

    #[test]
    fn test_compose_encodes_subject_and_body() {
        let url = compose(
            "ordershopyz@gmail.com",
            "shopyZ Order: Amel B",
            "Line one\nTotal: 1,300 DZD",
        );
        assert_eq!(
            url,
            "mailto:ordershopyz@gmail.com?subject=shopyZ%20Order%3A%20Amel%20B\
             &body=Line%20one%0ATotal%3A%201%2C300%20DZD"
        );
    }

    #[test]
    fn test_dispatch_round_trips_order_body() {
        let mut cart = CartLedger::new();
        cart.add(&default_products().remove(0));
        let form = CheckoutForm {
            full_name: "Amel".to_string(),
            phone: "0550 00 00 00".to_string(),
            address: "12 Rue Didouche Mourad".to_string(),
            delivery_method: DeliveryMethod::Counter,
            ..CheckoutForm::default()
        };
        let order = compose_order(&form, &cart, &RegionTable::default()).unwrap();

        let handoff = MailDispatcher::new("orders@shop.dz").dispatch(&order);
        assert_eq!(handoff.subject, "shopyZ Order: Amel");
        assert!(handoff.mailto.starts_with("mailto:orders@shop.dz?subject="));

        let encoded_body = handoff.mailto.split("&body=").nth(1).unwrap();
        let decoded = urlencoding::decode(encoded_body).unwrap();
        assert_eq!(decoded, order.body());
    }
}
