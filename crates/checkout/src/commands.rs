//! Typed commands crossing the checkout boundary.
//!
//! Request bodies are deserialized into these structs before any business
//! logic runs; `validate` enforces the field-level rules so a command that
//! reaches the coordinator is already well-formed.

use common::{OrderId, ProductId, UserId};
use domain::{Money, PaymentMethod};
use serde::Deserialize;

use crate::error::CheckoutError;

/// Who is checking out.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopperDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl ShopperDetails {
    /// Display name persisted on a newly created guest account.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Where the order ships.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingDetails {
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// One cart line as submitted at checkout.
///
/// The unit price is the cart snapshot price; it is charged as-is and
/// never re-fetched from the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

/// Command to place an order from a cart snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrder {
    pub shopper: ShopperDetails,
    pub shipping: ShippingDetails,
    pub payment_method: PaymentMethod,
    pub lines: Vec<CheckoutLine>,

    /// Set from the session for authenticated shoppers; guests are
    /// identified by email.
    #[serde(default)]
    pub user_id: Option<UserId>,

    /// Cart total as displayed to the shopper, if the client sent one.
    /// Checked against the recomputed line total so the shopper is never
    /// charged an amount different from what they saw.
    #[serde(default)]
    pub claimed_total: Option<Money>,
}

impl PlaceOrder {
    /// Validates the command before any persistence.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.lines.is_empty() {
            return Err(CheckoutError::Validation("empty cart".to_string()));
        }
        for line in &self.lines {
            if line.quantity == 0 {
                return Err(CheckoutError::Validation(format!(
                    "quantity must be at least 1 for product {}",
                    line.product_id
                )));
            }
            if !line.unit_price.is_positive() {
                return Err(CheckoutError::Validation(format!(
                    "price must be positive for product {}",
                    line.product_id
                )));
            }
        }

        if self.shopper.first_name.trim().is_empty() || self.shopper.last_name.trim().is_empty() {
            return Err(CheckoutError::Validation("name is required".to_string()));
        }
        if !self.shopper.email.contains('@') {
            return Err(CheckoutError::Validation(format!(
                "invalid email: {}",
                self.shopper.email
            )));
        }
        if self.shopper.phone.trim().is_empty() {
            return Err(CheckoutError::Validation("phone is required".to_string()));
        }

        if self.shipping.address.trim().is_empty()
            || self.shipping.city.trim().is_empty()
            || self.shipping.state.trim().is_empty()
        {
            return Err(CheckoutError::Validation(
                "shipping address is incomplete".to_string(),
            ));
        }
        if self.shipping.pincode.len() != 6
            || !self.shipping.pincode.chars().all(|c| c.is_ascii_digit())
        {
            return Err(CheckoutError::Validation(format!(
                "invalid pincode: {}",
                self.shipping.pincode
            )));
        }

        if let Some(claimed) = self.claimed_total
            && claimed != self.subtotal()
        {
            return Err(CheckoutError::Validation(format!(
                "cart total mismatch: displayed {claimed}, computed {}",
                self.subtotal()
            )));
        }

        Ok(())
    }

    /// Sum of line subtotals.
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .map(|l| l.unit_price.multiply(l.quantity))
            .sum()
    }
}

/// Command to verify a payment-completion callback.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPayment {
    pub order_id: OrderId,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_command() -> PlaceOrder {
        PlaceOrder {
            shopper: ShopperDetails {
                first_name: "Asha".to_string(),
                last_name: "Verma".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9876543210".to_string(),
            },
            shipping: ShippingDetails {
                address: "14 MG Road".to_string(),
                city: "Pune".to_string(),
                state: "Maharashtra".to_string(),
                pincode: "411001".to_string(),
            },
            payment_method: PaymentMethod::Online,
            lines: vec![CheckoutLine {
                product_id: ProductId::new(),
                quantity: 2,
                unit_price: Money::from_rupees(4500),
            }],
            user_id: None,
            claimed_total: None,
        }
    }

    #[test]
    fn test_valid_command_passes() {
        assert!(valid_command().validate().is_ok());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut cmd = valid_command();
        cmd.lines.clear();

        let err = cmd.validate().unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(ref m) if m == "empty cart"));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut cmd = valid_command();
        cmd.lines[0].quantity = 0;
        assert!(matches!(
            cmd.validate(),
            Err(CheckoutError::Validation(_))
        ));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut cmd = valid_command();
        cmd.lines[0].unit_price = Money::zero();
        assert!(matches!(
            cmd.validate(),
            Err(CheckoutError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_email_rejected() {
        let mut cmd = valid_command();
        cmd.shopper.email = "not-an-email".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(CheckoutError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_pincode_rejected() {
        let mut cmd = valid_command();
        cmd.shipping.pincode = "41100".to_string();
        assert!(cmd.validate().is_err());

        cmd.shipping.pincode = "4110a1".to_string();
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_blank_shipping_rejected() {
        let mut cmd = valid_command();
        cmd.shipping.city = "  ".to_string();
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_claimed_total_must_match() {
        let mut cmd = valid_command();
        cmd.claimed_total = Some(Money::from_rupees(9000));
        assert!(cmd.validate().is_ok());

        cmd.claimed_total = Some(Money::from_rupees(8999));
        assert!(matches!(
            cmd.validate(),
            Err(CheckoutError::Validation(_))
        ));
    }

    #[test]
    fn test_subtotal() {
        let mut cmd = valid_command();
        cmd.lines.push(CheckoutLine {
            product_id: ProductId::new(),
            quantity: 1,
            unit_price: Money::from_paise(250),
        });

        assert_eq!(cmd.subtotal(), Money::from_paise(900_250));
    }
}
