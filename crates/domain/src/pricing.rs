//! Pluggable tax and shipping policies.

use crate::money::Money;

/// Computes the tax and shipping charges for an order subtotal.
///
/// The deployed configuration charges neither, but the order builder treats
/// both as policy so a configuration change never touches checkout logic.
pub trait PricingPolicy: Send + Sync {
    /// Tax charged on top of the subtotal.
    fn tax(&self, subtotal: Money) -> Money;

    /// Shipping charge for the order.
    fn shipping_cost(&self, subtotal: Money) -> Money;
}

/// Zero tax, zero shipping.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCharges;

impl PricingPolicy for NoCharges {
    fn tax(&self, _subtotal: Money) -> Money {
        Money::zero()
    }

    fn shipping_cost(&self, _subtotal: Money) -> Money {
        Money::zero()
    }
}

/// Percentage tax plus a flat shipping fee, waived above a threshold.
#[derive(Debug, Clone, Copy)]
pub struct StandardPricing {
    /// Tax rate in basis points (e.g., 1800 = 18%).
    pub tax_basis_points: i64,

    /// Flat shipping fee.
    pub shipping_flat: Money,

    /// Subtotal at or above which shipping is free.
    pub free_shipping_above: Option<Money>,
}

impl PricingPolicy for StandardPricing {
    fn tax(&self, subtotal: Money) -> Money {
        Money::from_paise(subtotal.paise() * self.tax_basis_points / 10_000)
    }

    fn shipping_cost(&self, subtotal: Money) -> Money {
        match self.free_shipping_above {
            Some(threshold) if subtotal >= threshold => Money::zero(),
            _ => self.shipping_flat,
        }
    }
}
