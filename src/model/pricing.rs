use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::AppPricingRuleCfg;
use crate::constant::AMOUNT_DISPLAY_SCALE;

use super::CartLineModel;

#[derive(Debug)]
pub enum PricingRuleError {
    MalformedAmount { label: &'static str, detail: String },
    NegativeAmount { label: &'static str },
}

// fixed business rules the total derivation depends on, loaded from
// config rather than written as literals
#[derive(Debug, Clone)]
pub struct PricingRuleSet {
    pub free_shipping_threshold: Decimal,
    pub flat_shipping_fee: Decimal,
    pub tax_rate: Decimal,
}

// derived from cart lines on every read, never stored or mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}

fn try_decimal_field(
    label: &'static str,
    raw: &serde_json::Number,
) -> Result<Decimal, PricingRuleError> {
    let parsed = Decimal::from_str(raw.to_string().as_str()).map_err(|e| {
        PricingRuleError::MalformedAmount {
            label,
            detail: e.to_string(),
        }
    })?;
    if parsed.is_sign_negative() {
        Err(PricingRuleError::NegativeAmount { label })
    } else {
        Ok(parsed)
    }
}

impl TryFrom<&AppPricingRuleCfg> for PricingRuleSet {
    type Error = PricingRuleError;
    fn try_from(value: &AppPricingRuleCfg) -> Result<Self, Self::Error> {
        Ok(Self {
            free_shipping_threshold: try_decimal_field(
                "free-shipping-threshold",
                &value.free_shipping_threshold,
            )?,
            flat_shipping_fee: try_decimal_field("flat-shipping-fee", &value.flat_shipping_fee)?,
            tax_rate: try_decimal_field("tax-rate", &value.tax_rate)?,
        })
    }
}

impl PricingRuleSet {
    // pure derivation, full precision is kept here, rounding happens
    // only in `OrderTotals::for_display`. amounts close to the 96-bit
    // `Decimal` bound saturate instead of panicking
    pub fn derive_totals(&self, lines: &[CartLineModel]) -> OrderTotals {
        let subtotal = lines.iter().fold(Decimal::ZERO, |acc, line| {
            let line_amount = line
                .product
                .unit_price
                .saturating_mul(Decimal::from(line.quantity));
            acc.saturating_add(line_amount)
        });
        let shipping = if lines.is_empty() {
            // nothing to ship, not a threshold waiver
            Decimal::ZERO
        } else if subtotal >= self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping_fee
        };
        let tax = subtotal.saturating_mul(self.tax_rate); // shipping is not taxed
        let grand_total = subtotal.saturating_add(shipping).saturating_add(tax);
        OrderTotals {
            subtotal,
            shipping,
            tax,
            grand_total,
        }
    }
} // end of impl PricingRuleSet

impl OrderTotals {
    // the three components round independently, then the grand total is
    // re-summed from the rounded parts so the displayed identity
    // `grand == subtotal + shipping + tax` holds exactly
    pub fn for_display(&self) -> Self {
        let rounder = |d: &Decimal| {
            d.round_dp_with_strategy(AMOUNT_DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
        };
        let subtotal = rounder(&self.subtotal);
        let shipping = rounder(&self.shipping);
        let tax = rounder(&self.tax);
        Self {
            subtotal,
            shipping,
            tax,
            grand_total: subtotal + shipping + tax,
        }
    }
}
