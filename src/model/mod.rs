mod cart;
mod pricing;

pub use cart::{CartLineModel, CartModel, CartModelError, ProductSnapshotModel};
pub use pricing::{OrderTotals, PricingRuleError, PricingRuleSet};
