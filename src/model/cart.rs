use std::str::FromStr;

use rust_decimal::Decimal;

use crate::api::dto::{CartItemDto, CartSummaryDto};
use crate::constant::hard_limit;

#[derive(Debug)]
pub enum CartModelError {
    // unit price or total amount failed to parse into `Decimal`
    AmountParse { item_id: u64, detail: String },
    // the backend must never hand out a line below the quantity floor
    InvalidQuantity { item_id: u64, given: u32 },
}

// denormalised product snapshot carried on each cart line, the client
// does not own the product record, only what the cart rows reflect
#[derive(Debug, Clone)]
pub struct ProductSnapshotModel {
    pub product_id: u64,
    pub name: String,
    pub unit_price: Decimal,
    pub active: bool,
    pub has_image: bool,
}

#[derive(Debug, Clone)]
pub struct CartLineModel {
    pub item_id: u64,
    pub product: ProductSnapshotModel,
    pub quantity: u32,
}

// local cache of the server-side cart, line order reflects add order,
// `server_total` / `unit_count` echo what the summary endpoint reported
#[derive(Debug, Clone, Default)]
pub struct CartModel {
    pub lines: Vec<CartLineModel>,
    pub server_total: Decimal,
    pub unit_count: u32,
}

impl TryFrom<CartItemDto> for CartLineModel {
    type Error = CartModelError;
    fn try_from(value: CartItemDto) -> Result<Self, Self::Error> {
        if value.quantity < hard_limit::MIN_LINE_QUANTITY {
            return Err(CartModelError::InvalidQuantity {
                item_id: value.id,
                given: value.quantity,
            });
        }
        let unit_price = Decimal::from_str(value.product.price.to_string().as_str()).map_err(
            |e| CartModelError::AmountParse {
                item_id: value.id,
                detail: e.to_string(),
            },
        )?;
        Ok(Self {
            item_id: value.id,
            quantity: value.quantity,
            product: ProductSnapshotModel {
                product_id: value.product_id,
                name: value.product.name,
                unit_price,
                active: value.product.is_active,
                has_image: value.product.has_image,
            },
        })
    }
} // end of impl CartLineModel

impl CartModel {
    pub fn try_from_parts(
        d_lines: Vec<CartItemDto>,
        summary: CartSummaryDto,
    ) -> Result<Self, CartModelError> {
        let mut lines = Vec::with_capacity(d_lines.len());
        for d in d_lines {
            lines.push(CartLineModel::try_from(d)?);
        }
        let server_total =
            Decimal::from_str(summary.total_amount.to_string().as_str()).map_err(|e| {
                CartModelError::AmountParse {
                    item_id: 0,
                    detail: e.to_string(),
                }
            })?;
        Ok(Self {
            lines,
            server_total,
            unit_count: summary.item_count,
        })
    }

    pub fn find_line(&self, item_id: u64) -> Option<&CartLineModel> {
        self.lines.iter().find(|obj| obj.item_id == item_id)
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
} // end of impl CartModel
