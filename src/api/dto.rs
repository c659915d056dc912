use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Number as JsnNum;

// JSON shapes of the remote shop-backend contract, monetary figures stay
// as raw JSON numbers here and convert to `Decimal` in the model layer

#[derive(Deserialize, Debug)]
pub struct ProductSnapshotDto {
    pub id: u64,
    pub name: String,
    pub price: JsnNum,
    pub is_active: bool,
    #[serde(default)]
    pub has_image: bool,
}

#[derive(Deserialize, Debug)]
pub struct CartItemDto {
    pub id: u64,
    pub product_id: u64,
    pub quantity: u32,
    pub product: ProductSnapshotDto,
    // backend serialises timestamps without zone offset
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Deserialize, Debug)]
pub struct CartSummaryDto {
    pub total_amount: JsnNum,
    // total number of units, not number of distinct lines
    pub item_count: u32,
}

#[derive(Serialize, Debug)]
pub struct CartItemCreateReqDto {
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodDto {
    CreditCard,
    Paypal,
    BankTransfer,
}

#[derive(Serialize, Debug)]
pub struct OrderCreateReqDto {
    pub shipping_address: String,
    pub billing_address: String,
    pub payment_method: PaymentMethodDto,
    pub notes: Option<String>,
    // line items are NOT re-sent, the server-side cart is authoritative
    // at order-creation time
}

#[derive(Deserialize, Debug)]
pub struct OrderCreatedRespDto {
    pub id: u64,
    pub order_number: String,
    pub total_amount: JsnNum,
    pub status: String,
    pub payment_status: Option<String>,
}

// FastAPI-style rejection body, `{"detail": "..."}`
#[derive(Deserialize, Debug)]
pub struct RemoteErrorDto {
    pub detail: Option<String>,
}
