mod checkout;
mod manage_cart;

pub use checkout::{CheckoutFormModel, OrderPlacedModel, OrderSubmissionError, PlaceOrderUseCase};
pub use manage_cart::{CartMutationError, CartStore};

// locally detected invalid input, rejected before any network round-trip
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    QuantityBelowMinimum { given: u32 },
    EmptyShippingAddress,
    EmptyCart,
}
