//! Checkout

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::Cart,
    orders::{Order, OrderDetails, OrderDetailsError, OrderSubmitter, SubmissionError},
};

/// Errors that stop a checkout. The cart is left untouched in every case.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing in the cart to order.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// The contact or delivery fields are incomplete.
    #[error(transparent)]
    InvalidDetails(#[from] OrderDetailsError),

    /// The order could not be submitted.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Submit the contents of `cart` as an order and empty the cart once it has been accepted.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if the cart is empty, the details are invalid, or submission fails.
pub async fn checkout(
    cart: &mut Cart,
    details: OrderDetails,
    submitter: &dyn OrderSubmitter,
) -> Result<Order, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    details.validate()?;

    let order = Order::from_cart(details, cart);

    if let Err(error) = submitter.submit(&order).await {
        warn!(%error, "order submission failed");

        return Err(error.into());
    }

    info!(items = order.items().len(), "order submitted");

    cart.discard();

    Ok(order)
}
