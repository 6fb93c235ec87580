//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, OrderItem},
    orders::{
        CheckoutError, HttpOrderSubmitter, Order, OrderDetails, OrderDetailsError, OrderSubmitter,
        SubmissionError, checkout,
    },
    products::{
        Product, ProductId, ProductSource, ProductSourceError,
        catalog::{Catalog, CatalogError},
        http::HttpProductSource,
        search,
    },
    summary::{SummaryError, write_cart_summary, write_catalog},
    tax::{TaxRate, TaxRateError},
    toasts::{DEFAULT_TOAST_DURATION, Toast, ToastKey, ToastQueue},
};
