//! Storefront
//!
//! Client-side storefront: browse a product catalog, build a session cart, and submit orders.

pub mod cart;
pub mod config;
pub mod observability;
pub mod orders;
pub mod prelude;
pub mod products;
pub mod summary;
pub mod tax;
pub mod toasts;

#[cfg(test)]
mod test;
