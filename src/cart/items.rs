//! Order Items

use rusty_money::{Money, iso::Currency};

use crate::products::{Product, ProductId};

/// A cart line: a snapshot of a product taken when it was added, plus a quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    product_id: ProductId,
    product_name: String,
    product_description: Option<String>,
    product_price: Money<'static, Currency>,
    quantity: u32,
}

impl OrderItem {
    /// Snapshot `product` with the given quantity.
    #[must_use]
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            product_description: product.description.clone(),
            product_price: product.price,
            quantity,
        }
    }

    /// Returns the identifier of the product this line was taken from.
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Returns the product name at the time it was added.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Returns the product description at the time it was added.
    pub fn product_description(&self) -> Option<&str> {
        self.product_description.as_deref()
    }

    /// Returns the unit price at the time it was added.
    pub fn product_price(&self) -> &Money<'static, Currency> {
        &self.product_price
    }

    /// Returns the quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(super) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    #[test]
    fn new_snapshots_product_fields() {
        let product = Product {
            id: ProductId::new(4),
            name: "Teapot".to_string(),
            description: Some("Cast iron".to_string()),
            stock: 6,
            price: Money::from_minor(3500, GBP),
            featured_image: Some("teapot.jpg".to_string()),
        };

        let item = OrderItem::new(&product, 2);

        assert_eq!(item.product_id(), ProductId::new(4));
        assert_eq!(item.product_name(), "Teapot");
        assert_eq!(item.product_description(), Some("Cast iron"));
        assert_eq!(item.product_price(), &Money::from_minor(3500, GBP));
        assert_eq!(item.quantity(), 2);
    }
}
