use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A priced line item from the customer's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub item_id: String,
    pub quantity: u32,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub unit_price: Decimal,
}

impl Item {
    /// Creates a new line item.
    ///
    /// # Arguments
    /// * `item_id` - Catalogue identifier of the product
    /// * `quantity` - Number of units ordered
    /// * `unit_price` - Price of a single unit
    pub fn new(item_id: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            id: None,
            item_id: item_id.into(),
            quantity,
            unit_price,
        }
    }

    /// Price of this line: `quantity * unit_price`.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Computes the order total: the sum of every line plus one flat shipping fee.
pub fn calculate_total(items: &[Item], shipping_fee: Decimal) -> Decimal {
    items.iter().map(Item::line_total).sum::<Decimal>() + shipping_fee
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_adds_flat_shipping_fee_once() {
        let items = vec![
            Item::new("sock-1", 2, Decimal::new(999, 2)),
            Item::new("sock-2", 1, Decimal::new(1500, 2)),
        ];

        let total = calculate_total(&items, Decimal::new(499, 2));

        assert_eq!(total, Decimal::new(3997, 2));
    }

    #[test]
    fn test_total_of_empty_cart_is_the_fee() {
        let fee = Decimal::new(499, 2);
        assert_eq!(calculate_total(&[], fee), fee);
    }

    #[test]
    fn test_zero_quantity_contributes_nothing() {
        let items = vec![Item::new("sock-1", 0, Decimal::new(1999, 2))];
        assert_eq!(calculate_total(&items, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_item_decodes_numeric_price_exactly() {
        let item: Item = serde_json::from_value(json!({
            "id": "i1",
            "itemId": "sock-1",
            "quantity": 3,
            "unitPrice": 9.99
        }))
        .unwrap();

        assert_eq!(item.unit_price, Decimal::new(999, 2));
        assert_eq!(item.line_total(), Decimal::new(2997, 2));
    }

    #[test]
    fn test_negative_quantity_is_rejected() {
        let result = serde_json::from_value::<Item>(json!({
            "itemId": "sock-1",
            "quantity": -1,
            "unitPrice": 1.0
        }));
        assert!(result.is_err());
    }
}
