use crate::model::{Address, Card, Customer, Item};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inbound request to assemble an order.
///
/// Carries only references (URIs) to the data held by the other services; the
/// workflow resolves each of them remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer: Option<String>,
    pub address: Option<String>,
    pub card: Option<String>,
    pub items: Option<String>,
}

/// The four references of an [`OrderRequest`], all present and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReferences {
    pub customer: String,
    pub address: String,
    pub card: String,
    pub items: String,
}

impl OrderRequest {
    pub fn new(
        customer: impl Into<String>,
        address: impl Into<String>,
        card: impl Into<String>,
        items: impl Into<String>,
    ) -> Self {
        Self {
            customer: Some(customer.into()),
            address: Some(address.into()),
            card: Some(card.into()),
            items: Some(items.into()),
        }
    }

    /// Checks that every reference is present and non-blank.
    ///
    /// On failure returns the names of the missing references, in field order.
    pub fn references(&self) -> Result<OrderReferences, Vec<&'static str>> {
        fn present(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        }

        match (
            present(&self.customer),
            present(&self.address),
            present(&self.card),
            present(&self.items),
        ) {
            (Some(customer), Some(address), Some(card), Some(items)) => Ok(OrderReferences {
                customer,
                address,
                card,
                items,
            }),
            (customer, address, card, items) => Err([
                ("customer", customer.is_none()),
                ("address", address.is_none()),
                ("card", card.is_none()),
                ("items", items.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect()),
        }
    }
}

/// Shipment record created by the shipping service, keyed by customer id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shipment {
    pub id: String,
    pub name: String,
}

impl Shipment {
    /// A new shipment request for `customer_id` with a fresh id.
    pub fn for_customer(customer_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: customer_id.into(),
        }
    }
}

/// A fully assembled order.
///
/// `id` stays `None` until the order store assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub customer_id: String,
    pub customer: Customer,
    pub address: Address,
    pub card: Card,
    pub items: Vec<Item>,
    pub shipment: Shipment,
    pub date: DateTime<Utc>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_request_yields_references() {
        let request = OrderRequest::new(
            "http://user/customers/1",
            "http://user/addresses/1",
            "http://user/cards/1",
            "http://carts/carts/1/items",
        );

        let refs = request.references().unwrap();
        assert_eq!(refs.items, "http://carts/carts/1/items");
    }

    #[test]
    fn test_missing_and_blank_references_are_reported() {
        let request = OrderRequest {
            customer: Some("http://user/customers/1".into()),
            address: None,
            card: Some("   ".into()),
            items: Some("http://carts/carts/1/items".into()),
        };

        assert_eq!(request.references().unwrap_err(), vec!["address", "card"]);
    }

    #[test]
    fn test_shipment_for_customer_has_fresh_id() {
        let a = Shipment::for_customer("c1");
        let b = Shipment::for_customer("c1");
        assert_eq!(a.name, "c1");
        assert_ne!(a.id, b.id);
    }
}
