//! Hypermedia (HAL) envelopes.
//!
//! The address, customer and card services answer with a single entity whose
//! fields sit at the top level next to a `_links` object. Only the entity payload
//! is consumed by the order workflow; the links are kept for diagnostics and for
//! recovering an id the payload may omit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single navigational link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
}

/// HAL allows a relation to carry one link or an array of links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Links {
    One(Link),
    Many(Vec<Link>),
}

impl Links {
    fn first(&self) -> Option<&Link> {
        match self {
            Links::One(link) => Some(link),
            Links::Many(links) => links.first(),
        }
    }
}

/// An entity wrapped together with its `_links`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Links>,
}

impl<T> Resource<T> {
    /// Wraps an entity with no links.
    pub fn new(content: T) -> Self {
        Self {
            content,
            links: BTreeMap::new(),
        }
    }

    /// Returns the `href` of the first link registered under `rel`.
    pub fn href(&self, rel: &str) -> Option<&str> {
        self.links
            .get(rel)
            .and_then(Links::first)
            .map(|link| link.href.as_str())
    }

    /// Last path segment of the `self` link, which is the entity id by HAL convention.
    pub fn self_id(&self) -> Option<&str> {
        self.href("self")
            .map(|href| href.trim_end_matches('/'))
            .and_then(|href| href.rsplit('/').next())
            .filter(|segment| !segment.is_empty())
    }

    /// Drops the links and returns the entity payload.
    pub fn into_content(self) -> T {
        self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Customer;
    use serde_json::json;

    #[test]
    fn test_envelope_exposes_payload_and_links() {
        let resource: Resource<Customer> = serde_json::from_value(json!({
            "firstName": "Eve",
            "username": "eve",
            "_links": {
                "self": { "href": "http://user/customers/57a98d98e4b00679b4a830af" },
                "addresses": [{ "href": "http://user/customers/57a98d98e4b00679b4a830af/addresses" }]
            }
        }))
        .unwrap();

        assert_eq!(resource.content.first_name, "Eve");
        assert_eq!(resource.self_id(), Some("57a98d98e4b00679b4a830af"));
        assert!(resource.href("addresses").unwrap().ends_with("/addresses"));
    }

    #[test]
    fn test_envelope_without_links() {
        let resource: Resource<Customer> =
            serde_json::from_value(json!({ "id": "c1", "username": "eve" })).unwrap();

        assert!(resource.links.is_empty());
        assert_eq!(resource.self_id(), None);
        assert_eq!(resource.into_content().id, "c1");
    }
}
