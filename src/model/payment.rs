use crate::model::{Address, Card, Customer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authorisation request sent to the payment service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub address: Address,
    pub card: Card,
    pub customer: Customer,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
}

/// Outcome reported by the payment service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    #[serde(rename = "authorised", alias = "authorized")]
    pub authorized: bool,
    #[serde(default)]
    pub message: String,
}

impl PaymentResponse {
    pub fn authorized(message: impl Into<String>) -> Self {
        Self {
            authorized: true,
            message: message.into(),
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            authorized: false,
            message: message.into(),
        }
    }

    /// Reads the payment service's raw reply.
    ///
    /// Returns `None` when the reply is empty or does not have the shape of a
    /// response.
    pub fn from_reply(reply: Value) -> Option<Self> {
        if reply.is_null() {
            return None;
        }
        serde_json::from_value(reply).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_accepts_both_spellings() {
        let british: PaymentResponse =
            serde_json::from_value(json!({ "authorised": true, "message": "Payment authorised" }))
                .unwrap();
        let american: PaymentResponse =
            serde_json::from_value(json!({ "authorized": false, "message": "no" })).unwrap();

        assert!(british.authorized);
        assert!(!american.authorized);
    }

    #[test]
    fn test_from_reply_reads_a_decline() {
        let reply = json!({ "authorised": false, "message": "insufficient funds", "extra": 1 });
        assert_eq!(
            PaymentResponse::from_reply(reply),
            Some(PaymentResponse::declined("insufficient funds"))
        );
    }

    #[test]
    fn test_from_reply_rejects_malformed_bodies() {
        for reply in [
            Value::Null,
            json!({}),
            json!("garbage"),
            json!({ "status": "ok" }),
            json!({ "authorised": "yes" }),
            json!([true]),
        ] {
            assert_eq!(PaymentResponse::from_reply(reply.clone()), None, "{reply}");
        }
    }

    #[test]
    fn test_request_writes_amount_as_number() {
        let request = PaymentRequest {
            address: Address::default(),
            card: Card::default(),
            customer: Customer::default(),
            amount: Decimal::new(3997, 2),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["amount"], json!(39.97));
    }
}
