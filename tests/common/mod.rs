#![allow(dead_code)]

use order_assembly::fetcher::mock::MockTransport;
use order_assembly::model::OrderRequest;
use serde_json::json;

pub const PAYMENT: &str = "http://payment/paymentAuth";
pub const SHIPPING: &str = "http://shipping/shipping";

/// URIs of one customer's reference data.
pub struct Refs {
    pub customer: String,
    pub address: String,
    pub card: String,
    pub items: String,
}

impl Refs {
    pub fn for_key(key: &str) -> Self {
        Self {
            customer: format!("http://user/customers/{key}"),
            address: format!("http://user/addresses/{key}"),
            card: format!("http://user/cards/{key}"),
            items: format!("http://carts/carts/{key}/items"),
        }
    }

    pub fn request(&self) -> OrderRequest {
        OrderRequest::new(&self.customer, &self.address, &self.card, &self.items)
    }
}

/// Scripts the user and cart services for customer `key`.
///
/// The cart holds two socks at 9.99 and one at 15.00, so the order total with
/// the default fee is 39.97.
pub fn script_customer(transport: &MockTransport, key: &str) -> Refs {
    let refs = Refs::for_key(key);
    transport.on_get(&refs.customer).respond(json!({
        "id": key,
        "firstName": "Eve",
        "lastName": "Berger",
        "username": format!("user{key}"),
        "_links": {"self": {"href": refs.customer}}
    }));
    transport.on_get(&refs.address).respond(json!({
        "id": key,
        "number": "246",
        "street": "Whitelees Road",
        "city": format!("Glasgow-{key}"),
        "postcode": "G67 3DL",
        "country": "United Kingdom",
        "_links": {"self": {"href": refs.address}}
    }));
    transport.on_get(&refs.card).respond(json!({
        "id": key,
        "longNum": format!("5429804235432{key}"),
        "expires": "08/19",
        "ccv": "958",
        "_links": {"self": {"href": refs.card}}
    }));
    transport.on_get(&refs.items).respond(json!([
        {"itemId": "03fef6ac-1896-4ce8-bd69-b798f85c6e0b", "quantity": 2, "unitPrice": 9.99},
        {"itemId": "510a0d7e-8e83-4193-b483-e27e09ddc34d", "quantity": 1, "unitPrice": 15.00}
    ]));
    refs
}

/// Scripts an approving payment service and an echoing shipping service.
pub fn script_downstream(transport: &MockTransport) {
    transport
        .on_post(PAYMENT)
        .respond(json!({"authorised": true, "message": "Payment authorised"}));
    transport.on_post(SHIPPING).echo();
}
