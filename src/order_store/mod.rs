//! Order persistence: the store actor specialised for [`CustomerOrder`].

pub mod entity;

use crate::clients::OrderStore;
use crate::framework::StoreActor;
use crate::model::CustomerOrder;
use uuid::Uuid;

/// Creates the order store actor and its client.
///
/// Ids are fresh v4 UUIDs in simple (hyphen-free) form.
pub fn new() -> (StoreActor<CustomerOrder>, OrderStore) {
    let next_order_id = || Uuid::new_v4().simple().to_string();

    let (actor, generic_client) = StoreActor::new(32, next_order_id);
    let client = OrderStore::new(generic_client);

    (actor, client)
}
