//! Domain clients: the payment and shipping services over the
//! [`RemoteFetcher`](crate::fetcher::RemoteFetcher), and the order store over its
//! [`StoreClient`](crate::framework::StoreClient).

pub mod order_store;
pub mod payment_client;
pub mod shipping_client;

pub use order_store::*;
pub use payment_client::*;
pub use shipping_client::*;
