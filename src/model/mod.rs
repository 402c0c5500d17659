//! Wire-level data structures (DTOs) exchanged with the remote services and the order store.
//!
//! Every type here serializes to camelCase JSON. Money is held as an exact
//! [`Decimal`](rust_decimal::Decimal) and written to the wire as a JSON number.

pub mod customer;
pub mod item;
pub mod order;
pub mod payment;
pub mod resource;

pub use customer::*;
pub use item::*;
pub use order::*;
pub use payment::*;
pub use resource::*;
