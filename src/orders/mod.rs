//! Order assembly: the workflow that turns an [`OrderRequest`](crate::model::OrderRequest)
//! into a persisted [`CustomerOrder`].
//!
//! # Flow
//!
//! 1. Validate the four references; nothing goes on the wire for an invalid request.
//! 2. Issue the address, customer, card and item fetches together.
//! 3. Join the items and compute the total.
//! 4. Join address, card and customer, each with its own time bound.
//! 5. Authorise payment, then request shipment, then save.
//!
//! The first failure ends the run. Fetches already in flight are left to finish on
//! their own, and nothing done before the failure is undone.

pub mod error;
pub mod state;
pub mod workflow;

pub use error::*;
pub use state::*;
pub use workflow::*;

use crate::model::CustomerOrder;
use reqwest::StatusCode;

/// Status code for the outcome of a create-order call.
pub fn response_status(result: &Result<CustomerOrder, OrderError>) -> StatusCode {
    match result {
        Ok(_) => StatusCode::CREATED,
        Err(e) => e.status(),
    }
}
