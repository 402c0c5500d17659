//! # Order Assembly
//!
//! Builds a customer order from references to data held by other services: it
//! fetches the address, customer, card and priced items concurrently, computes the
//! total, authorises payment, requests shipment and persists the result.
//!
//! ## Core Concepts
//!
//! ### Bounded joins, not a shared deadline
//! Every remote call runs as its own task on a bounded [`WorkerPool`](fetcher::WorkerPool)
//! and is collected through a [`FetchHandle`](fetcher::FetchHandle). Each join gets the
//! full configured timeout on its own. A join that gives up does not cancel the task.
//!
//! ### Explicit trace context
//! A [`TraceContext`](fetcher::TraceContext) is created per run and a child is moved
//! into every fetch task, so concurrent calls stay attributable without any
//! thread-local state.
//!
//! ### Failures callers can act on
//! [`OrderError`](orders::OrderError) keeps the full taxonomy for logs, while
//! [`status`](orders::OrderError::status) and
//! [`public_message`](orders::OrderError::public_message) give the coarse view meant for
//! callers.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic `StoreActor<T>` behind the order store.
//! - **Key items**: [`StoreEntity`](framework::StoreEntity), [`StoreActor`](framework::StoreActor).
//!
//! ### 2. Remote Calls ([`fetcher`])
//! - **Key items**: [`RemoteFetcher`](fetcher::RemoteFetcher), [`Transport`](fetcher::Transport).
//!
//! ### 3. The Interface ([`clients`])
//! - **Key items**: [`PaymentClient`](clients::PaymentClient),
//!   [`ShippingClient`](clients::ShippingClient), [`OrderStore`](clients::OrderStore).
//!
//! ### 4. The Workflow ([`orders`])
//! - **Key items**: [`OrderWorkflow`](orders::OrderWorkflow), [`WorkflowState`](orders::WorkflowState).
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! Wires everything together from an [`OrdersConfig`](config::OrdersConfig).
//! - **Key items**: [`OrderSystem`](lifecycle::OrderSystem), [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ## Quick Start
//!
//! ```bash
//! echo '{"customer":"http://user/customers/1","address":"http://user/addresses/1",
//!        "card":"http://user/cards/1","items":"http://carts/carts/1/items"}' \
//!   | RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod config;
pub mod fetcher;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod order_store;
pub mod orders;
