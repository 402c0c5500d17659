//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Workflow runs**: a `create_order` span per run, carrying its correlation id
//! - **Remote calls**: a `fetch` span per call (correlation id, request id, method,
//!   URI), entered only while the pool task is being polled
//! - **Store operations**: `db.order.*` spans with `db.system`, `db.operation` and
//!   `db.collection` fields, plus durations
//! - **Store actor lifecycle**: startup, inserts, deletes and shutdown
//!
//! ## Usage Examples
//!
//! ```bash
//! # Step-by-step workflow logs
//! RUST_LOG=info cargo run < order.json
//!
//! # Request payloads and state transitions
//! RUST_LOG=debug cargo run < order.json
//! ```
//!
//! **With `RUST_LOG=info`**, a successful run looks like:
//!
//! ```text
//! INFO create_order: Issued reference fetches correlation_id=8c0f...
//! INFO create_order:fetch: Request completed elapsed_ms=12 correlation_id=8c0f... method="GET" uri="http://carts/carts/1/items"
//! INFO create_order: Items resolved items=2 total=39.97
//! INFO create_order: References resolved customer_id="57a98d98e4b00679b4a830af"
//! INFO create_order:authorize: Requesting payment authorisation endpoint=http://payment/paymentAuth
//! INFO create_order: Payment authorised
//! INFO create_order: Shipment obtained shipment_id=3f6e...
//! INFO create_order:db.order.save: Inserted record_type="CustomerOrder" id=9b1d... size=1
//! INFO create_order: Order created order_id=Some("9b1d...") total=39.97 elapsed_ms=57
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
