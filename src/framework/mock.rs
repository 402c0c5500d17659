//! # Mock Store
//!
//! Utilities for testing store clients in isolation.
//!
//! Use [`create_mock_store`] to get a client and a receiver, then helpers like
//! [`expect_save`] to assert behavior. [`MockStore`] offers a fluent expectation API.

use crate::framework::{StoreClient, StoreEntity, StoreError, StoreRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request to the mock store and the response to give.
enum Expectation<T: StoreEntity> {
    Save {
        response: Result<T, StoreError>,
    },
    FindById {
        response: Result<Option<T>, StoreError>,
    },
    Count {
        response: Result<usize, StoreError>,
    },
}

/// A mock store with expectation tracking for fluent testing.
///
/// Every request received is also recorded, so tests can assert that an operation
/// was *never* issued.
///
/// # Example
/// ```ignore
/// let mut mock = MockStore::<CustomerOrder>::new();
/// mock.expect_save().return_err(StoreError::ActorDropped);
///
/// let client = mock.client();
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockStore<T: StoreEntity> {
    client: StoreClient<T>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    received: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: StoreEntity> Default for MockStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoreEntity> MockStore<T> {
    /// Creates a new mock store with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let received_clone = received.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                received_clone.lock().unwrap().push(format!("{request:?}"));
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (StoreRequest::Save { respond_to, .. }, Some(Expectation::Save { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::FindById { respond_to, .. },
                        Some(Expectation::FindById { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Count { respond_to }, Some(Expectation::Count { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected store request: {request:?}");
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            received,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> StoreClient<T> {
        self.client.clone()
    }

    /// Expects a `save` operation.
    pub fn expect_save(&mut self) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Save {
            response,
        })
    }

    /// Expects a `find_by_id` operation.
    pub fn expect_find_by_id(&mut self) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            Expectation::FindById { response }
        })
    }

    /// Expects a `count` operation.
    pub fn expect_count(&mut self) -> ExpectationBuilder<T, usize> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Count {
            response,
        })
    }

    /// Debug renderings of every request received so far, in arrival order.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder that queues one expectation with its response.
pub struct ExpectationBuilder<T: StoreEntity, R> {
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    make: fn(Result<R, StoreError>) -> Expectation<T>,
}

impl<T: StoreEntity, R> ExpectationBuilder<T, R> {
    fn new(
        expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
        make: fn(Result<R, StoreError>) -> Expectation<T>,
    ) -> Self {
        Self { expectations, make }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.make)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: StoreError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.make)(Err(error)));
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a store client and the receiver its requests arrive on.
///
/// Lets a test play the store's part by hand: receive the request, inspect it,
/// answer through the one-shot sender.
pub fn create_mock_store<T: StoreEntity>(
    buffer_size: usize,
) -> (StoreClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Save request
pub async fn expect_save<T: StoreEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T, tokio::sync::oneshot::Sender<Result<T, StoreError>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Save { record, respond_to }) => Some((record, respond_to)),
        _ => None,
    }
}
