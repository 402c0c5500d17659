use crate::framework::{StoreClient, StoreError};
use crate::model::CustomerOrder;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, error, Instrument, Span};

const COLLECTION: &str = "customerOrders";

/// Opens a `db.order.*` span carrying the usual database attributes.
macro_rules! db_span {
    ($name:literal, $operation:literal) => {
        tracing::info_span!(
            $name,
            db.system = "in-memory",
            db.operation = $operation,
            db.collection = COLLECTION,
        )
    };
}

/// Client for the order store.
///
/// Every call runs inside its own `db.order.<operation>` span and logs its
/// duration and outcome.
#[derive(Clone)]
pub struct OrderStore {
    inner: StoreClient<CustomerOrder>,
}

impl OrderStore {
    pub fn new(inner: StoreClient<CustomerOrder>) -> Self {
        Self { inner }
    }

    /// Inserts the order, assigning an id if it has none; overwrites otherwise.
    pub async fn save(&self, order: CustomerOrder) -> Result<CustomerOrder, StoreError> {
        observed(db_span!("db.order.save", "save"), self.inner.save(order)).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<CustomerOrder>, StoreError> {
        observed(
            db_span!("db.order.find_by_id", "findById"),
            self.inner.find_by_id(id.to_string()),
        )
        .await
    }

    /// All orders placed by `customer_id`, oldest first.
    pub async fn find_by_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Vec<CustomerOrder>, StoreError> {
        let customer_id = customer_id.to_string();
        observed(
            db_span!("db.order.find_by_customer_id", "findByCustomerId"),
            self.inner
                .find_where(move |order| order.customer_id == customer_id),
        )
        .await
    }

    pub async fn find_all(&self) -> Result<Vec<CustomerOrder>, StoreError> {
        observed(db_span!("db.order.find_all", "findAll"), self.inner.find_all()).await
    }

    /// Fails with [`StoreError::NotFound`] when no order has this id.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        observed(
            db_span!("db.order.delete_by_id", "deleteById"),
            self.inner.delete(id.to_string()),
        )
        .await
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        observed(db_span!("db.order.count", "count"), self.inner.count()).await
    }
}

async fn observed<R, F>(span: Span, operation: F) -> Result<R, StoreError>
where
    F: Future<Output = Result<R, StoreError>>,
{
    async move {
        let started = Instant::now();
        let result = operation.await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => debug!(elapsed_ms, "Store call completed"),
            Err(e) => error!(elapsed_ms, error = %e, "Store call failed"),
        }
        result
    }
    .instrument(span)
    .await
}
