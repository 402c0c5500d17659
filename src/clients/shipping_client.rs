use crate::fetcher::{FetchError, FetchHandle, RemoteFetcher, TraceContext};
use crate::model::Shipment;
use tracing::{info, instrument};

/// Client for the shipping service.
#[derive(Clone)]
pub struct ShippingClient {
    fetcher: RemoteFetcher,
    endpoint: String,
}

impl ShippingClient {
    pub fn new(fetcher: RemoteFetcher, endpoint: impl Into<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
        }
    }

    /// Posts a fresh shipment named after the customer; the handle resolves to the
    /// shipment the service records.
    #[instrument(skip(self, trace))]
    pub async fn request_shipment(
        &self,
        customer_id: &str,
        trace: &TraceContext,
    ) -> Result<FetchHandle<Shipment>, FetchError> {
        let shipment = Shipment::for_customer(customer_id);
        info!(shipment_id = %shipment.id, "Requesting shipment");
        self.fetcher.post_one(&self.endpoint, &shipment, trace).await
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
