use crate::fetcher::{FetchError, FetchHandle, RemoteFetcher, TraceContext};
use crate::model::PaymentRequest;
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Client for the payment service's authorisation endpoint.
#[derive(Clone)]
pub struct PaymentClient {
    fetcher: RemoteFetcher,
    endpoint: String,
}

impl PaymentClient {
    pub fn new(fetcher: RemoteFetcher, endpoint: impl Into<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
        }
    }

    /// Issues the authorisation request.
    ///
    /// The handle resolves to the raw reply, `null` for an empty body. Use
    /// [`PaymentResponse::from_reply`](crate::model::PaymentResponse::from_reply)
    /// to read it.
    #[instrument(skip_all, fields(amount = %request.amount))]
    pub async fn authorize(
        &self,
        request: &PaymentRequest,
        trace: &TraceContext,
    ) -> Result<FetchHandle<Value>, FetchError> {
        debug!(?request, "authorize called");
        info!(endpoint = %self.endpoint, "Requesting payment authorisation");
        self.fetcher
            .post_one::<Value, _>(&self.endpoint, request, trace)
            .await
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock::MockTransport;
    use crate::fetcher::{PoolConfig, WorkerPool};
    use crate::model::{Address, Card, Customer, PaymentResponse};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const ENDPOINT: &str = "http://payment/paymentAuth";

    fn client(transport: &MockTransport) -> PaymentClient {
        let fetcher = RemoteFetcher::new(
            Arc::new(transport.clone()),
            WorkerPool::new(&PoolConfig::default()),
        );
        PaymentClient::new(fetcher, ENDPOINT)
    }

    fn request() -> PaymentRequest {
        PaymentRequest {
            address: Address::default(),
            card: Card::default(),
            customer: Customer::new("c1", "alice"),
            amount: Decimal::new(3997, 2),
        }
    }

    #[tokio::test]
    async fn test_authorize_posts_amount() {
        let transport = MockTransport::new();
        transport
            .on_post(ENDPOINT)
            .respond(json!({"authorised": true, "message": "Payment authorised"}));

        let reply = client(&transport)
            .authorize(&request(), &TraceContext::new_root())
            .await
            .unwrap()
            .join(Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(
            PaymentResponse::from_reply(reply),
            Some(PaymentResponse::authorized("Payment authorised"))
        );
        assert_eq!(transport.posted(ENDPOINT)[0]["amount"], json!(39.97));
    }

    #[tokio::test]
    async fn test_malformed_reply_is_not_a_fetch_error() {
        let transport = MockTransport::new();
        transport.on_post(ENDPOINT).respond(json!({"status": "ok"}));

        let reply = client(&transport)
            .authorize(&request(), &TraceContext::new_root())
            .await
            .unwrap()
            .join(Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(reply, json!({"status": "ok"}));
        assert_eq!(PaymentResponse::from_reply(reply), None);
    }
}
