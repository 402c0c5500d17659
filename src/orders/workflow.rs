use crate::clients::{OrderStore, PaymentClient, ShippingClient};
use crate::fetcher::{RemoteFetcher, TraceContext};
use crate::model::{
    calculate_total, Address, Card, Customer, CustomerOrder, Item, OrderReferences,
    OrderRequest, PaymentRequest, PaymentResponse, Resource,
};
use crate::orders::error::{OrderError, UNPARSEABLE_AUTHORISATION};
use crate::orders::state::{StateLog, WorkflowState};
use chrono::Utc;
use rust_decimal::Decimal;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn, Instrument};

/// Knobs the workflow reads on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSettings {
    /// Bound applied to each join on its own.
    pub timeout: Duration,
    /// Flat fee added once per order.
    pub shipping_fee: Decimal,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            shipping_fee: Decimal::new(499, 2),
        }
    }
}

/// Outcome of one run together with the states it passed through.
#[derive(Debug)]
pub struct WorkflowRun {
    pub result: Result<CustomerOrder, OrderError>,
    pub states: StateLog,
}

/// The order-assembly state machine.
///
/// One call to [`create_order`](Self::create_order) is one workflow instance: it
/// owns its resolved data and handles and shares nothing with concurrent runs.
#[derive(Clone)]
pub struct OrderWorkflow {
    fetcher: RemoteFetcher,
    payments: PaymentClient,
    shipping: ShippingClient,
    store: OrderStore,
    settings: WorkflowSettings,
}

impl OrderWorkflow {
    pub fn new(
        fetcher: RemoteFetcher,
        payments: PaymentClient,
        shipping: ShippingClient,
        store: OrderStore,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            fetcher,
            payments,
            shipping,
            store,
            settings,
        }
    }

    /// Assembles, pays for, ships and persists one order.
    pub async fn create_order(&self, request: OrderRequest) -> Result<CustomerOrder, OrderError> {
        self.run(request).await.result
    }

    /// Like [`create_order`](Self::create_order), also reporting the visited states.
    pub async fn run(&self, request: OrderRequest) -> WorkflowRun {
        let trace = TraceContext::new_root();
        let span = info_span!("create_order", correlation_id = %trace.correlation_id());

        async move {
            debug!(?request, "create_order called");
            let started = Instant::now();
            let mut states = StateLog::new();

            let result = self.execute(&request, &trace, &mut states).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;
            match &result {
                Ok(order) => {
                    info!(order_id = ?order.id, total = %order.total, elapsed_ms, "Order created");
                }
                Err(e) => {
                    states.advance(WorkflowState::Failed(e.kind()));
                    warn!(error = %e, elapsed_ms, "Order creation failed");
                }
            }
            WorkflowRun { result, states }
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        request: &OrderRequest,
        trace: &TraceContext,
        states: &mut StateLog,
    ) -> Result<CustomerOrder, OrderError> {
        let timeout = self.settings.timeout;

        let refs: OrderReferences = request.references().map_err(|missing| {
            warn!(?missing, "Rejecting order with missing references");
            OrderError::invalid_order()
        })?;
        states.advance(WorkflowState::Fetching);

        // All four are in flight before the first join.
        let address = self
            .fetcher
            .fetch_one::<Resource<Address>>(&refs.address, trace)
            .await
            .map_err(|e| OrderError::from_fetch("address", e))?;
        let customer = self
            .fetcher
            .fetch_one::<Resource<Customer>>(&refs.customer, trace)
            .await
            .map_err(|e| OrderError::from_fetch("customer", e))?;
        let card = self
            .fetcher
            .fetch_one::<Resource<Card>>(&refs.card, trace)
            .await
            .map_err(|e| OrderError::from_fetch("card", e))?;
        let items = self
            .fetcher
            .fetch_list::<Item>(&refs.items, trace)
            .await
            .map_err(|e| OrderError::from_fetch("items", e))?;
        info!("Issued reference fetches");

        let items = items
            .join(timeout)
            .await
            .map_err(|e| OrderError::from_fetch("items", e))?;
        if let Some(item) = items.iter().find(|item| item.unit_price.is_sign_negative()) {
            return Err(OrderError::UpstreamFailure {
                dependency: "items",
                cause: format!("negative unit price for item {}", item.item_id),
            });
        }
        let total = calculate_total(&items, self.settings.shipping_fee);
        info!(items = items.len(), %total, "Items resolved");
        states.advance(WorkflowState::ItemsResolved);

        let address = address
            .join(timeout)
            .await
            .map_err(|e| OrderError::from_fetch("address", e))?
            .into_content();
        let card = card
            .join(timeout)
            .await
            .map_err(|e| OrderError::from_fetch("card", e))?
            .into_content();
        let customer = customer
            .join(timeout)
            .await
            .map_err(|e| OrderError::from_fetch("customer", e))?;
        let customer_id = customer_id(&customer)?;
        let customer = customer.into_content();
        info!(%customer_id, "References resolved");
        states.advance(WorkflowState::ReferencesResolved);

        let payment = PaymentRequest {
            address: address.clone(),
            card: card.clone(),
            customer: customer.clone(),
            amount: total,
        };
        let reply = self
            .payments
            .authorize(&payment, trace)
            .await
            .map_err(|e| OrderError::from_fetch("payment", e))?
            .join(timeout)
            .await
            .map_err(|e| OrderError::from_fetch("payment", e))?;
        match PaymentResponse::from_reply(reply) {
            None => {
                return Err(OrderError::PaymentDeclined(
                    UNPARSEABLE_AUTHORISATION.to_string(),
                ))
            }
            Some(response) if !response.authorized => {
                return Err(OrderError::PaymentDeclined(response.message))
            }
            Some(_) => info!("Payment authorised"),
        }
        states.advance(WorkflowState::PaymentAuthorized);

        let shipment = self
            .shipping
            .request_shipment(&customer_id, trace)
            .await
            .map_err(|e| OrderError::from_fetch("shipping", e))?
            .join(timeout)
            .await
            .map_err(|e| OrderError::from_fetch("shipping", e))?;
        info!(shipment_id = %shipment.id, "Shipment obtained");
        states.advance(WorkflowState::ShipmentObtained);

        let order = CustomerOrder {
            id: None,
            customer_id,
            customer,
            address,
            card,
            items,
            shipment,
            date: Utc::now(),
            total,
        };
        let saved = self
            .store
            .save(order)
            .await
            .map_err(|e| OrderError::InternalFault(format!("order store: {e}")))?;
        states.advance(WorkflowState::Persisted);
        Ok(saved)
    }
}

/// The customer's id, falling back to the last segment of its `self` link.
fn customer_id(customer: &Resource<Customer>) -> Result<String, OrderError> {
    if !customer.content.id.trim().is_empty() {
        return Ok(customer.content.id.clone());
    }
    customer
        .self_id()
        .map(str::to_string)
        .ok_or_else(|| OrderError::UpstreamFailure {
            dependency: "customer",
            cause: "customer resource carries no id".to_string(),
        })
}
