use crate::clients::{OrderStore, PaymentClient, ShippingClient};
use crate::config::OrdersConfig;
use crate::fetcher::{HttpTransport, RemoteFetcher, Transport, TransportError, WorkerPool};
use crate::orders::OrderWorkflow;
use std::sync::Arc;
use tracing::{error, info};

/// The assembled order service.
///
/// `OrderSystem` is responsible for:
/// - **Lifecycle Management**: Starting the order store actor and stopping it again
/// - **Dependency Wiring**: One worker pool and transport shared by every remote client
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::with_http(&OrdersConfig::from_env()?)?;
///
/// let order = system.workflow.create_order(request).await?;
/// let history = system.store.find_by_customer_id(&order.customer_id).await?;
///
/// // Gracefully shut down when done
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// The order-assembly workflow.
    pub workflow: OrderWorkflow,

    /// Client for the order store.
    pub store: OrderStore,

    /// Task handles for the running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Wires the system on top of `transport`, spawning the order store actor.
    pub fn new(config: &OrdersConfig, transport: Arc<dyn Transport>) -> Self {
        let (store_actor, store) = crate::order_store::new();
        let store_handle = tokio::spawn(store_actor.run());

        let fetcher = RemoteFetcher::new(transport, WorkerPool::new(&config.pool));
        let payments = PaymentClient::new(fetcher.clone(), config.payment_uri.clone());
        let shipping = ShippingClient::new(fetcher.clone(), config.shipping_uri.clone());
        let workflow = OrderWorkflow::new(
            fetcher,
            payments,
            shipping,
            store.clone(),
            config.workflow_settings(),
        );

        info!(
            payment_uri = %config.payment_uri,
            shipping_uri = %config.shipping_uri,
            max_workers = config.pool.max_workers,
            queue_capacity = config.pool.queue_capacity,
            "Order system started"
        );

        Self {
            workflow,
            store,
            handles: vec![store_handle],
        }
    }

    /// Wires the system over HTTP, honouring the configured proxy.
    pub fn with_http(config: &OrdersConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config.proxy_url.as_deref())?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the workflow and store client closes the store's channel; the actor
    /// then drains and exits. Clones of either handed out earlier keep the actor
    /// alive, so drop them first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.workflow);
        drop(self.store);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
