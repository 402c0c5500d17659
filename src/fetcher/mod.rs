//! Remote resource fetching.
//!
//! # Main Components
//!
//! - [`RemoteFetcher`] - Issues typed GET/POST calls as pool tasks and hands back handles
//! - [`FetchHandle`] - Joins one in-flight call with a time bound
//! - [`WorkerPool`] - Bounded execution with a saturation policy
//! - [`Transport`] - The network seam; [`HttpTransport`] in production
//! - [`TraceContext`] - Correlation ids and spans carried into each task
//!
//! # Testing
//!
//! See [`mock`] for a scripted transport.

pub mod context;
pub mod error;
pub mod handle;
pub mod mock;
pub mod pool;
pub mod transport;

pub use context::TraceContext;
pub use error::{FetchError, TransportError};
pub use handle::FetchHandle;
pub use pool::{PoolConfig, SaturationPolicy, WorkerPool};
pub use transport::{HttpTransport, MediaType, Transport};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn, Instrument};

enum Call {
    Get(MediaType),
    Post(Value),
}

impl Call {
    fn method(&self) -> &'static str {
        match self {
            Call::Get(_) => "GET",
            Call::Post(_) => "POST",
        }
    }
}

/// Issues remote calls on a worker pool.
///
/// Every method returns as soon as the task is admitted; the call itself runs
/// concurrently with the caller and its result is collected through the returned
/// [`FetchHandle`].
#[derive(Clone)]
pub struct RemoteFetcher {
    transport: Arc<dyn Transport>,
    pool: WorkerPool,
}

impl RemoteFetcher {
    pub fn new(transport: Arc<dyn Transport>, pool: WorkerPool) -> Self {
        Self { transport, pool }
    }

    /// GETs a single HAL resource and decodes it as `T`.
    pub async fn fetch_one<T>(
        &self,
        uri: &str,
        trace: &TraceContext,
    ) -> Result<FetchHandle<T>, FetchError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.issue(Call::Get(MediaType::HalJson), uri, trace).await
    }

    /// GETs a JSON array and decodes each element as `T`.
    pub async fn fetch_list<T>(
        &self,
        uri: &str,
        trace: &TraceContext,
    ) -> Result<FetchHandle<Vec<T>>, FetchError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.issue(Call::Get(MediaType::Json), uri, trace).await
    }

    /// POSTs `body` as JSON and decodes the reply as `T`.
    pub async fn post_one<T, B>(
        &self,
        uri: &str,
        body: &B,
        trace: &TraceContext,
    ) -> Result<FetchHandle<T>, FetchError>
    where
        T: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(TransportError::Body)?;
        self.issue(Call::Post(body), uri, trace).await
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    async fn issue<T>(
        &self,
        call: Call,
        uri: &str,
        trace: &TraceContext,
    ) -> Result<FetchHandle<T>, FetchError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let context = trace.child(call.method(), uri);
        let span = context.span().clone();
        let transport = self.transport.clone();
        let target = uri.to_string();

        let task = async move {
            let started = Instant::now();
            debug!("Request started");

            let response = match call {
                Call::Get(accept) => transport.get(&target, accept, &context).await,
                Call::Post(body) => transport.post(&target, body, &context).await,
            };
            let outcome = response
                .and_then(|value| serde_json::from_value::<T>(value).map_err(TransportError::Body));

            let elapsed_ms = started.elapsed().as_millis() as u64;
            match &outcome {
                Ok(_) => info!(elapsed_ms, "Request completed"),
                Err(e) => warn!(elapsed_ms, error = %e, "Request failed"),
            }
            outcome.map_err(FetchError::FetchFailed)
        };

        let inner = self.pool.spawn(task.instrument(span)).await?;
        Ok(FetchHandle::new(uri.to_string(), inner))
    }
}
