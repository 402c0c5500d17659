//! # Mock Transport
//!
//! A scripted [`Transport`] for exercising the fetcher and the workflow without a
//! network. Routes are keyed by method and URI; every call is recorded with the
//! trace ids it carried.
//!
//! ```ignore
//! let transport = MockTransport::new();
//! transport.on_get("http://user/cards/1").respond(json!({"id": "1"}));
//! transport.on_get("http://catalogue/items").after(Duration::from_secs(9)).respond(json!([]));
//! transport.on_post("http://shipping/shipping").echo();
//! ```

use crate::fetcher::context::TraceContext;
use crate::fetcher::error::TransportError;
use crate::fetcher::transport::{MediaType, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub uri: String,
    pub accept: Option<MediaType>,
    pub body: Option<Value>,
    pub correlation_id: Uuid,
    pub request_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Echo,
    Fail(String),
}

#[derive(Debug, Clone)]
struct Route {
    delay: Duration,
    reply: Reply,
}

type RouteKey = (&'static str, String);

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<RouteKey, Route>,
    calls: Vec<RecordedCall>,
    completed: Vec<RouteKey>,
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the reply to `GET uri`, replacing any earlier script.
    pub fn on_get(&self, uri: impl Into<String>) -> RouteBuilder {
        RouteBuilder::new(self.state.clone(), ("GET", uri.into()))
    }

    /// Scripts the reply to `POST uri`, replacing any earlier script.
    pub fn on_post(&self, uri: impl Into<String>) -> RouteBuilder {
        RouteBuilder::new(self.state.clone(), ("POST", uri.into()))
    }

    /// Every call received, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// How many times `method uri` was called.
    pub fn calls_to(&self, method: &str, uri: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.method == method && call.uri == uri)
            .count()
    }

    /// Bodies posted to `uri`, in arrival order.
    pub fn posted(&self, uri: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.method == "POST" && call.uri == uri)
            .filter_map(|call| call.body.clone())
            .collect()
    }

    /// True once a call to `method uri` ran to the end of its scripted delay.
    pub fn completed(&self, method: &str, uri: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .completed
            .iter()
            .any(|(m, u)| *m == method && u == uri)
    }

    async fn dispatch(
        &self,
        method: &'static str,
        uri: &str,
        accept: Option<MediaType>,
        body: Option<Value>,
        context: &TraceContext,
    ) -> Result<Value, TransportError> {
        let route = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(RecordedCall {
                method,
                uri: uri.to_string(),
                accept,
                body: body.clone(),
                correlation_id: context.correlation_id(),
                request_id: context.request_id(),
            });
            state.routes.get(&(method, uri.to_string())).cloned()
        };

        let Some(route) = route else {
            return Err(TransportError::Other(format!("no route for {method} {uri}")));
        };

        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        self.state
            .lock()
            .unwrap()
            .completed
            .push((method, uri.to_string()));

        match route.reply {
            Reply::Json(value) => Ok(value),
            Reply::Echo => Ok(body.unwrap_or(Value::Null)),
            Reply::Fail(message) => Err(TransportError::Other(message)),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(
        &self,
        uri: &str,
        accept: MediaType,
        context: &TraceContext,
    ) -> Result<Value, TransportError> {
        self.dispatch("GET", uri, Some(accept), None, context).await
    }

    async fn post(
        &self,
        uri: &str,
        body: Value,
        context: &TraceContext,
    ) -> Result<Value, TransportError> {
        self.dispatch("POST", uri, None, Some(body), context).await
    }
}

/// Builder for one scripted route.
pub struct RouteBuilder {
    state: Arc<Mutex<MockState>>,
    key: RouteKey,
    delay: Duration,
}

impl RouteBuilder {
    fn new(state: Arc<Mutex<MockState>>, key: RouteKey) -> Self {
        Self {
            state,
            key,
            delay: Duration::ZERO,
        }
    }

    /// Delays the reply by `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replies with `value` as the response body.
    pub fn respond(self, value: Value) {
        self.install(Reply::Json(value));
    }

    /// Replies with the request body (`null` for GETs).
    pub fn echo(self) {
        self.install(Reply::Echo);
    }

    /// Fails the call with a transport error.
    pub fn fail(self, message: impl Into<String>) {
        self.install(Reply::Fail(message.into()));
    }

    fn install(self, reply: Reply) {
        let route = Route {
            delay: self.delay,
            reply,
        };
        self.state.lock().unwrap().routes.insert(self.key, route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_routes() {
        let transport = MockTransport::new();
        transport
            .on_get("http://user/cards/1")
            .respond(json!({"id": "1"}));
        transport.on_post("http://shipping/shipping").echo();
        transport.on_get("http://catalogue/items").fail("connection reset");

        let context = TraceContext::new_root().child("GET", "test");
        let card = transport
            .get("http://user/cards/1", MediaType::HalJson, &context)
            .await
            .unwrap();
        assert_eq!(card, json!({"id": "1"}));

        let echoed = transport
            .post("http://shipping/shipping", json!({"name": "c1"}), &context)
            .await
            .unwrap();
        assert_eq!(echoed, json!({"name": "c1"}));

        assert!(transport
            .get("http://catalogue/items", MediaType::Json, &context)
            .await
            .is_err());
        assert!(transport
            .get("http://nowhere", MediaType::Json, &context)
            .await
            .is_err());

        assert_eq!(transport.call_count(), 4);
        assert_eq!(transport.calls_to("GET", "http://user/cards/1"), 1);
        assert_eq!(
            transport.posted("http://shipping/shipping"),
            vec![json!({"name": "c1"})]
        );
        assert!(transport.calls()[0].request_id.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_route_completes_later() {
        let transport = MockTransport::new();
        transport
            .on_get("http://user/addresses/1")
            .after(Duration::from_secs(3))
            .respond(json!({}));

        let context = TraceContext::new_root();
        let pending = {
            let transport = transport.clone();
            tokio::spawn(async move {
                transport
                    .get("http://user/addresses/1", MediaType::HalJson, &context)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!transport.completed("GET", "http://user/addresses/1"));

        pending.await.unwrap().unwrap();
        assert!(transport.completed("GET", "http://user/addresses/1"));
    }
}
