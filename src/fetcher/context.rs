//! Correlation context carried into every fetch task.
//!
//! A [`TraceContext`] is created once per workflow run. Each fetch derives a child
//! context on the issuing side and moves it into the spawned task, so the task logs
//! under its own `fetch` span and the outbound request carries the run's correlation
//! id, no matter which worker ends up polling it.

use tracing::Span;
use uuid::Uuid;

/// Header carrying the workflow-wide correlation id.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

/// Header carrying the id of an individual fetch.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Debug, Clone)]
pub struct TraceContext {
    correlation_id: Uuid,
    request_id: Option<Uuid>,
    span: Span,
}

impl TraceContext {
    /// A fresh root context for one workflow run, parented to the current span.
    pub fn new_root() -> Self {
        let correlation_id = Uuid::new_v4();
        Self {
            correlation_id,
            request_id: None,
            span: Span::current(),
        }
    }

    /// Root context with a caller-supplied correlation id (e.g. from an inbound header).
    pub fn with_correlation_id(correlation_id: Uuid) -> Self {
        Self {
            correlation_id,
            request_id: None,
            span: Span::current(),
        }
    }

    /// Derives the context for one outbound call.
    ///
    /// The child shares the correlation id, gets its own request id, and opens a
    /// `fetch` span under this context's span.
    pub fn child(&self, method: &'static str, uri: &str) -> Self {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            parent: &self.span,
            "fetch",
            correlation_id = %self.correlation_id,
            request_id = %request_id,
            method,
            uri,
        );
        Self {
            correlation_id: self.correlation_id,
            request_id: Some(request_id),
            span,
        }
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// `None` for a root context.
    pub fn request_id(&self) -> Option<Uuid> {
        self.request_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_share_correlation_but_not_request_id() {
        let root = TraceContext::new_root();
        let a = root.child("GET", "http://user/addresses/1");
        let b = root.child("GET", "http://user/cards/1");

        assert_eq!(root.request_id(), None);
        assert_eq!(a.correlation_id(), root.correlation_id());
        assert_eq!(b.correlation_id(), root.correlation_id());
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn test_roots_are_independent() {
        assert_ne!(
            TraceContext::new_root().correlation_id(),
            TraceContext::new_root().correlation_id()
        );
    }
}
