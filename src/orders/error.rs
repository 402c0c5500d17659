use crate::fetcher::FetchError;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Message returned for requests missing one of their four references.
pub const INVALID_ORDER_MESSAGE: &str =
    "Invalid order request. Order requires customer, address, card and items.";

/// Message returned when the payment service answers with an empty body.
pub const UNPARSEABLE_AUTHORISATION: &str = "unable to parse authorisation response";

const GENERIC_FAILURE_MESSAGE: &str = "Unable to create order.";

/// Why an order could not be created.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("{0}")]
    InvalidOrder(String),

    #[error("Timed out waiting for {dependency} after {timeout:?}")]
    Timeout {
        dependency: &'static str,
        timeout: Duration,
    },

    #[error("{dependency} failed: {cause}")]
    UpstreamFailure {
        dependency: &'static str,
        cause: String,
    },

    #[error("{0}")]
    PaymentDeclined(String),

    #[error("Could not schedule {dependency}: {cause}")]
    ResourceExhausted {
        dependency: &'static str,
        cause: String,
    },

    #[error("Internal fault: {0}")]
    InternalFault(String),
}

/// The failure class of an [`OrderError`], without its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidOrder,
    Timeout,
    UpstreamFailure,
    PaymentDeclined,
    ResourceExhausted,
    InternalFault,
}

impl OrderError {
    pub fn invalid_order() -> Self {
        OrderError::InvalidOrder(INVALID_ORDER_MESSAGE.to_string())
    }

    /// Classifies a fetch failure against the dependency it was for.
    pub fn from_fetch(dependency: &'static str, error: FetchError) -> Self {
        match error {
            FetchError::TimedOut(timeout) => OrderError::Timeout {
                dependency,
                timeout,
            },
            FetchError::FetchFailed(cause) => OrderError::UpstreamFailure {
                dependency,
                cause: cause.to_string(),
            },
            FetchError::ResourceExhausted(cause) => {
                OrderError::ResourceExhausted { dependency, cause }
            }
            FetchError::TaskAborted(cause) => {
                OrderError::InternalFault(format!("{dependency} task aborted: {cause}"))
            }
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            OrderError::InvalidOrder(_) => FailureKind::InvalidOrder,
            OrderError::Timeout { .. } => FailureKind::Timeout,
            OrderError::UpstreamFailure { .. } => FailureKind::UpstreamFailure,
            OrderError::PaymentDeclined(_) => FailureKind::PaymentDeclined,
            OrderError::ResourceExhausted { .. } => FailureKind::ResourceExhausted,
            OrderError::InternalFault(_) => FailureKind::InternalFault,
        }
    }

    /// Status code a service front end should answer with.
    ///
    /// Caller mistakes and declined payments are "not acceptable"; everything else
    /// is a server error.
    pub fn status(&self) -> StatusCode {
        match self {
            OrderError::InvalidOrder(_) | OrderError::PaymentDeclined(_) => {
                StatusCode::NOT_ACCEPTABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a caller; server-side details are withheld.
    pub fn public_message(&self) -> String {
        match self {
            OrderError::InvalidOrder(message) | OrderError::PaymentDeclined(message) => {
                message.clone()
            }
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::TransportError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(OrderError::invalid_order().status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(
            OrderError::PaymentDeclined("insufficient funds".into()).status(),
            StatusCode::NOT_ACCEPTABLE
        );
        assert_eq!(
            OrderError::InternalFault("store".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            OrderError::Timeout {
                dependency: "items",
                timeout: Duration::from_secs(5)
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_message_hides_server_details() {
        let declined = OrderError::PaymentDeclined("insufficient funds".into());
        assert_eq!(declined.public_message(), "insufficient funds");
        assert_eq!(OrderError::invalid_order().public_message(), INVALID_ORDER_MESSAGE);

        let upstream = OrderError::UpstreamFailure {
            dependency: "card",
            cause: "http://user/cards/1 returned 503".into(),
        };
        assert_eq!(upstream.public_message(), "Unable to create order.");
    }

    #[test]
    fn test_fetch_error_classification() {
        let timeout = OrderError::from_fetch("items", FetchError::TimedOut(Duration::from_secs(5)));
        assert_eq!(timeout.kind(), FailureKind::Timeout);

        let failed = OrderError::from_fetch(
            "card",
            FetchError::FetchFailed(TransportError::Other("reset".into())),
        );
        assert_eq!(failed.kind(), FailureKind::UpstreamFailure);

        let exhausted =
            OrderError::from_fetch("address", FetchError::ResourceExhausted("full".into()));
        assert_eq!(exhausted.kind(), FailureKind::ResourceExhausted);

        let aborted = OrderError::from_fetch("customer", FetchError::TaskAborted("panic".into()));
        assert_eq!(aborted.kind(), FailureKind::InternalFault);
    }
}
