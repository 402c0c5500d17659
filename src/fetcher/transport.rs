//! The seam between the fetcher and the network.
//!
//! [`Transport`] moves JSON documents; typing happens one level up in
//! [`RemoteFetcher`](crate::fetcher::RemoteFetcher). [`HttpTransport`] is the
//! production implementation on top of `reqwest`.

use crate::fetcher::context::{TraceContext, CORRELATION_ID_HEADER, REQUEST_ID_HEADER};
use crate::fetcher::error::TransportError;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Proxy, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

/// Media type requested from a remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// `application/hal+json`: single linked resources.
    HalJson,
    /// `application/json`: plain documents and lists.
    Json,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::HalJson => "application/hal+json",
            MediaType::Json => "application/json",
        }
    }
}

/// Sends one request and hands back the decoded JSON body.
///
/// An empty body is returned as [`Value::Null`].
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn get(
        &self,
        uri: &str,
        accept: MediaType,
        context: &TraceContext,
    ) -> Result<Value, TransportError>;

    async fn post(
        &self,
        uri: &str,
        body: Value,
        context: &TraceContext,
    ) -> Result<Value, TransportError>;
}

/// HTTP transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the client, routing plain-HTTP traffic through `proxy` when given.
    pub fn new(proxy: Option<&str>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(url) = proxy {
            builder = builder.proxy(Proxy::http(url)?);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    fn traced(&self, request: RequestBuilder, context: &TraceContext) -> RequestBuilder {
        let request = request.header(CORRELATION_ID_HEADER, context.correlation_id().to_string());
        match context.request_id() {
            Some(id) => request.header(REQUEST_ID_HEADER, id.to_string()),
            None => request,
        }
    }

    async fn handle_response(
        method: &'static str,
        uri: &str,
        response: Response,
    ) -> Result<Value, TransportError> {
        let status = response.status();
        debug!(method, uri, %status, "Response received");
        if !status.is_success() {
            return Err(TransportError::Status {
                method,
                uri: uri.to_string(),
                status,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        uri: &str,
        accept: MediaType,
        context: &TraceContext,
    ) -> Result<Value, TransportError> {
        let request = self.client.get(uri).header(ACCEPT, accept.as_str());
        let response = self.traced(request, context).send().await?;
        Self::handle_response("GET", uri, response).await
    }

    async fn post(
        &self,
        uri: &str,
        body: Value,
        context: &TraceContext,
    ) -> Result<Value, TransportError> {
        let request = self
            .client
            .post(uri)
            .header(ACCEPT, MediaType::Json.as_str())
            .json(&body);
        let response = self.traced(request, context).send().await?;
        Self::handle_response("POST", uri, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_types() {
        assert_eq!(MediaType::HalJson.as_str(), "application/hal+json");
        assert_eq!(MediaType::Json.as_str(), "application/json");
    }

    #[test]
    fn test_builds_with_and_without_proxy() {
        assert!(HttpTransport::new(None).is_ok());
        assert!(HttpTransport::new(Some("http://proxy.local:3128")).is_ok());
    }
}
