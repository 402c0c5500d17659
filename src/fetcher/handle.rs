use crate::fetcher::error::FetchError;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

/// Single-assignment handle to an in-flight fetch.
///
/// Joining consumes the handle. A join that times out stops waiting but leaves
/// the task running: its result is discarded when it eventually completes.
#[derive(Debug)]
pub struct FetchHandle<T> {
    uri: String,
    inner: JoinHandle<Result<T, FetchError>>,
}

impl<T> FetchHandle<T> {
    pub(crate) fn new(uri: String, inner: JoinHandle<Result<T, FetchError>>) -> Self {
        Self { uri, inner }
    }

    /// Waits at most `timeout` for the fetch to finish.
    pub async fn join(self, timeout: Duration) -> Result<T, FetchError> {
        let mut inner = self.inner;
        match tokio::time::timeout(timeout, &mut inner).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(FetchError::TaskAborted(e.to_string())),
            Err(_) => {
                warn!(uri = %self.uri, ?timeout, "Gave up waiting for fetch");
                Err(FetchError::TimedOut(timeout))
            }
        }
    }

    /// True once the underlying task has produced its result.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}
