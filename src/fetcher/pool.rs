//! Bounded pool that fetch tasks run on.
//!
//! At most `max_workers` tasks make progress at once and at most `queue_capacity`
//! more wait for a worker. Admission beyond that is governed by the
//! [`SaturationPolicy`].

use crate::fetcher::error::FetchError;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::warn;

/// What happens when both the workers and the queue are full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaturationPolicy {
    /// Refuse the task with [`FetchError::ResourceExhausted`].
    #[default]
    Reject,
    /// Suspend the issuer until a slot frees up.
    Block,
}

impl FromStr for SaturationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(SaturationPolicy::Reject),
            "block" => Ok(SaturationPolicy::Block),
            other => Err(format!("unknown saturation policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_workers: usize,
    pub queue_capacity: usize,
    pub saturation: SaturationPolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_workers: 50,
            queue_capacity: 100,
            saturation: SaturationPolicy::Reject,
        }
    }
}

/// Cloneable handle to a shared worker pool.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    admission: Arc<Semaphore>,
    workers: Arc<Semaphore>,
    capacity: usize,
    saturation: SaturationPolicy,
}

impl WorkerPool {
    pub fn new(config: &PoolConfig) -> Self {
        let max_workers = config.max_workers.max(1);
        let capacity = max_workers + config.queue_capacity;
        Self {
            admission: Arc::new(Semaphore::new(capacity)),
            workers: Arc::new(Semaphore::new(max_workers)),
            capacity,
            saturation: config.saturation,
        }
    }

    /// Admits `task` to the pool and spawns it.
    ///
    /// With [`SaturationPolicy::Reject`] this never suspends: a full pool fails
    /// immediately. The admission slot is held until the task finishes, whether or
    /// not anyone is still waiting on its result.
    pub async fn spawn<F, T>(&self, task: F) -> Result<JoinHandle<T>, FetchError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let admitted = match self.saturation {
            SaturationPolicy::Reject => self.admission.clone().try_acquire_owned().map_err(|_| {
                warn!(capacity = self.capacity, "Worker pool saturated, rejecting task");
                FetchError::ResourceExhausted(format!(
                    "all {} worker and queue slots are taken",
                    self.capacity
                ))
            })?,
            SaturationPolicy::Block => self
                .admission
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| FetchError::ResourceExhausted(e.to_string()))?,
        };

        let workers = self.workers.clone();
        Ok(tokio::spawn(async move {
            let _admitted = admitted;
            // The worker semaphore is never closed, so this only waits.
            let _running = workers.acquire_owned().await;
            task.await
        }))
    }

    /// Slots (running plus queued) currently free.
    pub fn available(&self) -> usize {
        self.admission.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pool(max_workers: usize, queue_capacity: usize, saturation: SaturationPolicy) -> WorkerPool {
        WorkerPool::new(&PoolConfig {
            max_workers,
            queue_capacity,
            saturation,
        })
    }

    #[test]
    fn test_parse_saturation_policy() {
        assert_eq!("reject".parse::<SaturationPolicy>(), Ok(SaturationPolicy::Reject));
        assert_eq!(" BLOCK ".parse::<SaturationPolicy>(), Ok(SaturationPolicy::Block));
        assert!("drop".parse::<SaturationPolicy>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reject_when_saturated() {
        let pool = pool(1, 1, SaturationPolicy::Reject);
        assert_eq!(pool.capacity(), 2);

        let first = pool.spawn(tokio::time::sleep(Duration::from_secs(10))).await;
        let second = pool.spawn(tokio::time::sleep(Duration::from_secs(10))).await;
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(pool.available(), 0);

        let third = pool.spawn(async {}).await;
        assert!(matches!(third, Err(FetchError::ResourceExhausted(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_free_up_after_completion() {
        let pool = pool(1, 0, SaturationPolicy::Reject);

        let handle = pool.spawn(async { 7 }).await.unwrap();
        assert_eq!(handle.await.unwrap(), 7);
        assert_eq!(pool.available(), 1);

        assert!(pool.spawn(async {}).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_block_waits_for_a_slot() {
        let pool = pool(1, 0, SaturationPolicy::Block);

        let slow = pool
            .spawn(tokio::time::sleep(Duration::from_secs(1)))
            .await
            .unwrap();
        let start = tokio::time::Instant::now();
        let next = pool.spawn(async { "done" }).await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(1));
        slow.await.unwrap();
        assert_eq!(next.await.unwrap(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn test_workers_bound_concurrency() {
        let pool = pool(2, 10, SaturationPolicy::Reject);
        let start = tokio::time::Instant::now();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let task = async { tokio::time::sleep(Duration::from_secs(1)).await };
            handles.push(pool.spawn(task).await.unwrap());
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Four one-second tasks on two workers take two rounds.
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
