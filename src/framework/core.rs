//! # Core Store Actor
//!
//! This module defines the generic building blocks for the in-process key-value store.
//!
//! ## Key Types
//!
//! - [`StoreEntity`]: The trait that all stored record types must implement.
//! - [`StoreActor`]: The generic actor that owns the records.
//! - [`StoreClient`]: The generic client for communicating with the actor.
//! - [`StoreError`]: Common errors (e.g., ActorClosed, NotFound).

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any record must implement to be kept by a [`StoreActor`].
///
/// # Architecture Note
/// The store never inspects a record beyond its id. Records arrive without an id
/// the first time they are saved; the actor assigns one through its id generator
/// and hands the record back with the id filled in.
pub trait StoreEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this record (e.g., String, Uuid, u64).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The id of this record, if it has been persisted before.
    fn id(&self) -> Option<&Self::Id>;

    /// Returns the record with its id set to `id`.
    fn with_id(self, id: Self::Id) -> Self;
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the store itself.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("Store actor closed")]
    ActorClosed,
    #[error("Store actor dropped response channel")]
    ActorDropped,
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Predicate used by [`StoreRequest::FindWhere`].
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Internal message type sent to the actor to request operations.
///
/// The variants map onto the repository operations of a document store:
/// save (insert or overwrite), lookup by id, filtered scan, full scan, delete and count.
pub enum StoreRequest<T: StoreEntity> {
    Save {
        record: T,
        respond_to: Response<T>,
    },
    FindById {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    FindWhere {
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
    FindAll {
        respond_to: Response<Vec<T>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Count {
        respond_to: Response<usize>,
    },
}

impl<T: StoreEntity> Debug for StoreRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreRequest::Save { record, .. } => write!(f, "Save({:?})", record.id()),
            StoreRequest::FindById { id, .. } => write!(f, "FindById({id})"),
            StoreRequest::FindWhere { .. } => write!(f, "FindWhere"),
            StoreRequest::FindAll { .. } => write!(f, "FindAll"),
            StoreRequest::Delete { id, .. } => write!(f, "Delete({id})"),
            StoreRequest::Count { .. } => write!(f, "Count"),
        }
    }
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that owns a collection of records.
///
/// # Architecture Note
/// This struct is the "Server" half of the store. It owns the state (`records`) and
/// the receiver end of the channel, and processes requests *sequentially*, so the
/// map needs no lock. Records are kept in insertion order for `FindAll`.
pub struct StoreActor<T: StoreEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    records: HashMap<T::Id, T>,
    insertion_order: Vec<T::Id>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: StoreEntity> StoreActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: HashMap::new(),
            insertion_order: Vec::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = StoreClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "CustomerOrder" instead of the full path)
        let record_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(record_type, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Save { record, respond_to } => {
                    let (id, record) = match record.id().cloned() {
                        Some(id) => (id, record),
                        None => {
                            let id = (self.next_id_fn)();
                            (id.clone(), record.with_id(id))
                        }
                    };
                    if self.records.insert(id.clone(), record.clone()).is_none() {
                        self.insertion_order.push(id.clone());
                        info!(record_type, %id, size = self.records.len(), "Inserted");
                    } else {
                        info!(record_type, %id, "Overwritten");
                    }
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::FindById { id, respond_to } => {
                    let record = self.records.get(&id).cloned();
                    debug!(record_type, %id, found = record.is_some(), "FindById");
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::FindWhere { filter, respond_to } => {
                    let matches: Vec<T> = self
                        .ordered()
                        .filter(|record| filter(record))
                        .cloned()
                        .collect();
                    debug!(record_type, matched = matches.len(), "FindWhere");
                    let _ = respond_to.send(Ok(matches));
                }
                StoreRequest::FindAll { respond_to } => {
                    let all: Vec<T> = self.ordered().cloned().collect();
                    debug!(record_type, size = all.len(), "FindAll");
                    let _ = respond_to.send(Ok(all));
                }
                StoreRequest::Delete { id, respond_to } => {
                    if self.records.remove(&id).is_some() {
                        self.insertion_order.retain(|existing| existing != &id);
                        info!(record_type, %id, size = self.records.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(record_type, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                    }
                }
                StoreRequest::Count { respond_to } => {
                    let _ = respond_to.send(Ok(self.records.len()));
                }
            }
        }

        info!(record_type, size = self.records.len(), "Shutdown");
    }

    fn ordered(&self) -> impl Iterator<Item = &T> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.records.get(id))
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a [`StoreActor`].
///
/// Holds only a sender, so cloning is cheap.
pub struct StoreClient<T: StoreEntity> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: StoreEntity> Clone for StoreClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: StoreEntity> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn save(&self, record: T) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Save { record, respond_to })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn find_by_id(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::FindById { id, respond_to })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn find_where(
        &self,
        filter: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::FindWhere {
                filter: Box::new(filter),
                respond_to,
            })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::FindAll { respond_to })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Delete { id, respond_to })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Count { respond_to })
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: Option<String>,
        owner: String,
        body: String,
    }

    impl Note {
        fn new(owner: &str, body: &str) -> Self {
            Self {
                id: None,
                owner: owner.into(),
                body: body.into(),
            }
        }
    }

    impl StoreEntity for Note {
        type Id = String;

        fn id(&self) -> Option<&String> {
            self.id.as_ref()
        }

        fn with_id(self, id: String) -> Self {
            Self { id: Some(id), ..self }
        }
    }

    fn start() -> StoreClient<Note> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("note_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = StoreActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_store_lifecycle() {
        let client = start();

        // 1. Save assigns ids
        let first = client.save(Note::new("ann", "hello")).await.unwrap();
        let second = client.save(Note::new("bob", "hi")).await.unwrap();
        assert_eq!(first.id.as_deref(), Some("note_1"));
        assert_eq!(second.id.as_deref(), Some("note_2"));

        // 2. Lookups
        let found = client.find_by_id("note_1".into()).await.unwrap().unwrap();
        assert_eq!(found.body, "hello");
        let anns = client.find_where(|n: &Note| n.owner == "ann").await.unwrap();
        assert_eq!(anns, vec![first.clone()]);

        // 3. Saving with an id overwrites
        let edited = Note {
            body: "hello again".into(),
            ..first.clone()
        };
        client.save(edited).await.unwrap();
        assert_eq!(client.count().await.unwrap(), 2);
        let all = client.find_all().await.unwrap();
        assert_eq!(all[0].body, "hello again");
        assert_eq!(all[1].owner, "bob");

        // 4. Delete
        client.delete("note_1".into()).await.unwrap();
        assert_eq!(client.count().await.unwrap(), 1);
        assert!(client.find_by_id("note_1".into()).await.unwrap().is_none());
        assert_eq!(
            client.delete("note_1".into()).await,
            Err(StoreError::NotFound("note_1".into()))
        );
    }

    #[tokio::test]
    async fn test_closed_store_reports_actor_closed() {
        let (actor, client) = StoreActor::<Note>::new(1, || "unused".to_string());
        drop(actor);

        assert_eq!(client.count().await, Err(StoreError::ActorClosed));
    }
}
