//! Generic in-process store built on the actor pattern.
//!
//! # Main Components
//!
//! - [`StoreEntity`] - Trait that record types implement to be kept by the store
//! - [`StoreActor`] - Generic actor that owns the records
//! - [`StoreClient`] - Type-safe, cloneable handle for talking to the actor
//! - [`StoreError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test store clients without spawning the actor.

pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use core::*;
