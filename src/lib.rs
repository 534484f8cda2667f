//! # dedupq
//!
//! Deduplicating work queues for work-list traversals.
//!
//! Provides a single-owner queue ([`DedupQueue`]), a thread-safe variant
//! ([`SharedDedupQueue`]), a graph walker and a line deduplicator built on
//! top of them, and OpenTelemetry observability.

pub mod config;
pub mod error;
pub mod graph;
pub mod lines;
pub mod queue;
pub mod telemetry;

pub use error::{Error, Result};
pub use queue::{DedupQueue, SharedDedupQueue};
