//! Deduplicating work queues.
//!
//! A queue accepts an element only if the key derived from it has never
//! been seen by that queue before. Keys are never forgotten: once an element
//! has been enqueued, no element with an equal key can be enqueued again for
//! the lifetime of the queue, even after the first one was dequeued.
//!
//! [`DedupQueue`] is single-owner and mutated through `&mut self`.
//! [`SharedDedupQueue`] is the thread-safe variant.

pub mod shared;

pub use shared::SharedDedupQueue;

use std::collections::{HashSet, VecDeque};
use std::fmt;

use opentelemetry::KeyValue;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::telemetry::{metrics, queue as queue_span};

/// Name used for queues that were not given one.
pub const DEFAULT_QUEUE_NAME: &str = "default";

/// Derives the deduplication key of an element.
type KeyFn<T> = Box<dyn Fn(&T) -> String>;

/// A FIFO work queue that silently drops elements whose key was already seen.
pub struct DedupQueue<T> {
    name: String,
    key_fn: KeyFn<T>,
    queue: VecDeque<T>,
    seen: HashSet<String>,
}

impl<T> DedupQueue<T> {
    /// Create a queue preloaded with `initial`, in order.
    ///
    /// Initial elements are all kept, even when two of them share a key.
    /// Their keys are registered as they are loaded, so a later
    /// [`enqueue`](Self::enqueue) of an equal-key element is dropped.
    pub fn new<F, I>(key_fn: F, initial: I) -> Self
    where
        F: Fn(&T) -> String + 'static,
        I: IntoIterator<Item = T>,
    {
        let mut this = Self {
            name: DEFAULT_QUEUE_NAME.to_string(),
            key_fn: Box::new(key_fn),
            queue: VecDeque::new(),
            seen: HashSet::new(),
        };
        for element in initial {
            let key = (this.key_fn)(&element);
            trace!(queue = %this.name, key = %key, "preloading");
            this.seen.insert(key);
            this.queue.push_back(element);
        }
        this
    }

    /// Create an empty queue.
    pub fn empty<F>(key_fn: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        Self::new(key_fn, std::iter::empty())
    }

    /// Set the name used in logs and metrics.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an element to the back of the queue unless its key was seen.
    ///
    /// Returns `true` if the element was accepted. A dropped duplicate is
    /// not an error.
    pub fn enqueue(&mut self, element: T) -> bool {
        let key = (self.key_fn)(&element);
        trace!(queue = %self.name, key = %key, "enqueuing");

        if self.seen.contains(&key) {
            trace!(queue = %self.name, key = %key, "skipped, already seen");
            metrics::queue_skipped().add(1, &[KeyValue::new("queue", self.name.clone())]);
            return false;
        }

        self.queue.push_back(element);
        self.seen.insert(key);
        metrics::queue_enqueued().add(1, &[KeyValue::new("queue", self.name.clone())]);
        true
    }

    /// Remove the element at the front of the queue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyQueue`] if there is nothing to remove.
    pub fn dequeue(&mut self) -> Result<T> {
        self.pop().ok_or(Error::EmptyQueue)
    }

    fn pop(&mut self) -> Option<T> {
        let element = self.queue.pop_front()?;
        trace!(queue = %self.name, remaining = self.queue.len(), "popped from queue");
        metrics::queue_dequeued().add(1, &[KeyValue::new("queue", self.name.clone())]);
        Some(element)
    }

    pub fn is_not_empty(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of elements currently queued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Has an element with this key ever been accepted?
    pub fn has_seen(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Number of distinct keys ever accepted.
    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }

    /// Drain the queue, handing each element to `action`.
    ///
    /// `action` receives the queue itself and may enqueue follow-up work;
    /// those elements are drained by the same loop. Returns the number of
    /// elements processed. There is no iteration bound: an action that keeps
    /// producing new keys keeps the loop running.
    pub fn process<F>(&mut self, mut action: F) -> usize
    where
        F: FnMut(&mut Self, T),
    {
        let span = queue_span::start_process_span(&self.name);
        let _entered = span.enter();

        let mut drained = 0;
        while let Some(element) = self.pop() {
            action(self, element);
            drained += 1;
        }

        queue_span::record_drained(&span, drained);
        debug!(queue = %self.name, drained, "queue drained");
        drained
    }

    /// Like [`process`](Self::process), but stops at the first action error.
    ///
    /// The failing element is consumed; elements behind it stay queued.
    ///
    /// # Errors
    ///
    /// Returns the action's error unchanged.
    pub fn try_process<F, E>(&mut self, mut action: F) -> std::result::Result<usize, E>
    where
        F: FnMut(&mut Self, T) -> std::result::Result<(), E>,
    {
        let span = queue_span::start_process_span(&self.name);
        let _entered = span.enter();

        let mut drained = 0;
        while let Some(element) = self.pop() {
            drained += 1;
            if let Err(e) = action(self, element) {
                queue_span::record_drained(&span, drained);
                debug!(queue = %self.name, drained, remaining = self.len(), "processing stopped by action error");
                return Err(e);
            }
        }

        queue_span::record_drained(&span, drained);
        debug!(queue = %self.name, drained, "queue drained");
        Ok(drained)
    }
}

impl<T> Extend<T> for DedupQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.enqueue(element);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DedupQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DedupQueue")
            .field("name", &self.name)
            .field("queue", &self.queue)
            .field("seen", &self.seen.len())
            .finish_non_exhaustive()
    }
}
