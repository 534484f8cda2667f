//! Thread-safe deduplicating queue.
//!
//! The seen-key set is a `DashSet`, whose `insert` is an atomic
//! insert-if-absent, so racing producers with equal keys cannot both win.
//! The queue itself is an unbounded crossbeam channel; the instance holds
//! both ends, so it is never disconnected.

use crossbeam_channel::{Receiver, Sender};
use dashmap::DashSet;
use opentelemetry::KeyValue;
use tracing::{debug, trace};

use super::DEFAULT_QUEUE_NAME;
use crate::error::{Error, Result};
use crate::telemetry::{metrics, queue as queue_span};

type KeyFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// A deduplicating FIFO queue usable from many threads through `&self`.
pub struct SharedDedupQueue<T> {
    name: String,
    key_fn: KeyFn<T>,
    tx: Sender<T>,
    rx: Receiver<T>,
    seen: DashSet<String>,
}

impl<T> SharedDedupQueue<T> {
    /// Create a queue preloaded with `initial`, in order.
    ///
    /// Same preload policy as [`DedupQueue::new`](super::DedupQueue::new):
    /// every initial element is kept and its key registered.
    pub fn new<F, I>(key_fn: F, initial: I) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
    {
        let (tx, rx) = crossbeam_channel::unbounded();
        let this = Self {
            name: DEFAULT_QUEUE_NAME.to_string(),
            key_fn: Box::new(key_fn),
            tx,
            rx,
            seen: DashSet::new(),
        };
        for element in initial {
            this.seen.insert((this.key_fn)(&element));
            this.push(element);
        }
        this
    }

    pub fn empty<F>(key_fn: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
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

    fn push(&self, element: T) {
        // Cannot fail: `self.rx` keeps the channel connected.
        let _ = self.tx.send(element);
    }

    /// Add an element unless its key was seen. Returns `true` if accepted.
    ///
    /// Of several concurrent calls with equal keys, exactly one returns `true`.
    pub fn enqueue(&self, element: T) -> bool {
        let key = (self.key_fn)(&element);
        trace!(queue = %self.name, key = %key, "enqueuing");

        if !self.seen.insert(key.clone()) {
            trace!(queue = %self.name, key = %key, "skipped, already seen");
            metrics::queue_skipped().add(1, &[KeyValue::new("queue", self.name.clone())]);
            return false;
        }

        self.push(element);
        metrics::queue_enqueued().add(1, &[KeyValue::new("queue", self.name.clone())]);
        true
    }

    /// Remove the element at the front of the queue without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyQueue`] if there is nothing to remove.
    pub fn dequeue(&self) -> Result<T> {
        self.pop().ok_or(Error::EmptyQueue)
    }

    fn pop(&self) -> Option<T> {
        let element = self.rx.try_recv().ok()?;
        trace!(queue = %self.name, "popped from queue");
        metrics::queue_dequeued().add(1, &[KeyValue::new("queue", self.name.clone())]);
        Some(element)
    }

    pub fn is_not_empty(&self) -> bool {
        !self.rx.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn has_seen(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }

    /// Drain the queue, handing each element to `action`.
    ///
    /// Several threads may call this on one instance to drain it together;
    /// each element goes to exactly one of them. A thread returns as soon as
    /// it finds the queue empty, even if another thread's action is about to
    /// enqueue more. Returns the number of elements this call processed.
    pub fn process<F>(&self, mut action: F) -> usize
    where
        F: FnMut(&Self, T),
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
}

impl<T> std::fmt::Debug for SharedDedupQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDedupQueue")
            .field("name", &self.name)
            .field("len", &self.rx.len())
            .field("seen", &self.seen.len())
            .finish_non_exhaustive()
    }
}
