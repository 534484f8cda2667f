//! Metric instrument factories for dedupq.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"dedupq"` meter. Without a
//! registered provider they are no-ops.

use opentelemetry::metrics::{Counter, Meter};

/// Returns the shared meter for dedupq instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("dedupq")
}

/// Counter: elements accepted into a queue.
/// Labels: `queue`.
pub fn queue_enqueued() -> Counter<u64> {
    meter()
        .u64_counter("dedupq.queue.enqueued")
        .with_description("Number of elements accepted into a queue")
        .build()
}

/// Counter: elements dropped because their key was already seen.
/// Labels: `queue`.
pub fn queue_skipped() -> Counter<u64> {
    meter()
        .u64_counter("dedupq.queue.skipped")
        .with_description("Number of duplicate elements dropped")
        .build()
}

/// Counter: elements removed from a queue.
/// Labels: `queue`.
pub fn queue_dequeued() -> Counter<u64> {
    meter()
        .u64_counter("dedupq.queue.dequeued")
        .with_description("Number of elements removed from a queue")
        .build()
}
