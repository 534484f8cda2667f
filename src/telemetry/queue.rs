//! Queue processing span helpers.

use tracing::Span;

/// Start a span covering one `process` drain loop.
///
/// The `queue.drained` field is declared empty and filled in by
/// [`record_drained`].
pub fn start_process_span(queue: &str) -> Span {
    tracing::debug_span!(
        "queue.process",
        "queue.name" = queue,
        "queue.drained" = tracing::field::Empty,
    )
}

/// Record how many elements a drain loop processed.
pub fn record_drained(span: &Span, drained: usize) {
    span.record("queue.drained", drained as u64);
}
