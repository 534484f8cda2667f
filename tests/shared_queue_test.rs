//! Integration tests for the thread-safe dedup queue.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use dedupq::{Error, SharedDedupQueue};

fn string_queue(initial: &[&str]) -> SharedDedupQueue<String> {
    SharedDedupQueue::new(
        |s: &String| s.clone(),
        initial.iter().map(|s| s.to_string()),
    )
}

#[test]
fn single_thread_behaves_like_the_owned_queue() {
    let queue = string_queue(&["x", "y"]);
    assert!(!queue.enqueue("x".to_string()));
    assert_eq!(queue.len(), 2);

    assert_eq!(queue.dequeue().unwrap(), "x");
    assert!(queue.enqueue("z".to_string()));

    let mut order = Vec::new();
    queue.process(|_, s| order.push(s));
    assert_eq!(order, ["y", "z"]);
    assert!(!queue.is_not_empty());
    assert!(matches!(queue.dequeue(), Err(Error::EmptyQueue)));
}

#[test]
fn racing_enqueues_of_one_key_accept_exactly_one() {
    let queue = string_queue(&[]);
    let accepted = AtomicUsize::new(0);

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..100 {
                    if queue.enqueue("same".to_string()) {
                        accepted.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    assert_eq!(accepted.load(Ordering::Relaxed), 1);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.seen_len(), 1);
}

#[test]
fn concurrent_producers_with_overlapping_keys() {
    let queue = SharedDedupQueue::empty(|n: &u32| n.to_string());

    std::thread::scope(|s| {
        for t in 0..4u32 {
            let queue = &queue;
            s.spawn(move || {
                // Threads overlap on half their range.
                for n in (t * 50)..(t * 50 + 100) {
                    queue.enqueue(n);
                }
            });
        }
    });

    assert_eq!(queue.len(), 250);
    let mut drained = Vec::new();
    queue.process(|_, n| drained.push(n));
    drained.sort_unstable();
    assert_eq!(drained, (0..250).collect::<Vec<_>>());
}

#[test]
fn cooperative_drain_visits_each_element_once() {
    let queue = SharedDedupQueue::new(|n: &u32| n.to_string(), 0..1000u32);
    let visited = Mutex::new(Vec::new());

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                queue.process(|_, n| visited.lock().unwrap().push(n));
            });
        }
    });

    let mut visited = visited.into_inner().unwrap();
    visited.sort_unstable();
    assert_eq!(visited, (0..1000).collect::<Vec<_>>());
    assert!(queue.is_empty());
}

#[test]
fn process_drains_follow_up_work() {
    let queue = SharedDedupQueue::new(|n: &u32| n.to_string(), [1u32]);
    let drained = queue.process(|queue, n| {
        if n < 64 {
            queue.enqueue(n * 2);
            queue.enqueue(n * 2 + 1);
        }
    });
    // 1..=127 is exactly the set of reachable values.
    assert_eq!(drained, 127);
    assert!(queue.has_seen("127"));
    assert!(!queue.has_seen("128"));
}
