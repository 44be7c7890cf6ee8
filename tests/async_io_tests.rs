#![cfg(feature = "async")]
//! Integration tests for AsyncIO execution semantics.

use futures::future;
use lamina::control::Either;
use lamina::effect::{AsyncIO, Race};
use lamina::typeclass::{Monoid, Semigroup};
use rstest::rstest;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::task::Poll;
use std::time::Duration;

// =============================================================================
// Deferred Execution
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_run_twice_executes_effects_twice() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let io = AsyncIO::from_fn(move || counter.fetch_add(1, Ordering::SeqCst) + 1);

    assert_eq!(runs.load(Ordering::SeqCst), 0);
    assert_eq!(io.run_async().await, 1);
    assert_eq!(io.run_async().await, 2);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn test_construction_does_not_run_effects() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let _composed = AsyncIO::from_fn(move || counter.fetch_add(1, Ordering::SeqCst))
        .fmap(|count| count * 2)
        .flat_map(AsyncIO::pure);

    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn test_tail_rec_m_does_not_grow_stack() {
    let countdown = AsyncIO::tail_rec_m(1_000_000_u64, |remaining| {
        AsyncIO::pure(if remaining == 0 {
            Either::Right("done")
        } else {
            Either::Left(remaining - 1)
        })
    });

    assert_eq!(countdown.await, "done");
}

// =============================================================================
// Timing
// =============================================================================

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_delay_waits_before_running() {
    let start = tokio::time::Instant::now();
    let value = AsyncIO::pure(1).delay(Duration::from_millis(250)).await;

    assert_eq!(value, 1);
    assert!(start.elapsed() >= Duration::from_millis(250));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_map2_par_overlaps_waits() {
    let start = tokio::time::Instant::now();
    let slow = AsyncIO::pure(1).delay(Duration::from_millis(100));
    let slower = AsyncIO::pure(2).delay(Duration::from_millis(100));
    let sum = slow.map2_par(slower, |a, b| a + b).await;

    assert_eq!(sum, 3);
    assert!(start.elapsed() < Duration::from_millis(200));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_race_returns_first_settled() {
    let slow = AsyncIO::pure("slow").delay(Duration::from_millis(100));
    let fast = AsyncIO::pure("fast").delay(Duration::from_millis(10));

    assert_eq!(slow.race(fast).await, "fast");
}

fn yield_once() -> impl Future<Output = ()> {
    let mut yielded = false;
    future::poll_fn(move |context| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            context.waker().wake_by_ref();
            Poll::Pending
        }
    })
}

#[rstest]
fn test_race_outside_tokio_still_completes_loser() {
    let (sender, receiver) = mpsc::channel();
    let slow = AsyncIO::new(move || {
        let sender = sender.clone();
        async move {
            yield_once().await;
            sender.send("loser finished").ok();
            1
        }
    });

    let winner = futures::executor::block_on(slow.race(AsyncIO::pure(2)).run_async());

    assert_eq!(winner, 2);
    assert_eq!(receiver.recv_timeout(Duration::from_secs(5)), Ok("loser finished"));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_race_monoid_identity() {
    let value = Race(AsyncIO::pure(5).delay(Duration::from_millis(5)));
    let left_identity = Race::empty().combine(value.clone()).into_inner().await;
    let right_identity = value.combine(Race::empty()).into_inner().await;

    assert_eq!(left_identity, 5);
    assert_eq!(right_identity, 5);
}

// =============================================================================
// Traversal
// =============================================================================

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_traverse_par_invokes_all_before_awaiting() {
    let start = tokio::time::Instant::now();
    let traversal = AsyncIO::traverse_par_with_index(vec![50_u64, 50, 50], |index, delay| {
        AsyncIO::pure(index).delay(Duration::from_millis(delay))
    });

    assert_eq!(traversal.await, vec![0, 1, 2]);
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_traverse_sequential_runs_one_at_a_time() {
    let start = tokio::time::Instant::now();
    let traversal = AsyncIO::traverse_with_index(vec![50_u64, 50, 50], |index, delay| {
        AsyncIO::pure(index).delay(Duration::from_millis(delay))
    });

    assert_eq!(traversal.await, vec![0, 1, 2]);
    assert!(start.elapsed() >= Duration::from_millis(150));
}
