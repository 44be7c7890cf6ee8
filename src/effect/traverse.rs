//! Traversal drivers shared by the async stacks.
//!
//! Each driver takes the inputs and a function producing one future per
//! `(index, input)` and returns the collected results in input order. The
//! stacks differ only in how they build that per-element future (with or
//! without an environment), so they all delegate here.
//!
//! - [`sequential`]: one element at a time; stops at the first failure
//! - [`parallel`]: every element invoked before any is awaited; the first
//!   failure in index order is reported
//! - [`parallel_bounded`]: like `parallel` with at most `limit` in flight
//! - [`parallel_accumulating`]: like `parallel`, combining all failures
//! - [`sequential_with_state`]: `sequential` threading a state value

use std::future::Future;
use std::sync::Arc;

use futures::StreamExt;
use futures::future::join_all;
use futures::stream;

use crate::typeclass::Semigroup;

use super::ParallelConfig;

pub(crate) async fn sequential<T, B, E, F, Fut>(inputs: Arc<[T]>, function: F) -> Result<Vec<B>, E>
where
    T: Clone,
    F: Fn(usize, T) -> Fut,
    Fut: Future<Output = Result<B, E>>,
{
    let length = inputs.len();
    let mut results = Vec::with_capacity(length);
    for (index, input) in inputs.iter().cloned().enumerate() {
        match function(index, input).await {
            Ok(value) => results.push(value),
            Err(error) => {
                tracing::debug!(index, length, "sequential traversal short-circuited");
                return Err(error);
            }
        }
    }
    Ok(results)
}

pub(crate) async fn parallel<T, B, E, F, Fut>(inputs: Arc<[T]>, function: F) -> Result<Vec<B>, E>
where
    T: Clone,
    F: Fn(usize, T) -> Fut,
    Fut: Future<Output = Result<B, E>>,
{
    let pending: Vec<Fut> = inputs
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, input)| function(index, input))
        .collect();
    first_failure(join_all(pending).await)
}

pub(crate) async fn parallel_bounded<T, B, E, F, Fut>(
    config: ParallelConfig,
    inputs: Arc<[T]>,
    function: F,
) -> Result<Vec<B>, E>
where
    T: Clone,
    F: Fn(usize, T) -> Fut,
    Fut: Future<Output = Result<B, E>>,
{
    let Some(limit) = config.max_concurrency() else {
        return parallel(inputs, function).await;
    };
    let outcomes: Vec<Result<B, E>> = stream::iter(inputs.iter().cloned().enumerate())
        .map(|(index, input)| function(index, input))
        .buffered(limit)
        .collect()
        .await;
    first_failure(outcomes)
}

pub(crate) async fn parallel_accumulating<T, B, E, F, Fut>(
    inputs: Arc<[T]>,
    function: F,
) -> Result<Vec<B>, E>
where
    T: Clone,
    E: Semigroup,
    F: Fn(usize, T) -> Fut,
    Fut: Future<Output = Result<B, E>>,
{
    let pending: Vec<Fut> = inputs
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, input)| function(index, input))
        .collect();
    let outcomes = join_all(pending).await;

    let length = outcomes.len();
    let mut values = Vec::with_capacity(length);
    let mut failure: Option<E> = None;
    let mut failures = 0_usize;
    for outcome in outcomes {
        match outcome {
            Ok(value) => values.push(value),
            Err(error) => {
                failures += 1;
                failure = Some(match failure {
                    Some(accumulated) => accumulated.combine(error),
                    None => error,
                });
            }
        }
    }
    match failure {
        Some(error) => {
            tracing::debug!(failures, length, "parallel traversal completed with failures");
            Err(error)
        }
        None => Ok(values),
    }
}

pub(crate) async fn sequential_with_state<T, S, B, E, F, Fut>(
    inputs: Arc<[T]>,
    initial_state: S,
    function: F,
) -> Result<(Vec<B>, S), E>
where
    T: Clone,
    F: Fn(usize, T, S) -> Fut,
    Fut: Future<Output = Result<(B, S), E>>,
{
    let length = inputs.len();
    let mut results = Vec::with_capacity(length);
    let mut state = initial_state;
    for (index, input) in inputs.iter().cloned().enumerate() {
        match function(index, input, state).await {
            Ok((value, next_state)) => {
                results.push(value);
                state = next_state;
            }
            Err(error) => {
                tracing::debug!(index, length, "sequential traversal short-circuited");
                return Err(error);
            }
        }
    }
    Ok((results, state))
}

fn first_failure<B, E>(outcomes: Vec<Result<B, E>>) -> Result<Vec<B>, E> {
    let failures = outcomes.iter().filter(|outcome| outcome.is_err()).count();
    if failures > 0 {
        tracing::debug!(
            failures,
            length = outcomes.len(),
            "parallel traversal completed with failures"
        );
    }
    outcomes.into_iter().collect()
}
