//! `AsyncResult` - an asynchronous computation that may fail.
//!
//! `AsyncResult<A, E>` is `AsyncIO<Result<A, E>>` with combinators that
//! see through the `Result`: `fmap` and `flat_map` act on the success value
//! and leave failures untouched, `map_error` and `catch_error` act on the
//! failure.
//!
//! # Examples
//!
//! ```rust
//! use lamina::effect::AsyncResult;
//!
//! fn parse(input: &'static str) -> AsyncResult<i32, String> {
//!     AsyncResult::from_result(input.parse::<i32>().map_err(|error| error.to_string()))
//! }
//!
//! let doubled = parse("21").fmap(|n| n * 2);
//! assert_eq!(futures::executor::block_on(doubled.run_async()), Ok(42));
//!
//! let recovered = parse("x").catch_error(|_| AsyncResult::<i32, String>::pure(0));
//! assert_eq!(futures::executor::block_on(recovered.run_async()), Ok(0));
//! ```

use std::future::{Future, IntoFuture};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};

use crate::control::to_result;
use crate::typeclass::Semigroup;

use super::{AsyncIO, PanicError, ParallelConfig, traverse};

/// An asynchronous computation producing `Result<A, E>`.
pub struct AsyncResult<A, E> {
    io: AsyncIO<Result<A, E>>,
}

impl<A, E> Clone for AsyncResult<A, E> {
    fn clone(&self) -> Self {
        Self {
            io: self.io.clone(),
        }
    }
}

impl<A, E> AsyncResult<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
{
    /// Creates an `AsyncResult` from a function producing a future.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<A, E>> + Send + 'static,
    {
        Self {
            io: AsyncIO::new(action),
        }
    }

    /// Wraps an `AsyncIO` that already yields a `Result`.
    pub const fn from_async_io(io: AsyncIO<Result<A, E>>) -> Self {
        Self { io }
    }

    /// Unwraps into the underlying `AsyncIO`.
    pub fn into_async_io(self) -> AsyncIO<Result<A, E>> {
        self.io
    }

    /// Lifts a ready `Result`.
    pub fn from_result(result: Result<A, E>) -> Self
    where
        A: Clone + Sync,
        E: Clone + Sync,
    {
        Self::from_async_io(AsyncIO::pure(result))
    }

    /// Lifts an `Option`, failing with `on_none()` when it is `None`.
    ///
    /// `on_none` is called only for `None`.
    pub fn from_option<F>(option: Option<A>, on_none: F) -> Self
    where
        A: Clone + Sync,
        E: Clone + Sync,
        F: FnOnce() -> E,
    {
        Self::from_result(to_result(option, on_none))
    }

    /// Succeeds with `value`.
    pub fn pure(value: A) -> Self
    where
        A: Clone + Sync,
    {
        Self::new(move || future::ready(Ok(value.clone())))
    }

    /// Alias for `pure`.
    pub fn succeed(value: A) -> Self
    where
        A: Clone + Sync,
    {
        Self::pure(value)
    }

    /// Fails with `error`.
    pub fn fail(error: E) -> Self
    where
        E: Clone + Sync,
    {
        Self::new(move || future::ready(Err(error.clone())))
    }

    /// Lifts an `AsyncIO` as the success branch.
    pub fn right_async(io: AsyncIO<A>) -> Self {
        Self::from_async_io(io.fmap(Ok))
    }

    /// Lifts an `AsyncIO` as the failure branch.
    pub fn left_async(io: AsyncIO<E>) -> Self {
        Self::from_async_io(io.fmap(Err))
    }

    /// Runs `producer`, turning a panic into a typed failure.
    ///
    /// Panics raised while creating or polling the future are caught,
    /// converted to [`PanicError`] and passed through `on_panic`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::AsyncResult;
    ///
    /// let failing: AsyncResult<i32, String> = AsyncResult::try_catch(
    ///     || async { panic!("connection reset") },
    ///     |error| error.message().to_string(),
    /// );
    /// let outcome = futures::executor::block_on(failing.run_async());
    /// assert_eq!(outcome, Err("connection reset".to_string()));
    /// ```
    pub fn try_catch<P, Fut, H>(producer: P, on_panic: H) -> Self
    where
        P: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = A> + Send + 'static,
        H: Fn(PanicError) -> E + Send + Sync + 'static,
    {
        let producer = Arc::new(producer);
        let on_panic = Arc::new(on_panic);
        Self::new(move || {
            let producer = Arc::clone(&producer);
            let on_panic = Arc::clone(&on_panic);
            async move {
                match AssertUnwindSafe(async move { producer().await })
                    .catch_unwind()
                    .await
                {
                    Ok(value) => Ok(value),
                    Err(payload) => {
                        let error = PanicError::from_payload(payload.as_ref());
                        tracing::debug!(
                            panic_message = error.message(),
                            "converted panic into failure"
                        );
                        Err(on_panic(error))
                    }
                }
            }
        })
    }

    /// Invokes the computation, returning a fresh future.
    pub fn run_async(&self) -> BoxFuture<'static, Result<A, E>> {
        self.io.run_async()
    }

    /// Maps the success value.
    pub fn fmap<B, F>(self, function: F) -> AsyncResult<B, E>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        AsyncResult::from_async_io(self.io.fmap(move |result| result.map(&function)))
    }

    /// Maps the failure value.
    pub fn map_error<E2, F>(self, function: F) -> AsyncResult<A, E2>
    where
        F: Fn(E) -> E2 + Send + Sync + 'static,
        E2: Send + 'static,
    {
        AsyncResult::from_async_io(self.io.fmap(move |result| result.map_err(&function)))
    }

    /// Maps whichever branch is populated.
    pub fn map_both<E2, B, F, G>(self, error_function: F, value_function: G) -> AsyncResult<B, E2>
    where
        F: Fn(E) -> E2 + Send + Sync + 'static,
        G: Fn(A) -> B + Send + Sync + 'static,
        E2: Send + 'static,
        B: Send + 'static,
    {
        AsyncResult::from_async_io(self.io.fmap(move |result| match result {
            Ok(value) => Ok(value_function(value)),
            Err(error) => Err(error_function(error)),
        }))
    }

    /// Chains a fallible computation on the success value.
    ///
    /// On failure `function` is never called.
    pub fn flat_map<B, F>(self, function: F) -> AsyncResult<B, E>
    where
        F: Fn(A) -> AsyncResult<B, E> + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        let io = self.io;
        AsyncResult::new(move || {
            let first = io.run_async();
            let function = Arc::clone(&function);
            async move {
                match first.await {
                    Ok(value) => {
                        let next = function(value);
                        next.run_async().await
                    }
                    Err(error) => Err(error),
                }
            }
        })
    }

    /// Alias for `flat_map`.
    pub fn and_then<B, F>(self, function: F) -> AsyncResult<B, E>
    where
        F: Fn(A) -> AsyncResult<B, E> + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.flat_map(function)
    }

    /// `flat_map` across different error types, widening both into `EW`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::AsyncResult;
    ///
    /// #[derive(Debug, PartialEq)]
    /// enum AppError { Parse(String), Lookup(u32) }
    ///
    /// impl From<String> for AppError {
    ///     fn from(message: String) -> Self { AppError::Parse(message) }
    /// }
    /// impl From<u32> for AppError {
    ///     fn from(id: u32) -> Self { AppError::Lookup(id) }
    /// }
    ///
    /// let parsed: AsyncResult<u32, String> = AsyncResult::pure(7);
    /// let looked_up = parsed.flat_map_w::<&str, u32, AppError, _>(|id| AsyncResult::fail(id));
    /// let outcome = futures::executor::block_on(looked_up.run_async());
    /// assert_eq!(outcome, Err(AppError::Lookup(7)));
    /// ```
    pub fn flat_map_w<B, E2, EW, F>(self, function: F) -> AsyncResult<B, EW>
    where
        F: Fn(A) -> AsyncResult<B, E2> + Send + Sync + 'static,
        B: Send + 'static,
        E: Into<EW>,
        E2: Into<EW> + Send + 'static,
        EW: Send + 'static,
    {
        self.map_error(Into::into)
            .flat_map(move |value| function(value).map_error(Into::into))
    }

    /// Runs `that` if `self` fails; otherwise keeps the success.
    #[must_use]
    pub fn or_else(self, that: Self) -> Self {
        self.catch_error(move |_| that.clone())
    }

    /// Recovers from a failure with a new computation.
    ///
    /// `handler` is called only on failure.
    pub fn catch_error<E2, F>(self, handler: F) -> AsyncResult<A, E2>
    where
        F: Fn(E) -> AsyncResult<A, E2> + Send + Sync + 'static,
        E2: Send + 'static,
    {
        let handler = Arc::new(handler);
        let io = self.io;
        AsyncResult::new(move || {
            let first = io.run_async();
            let handler = Arc::clone(&handler);
            async move {
                match first.await {
                    Ok(value) => Ok(value),
                    Err(error) => {
                        let recovery = handler(error);
                        recovery.run_async().await
                    }
                }
            }
        })
    }

    /// Collapses both branches into one value.
    pub fn fold<T, F, G>(self, on_failure: F, on_success: G) -> AsyncIO<T>
    where
        F: Fn(E) -> T + Send + Sync + 'static,
        G: Fn(A) -> T + Send + Sync + 'static,
        T: Send + 'static,
    {
        self.io.fmap(move |result| match result {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        })
    }

    /// Applies a fallible function to a fallible value, sequentially.
    ///
    /// `function_result` runs first; if it fails, `self` is never invoked.
    pub fn apply<B, F>(self, function_result: AsyncResult<F, E>) -> AsyncResult<B, E>
    where
        F: Fn(A) -> B + Send + 'static,
        B: Send + 'static,
    {
        AsyncResult::new(move || {
            let function_future = function_result.run_async();
            let value = self.clone();
            async move {
                match function_future.await {
                    Ok(function) => value.run_async().await.map(function),
                    Err(error) => Err(error),
                }
            }
        })
    }

    /// Parallel `apply`: both sides are invoked before either is awaited.
    ///
    /// If both fail, the function's failure is reported.
    pub fn apply_par<B, F>(self, function_result: AsyncResult<F, E>) -> AsyncResult<B, E>
    where
        F: Fn(A) -> B + Send + 'static,
        B: Send + 'static,
    {
        AsyncResult::new(move || {
            let function_future = function_result.run_async();
            let value_future = self.run_async();
            async move {
                match future::join(function_future, value_future).await {
                    (Ok(function), Ok(value)) => Ok(function(value)),
                    (Err(error), _) | (_, Err(error)) => Err(error),
                }
            }
        })
    }

    /// Acquires a resource, uses it, and always releases it.
    ///
    /// 1. If `acquire` fails, its failure is returned; `use_resource` and
    ///    `release` are not run.
    /// 2. Otherwise `use_resource(resource)` runs and its outcome is kept.
    /// 3. `release(resource, &outcome)` then runs exactly once.
    ///
    /// A failing use wins over a failing release, and a failing release
    /// wins over a successful use.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::AsyncResult;
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    ///
    /// let releases = Arc::new(AtomicUsize::new(0));
    /// let counter = Arc::clone(&releases);
    /// let program: AsyncResult<i32, String> = AsyncResult::bracket(
    ///     AsyncResult::pure("handle"),
    ///     |_handle| AsyncResult::fail("x".to_string()),
    ///     move |_handle, _outcome| {
    ///         counter.fetch_add(1, Ordering::SeqCst);
    ///         AsyncResult::pure(())
    ///     },
    /// );
    ///
    /// assert_eq!(futures::executor::block_on(program.run_async()), Err("x".to_string()));
    /// assert_eq!(releases.load(Ordering::SeqCst), 1);
    /// ```
    pub fn bracket<Resource, Use, Release>(
        acquire: AsyncResult<Resource, E>,
        use_resource: Use,
        release: Release,
    ) -> Self
    where
        Resource: Clone + Send + 'static,
        Use: Fn(Resource) -> Self + Send + Sync + 'static,
        Release: Fn(Resource, &Result<A, E>) -> AsyncResult<(), E> + Send + Sync + 'static,
    {
        let use_resource = Arc::new(use_resource);
        let release = Arc::new(release);
        Self::new(move || {
            let acquisition = acquire.run_async();
            let use_resource = Arc::clone(&use_resource);
            let release = Arc::clone(&release);
            async move {
                let resource = match acquisition.await {
                    Ok(resource) => resource,
                    Err(error) => {
                        tracing::debug!("bracket acquisition failed; use and release skipped");
                        return Err(error);
                    }
                };
                let usage = use_resource(resource.clone());
                let outcome = usage.run_async().await;
                let releasing = release(resource, &outcome);
                let released = releasing.run_async().await;
                settle_bracket(outcome, released)
            }
        })
    }
}

pub(crate) fn settle_bracket<A, E>(outcome: Result<A, E>, released: Result<(), E>) -> Result<A, E> {
    match (outcome, released) {
        (outcome, Ok(())) => outcome,
        (Err(error), Err(_)) => {
            tracing::warn!("bracket release failed after a failed use; release failure discarded");
            Err(error)
        }
        (Ok(_), Err(error)) => {
            tracing::debug!("bracket release failed after a successful use");
            Err(error)
        }
    }
}

// =============================================================================
// Traversal
// =============================================================================

impl<B, E> AsyncResult<Vec<B>, E>
where
    B: Send + 'static,
    E: Send + 'static,
{
    /// Runs `function(index, input)` one element at a time in index order.
    ///
    /// The first failure stops the traversal; later elements are never
    /// invoked.
    pub fn traverse_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        F: Fn(usize, T) -> AsyncResult<B, E> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move || {
            let function = Arc::clone(&function);
            traverse::sequential(Arc::clone(&inputs), move |index, input| {
                function(index, input).run_async()
            })
        })
    }

    /// Invokes every element before awaiting any; results keep input order.
    ///
    /// All elements run to completion. The first failure in index order is
    /// reported.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::AsyncResult;
    ///
    /// let checked = AsyncResult::traverse_par_with_index(vec![2, 4, 5], |index, n: i32| {
    ///     if n % 2 == 0 {
    ///         AsyncResult::pure(n / 2)
    ///     } else {
    ///         AsyncResult::fail(format!("odd at {index}"))
    ///     }
    /// });
    /// let outcome = futures::executor::block_on(checked.run_async());
    /// assert_eq!(outcome, Err("odd at 2".to_string()));
    /// ```
    pub fn traverse_par_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        F: Fn(usize, T) -> AsyncResult<B, E> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move || {
            let function = Arc::clone(&function);
            traverse::parallel(Arc::clone(&inputs), move |index, input| {
                function(index, input).run_async()
            })
        })
    }

    /// Parallel traversal that combines every failure, in index order.
    pub fn traverse_par_with_index_accumulating<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        E: Semigroup,
        F: Fn(usize, T) -> AsyncResult<B, E> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move || {
            let function = Arc::clone(&function);
            traverse::parallel_accumulating(Arc::clone(&inputs), move |index, input| {
                function(index, input).run_async()
            })
        })
    }

    /// Parallel traversal with at most `config.max_concurrency()` elements
    /// in flight.
    pub fn traverse_par_with_index_config<T, I, F>(
        config: ParallelConfig,
        inputs: I,
        function: F,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        F: Fn(usize, T) -> AsyncResult<B, E> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move || {
            let function = Arc::clone(&function);
            traverse::parallel_bounded(config, Arc::clone(&inputs), move |index, input| {
                function(index, input).run_async()
            })
        })
    }
}

impl<A, E> IntoFuture for AsyncResult<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
{
    type Output = Result<A, E>;
    type IntoFuture = BoxFuture<'static, Result<A, E>>;

    fn into_future(self) -> Self::IntoFuture {
        self.run_async()
    }
}

impl<A, E> std::fmt::Debug for AsyncResult<A, E> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("AsyncResult(<deferred>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    #[tokio::test]
    async fn test_from_option_uses_on_none_only_for_none() {
        let present: AsyncResult<i32, String> = AsyncResult::from_option(Some(1), || unreachable!());
        let absent: AsyncResult<i32, String> =
            AsyncResult::from_option(None, || "missing".to_string());
        assert_eq!(present.await, Ok(1));
        assert_eq!(absent.await, Err("missing".to_string()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_flat_map_skips_function_on_failure() {
        let invoked = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invoked);
        let failed: AsyncResult<i32, &str> = AsyncResult::fail("boom");
        let chained = failed.flat_map(move |value| {
            counter.fetch_add(1, Ordering::SeqCst);
            AsyncResult::pure(value)
        });
        assert_eq!(chained.await, Err("boom"));
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_or_else_takes_alternative_only_on_failure() {
        let fallback: AsyncResult<i32, &str> = AsyncResult::pure(0);
        let ok: AsyncResult<i32, &str> = AsyncResult::pure(1);
        let err: AsyncResult<i32, &str> = AsyncResult::fail("e");
        assert_eq!(ok.or_else(fallback.clone()).await, Ok(1));
        assert_eq!(err.or_else(fallback).await, Ok(0));
    }

    #[rstest]
    #[tokio::test]
    async fn test_map_both_and_fold() {
        let failed: AsyncResult<i32, String> = AsyncResult::fail("bad".to_string());
        assert_eq!(failed.clone().map_both(|e| e.len(), |n| n + 1).await, Err(3));
        let described = failed.fold(|e| format!("error {e}"), |n| format!("value {n}"));
        assert_eq!(described.await, "error bad");
    }

    #[rstest]
    #[tokio::test]
    async fn test_right_and_left_async() {
        let right: AsyncResult<i32, String> = AsyncResult::right_async(AsyncIO::pure(3));
        let left: AsyncResult<i32, String> =
            AsyncResult::left_async(AsyncIO::pure("no".to_string()));
        assert_eq!(right.await, Ok(3));
        assert_eq!(left.await, Err("no".to_string()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_apply_skips_value_when_function_fails() {
        let invoked = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invoked);
        let value: AsyncResult<i32, &str> = AsyncResult::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            future::ready(Ok(1))
        });
        let function: AsyncResult<fn(i32) -> i32, &str> = AsyncResult::fail("no function");
        assert_eq!(value.apply(function).await, Err("no function"));
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_apply_par_invokes_value_even_when_function_fails() {
        let invoked = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invoked);
        let value: AsyncResult<i32, &str> = AsyncResult::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            future::ready(Err("bad value"))
        });
        let function: AsyncResult<fn(i32) -> i32, &str> = AsyncResult::fail("no function");
        assert_eq!(value.apply_par(function).await, Err("no function"));
        assert_eq!(invoked.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_try_catch_passes_through_success() {
        let fine: AsyncResult<i32, String> =
            AsyncResult::try_catch(|| async { 5 }, |error| error.to_string());
        assert_eq!(fine.await, Ok(5));
    }

    #[rstest]
    #[tokio::test]
    async fn test_bracket_acquire_failure_skips_use_and_release() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let use_calls = Arc::clone(&calls);
        let release_calls = Arc::clone(&calls);
        let program: AsyncResult<i32, String> = AsyncResult::bracket(
            AsyncResult::<&str, String>::fail("no handle".to_string()),
            move |_| {
                use_calls.lock().unwrap().push("use");
                AsyncResult::pure(1)
            },
            move |_, _| {
                release_calls.lock().unwrap().push("release");
                AsyncResult::pure(())
            },
        );
        assert_eq!(program.await, Err("no handle".to_string()));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[rstest]
    #[case(Ok(1), Ok(()), Ok(1))]
    #[case(Err("use"), Ok(()), Err("use"))]
    #[case(Ok(1), Err("release"), Err("release"))]
    #[case(Err("use"), Err("release"), Err("use"))]
    fn test_settle_bracket_precedence(
        #[case] outcome: Result<i32, &str>,
        #[case] released: Result<(), &str>,
        #[case] expected: Result<i32, &str>,
    ) {
        assert_eq!(settle_bracket(outcome, released), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn test_release_sees_use_outcome() {
        let seen = Arc::new(Mutex::new(None));
        let recorder = Arc::clone(&seen);
        let program: AsyncResult<i32, String> = AsyncResult::bracket(
            AsyncResult::pure(10),
            |resource| AsyncResult::pure(resource * 2),
            move |resource, outcome: &Result<i32, String>| {
                *recorder.lock().unwrap() = Some((resource, outcome.clone()));
                AsyncResult::pure(())
            },
        );
        assert_eq!(program.await, Ok(20));
        assert_eq!(*seen.lock().unwrap(), Some((10, Ok(20))));
    }
}
