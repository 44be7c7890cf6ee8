//! `ReaderAsyncResult` - an environment-reading asynchronous computation
//! that may fail.
//!
//! `ReaderAsyncResult<R, A, E>` wraps a function `R -> AsyncResult<A, E>`.
//! Every step of a composition receives the same environment; the first
//! failure short-circuits the rest.
//!
//! # Examples
//!
//! ```rust
//! use lamina::effect::ReaderAsyncResult;
//!
//! #[derive(Clone)]
//! struct Limits {
//!     max_items: usize,
//! }
//!
//! fn check(count: usize) -> ReaderAsyncResult<Limits, usize, String> {
//!     ReaderAsyncResult::asks(|limits: Limits| limits.max_items).flat_map(move |max_items| {
//!         if count <= max_items {
//!             ReaderAsyncResult::pure(count)
//!         } else {
//!             ReaderAsyncResult::fail(format!("{count} exceeds {max_items}"))
//!         }
//!     })
//! }
//!
//! let limits = Limits { max_items: 3 };
//! let accepted = futures::executor::block_on(check(2).run(limits.clone()).run_async());
//! let rejected = futures::executor::block_on(check(5).run(limits).run_async());
//! assert_eq!(accepted, Ok(2));
//! assert_eq!(rejected, Err("5 exceeds 3".to_string()));
//! ```

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::typeclass::Semigroup;

use super::{AsyncIO, AsyncResult, ParallelConfig, ReaderAsync, traverse};

type ReaderFunction<R, A, E> = dyn Fn(R) -> AsyncResult<A, E> + Send + Sync;

/// A fallible asynchronous computation depending on an environment `R`.
pub struct ReaderAsyncResult<R, A, E> {
    run_function: Arc<ReaderFunction<R, A, E>>,
}

impl<R, A, E> Clone for ReaderAsyncResult<R, A, E> {
    fn clone(&self) -> Self {
        Self {
            run_function: Arc::clone(&self.run_function),
        }
    }
}

impl<R, A, E> ReaderAsyncResult<R, A, E>
where
    R: Clone + Send + Sync + 'static,
    A: Send + 'static,
    E: Send + 'static,
{
    /// Creates a `ReaderAsyncResult` from a function of the environment.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(R) -> AsyncResult<A, E> + Send + Sync + 'static,
    {
        Self {
            run_function: Arc::new(function),
        }
    }

    /// Supplies the environment, yielding the `AsyncIO` to run.
    pub fn run(&self, environment: R) -> AsyncIO<Result<A, E>> {
        self.run_result(environment).into_async_io()
    }

    /// Supplies the environment, yielding an `AsyncResult`.
    pub fn run_result(&self, environment: R) -> AsyncResult<A, E> {
        (self.run_function)(environment)
    }

    pub(crate) fn run_future(&self, environment: R) -> BoxFuture<'static, Result<A, E>> {
        self.run_result(environment).run_async()
    }

    /// Succeeds with `value` regardless of the environment.
    pub fn pure(value: A) -> Self
    where
        A: Clone + Sync,
    {
        Self::from_async_result(AsyncResult::pure(value))
    }

    /// Fails with `error` regardless of the environment.
    pub fn fail(error: E) -> Self
    where
        E: Clone + Sync,
    {
        Self::from_async_result(AsyncResult::fail(error))
    }

    /// Projects a value from the environment.
    pub fn asks<F>(projection: F) -> Self
    where
        F: Fn(R) -> A + Send + Sync + 'static,
    {
        Self::from_reader_async(ReaderAsync::asks(projection))
    }

    /// Lifts an `AsyncResult` that does not need the environment.
    pub fn from_async_result(result: AsyncResult<A, E>) -> Self {
        Self::new(move |_| result.clone())
    }

    /// Lifts an infallible `ReaderAsync` as the success branch.
    pub fn from_reader_async(reader: ReaderAsync<R, A>) -> Self {
        Self::new(move |environment: R| AsyncResult::right_async(reader.run(environment)))
    }

    /// Lifts a ready `Result`.
    pub fn from_result(result: Result<A, E>) -> Self
    where
        A: Clone + Sync,
        E: Clone + Sync,
    {
        Self::from_async_result(AsyncResult::from_result(result))
    }

    /// Runs `computation` against an environment derived from the outer one.
    ///
    /// ```rust
    /// use lamina::effect::ReaderAsyncResult;
    ///
    /// let timeout: ReaderAsyncResult<u64, u64, String> = ReaderAsyncResult::ask();
    /// let from_pair = ReaderAsyncResult::local(|(_, timeout): (String, u64)| timeout, timeout);
    /// let outcome = futures::executor::block_on(from_pair.run(("db".to_string(), 30)).run_async());
    /// assert_eq!(outcome, Ok(30));
    /// ```
    pub fn local<Outer, F>(modifier: F, computation: Self) -> ReaderAsyncResult<Outer, A, E>
    where
        Outer: Clone + Send + Sync + 'static,
        F: Fn(Outer) -> R + Send + Sync + 'static,
    {
        ReaderAsyncResult::new(move |environment: Outer| {
            computation.run_result(modifier(environment))
        })
    }

    /// Maps the success value.
    pub fn fmap<B, F>(self, function: F) -> ReaderAsyncResult<R, B, E>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        ReaderAsyncResult::new(move |environment: R| {
            let function = Arc::clone(&function);
            self.run_result(environment).fmap(move |value| function(value))
        })
    }

    /// Maps the failure value.
    pub fn map_error<E2, F>(self, function: F) -> ReaderAsyncResult<R, A, E2>
    where
        F: Fn(E) -> E2 + Send + Sync + 'static,
        E2: Send + 'static,
    {
        let function = Arc::new(function);
        ReaderAsyncResult::new(move |environment: R| {
            let function = Arc::clone(&function);
            self.run_result(environment)
                .map_error(move |error| function(error))
        })
    }

    /// Chains a computation on the success value; both see the same
    /// environment. On failure `function` is never called.
    pub fn flat_map<B, F>(self, function: F) -> ReaderAsyncResult<R, B, E>
    where
        F: Fn(A) -> ReaderAsyncResult<R, B, E> + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        ReaderAsyncResult::new(move |environment: R| {
            let function = Arc::clone(&function);
            let inner_environment = environment.clone();
            self.run_result(environment)
                .flat_map(move |value| function(value).run_result(inner_environment.clone()))
        })
    }

    /// Alias for `flat_map`.
    pub fn and_then<B, F>(self, function: F) -> ReaderAsyncResult<R, B, E>
    where
        F: Fn(A) -> ReaderAsyncResult<R, B, E> + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.flat_map(function)
    }

    /// `flat_map` across different error types, widening both into `EW`.
    pub fn flat_map_w<B, E2, EW, F>(self, function: F) -> ReaderAsyncResult<R, B, EW>
    where
        F: Fn(A) -> ReaderAsyncResult<R, B, E2> + Send + Sync + 'static,
        B: Send + 'static,
        E: Into<EW>,
        E2: Into<EW> + Send + 'static,
        EW: Send + 'static,
    {
        self.map_error(Into::into)
            .flat_map(move |value| function(value).map_error(Into::into))
    }

    /// Runs `that` if `self` fails.
    #[must_use]
    pub fn or_else(self, that: Self) -> Self {
        self.catch_error(move |_| that.clone())
    }

    /// Recovers from a failure; the recovery sees the same environment.
    pub fn catch_error<E2, F>(self, handler: F) -> ReaderAsyncResult<R, A, E2>
    where
        F: Fn(E) -> ReaderAsyncResult<R, A, E2> + Send + Sync + 'static,
        E2: Send + 'static,
    {
        let handler = Arc::new(handler);
        ReaderAsyncResult::new(move |environment: R| {
            let handler = Arc::clone(&handler);
            let recovery_environment = environment.clone();
            self.run_result(environment)
                .catch_error(move |error| handler(error).run_result(recovery_environment.clone()))
        })
    }

    /// Collapses both branches into an infallible `ReaderAsync`.
    pub fn fold<T, F, G>(self, on_failure: F, on_success: G) -> ReaderAsync<R, T>
    where
        F: Fn(E) -> T + Send + Sync + 'static,
        G: Fn(A) -> T + Send + Sync + 'static,
        T: Send + 'static,
    {
        let on_failure = Arc::new(on_failure);
        let on_success = Arc::new(on_success);
        ReaderAsync::new(move |environment: R| {
            let on_failure = Arc::clone(&on_failure);
            let on_success = Arc::clone(&on_success);
            self.run_result(environment)
                .fold(move |error| on_failure(error), move |value| on_success(value))
        })
    }

    /// Sequential `apply`: `function_reader` completes before `self` starts.
    pub fn apply<B, F>(self, function_reader: ReaderAsyncResult<R, F, E>) -> ReaderAsyncResult<R, B, E>
    where
        F: Fn(A) -> B + Send + 'static,
        B: Send + 'static,
    {
        ReaderAsyncResult::new(move |environment: R| {
            let function_io = function_reader.run_result(environment.clone());
            self.run_result(environment).apply(function_io)
        })
    }

    /// Parallel `apply`: both sides are invoked before either is awaited.
    pub fn apply_par<B, F>(
        self,
        function_reader: ReaderAsyncResult<R, F, E>,
    ) -> ReaderAsyncResult<R, B, E>
    where
        F: Fn(A) -> B + Send + 'static,
        B: Send + 'static,
    {
        ReaderAsyncResult::new(move |environment: R| {
            let function_io = function_reader.run_result(environment.clone());
            self.run_result(environment).apply_par(function_io)
        })
    }

    /// Acquire/use/release with the environment available to every step.
    ///
    /// Follows [`AsyncResult::bracket`]: `release` runs exactly once after a
    /// successful acquisition, and a failing use wins over a failing release.
    pub fn bracket<Resource, Use, Release>(
        acquire: ReaderAsyncResult<R, Resource, E>,
        use_resource: Use,
        release: Release,
    ) -> Self
    where
        Resource: Clone + Send + 'static,
        Use: Fn(Resource) -> Self + Send + Sync + 'static,
        Release: Fn(Resource, &Result<A, E>) -> ReaderAsyncResult<R, (), E> + Send + Sync + 'static,
    {
        let use_resource = Arc::new(use_resource);
        let release = Arc::new(release);
        Self::new(move |environment: R| {
            let use_resource = Arc::clone(&use_resource);
            let release = Arc::clone(&release);
            let use_environment = environment.clone();
            let release_environment = environment.clone();
            AsyncResult::bracket(
                acquire.run_result(environment),
                move |resource| use_resource(resource).run_result(use_environment.clone()),
                move |resource, outcome| {
                    release(resource, outcome).run_result(release_environment.clone())
                },
            )
        })
    }
}

impl<R, E> ReaderAsyncResult<R, R, E>
where
    R: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Yields the environment itself.
    #[must_use]
    pub fn ask() -> Self {
        Self::new(AsyncResult::pure)
    }
}

// =============================================================================
// Traversal
// =============================================================================

impl<R, B, E> ReaderAsyncResult<R, Vec<B>, E>
where
    R: Clone + Send + Sync + 'static,
    B: Send + 'static,
    E: Send + 'static,
{
    /// Sequential traversal; the first failure stops it.
    pub fn traverse_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        F: Fn(usize, T) -> ReaderAsyncResult<R, B, E> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move |environment: R| {
            let inputs = Arc::clone(&inputs);
            let function = Arc::clone(&function);
            AsyncResult::new(move || {
                let function = Arc::clone(&function);
                let environment = environment.clone();
                traverse::sequential(Arc::clone(&inputs), move |index, input| {
                    function(index, input).run_future(environment.clone())
                })
            })
        })
    }

    /// Parallel traversal; the first failure in index order is reported.
    pub fn traverse_par_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        F: Fn(usize, T) -> ReaderAsyncResult<R, B, E> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move |environment: R| {
            let inputs = Arc::clone(&inputs);
            let function = Arc::clone(&function);
            AsyncResult::new(move || {
                let function = Arc::clone(&function);
                let environment = environment.clone();
                traverse::parallel(Arc::clone(&inputs), move |index, input| {
                    function(index, input).run_future(environment.clone())
                })
            })
        })
    }

    /// Parallel traversal combining every failure in index order.
    pub fn traverse_par_with_index_accumulating<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        E: Semigroup,
        F: Fn(usize, T) -> ReaderAsyncResult<R, B, E> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move |environment: R| {
            let inputs = Arc::clone(&inputs);
            let function = Arc::clone(&function);
            AsyncResult::new(move || {
                let function = Arc::clone(&function);
                let environment = environment.clone();
                traverse::parallel_accumulating(Arc::clone(&inputs), move |index, input| {
                    function(index, input).run_future(environment.clone())
                })
            })
        })
    }

    /// Parallel traversal with bounded concurrency.
    pub fn traverse_par_with_index_config<T, I, F>(
        config: ParallelConfig,
        inputs: I,
        function: F,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        F: Fn(usize, T) -> ReaderAsyncResult<R, B, E> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move |environment: R| {
            let inputs = Arc::clone(&inputs);
            let function = Arc::clone(&function);
            AsyncResult::new(move || {
                let function = Arc::clone(&function);
                let environment = environment.clone();
                traverse::parallel_bounded(config, Arc::clone(&inputs), move |index, input| {
                    function(index, input).run_future(environment.clone())
                })
            })
        })
    }
}

impl<R, A, E> std::fmt::Debug for ReaderAsyncResult<R, A, E> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("ReaderAsyncResult(<deferred>)")
    }
}
