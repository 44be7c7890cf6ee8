//! `ReaderAsync` - an asynchronous computation that reads an environment.
//!
//! `ReaderAsync<R, A>` wraps a function `R -> AsyncIO<A>`. Composition
//! passes the same environment to every step.
//!
//! # Examples
//!
//! ```rust
//! use lamina::effect::{AsyncIO, ReaderAsync};
//!
//! #[derive(Clone)]
//! struct Settings {
//!     greeting: &'static str,
//! }
//!
//! let greet: ReaderAsync<Settings, String> = ReaderAsync::asks(|settings: Settings| settings.greeting)
//!     .flat_map(|greeting| ReaderAsync::from_async_io(AsyncIO::pure(format!("{greeting}, world"))));
//!
//! let io = greet.run(Settings { greeting: "hello" });
//! assert_eq!(futures::executor::block_on(io.run_async()), "hello, world");
//! ```

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::async_io::{infallible, into_value};
use super::{AsyncIO, traverse};

type ReaderFunction<R, A> = dyn Fn(R) -> AsyncIO<A> + Send + Sync;

/// An asynchronous computation depending on an environment of type `R`.
pub struct ReaderAsync<R, A> {
    run_function: Arc<ReaderFunction<R, A>>,
}

impl<R, A> Clone for ReaderAsync<R, A> {
    fn clone(&self) -> Self {
        Self {
            run_function: Arc::clone(&self.run_function),
        }
    }
}

impl<R, A> ReaderAsync<R, A>
where
    R: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    /// Creates a `ReaderAsync` from a function of the environment.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(R) -> AsyncIO<A> + Send + Sync + 'static,
    {
        Self {
            run_function: Arc::new(function),
        }
    }

    /// Supplies the environment, yielding the `AsyncIO` to run.
    pub fn run(&self, environment: R) -> AsyncIO<A> {
        (self.run_function)(environment)
    }

    pub(crate) fn run_future(&self, environment: R) -> BoxFuture<'static, A> {
        self.run(environment).run_async()
    }

    /// Ignores the environment and yields `value`.
    pub fn pure(value: A) -> Self
    where
        A: Clone + Sync,
    {
        Self::from_async_io(AsyncIO::pure(value))
    }

    /// Projects a value from the environment.
    pub fn asks<F>(projection: F) -> Self
    where
        F: Fn(R) -> A + Send + Sync + 'static,
    {
        let projection = Arc::new(projection);
        Self::new(move |environment: R| {
            let projection = Arc::clone(&projection);
            AsyncIO::from_fn(move || projection(environment.clone()))
        })
    }

    /// Lifts a synchronous reader function.
    ///
    /// The function runs each time the resulting `AsyncIO` is run.
    pub fn from_reader<F>(reader: F) -> Self
    where
        F: Fn(R) -> A + Send + Sync + 'static,
    {
        Self::asks(reader)
    }

    /// Lifts an `AsyncIO` that does not need the environment.
    pub fn from_async_io(io: AsyncIO<A>) -> Self {
        Self::new(move |_| io.clone())
    }

    /// Runs `computation` against an environment derived from the outer one.
    pub fn local<Outer, F>(modifier: F, computation: Self) -> ReaderAsync<Outer, A>
    where
        Outer: Clone + Send + Sync + 'static,
        F: Fn(Outer) -> R + Send + Sync + 'static,
    {
        ReaderAsync::new(move |environment: Outer| computation.run(modifier(environment)))
    }

    /// Maps the result.
    pub fn fmap<B, F>(self, function: F) -> ReaderAsync<R, B>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        ReaderAsync::new(move |environment: R| {
            let function = Arc::clone(&function);
            self.run(environment).fmap(move |value| function(value))
        })
    }

    /// Chains a computation that depends on this one's result; both see the
    /// same environment.
    pub fn flat_map<B, F>(self, function: F) -> ReaderAsync<R, B>
    where
        F: Fn(A) -> ReaderAsync<R, B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        ReaderAsync::new(move |environment: R| {
            let function = Arc::clone(&function);
            let inner_environment = environment.clone();
            self.run(environment)
                .flat_map(move |value| function(value).run(inner_environment.clone()))
        })
    }

    /// Alias for `flat_map`.
    pub fn and_then<B, F>(self, function: F) -> ReaderAsync<R, B>
    where
        F: Fn(A) -> ReaderAsync<R, B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.flat_map(function)
    }

    /// Sequential `apply`: `function_reader` completes before `self` starts.
    pub fn apply<B, F>(self, function_reader: ReaderAsync<R, F>) -> ReaderAsync<R, B>
    where
        F: Fn(A) -> B + Send + 'static,
        B: Send + 'static,
    {
        ReaderAsync::new(move |environment: R| {
            let function_io = function_reader.run(environment.clone());
            self.run(environment).apply(function_io)
        })
    }

    /// Parallel `apply`: both sides are invoked before either is awaited.
    pub fn apply_par<B, F>(self, function_reader: ReaderAsync<R, F>) -> ReaderAsync<R, B>
    where
        F: Fn(A) -> B + Send + 'static,
        B: Send + 'static,
    {
        ReaderAsync::new(move |environment: R| {
            let function_io = function_reader.run(environment.clone());
            self.run(environment).apply_par(function_io)
        })
    }
}

impl<R> ReaderAsync<R, R>
where
    R: Clone + Send + Sync + 'static,
{
    /// Yields the environment itself.
    #[must_use]
    pub fn ask() -> Self {
        Self::new(AsyncIO::pure)
    }
}

// =============================================================================
// Traversal
// =============================================================================

impl<R, B> ReaderAsync<R, Vec<B>>
where
    R: Clone + Send + Sync + 'static,
    B: Send + 'static,
{
    /// Sequential traversal: each element completes before the next starts.
    pub fn traverse_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        F: Fn(usize, T) -> ReaderAsync<R, B> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move |environment: R| {
            let inputs = Arc::clone(&inputs);
            let function = Arc::clone(&function);
            AsyncIO::new(move || {
                let function = Arc::clone(&function);
                let environment = environment.clone();
                traverse::sequential(Arc::clone(&inputs), move |index, input| {
                    infallible(function(index, input).run_future(environment.clone()))
                })
                .map(into_value)
            })
        })
    }

    /// Parallel traversal: every element is invoked before any is awaited;
    /// results keep input order.
    pub fn traverse_par_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        F: Fn(usize, T) -> ReaderAsync<R, B> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move |environment: R| {
            let inputs = Arc::clone(&inputs);
            let function = Arc::clone(&function);
            AsyncIO::new(move || {
                let function = Arc::clone(&function);
                let environment = environment.clone();
                traverse::parallel(Arc::clone(&inputs), move |index, input| {
                    infallible(function(index, input).run_future(environment.clone()))
                })
                .map(into_value)
            })
        })
    }
}

impl<R, A> std::fmt::Debug for ReaderAsync<R, A> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("ReaderAsync(<deferred>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;
    use std::time::Duration;

    #[rstest]
    #[tokio::test]
    async fn test_ask_returns_environment() {
        let reader: ReaderAsync<u8, u8> = ReaderAsync::ask();
        assert_eq!(reader.run(7).await, 7);
    }

    #[rstest]
    #[tokio::test]
    async fn test_local_narrows_environment() {
        let port: ReaderAsync<u16, String> = ReaderAsync::asks(|port: u16| format!(":{port}"));
        let wide = ReaderAsync::local(|(_, port): (&'static str, u16)| port, port);
        assert_eq!(wide.run(("localhost", 8080)).await, ":8080");
    }

    #[rstest]
    #[tokio::test]
    async fn test_flat_map_shares_environment() {
        let reader: ReaderAsync<i32, i32> = ReaderAsync::ask()
            .flat_map(|value| ReaderAsync::asks(move |environment: i32| value + environment));
        assert_eq!(reader.run(5).await, 10);
    }

    #[rstest]
    #[tokio::test]
    async fn test_apply_par_combines() {
        let value: ReaderAsync<i32, i32> = ReaderAsync::ask();
        let function: ReaderAsync<i32, fn(i32) -> i32> = ReaderAsync::pure(|n| n * 3);
        assert_eq!(value.clone().apply_par(function.clone()).run(4).await, 12);
        assert_eq!(value.apply(function).run(4).await, 12);
    }

    #[rstest]
    #[tokio::test]
    async fn test_apply_reads_environment_for_function_first() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let function_log = Arc::clone(&order);
        let value_log = Arc::clone(&order);
        let function_reader: ReaderAsync<i32, fn(i32) -> i32> = ReaderAsync::new(move |_: i32| {
            function_log.lock().unwrap().push("function");
            AsyncIO::pure((|n: i32| n + 1) as fn(i32) -> i32)
        });
        let value_reader = ReaderAsync::new(move |environment: i32| {
            value_log.lock().unwrap().push("value");
            AsyncIO::pure(environment)
        });
        assert_eq!(value_reader.apply(function_reader).run(41).await, 42);
        assert_eq!(*order.lock().unwrap(), vec!["function", "value"]);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_traverse_par_keeps_input_order() {
        let traversal = ReaderAsync::traverse_par_with_index(vec![100_u64, 10], |index, delay| {
            ReaderAsync::new(move |label: &'static str| {
                AsyncIO::pure(format!("{label}{index}")).delay(Duration::from_millis(delay))
            })
        });
        assert_eq!(traversal.run("item").await, vec!["item0", "item1"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_traverse_with_index_runs_each_element() {
        let traversal = ReaderAsync::traverse_with_index(vec![1, 2, 3], |_, value: i32| {
            ReaderAsync::asks(move |offset: i32| value + offset)
        });
        assert_eq!(traversal.run(10).await, vec![11, 12, 13]);
    }
}
