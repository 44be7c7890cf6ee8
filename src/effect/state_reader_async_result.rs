//! `StateReaderAsyncResult` - state, environment, asynchrony and failure in
//! one stack.
//!
//! `StateReaderAsyncResult<S, R, A, E>` wraps a function
//! `(S, R) -> AsyncResult<(A, S), E>`. The state lives in the success
//! payload: a failing step discards whatever state it was given, and the
//! next step only runs after the previous one produced `(value, state)`.
//!
//! State is threaded strictly left to right, so this stack has no parallel
//! combinators.
//!
//! # Examples
//!
//! ```rust
//! use lamina::effect::StateReaderAsyncResult;
//!
//! type Counter<A> = StateReaderAsyncResult<u32, u32, A, String>;
//!
//! fn tick() -> Counter<u32> {
//!     StateReaderAsyncResult::asks(|step: u32| step).flat_map(|step| {
//!         StateReaderAsyncResult::modify(move |count: u32| count + step)
//!             .flat_map(|()| StateReaderAsyncResult::get())
//!     })
//! }
//!
//! let program = tick().flat_map(|_| tick());
//! let outcome = futures::executor::block_on(program.run(0, 5).run_async());
//! assert_eq!(outcome, Ok((10, 10)));
//! ```

use std::future;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::{AsyncIO, AsyncResult, ReaderAsyncResult, traverse};

type StateFunction<S, R, A, E> = dyn Fn(S, R) -> AsyncResult<(A, S), E> + Send + Sync;

/// A fallible asynchronous computation that reads `R` and threads `S`.
pub struct StateReaderAsyncResult<S, R, A, E> {
    run_function: Arc<StateFunction<S, R, A, E>>,
}

impl<S, R, A, E> Clone for StateReaderAsyncResult<S, R, A, E> {
    fn clone(&self) -> Self {
        Self {
            run_function: Arc::clone(&self.run_function),
        }
    }
}

impl<S, R, A, E> StateReaderAsyncResult<S, R, A, E>
where
    S: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    A: Send + 'static,
    E: Send + 'static,
{
    /// Creates a computation from a function of the state and environment.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(S, R) -> AsyncResult<(A, S), E> + Send + Sync + 'static,
    {
        Self {
            run_function: Arc::new(function),
        }
    }

    /// Supplies the initial state and environment, yielding the `AsyncIO`
    /// to run.
    pub fn run(&self, initial_state: S, environment: R) -> AsyncIO<Result<(A, S), E>> {
        self.run_result(initial_state, environment).into_async_io()
    }

    /// Like `run`, yielding an `AsyncResult`.
    pub fn run_result(&self, initial_state: S, environment: R) -> AsyncResult<(A, S), E> {
        (self.run_function)(initial_state, environment)
    }

    pub(crate) fn run_future(
        &self,
        initial_state: S,
        environment: R,
    ) -> BoxFuture<'static, Result<(A, S), E>> {
        self.run_result(initial_state, environment).run_async()
    }

    /// Runs the computation and keeps only the result.
    pub fn evaluate(&self, initial_state: S, environment: R) -> AsyncIO<Result<A, E>> {
        self.run_result(initial_state, environment)
            .fmap(|(value, _)| value)
            .into_async_io()
    }

    /// Runs the computation and keeps only the final state.
    pub fn execute(&self, initial_state: S, environment: R) -> AsyncIO<Result<S, E>> {
        self.run_result(initial_state, environment)
            .fmap(|(_, final_state)| final_state)
            .into_async_io()
    }

    /// Succeeds with `value`, leaving the state untouched.
    pub fn pure(value: A) -> Self
    where
        A: Clone + Sync,
    {
        Self::new(move |state, _| AsyncResult::pure((value.clone(), state)))
    }

    /// Fails with `error`.
    pub fn fail(error: E) -> Self
    where
        E: Clone + Sync,
    {
        Self::new(move |_, _| AsyncResult::fail(error.clone()))
    }

    /// Projects a value from the state without changing it.
    pub fn gets<F>(projection: F) -> Self
    where
        F: Fn(&S) -> A + Send + Sync + 'static,
    {
        let projection = Arc::new(projection);
        Self::new(move |state: S, _| {
            let projection = Arc::clone(&projection);
            AsyncResult::new(move || {
                let state = state.clone();
                let value = projection(&state);
                future::ready(Ok((value, state)))
            })
        })
    }

    /// Projects a value from the environment.
    pub fn asks<F>(projection: F) -> Self
    where
        F: Fn(R) -> A + Send + Sync + 'static,
    {
        let projection = Arc::new(projection);
        Self::new(move |state: S, environment: R| {
            let projection = Arc::clone(&projection);
            AsyncResult::new(move || {
                future::ready(Ok((projection(environment.clone()), state.clone())))
            })
        })
    }

    /// Runs `computation` against an environment derived from the outer one.
    pub fn local<Outer, F>(modifier: F, computation: Self) -> StateReaderAsyncResult<S, Outer, A, E>
    where
        Outer: Clone + Send + Sync + 'static,
        F: Fn(Outer) -> R + Send + Sync + 'static,
    {
        StateReaderAsyncResult::new(move |state: S, environment: Outer| {
            computation.run_result(state, modifier(environment))
        })
    }

    /// Lifts a `ReaderAsyncResult`; the state passes through unchanged.
    pub fn from_reader_async_result(reader: ReaderAsyncResult<R, A, E>) -> Self {
        Self::new(move |state: S, environment: R| {
            reader
                .run_result(environment)
                .fmap(move |value| (value, state.clone()))
        })
    }

    /// Lifts a thread-safe state transition.
    ///
    /// The transition runs each time the computation is run.
    pub fn from_state<F>(transition: F) -> Self
    where
        F: Fn(S) -> (A, S) + Send + Sync + 'static,
    {
        let transition = Arc::new(transition);
        Self::new(move |state: S, _| {
            let transition = Arc::clone(&transition);
            AsyncResult::new(move || future::ready(Ok(transition(state.clone()))))
        })
    }

    /// Lifts a ready `Result`; the state passes through unchanged.
    pub fn from_result(result: Result<A, E>) -> Self
    where
        A: Clone + Sync,
        E: Clone + Sync,
    {
        Self::new(move |state: S, _| AsyncResult::from_result(result.clone().map(|value| (value, state))))
    }

    /// Maps the result value; the state is unchanged.
    pub fn fmap<B, F>(self, function: F) -> StateReaderAsyncResult<S, R, B, E>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        StateReaderAsyncResult::new(move |state: S, environment: R| {
            let function = Arc::clone(&function);
            self.run_result(state, environment)
                .fmap(move |(value, next_state)| (function(value), next_state))
        })
    }

    /// Maps the failure value.
    pub fn map_error<E2, F>(self, function: F) -> StateReaderAsyncResult<S, R, A, E2>
    where
        F: Fn(E) -> E2 + Send + Sync + 'static,
        E2: Send + 'static,
    {
        let function = Arc::new(function);
        StateReaderAsyncResult::new(move |state: S, environment: R| {
            let function = Arc::clone(&function);
            self.run_result(state, environment)
                .map_error(move |error| function(error))
        })
    }

    /// Runs `self` to `(a, s2)`, then runs `function(a)` from `s2` with the
    /// same environment. On failure `function` is never called.
    pub fn flat_map<B, F>(self, function: F) -> StateReaderAsyncResult<S, R, B, E>
    where
        F: Fn(A) -> StateReaderAsyncResult<S, R, B, E> + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        StateReaderAsyncResult::new(move |state: S, environment: R| {
            let function = Arc::clone(&function);
            let inner_environment = environment.clone();
            self.run_result(state, environment)
                .flat_map(move |(value, next_state)| {
                    function(value).run_result(next_state, inner_environment.clone())
                })
        })
    }

    /// Alias for `flat_map`.
    pub fn and_then<B, F>(self, function: F) -> StateReaderAsyncResult<S, R, B, E>
    where
        F: Fn(A) -> StateReaderAsyncResult<S, R, B, E> + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.flat_map(function)
    }

    /// `flat_map` across different error types, widening both into `EW`.
    pub fn flat_map_w<B, E2, EW, F>(self, function: F) -> StateReaderAsyncResult<S, R, B, EW>
    where
        F: Fn(A) -> StateReaderAsyncResult<S, R, B, E2> + Send + Sync + 'static,
        B: Send + 'static,
        E: Into<EW>,
        E2: Into<EW> + Send + 'static,
        EW: Send + 'static,
    {
        self.map_error(Into::into)
            .flat_map(move |value| function(value).map_error(Into::into))
    }

    /// Runs `that` from the original input state if `self` fails.
    #[must_use]
    pub fn or_else(self, that: Self) -> Self {
        Self::new(move |state: S, environment: R| {
            let alternative = that.run_result(state.clone(), environment.clone());
            self.run_result(state, environment).or_else(alternative)
        })
    }

    /// Sequential `apply`: `function_state` runs first and its final state
    /// feeds `self`.
    pub fn apply<B, F>(
        self,
        function_state: StateReaderAsyncResult<S, R, F, E>,
    ) -> StateReaderAsyncResult<S, R, B, E>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        function_state.flat_map(move |function| self.clone().fmap(move |value| function(value)))
    }
}

impl<S, R, E> StateReaderAsyncResult<S, R, S, E>
where
    S: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Returns the current state as the result.
    #[must_use]
    pub fn get() -> Self {
        Self::new(|state: S, _| AsyncResult::pure((state.clone(), state)))
    }
}

impl<S, R, E> StateReaderAsyncResult<S, R, R, E>
where
    S: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Yields the environment itself.
    #[must_use]
    pub fn ask() -> Self {
        Self::new(|state: S, environment: R| AsyncResult::pure((environment, state)))
    }
}

impl<S, R, E> StateReaderAsyncResult<S, R, (), E>
where
    S: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Replaces the state.
    pub fn put(new_state: S) -> Self {
        Self::new(move |_, _| AsyncResult::pure(((), new_state.clone())))
    }

    /// Applies `modifier` to the state.
    pub fn modify<F>(modifier: F) -> Self
    where
        F: Fn(S) -> S + Send + Sync + 'static,
    {
        let modifier = Arc::new(modifier);
        Self::new(move |state: S, _| {
            let modifier = Arc::clone(&modifier);
            AsyncResult::new(move || future::ready(Ok(((), modifier(state.clone())))))
        })
    }
}

// =============================================================================
// Traversal
// =============================================================================

impl<S, R, B, E> StateReaderAsyncResult<S, R, Vec<B>, E>
where
    S: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    B: Send + 'static,
    E: Send + 'static,
{
    /// Runs `function(index, input)` for each input in index order,
    /// threading the state; the first failure stops the traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::StateReaderAsyncResult;
    ///
    /// let numbered = StateReaderAsyncResult::traverse_with_index(vec!["a", "b"], |_, name| {
    ///     StateReaderAsyncResult::<u32, &str, String, String>::from_state(move |next| {
    ///         (format!("{name}{next}"), next + 1)
    ///     })
    /// });
    /// let outcome = futures::executor::block_on(numbered.run(1, "unused").run_async());
    /// assert_eq!(outcome, Ok((vec!["a1".to_string(), "b2".to_string()], 3)));
    /// ```
    pub fn traverse_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        F: Fn(usize, T) -> StateReaderAsyncResult<S, R, B, E> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move |state: S, environment: R| {
            let inputs = Arc::clone(&inputs);
            let function = Arc::clone(&function);
            AsyncResult::new(move || {
                let function = Arc::clone(&function);
                let environment = environment.clone();
                traverse::sequential_with_state(
                    Arc::clone(&inputs),
                    state.clone(),
                    move |index, input, current_state| {
                        function(index, input).run_future(current_state, environment.clone())
                    },
                )
            })
        })
    }
}

impl<S, R, A, E> std::fmt::Debug for StateReaderAsyncResult<S, R, A, E> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("StateReaderAsyncResult(<deferred>)")
    }
}
