//! `AsyncIO` - deferred asynchronous computation.
//!
//! `AsyncIO<A>` describes an asynchronous computation producing an `A`.
//! Every call to [`AsyncIO::run_async`] invokes the description again and
//! returns a fresh future; awaiting an `AsyncIO` directly does the same
//! through [`IntoFuture`]. Nothing is memoized.
//!
//! Sequential combinators (`flat_map`, `apply`, `map2`) start their second
//! computation only after the first has completed. The `_par` variants
//! invoke both sides before awaiting either and poll them concurrently on
//! the current task.
//!
//! # Examples
//!
//! ```rust
//! use lamina::effect::AsyncIO;
//!
//! let async_io = AsyncIO::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| AsyncIO::pure(x + 1));
//! assert_eq!(futures::executor::block_on(async_io.run_async()), 21);
//! ```
//!
//! # Side Effect Deferral
//!
//! ```rust
//! use lamina::effect::AsyncIO;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let runs = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&runs);
//! let async_io = AsyncIO::from_fn(move || counter.fetch_add(1, Ordering::SeqCst) + 1);
//!
//! assert_eq!(runs.load(Ordering::SeqCst), 0);
//! futures::executor::block_on(async {
//!     assert_eq!(async_io.run_async().await, 1);
//!     assert_eq!(async_io.clone().await, 2);
//! });
//! ```

use std::convert::Infallible;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{self, BoxFuture};

use crate::control::Either;
use crate::typeclass::{Monoid, Semigroup};

use super::traverse;

type Producer<A> = dyn Fn() -> BoxFuture<'static, A> + Send + Sync;

/// A deferred, repeatable asynchronous computation.
///
/// # Monad Laws
///
/// 1. **Left Identity**: `AsyncIO::pure(a).flat_map(f) == f(a)`
/// 2. **Right Identity**: `m.flat_map(AsyncIO::pure) == m`
/// 3. **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
pub struct AsyncIO<A> {
    run_function: Arc<Producer<A>>,
}

impl<A> Clone for AsyncIO<A> {
    fn clone(&self) -> Self {
        Self {
            run_function: Arc::clone(&self.run_function),
        }
    }
}

impl<A: Send + 'static> AsyncIO<A> {
    /// Creates an `AsyncIO` from a function producing a future.
    ///
    /// `action` is called once per run.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = A> + Send + 'static,
    {
        Self {
            run_function: Arc::new(move || action().boxed()),
        }
    }

    /// Creates an `AsyncIO` from a synchronous producer.
    pub fn from_fn<F>(producer: F) -> Self
    where
        F: Fn() -> A + Send + Sync + 'static,
    {
        Self::new(move || future::ready(producer()))
    }

    /// Wraps a pure value.
    pub fn pure(value: A) -> Self
    where
        A: Clone + Sync,
    {
        Self::new(move || future::ready(value.clone()))
    }

    /// An `AsyncIO` that never completes.
    ///
    /// This is the identity of [`AsyncIO::race`].
    #[must_use]
    pub fn never() -> Self {
        Self::new(future::pending)
    }

    /// Invokes the computation, returning a fresh future.
    pub fn run_async(&self) -> BoxFuture<'static, A> {
        (self.run_function)()
    }

    /// Transforms the result with a function.
    pub fn fmap<B, F>(self, function: F) -> AsyncIO<B>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        AsyncIO::new(move || {
            let future = self.run_async();
            let function = Arc::clone(&function);
            async move { function(future.await) }
        })
    }

    /// Chains a computation that depends on this one's result.
    ///
    /// `function` is called, and its `AsyncIO` invoked, only after `self`
    /// has completed.
    pub fn flat_map<B, F>(self, function: F) -> AsyncIO<B>
    where
        F: Fn(A) -> AsyncIO<B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        let function = Arc::new(function);
        AsyncIO::new(move || {
            let first = self.run_async();
            let function = Arc::clone(&function);
            async move {
                let next = function(first.await);
                next.run_async().await
            }
        })
    }

    /// Alias for `flat_map`.
    pub fn and_then<B, F>(self, function: F) -> AsyncIO<B>
    where
        F: Fn(A) -> AsyncIO<B> + Send + Sync + 'static,
        B: Send + 'static,
    {
        self.flat_map(function)
    }

    /// Runs `self`, discards its result, then runs `next`.
    #[must_use]
    pub fn then<B>(self, next: AsyncIO<B>) -> AsyncIO<B>
    where
        B: Send + 'static,
    {
        self.flat_map(move |_| next.clone())
    }

    /// Applies the function produced by `function_io` to the value of `self`.
    ///
    /// Sequential: `self` is invoked only after `function_io` has completed.
    pub fn apply<B, F>(self, function_io: AsyncIO<F>) -> AsyncIO<B>
    where
        F: Fn(A) -> B + Send + 'static,
        B: Send + 'static,
    {
        AsyncIO::new(move || {
            let function_future = function_io.run_async();
            let value_io = self.clone();
            async move {
                let function = function_future.await;
                let value = value_io.run_async().await;
                function(value)
            }
        })
    }

    /// Parallel `apply`: both sides are invoked before either is awaited.
    pub fn apply_par<B, F>(self, function_io: AsyncIO<F>) -> AsyncIO<B>
    where
        F: Fn(A) -> B + Send + 'static,
        B: Send + 'static,
    {
        AsyncIO::new(move || {
            let function_future = function_io.run_async();
            let value_future = self.run_async();
            async move {
                let (function, value) = future::join(function_future, value_future).await;
                function(value)
            }
        })
    }

    /// Combines two computations sequentially, `self` first.
    pub fn map2<B, C, F>(self, other: AsyncIO<B>, function: F) -> AsyncIO<C>
    where
        F: Fn(A, B) -> C + Send + Sync + 'static,
        B: Send + 'static,
        C: Send + 'static,
    {
        let function = Arc::new(function);
        AsyncIO::new(move || {
            let first = self.run_async();
            let other = other.clone();
            let function = Arc::clone(&function);
            async move {
                let a = first.await;
                let b = other.run_async().await;
                function(a, b)
            }
        })
    }

    /// Combines two computations, polling them concurrently.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::AsyncIO;
    ///
    /// let sum = AsyncIO::pure(1).map2_par(AsyncIO::pure(2), |a, b| a + b);
    /// assert_eq!(futures::executor::block_on(sum.run_async()), 3);
    /// ```
    pub fn map2_par<B, C, F>(self, other: AsyncIO<B>, function: F) -> AsyncIO<C>
    where
        F: Fn(A, B) -> C + Send + Sync + 'static,
        B: Send + 'static,
        C: Send + 'static,
    {
        let function = Arc::new(function);
        AsyncIO::new(move || {
            let first = self.run_async();
            let second = other.run_async();
            let function = Arc::clone(&function);
            async move {
                let (a, b) = future::join(first, second).await;
                function(a, b)
            }
        })
    }

    /// Combines two computations sequentially into a tuple.
    #[must_use]
    pub fn product<B>(self, other: AsyncIO<B>) -> AsyncIO<(A, B)>
    where
        B: Send + 'static,
    {
        self.map2(other, |a, b| (a, b))
    }

    /// Waits `duration` on the tokio timer, then runs `self`.
    #[must_use]
    pub fn delay(self, duration: Duration) -> Self {
        AsyncIO::sleep(duration).then(self)
    }

    /// Runs both computations and returns whichever settles first.
    ///
    /// The losing future is not cancelled: inside a tokio runtime it is
    /// detached onto the runtime and its result discarded. Outside a
    /// runtime there is nowhere to detach it, so it is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::AsyncIO;
    ///
    /// let winner = AsyncIO::never().race(AsyncIO::pure("fast"));
    /// assert_eq!(futures::executor::block_on(winner.run_async()), "fast");
    /// ```
    #[must_use]
    pub fn race(self, other: Self) -> Self {
        Self::new(move || {
            let left = self.run_async();
            let right = other.run_async();
            async move {
                match future::select(left, right).await {
                    future::Either::Left((value, loser)) | future::Either::Right((value, loser)) => {
                        detach(loser);
                        value
                    }
                }
            }
        })
    }

    /// Runs `step` repeatedly until it yields `Either::Right`.
    ///
    /// `Either::Left(next)` feeds `next` into the following step. Each step
    /// is awaited in a loop, so the number of steps is not limited by stack
    /// depth.
    pub fn tail_rec_m<S, F>(initial: S, step: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(S) -> AsyncIO<Either<S, A>> + Send + Sync + 'static,
    {
        let step = Arc::new(step);
        Self::new(move || {
            let step = Arc::clone(&step);
            let initial = initial.clone();
            async move {
                let mut current = initial;
                loop {
                    let next = step(current);
                    match next.run_async().await {
                        Either::Left(state) => current = state,
                        Either::Right(done) => return done,
                    }
                }
            }
        })
    }
}

impl AsyncIO<()> {
    /// Completes no earlier than `duration` after it is invoked.
    ///
    /// Requires a tokio runtime with the time driver enabled.
    #[must_use]
    pub fn sleep(duration: Duration) -> Self {
        Self::new(move || tokio::time::sleep(duration))
    }
}

fn detach<A: Send + 'static>(loser: BoxFuture<'static, A>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            tracing::trace!("race settled; detaching losing future");
            drop(handle.spawn(loser));
        }
        Err(_) => {
            tracing::debug!("race settled outside a tokio runtime; finishing loser on a helper thread");
            let spawned = std::thread::Builder::new()
                .name("lamina-race-loser".to_string())
                .spawn(move || drop(futures::executor::block_on(loser)));
            if let Err(error) = spawned {
                tracing::warn!(%error, "could not start helper thread; losing future dropped");
            }
        }
    }
}

// =============================================================================
// Traversal
// =============================================================================

impl<B: Send + 'static> AsyncIO<Vec<B>> {
    /// Runs `function(index, input)` for each input, one at a time in index
    /// order, and collects the results.
    pub fn traverse_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        F: Fn(usize, T) -> AsyncIO<B> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move || {
            let function = Arc::clone(&function);
            traverse::sequential(Arc::clone(&inputs), move |index, input| {
                infallible(function(index, input).run_async())
            })
            .map(into_value)
        })
    }

    /// Invokes every `function(index, input)` before awaiting any, and
    /// collects the results in input order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::AsyncIO;
    ///
    /// let lengths = AsyncIO::traverse_par_with_index(vec!["a", "bcd"], |_, word| {
    ///     AsyncIO::pure(word.len())
    /// });
    /// assert_eq!(futures::executor::block_on(lengths.run_async()), vec![1, 3]);
    /// ```
    pub fn traverse_par_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync + 'static,
        F: Fn(usize, T) -> AsyncIO<B> + Send + Sync + 'static,
    {
        let inputs: Arc<[T]> = inputs.into_iter().collect();
        let function = Arc::new(function);
        Self::new(move || {
            let function = Arc::clone(&function);
            traverse::parallel(Arc::clone(&inputs), move |index, input| {
                infallible(function(index, input).run_async())
            })
            .map(into_value)
        })
    }
}

pub(crate) fn infallible<A>(
    future: BoxFuture<'static, A>,
) -> impl Future<Output = Result<A, Infallible>> + Send + 'static
where
    A: Send + 'static,
{
    future.map(Ok)
}

pub(crate) fn into_value<A>(result: Result<A, Infallible>) -> A {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

impl<A: Send + 'static> IntoFuture for AsyncIO<A> {
    type Output = A;
    type IntoFuture = BoxFuture<'static, A>;

    fn into_future(self) -> Self::IntoFuture {
        self.run_async()
    }
}

impl<A> std::fmt::Debug for AsyncIO<A> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("AsyncIO(<deferred>)")
    }
}

// =============================================================================
// Race Monoid
// =============================================================================

/// `AsyncIO` under racing: `combine` is [`AsyncIO::race`] and `empty` is
/// [`AsyncIO::never`].
///
/// # Examples
///
/// ```rust
/// use lamina::effect::{AsyncIO, Race};
/// use lamina::typeclass::Monoid;
///
/// let racers = vec![Race(AsyncIO::never()), Race(AsyncIO::pure(7))];
/// let Race(winner) = Race::combine_all(racers);
/// assert_eq!(futures::executor::block_on(winner.run_async()), 7);
/// ```
#[derive(Debug, Clone)]
pub struct Race<A>(pub AsyncIO<A>);

impl<A> Race<A> {
    /// Unwraps the inner `AsyncIO`.
    pub fn into_inner(self) -> AsyncIO<A> {
        self.0
    }
}

impl<A: Send + 'static> Semigroup for Race<A> {
    fn combine(self, other: Self) -> Self {
        Self(self.0.race(other.0))
    }
}

impl<A: Send + 'static> Monoid for Race<A> {
    fn empty() -> Self {
        Self(AsyncIO::never())
    }
}
