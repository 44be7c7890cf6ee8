//! IO - deferred synchronous computation.
//!
//! `IO<A>` describes a synchronous computation producing an `A`. Nothing
//! happens until `run_unsafe` is called, which should happen at the
//! program's edge.
//!
//! An `IO` is a description, not a running task: `run_unsafe` may be called
//! any number of times and re-executes the side effects on every call.
//! Nothing is memoized.
//!
//! # Examples
//!
//! ```rust
//! use lamina::effect::IO;
//!
//! let io = IO::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| IO::pure(x + 1));
//! assert_eq!(io.run_unsafe(), 21);
//! ```
//!
//! # Side Effect Deferral
//!
//! ```rust
//! use lamina::effect::IO;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let runs = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&runs);
//! let io = IO::new(move || {
//!     counter.set(counter.get() + 1);
//!     counter.get()
//! });
//!
//! assert_eq!(runs.get(), 0);
//! assert_eq!(io.run_unsafe(), 1);
//! assert_eq!(io.run_unsafe(), 2);
//! ```

use std::rc::Rc;
use std::time::Duration;

use crate::control::{Either, try_catch};

use super::PanicError;

/// A deferred, repeatable synchronous computation.
///
/// # Monad Laws
///
/// 1. **Left Identity**: `IO::pure(a).flat_map(f) == f(a)`
/// 2. **Right Identity**: `m.flat_map(IO::pure) == m`
/// 3. **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
pub struct IO<A> {
    run_function: Rc<dyn Fn() -> A>,
}

impl<A> Clone for IO<A> {
    fn clone(&self) -> Self {
        Self {
            run_function: Rc::clone(&self.run_function),
        }
    }
}

impl<A: 'static> IO<A> {
    /// Creates a new IO action from a closure.
    ///
    /// The closure is not executed until `run_unsafe` is called, and is
    /// executed again on every later call.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn() -> A + 'static,
    {
        Self {
            run_function: Rc::new(action),
        }
    }

    /// Wraps a pure value in an IO action.
    ///
    /// ```rust
    /// use lamina::effect::IO;
    ///
    /// assert_eq!(IO::pure(42).run_unsafe(), 42);
    /// ```
    pub fn pure(value: A) -> Self
    where
        A: Clone,
    {
        Self::new(move || value.clone())
    }

    /// Executes the IO action and returns the result.
    ///
    /// Named `run_unsafe` because calling it performs the described side
    /// effects. It is memory-safe.
    pub fn run_unsafe(&self) -> A {
        (self.run_function)()
    }

    /// Transforms the result of an IO action using a function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::IO;
    ///
    /// let io = IO::pure(21).fmap(|x| x * 2);
    /// assert_eq!(io.run_unsafe(), 42);
    /// ```
    pub fn fmap<B, F>(self, function: F) -> IO<B>
    where
        F: Fn(A) -> B + 'static,
        B: 'static,
    {
        IO::new(move || function(self.run_unsafe()))
    }

    /// Chains IO actions, passing the result of the first to a function
    /// that produces the second.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::IO;
    ///
    /// let io = IO::pure(10).flat_map(|x| IO::pure(x * 2));
    /// assert_eq!(io.run_unsafe(), 20);
    /// ```
    pub fn flat_map<B, F>(self, function: F) -> IO<B>
    where
        F: Fn(A) -> IO<B> + 'static,
        B: 'static,
    {
        IO::new(move || function(self.run_unsafe()).run_unsafe())
    }

    /// Alias for `flat_map`.
    pub fn and_then<B, F>(self, function: F) -> IO<B>
    where
        F: Fn(A) -> IO<B> + 'static,
        B: 'static,
    {
        self.flat_map(function)
    }

    /// Sequences two IO actions, discarding the result of the first.
    pub fn then<B>(self, next: IO<B>) -> IO<B>
    where
        B: 'static,
    {
        self.flat_map(move |_| next.clone())
    }

    /// Applies the function produced by `function_io` to the value of `self`.
    ///
    /// `function_io` runs first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::IO;
    ///
    /// let add_one = IO::pure(|x: i32| x + 1);
    /// assert_eq!(IO::pure(41).apply(add_one).run_unsafe(), 42);
    /// ```
    pub fn apply<B, F>(self, function_io: IO<F>) -> IO<B>
    where
        F: Fn(A) -> B + 'static,
        B: 'static,
    {
        IO::new(move || {
            let function = function_io.run_unsafe();
            function(self.run_unsafe())
        })
    }

    /// Combines two IO actions using a function. `self` runs first.
    pub fn map2<B, C, F>(self, other: IO<B>, function: F) -> IO<C>
    where
        F: Fn(A, B) -> C + 'static,
        B: 'static,
        C: 'static,
    {
        IO::new(move || {
            let first = self.run_unsafe();
            let second = other.run_unsafe();
            function(first, second)
        })
    }

    /// Combines two IO actions into a tuple.
    pub fn product<B>(self, other: IO<B>) -> IO<(A, B)>
    where
        B: 'static,
    {
        self.map2(other, |a, b| (a, b))
    }

    /// Blocks the current thread for `duration`, then runs `self`.
    ///
    /// The wait happens on every run, not at construction.
    pub fn delay(self, duration: Duration) -> Self {
        Self::new(move || {
            std::thread::sleep(duration);
            self.run_unsafe()
        })
    }

    /// Converts a panic raised while running `self` into a typed failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::IO;
    ///
    /// let panicking: IO<i32> = IO::new(|| panic!("oops"));
    /// let caught = panicking.try_catch(|error| error.message().to_string());
    /// assert_eq!(caught.run_unsafe(), Err("oops".to_string()));
    ///
    /// let fine = IO::pure(42).try_catch(|error| error.message().to_string());
    /// assert_eq!(fine.run_unsafe(), Ok(42));
    /// ```
    pub fn try_catch<E, H>(self, on_panic: H) -> IO<Result<A, E>>
    where
        H: Fn(PanicError) -> E + 'static,
        E: 'static,
    {
        IO::new(move || try_catch(|| self.run_unsafe(), &on_panic))
    }

    /// Runs `step` repeatedly until it yields `Either::Right`.
    ///
    /// `Either::Left(next)` feeds `next` into the following step. The loop
    /// is iterative, so the number of steps is not limited by stack depth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::control::Either;
    /// use lamina::effect::IO;
    ///
    /// let sum = IO::tail_rec_m((0_u64, 0_u64), |(n, total)| {
    ///     IO::pure(if n > 100 { Either::Right(total) } else { Either::Left((n + 1, total + n)) })
    /// });
    /// assert_eq!(sum.run_unsafe(), 5050);
    /// ```
    pub fn tail_rec_m<S, F>(initial: S, step: F) -> Self
    where
        S: Clone + 'static,
        F: Fn(S) -> IO<Either<S, A>> + 'static,
    {
        Self::new(move || {
            let mut current = initial.clone();
            loop {
                match step(current).run_unsafe() {
                    Either::Left(next) => current = next,
                    Either::Right(done) => return done,
                }
            }
        })
    }
}

impl IO<()> {
    /// An IO action that blocks the current thread for `duration`.
    pub fn sleep(duration: Duration) -> Self {
        Self::new(move || std::thread::sleep(duration))
    }
}

// =============================================================================
// Traversal
// =============================================================================

impl<B: 'static> IO<Vec<B>> {
    /// Runs `function(index, input)` for each input in order and collects
    /// the results.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::IO;
    ///
    /// let io = IO::traverse_with_index(vec!["a", "b"], |index, name| {
    ///     IO::pure(format!("{index}:{name}"))
    /// });
    /// assert_eq!(io.run_unsafe(), vec!["0:a".to_string(), "1:b".to_string()]);
    /// ```
    pub fn traverse_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + 'static,
        F: Fn(usize, T) -> IO<B> + 'static,
    {
        let inputs: Rc<[T]> = inputs.into_iter().collect();
        Self::new(move || {
            inputs
                .iter()
                .cloned()
                .enumerate()
                .map(|(index, input)| function(index, input).run_unsafe())
                .collect()
        })
    }
}

impl<A> std::fmt::Debug for IO<A> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("IO(<deferred>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::{Cell, RefCell};

    #[rstest]
    fn test_io_pure_and_run() {
        assert_eq!(IO::pure(42).run_unsafe(), 42);
    }

    #[rstest]
    fn test_io_new_is_deferred() {
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        let io = IO::new(move || counter.set(counter.get() + 1));
        assert_eq!(runs.get(), 0);
        io.run_unsafe();
        io.run_unsafe();
        assert_eq!(runs.get(), 2);
    }

    #[rstest]
    fn test_io_then() {
        assert_eq!(IO::pure(10).then(IO::pure(20)).run_unsafe(), 20);
    }

    #[rstest]
    fn test_io_map2_runs_left_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let left_log = Rc::clone(&log);
        let right_log = Rc::clone(&log);
        let left = IO::new(move || left_log.borrow_mut().push("left"));
        let right = IO::new(move || right_log.borrow_mut().push("right"));
        left.map2(right, |(), ()| ()).run_unsafe();
        assert_eq!(*log.borrow(), vec!["left", "right"]);
    }

    #[rstest]
    fn test_io_apply_runs_function_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let function_log = Rc::clone(&log);
        let value_log = Rc::clone(&log);
        let function_io = IO::new(move || {
            function_log.borrow_mut().push("function");
            |x: i32| x * 3
        });
        let value_io = IO::new(move || {
            value_log.borrow_mut().push("value");
            5
        });
        assert_eq!(value_io.apply(function_io).run_unsafe(), 15);
        assert_eq!(*log.borrow(), vec!["function", "value"]);
    }

    #[rstest]
    fn test_io_product() {
        assert_eq!(IO::pure(10).product(IO::pure(20)).run_unsafe(), (10, 20));
    }

    #[rstest]
    fn test_io_try_catch_maps_panic() {
        let io: IO<i32> = IO::new(|| panic!("bad input"));
        let caught = io.try_catch(|error| error);
        assert_eq!(caught.run_unsafe(), Err(PanicError::new("bad input")));
    }

    #[rstest]
    fn test_io_tail_rec_m_counts_down() {
        let io = IO::tail_rec_m(10_i32, |n| {
            IO::pure(if n == 0 {
                Either::Right("done")
            } else {
                Either::Left(n - 1)
            })
        });
        assert_eq!(io.run_unsafe(), "done");
        assert_eq!(io.run_unsafe(), "done");
    }

    #[rstest]
    fn test_io_traverse_with_index_runs_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let shared = Rc::clone(&log);
        let io = IO::traverse_with_index(vec![3, 1, 2], move |index, value| {
            let shared = Rc::clone(&shared);
            IO::new(move || {
                shared.borrow_mut().push(index);
                value * 10
            })
        });
        assert_eq!(io.run_unsafe(), vec![30, 10, 20]);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[rstest]
    fn test_io_traverse_with_index_empty() {
        let io = IO::traverse_with_index(Vec::<i32>::new(), |_, value| IO::pure(value));
        assert!(io.run_unsafe().is_empty());
    }
}
