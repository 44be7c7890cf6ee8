//! State - stateful computation.
//!
//! A `State<S, A>` wraps a function `S -> (A, S)`: given the current state
//! it produces a result and the next state. Sequential composition threads
//! the state left to right.
//!
//! # Laws
//!
//! - Left Identity: `State::pure(a).flat_map(f) == f(a)`
//! - Right Identity: `m.flat_map(State::pure) == m`
//! - Associativity: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
//! - Get Put: `get().flat_map(put) == pure(())`
//! - Put Get: `put(s).then(get())` returns `s`
//! - Put Put: `put(s1).then(put(s2)) == put(s2)`
//!
//! # Examples
//!
//! ```rust
//! use lamina::effect::State;
//!
//! fn increment() -> State<i32, ()> {
//!     State::modify(|count| count + 1)
//! }
//!
//! let computation = increment()
//!     .then(increment())
//!     .then(increment())
//!     .then(State::get());
//!
//! assert_eq!(computation.run(0), (3, 3));
//! ```

use std::rc::Rc;

/// A computation that threads a state of type `S` and produces an `A`.
///
/// # Examples
///
/// ```rust
/// use lamina::effect::State;
///
/// let computation: State<i32, i32> = State::get()
///     .flat_map(|current| State::put(current + 1).then(State::pure(current)));
///
/// let (result, final_state) = computation.run(10);
/// assert_eq!(result, 10);
/// assert_eq!(final_state, 11);
/// ```
pub struct State<S, A>
where
    S: 'static,
    A: 'static,
{
    run_function: Rc<dyn Fn(S) -> (A, S)>,
}

impl<S, A> State<S, A>
where
    S: 'static,
    A: 'static,
{
    /// Creates a new State from a state transition function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::State;
    ///
    /// let state: State<i32, i32> = State::new(|s: i32| (s * 2, s + 1));
    /// assert_eq!(state.run(10), (20, 11));
    /// ```
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(S) -> (A, S) + 'static,
    {
        Self {
            run_function: Rc::new(function),
        }
    }

    /// Runs the computation, returning `(result, final_state)`.
    pub fn run(&self, initial_state: S) -> (A, S) {
        (self.run_function)(initial_state)
    }

    /// Runs the computation and returns only the result.
    ///
    /// ```rust
    /// use lamina::effect::State;
    ///
    /// let state: State<i32, i32> = State::new(|s: i32| (s * 2, s + 1));
    /// assert_eq!(state.evaluate(10), 20);
    /// ```
    pub fn evaluate(&self, initial_state: S) -> A {
        let (result, _) = self.run(initial_state);
        result
    }

    /// Runs the computation and returns only the final state.
    ///
    /// ```rust
    /// use lamina::effect::State;
    ///
    /// let state: State<i32, i32> = State::new(|s: i32| (s * 2, s + 1));
    /// assert_eq!(state.execute(10), 11);
    /// ```
    pub fn execute(&self, initial_state: S) -> S {
        let (_, final_state) = self.run(initial_state);
        final_state
    }

    /// Returns a constant value without touching the state.
    pub fn pure(value: A) -> Self
    where
        A: Clone,
    {
        Self::new(move |state| (value.clone(), state))
    }

    /// Maps the result; the state passes through unchanged.
    pub fn fmap<B, F>(self, function: F) -> State<S, B>
    where
        F: Fn(A) -> B + 'static,
        B: 'static,
    {
        let original_function = self.run_function;
        State::new(move |state| {
            let (result, new_state) = (original_function)(state);
            (function(result), new_state)
        })
    }

    /// Runs `self` to `(a, s2)`, then runs `function(a)` on `s2`.
    pub fn flat_map<B, F>(self, function: F) -> State<S, B>
    where
        F: Fn(A) -> State<S, B> + 'static,
        B: 'static,
    {
        let original_function = self.run_function;
        State::new(move |state| {
            let (result, intermediate_state) = (original_function)(state);
            function(result).run(intermediate_state)
        })
    }

    /// Alias for `flat_map`.
    pub fn and_then<B, F>(self, function: F) -> State<S, B>
    where
        F: Fn(A) -> State<S, B> + 'static,
        B: 'static,
    {
        self.flat_map(function)
    }

    /// Sequences two computations, discarding the first result.
    #[must_use]
    pub fn then<B>(self, next: State<S, B>) -> State<S, B>
    where
        B: 'static,
    {
        self.flat_map(move |_| next.clone())
    }

    /// Runs `self` then `other`, threading the state, and combines the results.
    pub fn map2<B, C, F>(self, other: State<S, B>, function: F) -> State<S, C>
    where
        F: Fn(A, B) -> C + 'static,
        B: 'static,
        C: 'static,
    {
        let self_function = self.run_function;
        let other_function = other.run_function;
        State::new(move |state| {
            let (result_a, intermediate_state) = (self_function)(state);
            let (result_b, final_state) = (other_function)(intermediate_state);
            (function(result_a, result_b), final_state)
        })
    }

    /// Combines two computations into a tuple.
    #[must_use]
    pub fn product<B>(self, other: State<S, B>) -> State<S, (A, B)>
    where
        B: 'static,
    {
        self.map2(other, |a, b| (a, b))
    }

    /// Projects a value from the state without changing it.
    ///
    /// ```rust
    /// use lamina::effect::State;
    ///
    /// let length: State<Vec<i32>, usize> = State::gets(Vec::len);
    /// assert_eq!(length.run(vec![1, 2]), (2, vec![1, 2]));
    /// ```
    pub fn gets<F>(projection: F) -> Self
    where
        F: Fn(&S) -> A + 'static,
    {
        Self::new(move |state| {
            let result = projection(&state);
            (result, state)
        })
    }
}

impl<St> State<St, St>
where
    St: Clone + 'static,
{
    /// Returns the current state as the result.
    #[must_use]
    pub fn get() -> Self {
        Self::new(|state: St| (state.clone(), state))
    }
}

impl<S> State<S, ()>
where
    S: 'static,
{
    /// Replaces the state.
    pub fn put(new_state: S) -> Self
    where
        S: Clone,
    {
        Self::new(move |_| ((), new_state.clone()))
    }

    /// Applies `modifier` to the state.
    pub fn modify<F>(modifier: F) -> Self
    where
        F: Fn(S) -> S + 'static,
    {
        Self::new(move |state| ((), modifier(state)))
    }
}

// =============================================================================
// Traversal
// =============================================================================

impl<S, B> State<S, Vec<B>>
where
    S: 'static,
    B: 'static,
{
    /// Runs `function(index, input)` for each input, threading the state in
    /// index order, and collects the results.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::State;
    ///
    /// let numbered = State::traverse_with_index(vec!["a", "b"], |_, name| {
    ///     State::new(move |next: u32| (format!("{name}{next}"), next + 1))
    /// });
    /// assert_eq!(numbered.run(7), (vec!["a7".to_string(), "b8".to_string()], 9));
    /// ```
    pub fn traverse_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + 'static,
        F: Fn(usize, T) -> State<S, B> + 'static,
    {
        let inputs: Rc<[T]> = inputs.into_iter().collect();
        Self::new(move |initial_state| {
            let mut results = Vec::with_capacity(inputs.len());
            let mut state = initial_state;
            for (index, input) in inputs.iter().cloned().enumerate() {
                let (result, next_state) = function(index, input).run(state);
                results.push(result);
                state = next_state;
            }
            (results, state)
        })
    }
}

impl<S, A> Clone for State<S, A>
where
    S: 'static,
    A: 'static,
{
    fn clone(&self) -> Self {
        Self {
            run_function: self.run_function.clone(),
        }
    }
}

impl<S, A> std::fmt::Display for State<S, A>
where
    S: 'static,
    A: 'static,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "<State>")
    }
}
