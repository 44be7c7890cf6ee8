//! Reader - environment reading computation.
//!
//! A `Reader<R, A>` wraps a function `R -> A`. Composing readers threads the
//! same environment through every step, which makes the environment a
//! natural place for configuration and injected dependencies.
//!
//! A computation written against a narrow environment is used inside a wider
//! one with [`Reader::local`], which projects the wide environment down to
//! the narrow one.
//!
//! # Laws
//!
//! - Left Identity: `Reader::pure(a).flat_map(f) == f(a)`
//! - Right Identity: `m.flat_map(Reader::pure) == m`
//! - Associativity: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
//! - Ask Retrieval: `Reader::ask().run(r) == r`
//! - Local Identity: `Reader::local(|r| r, m) == m`
//!
//! # Examples
//!
//! ```rust
//! use lamina::effect::Reader;
//!
//! #[derive(Clone)]
//! struct Config {
//!     port: u16,
//!     host: String,
//! }
//!
//! fn port() -> Reader<Config, u16> {
//!     Reader::asks(|config: Config| config.port)
//! }
//!
//! fn host() -> Reader<Config, String> {
//!     Reader::asks(|config: Config| config.host)
//! }
//!
//! let address = host().map2(port(), |host, port| format!("{host}:{port}"));
//! let config = Config { port: 8080, host: "localhost".to_string() };
//! assert_eq!(address.run(config), "localhost:8080");
//! ```

use std::rc::Rc;

/// A computation that reads from an environment of type `R`.
///
/// # Examples
///
/// ```rust
/// use lamina::effect::Reader;
///
/// let computation: Reader<i32, i32> = Reader::ask()
///     .flat_map(|environment| Reader::pure(environment * 2));
///
/// assert_eq!(computation.run(21), 42);
/// ```
pub struct Reader<R, A>
where
    R: 'static,
    A: 'static,
{
    run_function: Rc<dyn Fn(R) -> A>,
}

impl<R, A> Reader<R, A>
where
    R: 'static,
    A: 'static,
{
    /// Creates a new Reader from a function.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(R) -> A + 'static,
    {
        Self {
            run_function: Rc::new(function),
        }
    }

    /// Runs the Reader with the given environment.
    ///
    /// A Reader can be run any number of times.
    pub fn run(&self, environment: R) -> A {
        (self.run_function)(environment)
    }

    /// Creates a Reader that returns a constant value, ignoring the environment.
    pub fn pure(value: A) -> Self
    where
        A: Clone,
    {
        Self::new(move |_| value.clone())
    }

    /// Maps a function over the result of this Reader.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::Reader;
    ///
    /// let reader: Reader<i32, i32> = Reader::new(|environment| environment);
    /// assert_eq!(reader.fmap(|value| value * 2).run(21), 42);
    /// ```
    pub fn fmap<B, F>(self, function: F) -> Reader<R, B>
    where
        F: Fn(A) -> B + 'static,
        B: 'static,
    {
        let original_function = self.run_function;
        Reader::new(move |environment| function((original_function)(environment)))
    }

    /// Chains this Reader with a function that produces another Reader.
    ///
    /// Both readers see the same environment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::Reader;
    ///
    /// let reader: Reader<i32, i32> = Reader::new(|environment| environment);
    /// let chained = reader.flat_map(|value| Reader::new(move |environment| value + environment));
    /// assert_eq!(chained.run(10), 20);
    /// ```
    pub fn flat_map<B, F>(self, function: F) -> Reader<R, B>
    where
        F: Fn(A) -> Reader<R, B> + 'static,
        B: 'static,
        R: Clone,
    {
        let original_function = self.run_function;
        Reader::new(move |environment: R| {
            let a = (original_function)(environment.clone());
            function(a).run(environment)
        })
    }

    /// Alias for `flat_map`.
    pub fn and_then<B, F>(self, function: F) -> Reader<R, B>
    where
        F: Fn(A) -> Reader<R, B> + 'static,
        B: 'static,
        R: Clone,
    {
        self.flat_map(function)
    }

    /// Sequences two Readers, discarding the first result.
    #[must_use]
    pub fn then<B>(self, next: Reader<R, B>) -> Reader<R, B>
    where
        B: 'static,
        R: Clone,
    {
        self.flat_map(move |_| next.clone())
    }

    /// Combines two Readers using a binary function.
    pub fn map2<B, C, F>(self, other: Reader<R, B>, function: F) -> Reader<R, C>
    where
        F: Fn(A, B) -> C + 'static,
        B: 'static,
        C: 'static,
        R: Clone,
    {
        let self_function = self.run_function;
        let other_function = other.run_function;
        Reader::new(move |environment: R| {
            let a = (self_function)(environment.clone());
            let b = (other_function)(environment);
            function(a, b)
        })
    }

    /// Combines two Readers into a tuple.
    #[must_use]
    pub fn product<B>(self, other: Reader<R, B>) -> Reader<R, (A, B)>
    where
        B: 'static,
        R: Clone,
    {
        self.map2(other, |a, b| (a, b))
    }

    /// Creates a Reader that projects a value from the environment.
    pub fn asks<F>(projection: F) -> Self
    where
        F: Fn(R) -> A + 'static,
    {
        Self::new(projection)
    }

    /// Runs `computation` against an environment derived from the outer one.
    ///
    /// `modifier` maps the outer environment to the one `computation`
    /// expects, so a reader over a narrow environment can be embedded in a
    /// wider one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::Reader;
    ///
    /// let doubled: Reader<i32, i32> = Reader::new(|environment| environment * 2);
    /// let shifted = Reader::local(|environment: i32| environment + 10, doubled);
    /// assert_eq!(shifted.run(5), 30);
    ///
    /// let port: Reader<u16, String> = Reader::new(|port| format!(":{port}"));
    /// let from_pair: Reader<(String, u16), String> = Reader::local(|(_, port): (String, u16)| port, port);
    /// assert_eq!(from_pair.run(("localhost".to_string(), 80)), ":80");
    /// ```
    pub fn local<Outer, F>(modifier: F, computation: Self) -> Reader<Outer, A>
    where
        F: Fn(Outer) -> R + 'static,
        Outer: 'static,
    {
        let computation_function = computation.run_function;
        Reader::new(move |environment| (computation_function)(modifier(environment)))
    }
}

impl<Env> Reader<Env, Env>
where
    Env: 'static,
{
    /// Creates a Reader that returns the entire environment.
    #[must_use]
    pub fn ask() -> Self {
        Self::new(|environment| environment)
    }
}

// =============================================================================
// Traversal
// =============================================================================

impl<R, B> Reader<R, Vec<B>>
where
    R: Clone + 'static,
    B: 'static,
{
    /// Runs `function(index, input)` for each input in order against the
    /// same environment and collects the results.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::effect::Reader;
    ///
    /// let scaled = Reader::traverse_with_index(vec![1, 2, 3], |_, value| {
    ///     Reader::new(move |factor: i32| value * factor)
    /// });
    /// assert_eq!(scaled.run(10), vec![10, 20, 30]);
    /// ```
    pub fn traverse_with_index<T, I, F>(inputs: I, function: F) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + 'static,
        F: Fn(usize, T) -> Reader<R, B> + 'static,
    {
        let inputs: Rc<[T]> = inputs.into_iter().collect();
        Self::new(move |environment: R| {
            inputs
                .iter()
                .cloned()
                .enumerate()
                .map(|(index, input)| function(index, input).run(environment.clone()))
                .collect()
        })
    }
}

impl<R, A> Clone for Reader<R, A>
where
    R: 'static,
    A: 'static,
{
    fn clone(&self) -> Self {
        Self {
            run_function: self.run_function.clone(),
        }
    }
}

impl<R, A> std::fmt::Display for Reader<R, A>
where
    R: 'static,
    A: 'static,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "<Reader>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_display_reader() {
        let reader: Reader<i32, i32> = Reader::new(|environment| environment * 2);
        assert_eq!(format!("{reader}"), "<Reader>");
    }

    #[rstest]
    fn reader_pure_ignores_environment() {
        let reader: Reader<i32, &str> = Reader::pure("constant");
        assert_eq!(reader.run(0), "constant");
        assert_eq!(reader.run(100), "constant");
    }

    #[rstest]
    fn reader_ask_returns_environment() {
        let reader: Reader<i32, i32> = Reader::ask();
        assert_eq!(reader.run(42), 42);
    }

    #[rstest]
    fn reader_asks_projects_environment() {
        let reader: Reader<i32, String> = Reader::asks(|environment: i32| environment.to_string());
        assert_eq!(reader.run(42), "42");
    }

    #[rstest]
    fn reader_then_discards_first() {
        let first: Reader<i32, i32> = Reader::ask();
        assert_eq!(first.then(Reader::pure("result")).run(42), "result");
    }

    #[rstest]
    fn reader_local_modifies_environment() {
        let reader: Reader<i32, i32> = Reader::new(|environment| environment * 2);
        let local_reader = Reader::local(|environment: i32| environment + 10, reader);
        assert_eq!(local_reader.run(5), 30);
    }

    #[rstest]
    fn reader_local_narrows_environment() {
        #[derive(Clone)]
        struct Wide {
            name: &'static str,
            retries: u8,
        }

        let retries: Reader<u8, u8> = Reader::ask();
        let name: Reader<&'static str, &'static str> = Reader::ask();
        let combined = Reader::local(|wide: Wide| wide.retries, retries).map2(
            Reader::local(|wide: Wide| wide.name, name),
            |retries, name| format!("{name}x{retries}"),
        );
        assert_eq!(combined.run(Wide { name: "svc", retries: 3 }), "svcx3");
    }

    #[rstest]
    fn reader_map2_combines_readers() {
        let reader1: Reader<i32, i32> = Reader::new(|environment| environment);
        let reader2: Reader<i32, i32> = Reader::new(|environment| environment * 2);
        assert_eq!(reader1.map2(reader2, |a, b| a + b).run(10), 30);
    }

    #[rstest]
    fn reader_product_pairs_results() {
        let reader1: Reader<i32, i32> = Reader::ask();
        assert_eq!(reader1.product(Reader::pure("x")).run(1), (1, "x"));
    }

    #[rstest]
    fn reader_traverse_with_index_passes_indices() {
        let reader = Reader::traverse_with_index(vec!["a", "b", "c"], |index, name| {
            Reader::new(move |prefix: String| format!("{prefix}{index}{name}"))
        });
        assert_eq!(
            reader.run(">".to_string()),
            vec![">0a".to_string(), ">1b".to_string(), ">2c".to_string()]
        );
    }
}
