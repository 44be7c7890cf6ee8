//! Conversions between `Option` and `Result`.
//!
//! `Option` is the intermediate "present or absent" representation. Turning
//! it back into a `Result` needs an error for the absent case, supplied by
//! the caller.
//!
//! ```rust
//! use lamina::control::{from_result, to_result};
//!
//! let failed: Result<i32, String> = Err("not found".to_string());
//! let recovered = to_result(from_result(failed.clone()), || "not found".to_string());
//! assert_eq!(recovered, failed);
//! ```

/// Keeps the success value, dropping the error.
pub fn from_result<A, E>(result: Result<A, E>) -> Option<A> {
    result.ok()
}

/// Converts an `Option` into a `Result`, using `on_none` for the absent case.
///
/// `on_none` is only invoked when the option is `None`.
pub fn to_result<A, E, F>(option: Option<A>, on_none: F) -> Result<A, E>
where
    F: FnOnce() -> E,
{
    option.ok_or_else(on_none)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Ok(5))]
    #[case(Err("missing".to_string()))]
    fn round_trip_recovers_result(#[case] original: Result<i32, String>) {
        let recovered = to_result(from_result(original.clone()), || "missing".to_string());
        assert_eq!(recovered, original);
    }

    #[rstest]
    fn on_none_not_invoked_for_some() {
        let mut invoked = false;
        let result: Result<i32, &str> = to_result(Some(1), || {
            invoked = true;
            "absent"
        });
        assert_eq!(result, Ok(1));
        assert!(!invoked);
    }
}
