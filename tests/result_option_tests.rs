//! Integration tests for the Result and Option helpers.

use lamina::control::{ResultExt, from_predicate, from_result, lift_throwable, to_result, try_catch};
use proptest::prelude::*;
use rstest::rstest;

#[derive(Debug, Clone, PartialEq, Eq)]
enum LookupError {
    Missing,
    Crashed(String),
}

proptest! {
    #[test]
    fn prop_option_round_trip_success(value: i64) {
        let original: Result<i64, LookupError> = Ok(value);

        prop_assert_eq!(to_result(from_result(original.clone()), || LookupError::Missing), original);
    }

    #[test]
    fn prop_option_round_trip_failure(_seed: u8) {
        let original: Result<i64, LookupError> = Err(LookupError::Missing);

        prop_assert_eq!(to_result(from_result(original.clone()), || LookupError::Missing), original);
    }

    #[test]
    fn prop_result_flat_map_left_identity(value: i32) {
        let function = |n: i32| if n % 2 == 0 { Ok(n / 2) } else { Err(LookupError::Missing) };
        let left: Result<i32, LookupError> = Ok(value).and_then(function);

        prop_assert_eq!(left, function(value));
    }

    #[test]
    fn prop_map_both_agrees_with_map_and_map_err(value: i32, fails: bool) {
        let original: Result<i32, i32> = if fails { Err(value) } else { Ok(value) };
        let both = original.map_both(|e| e.wrapping_neg(), |a| a.wrapping_mul(3));
        let separately = original.map(|a| a.wrapping_mul(3)).map_err(|e| e.wrapping_neg());

        prop_assert_eq!(both, separately);
    }
}

#[rstest]
#[case(4, Ok(4))]
#[case(-4, Err("-4 is negative".to_string()))]
fn test_from_predicate(#[case] value: i32, #[case] expected: Result<i32, String>) {
    let result = from_predicate(value, |n| *n >= 0, |n| format!("{n} is negative"));

    assert_eq!(result, expected);
}

#[rstest]
fn test_or_else_with_only_runs_on_failure() {
    let ok: Result<i32, LookupError> = Ok(1);
    let failed: Result<i32, LookupError> = Err(LookupError::Missing);

    assert_eq!(ok.or_else_with(|| unreachable!()), Ok(1));
    assert_eq!(failed.or_else_with(|| Ok(0)), Ok(0));
}

#[rstest]
fn test_try_catch_projects_panic_payload() {
    let result: Result<i32, LookupError> = try_catch(
        || panic!("index {} out of range", 9),
        |error| LookupError::Crashed(error.message().to_string()),
    );

    assert_eq!(result, Err(LookupError::Crashed("index 9 out of range".to_string())));
}

#[rstest]
fn test_lift_throwable_guards_every_call() {
    let first = lift_throwable(
        |items: Vec<i32>| items[0],
        |error| LookupError::Crashed(error.message().to_string()),
    );

    assert_eq!(first(vec![3, 4]), Ok(3));
    assert!(matches!(first(Vec::new()), Err(LookupError::Crashed(_))));
}
