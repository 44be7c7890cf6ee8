#![cfg(feature = "async")]
//! Property-based tests for AsyncIO laws.
//!
//! - Left Identity: pure(a).flat_map(f) == f(a)
//! - Right Identity: m.flat_map(pure) == m
//! - Associativity: m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))
//! - apply and apply_par agree on the value they produce

use lamina::effect::AsyncIO;
use proptest::prelude::*;

fn block_on<A: Send + 'static>(io: AsyncIO<A>) -> A {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    runtime.block_on(io.run_async())
}

// =============================================================================
// Monad Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_async_io_monad_left_identity(value: i32) {
        let function = |n: i32| AsyncIO::pure(n.wrapping_mul(2));

        let left_result = block_on(AsyncIO::pure(value).flat_map(function));
        let right_result = block_on(function(value));

        prop_assert_eq!(left_result, right_result);
    }

    #[test]
    fn prop_async_io_monad_right_identity(value: i32) {
        let left_result = block_on(AsyncIO::pure(value).flat_map(AsyncIO::pure));

        prop_assert_eq!(left_result, value);
    }

    #[test]
    fn prop_async_io_monad_associativity(value: i32) {
        let function1 = |n: i32| AsyncIO::pure(n.wrapping_add(1));
        let function2 = |n: i32| AsyncIO::pure(n.wrapping_mul(2));

        let left_result = block_on(AsyncIO::pure(value).flat_map(function1).flat_map(function2));
        let right_result =
            block_on(AsyncIO::pure(value).flat_map(move |x| function1(x).flat_map(function2)));

        prop_assert_eq!(left_result, right_result);
    }
}

// =============================================================================
// Applicative Consistency
// =============================================================================

proptest! {
    #[test]
    fn prop_async_io_apply_matches_apply_par(value: i32, offset: i32) {
        let function = AsyncIO::pure(move |n: i32| n.wrapping_add(offset));

        let sequential = block_on(AsyncIO::pure(value).apply(function.clone()));
        let parallel = block_on(AsyncIO::pure(value).apply_par(function));

        prop_assert_eq!(sequential, parallel);
    }

    #[test]
    fn prop_async_io_map2_matches_map2_par(a: i32, b: i32) {
        let sequential = block_on(AsyncIO::pure(a).map2(AsyncIO::pure(b), i32::wrapping_sub));
        let parallel = block_on(AsyncIO::pure(a).map2_par(AsyncIO::pure(b), i32::wrapping_sub));

        prop_assert_eq!(sequential, parallel);
        prop_assert_eq!(sequential, a.wrapping_sub(b));
    }
}
