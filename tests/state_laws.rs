//! Property-based tests for State laws.
//!
//! ## Monad Laws
//! - Left Identity: pure(a).flat_map(f) == f(a)
//! - Right Identity: m.flat_map(pure) == m
//! - Associativity: m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))
//!
//! ## State Laws
//! - Get Put: get().flat_map(put) == pure(())
//! - Put Get: put(s).then(get()) returns s
//! - Put Put: put(s1).then(put(s2)) == put(s2)
//! - Modify Composition: modify(f).then(modify(g)) == modify(|s| g(f(s)))

use lamina::effect::State;
use proptest::prelude::*;

fn step(a: i32) -> State<i32, i32> {
    State::new(move |s: i32| (a.wrapping_add(s), s.wrapping_add(1)))
}

fn double(a: i32) -> State<i32, i32> {
    State::new(move |s: i32| (a.wrapping_mul(2), s.wrapping_mul(3)))
}

// =============================================================================
// Monad Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_state_monad_left_identity(value in -1000i32..1000i32, initial_state in -1000i32..1000i32) {
        let left: State<i32, i32> = State::pure(value).flat_map(step);
        let right = step(value);

        prop_assert_eq!(left.run(initial_state), right.run(initial_state));
    }

    #[test]
    fn prop_state_monad_right_identity(initial_state in -1000i32..1000i32) {
        let left = step(5).flat_map(State::pure);
        let right = step(5);

        prop_assert_eq!(left.run(initial_state), right.run(initial_state));
    }

    #[test]
    fn prop_state_monad_associativity(initial_state in -1000i32..1000i32) {
        let left = step(1).flat_map(step).flat_map(double);
        let right = step(1).flat_map(|x| step(x).flat_map(double));

        prop_assert_eq!(left.run(initial_state), right.run(initial_state));
    }

    #[test]
    fn prop_state_fmap_keeps_state(initial_state in -1000i32..1000i32) {
        let (_, mapped_state) = step(3).fmap(|x| x.wrapping_mul(7)).run(initial_state);
        let (_, original_state) = step(3).run(initial_state);

        prop_assert_eq!(mapped_state, original_state);
    }
}

// =============================================================================
// State Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_get_put(initial_state in any::<i32>()) {
        let left: State<i32, ()> = State::get().flat_map(State::put);
        let right: State<i32, ()> = State::pure(());

        prop_assert_eq!(left.run(initial_state), right.run(initial_state));
    }

    #[test]
    fn prop_put_get(initial_state in any::<i32>(), new_state in any::<i32>()) {
        let computation: State<i32, i32> = State::put(new_state).then(State::get());

        prop_assert_eq!(computation.run(initial_state), (new_state, new_state));
    }

    #[test]
    fn prop_put_put(initial_state in any::<i32>(), first in any::<i32>(), second in any::<i32>()) {
        let left: State<i32, ()> = State::put(first).then(State::put(second));
        let right: State<i32, ()> = State::put(second);

        prop_assert_eq!(left.run(initial_state), right.run(initial_state));
    }

    #[test]
    fn prop_modify_composition(initial_state in -1000i32..1000i32) {
        let add_one = |s: i32| s.wrapping_add(1);
        let triple = |s: i32| s.wrapping_mul(3);

        let left: State<i32, ()> = State::modify(add_one).then(State::modify(triple));
        let right: State<i32, ()> = State::modify(move |s| triple(add_one(s)));

        prop_assert_eq!(left.execute(initial_state), right.execute(initial_state));
    }

    #[test]
    fn prop_traverse_threads_state_in_index_order(values in prop::collection::vec(-100i32..100, 0..20)) {
        let length = values.len();
        let computation = State::traverse_with_index(values.clone(), |index, value| {
            State::new(move |visited: Vec<usize>| {
                let mut visited = visited;
                visited.push(index);
                (value, visited)
            })
        });

        let (results, visited) = computation.run(Vec::new());

        prop_assert_eq!(results, values);
        prop_assert_eq!(visited, (0..length).collect::<Vec<_>>());
    }
}
