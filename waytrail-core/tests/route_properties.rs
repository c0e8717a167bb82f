//! Property-based tests for route progression.
//!
//! # Invariants tested
//!
//! - **Contiguous order:** after any mix of appends and removals, waypoint
//!   orders read `0..n` in sequence.
//! - **Bounded progress:** progress stays within `[0.0, 1.0]`.
//! - **Monotonic cursor:** advancing never moves the cursor backwards and
//!   moves it by at most one.

use proptest::prelude::*;
use waytrail_core::{Place, Route, Waypoint};

#[derive(Debug, Clone)]
enum Edit {
    Append,
    Remove(usize),
    Advance,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => Just(Edit::Append),
        2 => (0_usize..16).prop_map(Edit::Remove),
        2 => Just(Edit::Advance),
    ]
}

fn apply(route: &mut Route, edit: &Edit, counter: &mut usize) {
    match edit {
        Edit::Append => {
            *counter += 1;
            route.append(Place::named(format!("Stop {counter}")));
        }
        Edit::Remove(index) => {
            if let Some(id) = route.points().get(*index).map(Waypoint::id) {
                route.remove(id);
            }
        }
        Edit::Advance => {
            route.advance();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: orders always match positions.
    #[test]
    fn orders_stay_contiguous(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut route = Route::new("Property route");
        let mut counter = 0;
        for edit in &edits {
            apply(&mut route, edit, &mut counter);
            let orders: Vec<_> = route.points().iter().map(Waypoint::order).collect();
            let expected: Vec<_> = (0..route.len()).collect();
            prop_assert_eq!(orders, expected);
        }
    }

    /// Property: progress is a fraction and the cursor never retreats.
    #[test]
    fn cursor_only_moves_forward(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut route = Route::new("Property route");
        let mut counter = 0;
        for edit in &edits {
            let before = route.current_point_index();
            let advanced = matches!(edit, Edit::Advance) && route.clone().advance();
            apply(&mut route, edit, &mut counter);
            let after = route.current_point_index();
            prop_assert!(after >= before);
            prop_assert_eq!(after - before, usize::from(advanced));
            prop_assert!((0.0..=1.0).contains(&route.progress()));
        }
    }
}
