//! Property tests for the answer domain analysis.

use std::collections::BTreeSet;

use proptest::prelude::*;
use survey_pivot::{continuity_warning, count_negative_map, normalized_by_median_map};

fn sorted_codes() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::btree_set(-20i64..200, 0..40)
        .prop_map(|codes: BTreeSet<i64>| codes.into_iter().collect())
}

proptest! {
    #[test]
    fn count_negative_splits_at_the_middle(codes in sorted_codes()) {
        let map = count_negative_map(&codes);
        let n = codes.len();
        prop_assert_eq!(map.len(), n);

        let ones = map.values().filter(|v| **v == 1.0).count();
        let halves = map.values().filter(|v| **v == 0.5).count();
        let zeros = map.values().filter(|v| **v == 0.0).count();
        prop_assert_eq!(ones, n / 2);
        prop_assert_eq!(halves, n % 2);
        prop_assert_eq!(zeros, n / 2);

        for (idx, code) in codes.iter().enumerate() {
            let value = map[&code.to_string()];
            if idx < n / 2 {
                prop_assert_eq!(value, 1.0);
            } else {
                prop_assert!(value < 1.0);
            }
        }
    }

    #[test]
    fn normalized_sign_follows_median(codes in sorted_codes()) {
        let map = normalized_by_median_map(&codes);
        prop_assert_eq!(map.len(), codes.len());
        let n = codes.len();
        for (idx, code) in codes.iter().enumerate() {
            let value = map[&code.to_string()];
            if idx < n / 2 {
                prop_assert!(value < 0, "code {} below the median mapped to {}", code, value);
            } else if n % 2 == 1 && idx == n / 2 {
                prop_assert_eq!(value, 0);
            } else {
                prop_assert!(value > 0, "code {} above the median mapped to {}", code, value);
            }
        }
    }

    #[test]
    fn normalized_is_antisymmetric_for_consecutive_codes(start in 1i64..10, len in 1usize..15) {
        let codes: Vec<i64> = (start..start + len as i64).collect();
        let map = normalized_by_median_map(&codes);
        for idx in 0..len {
            let low = map[&codes[idx].to_string()];
            let high = map[&codes[len - 1 - idx].to_string()];
            prop_assert_eq!(low, -high);
        }
    }

    #[test]
    fn consecutive_positive_codes_pass_continuity(start in 1i64..50, len in 0usize..20) {
        let codes: Vec<i64> = (start..start + len as i64).collect();
        prop_assert_eq!(continuity_warning("Q1", &codes), None);
    }
}
