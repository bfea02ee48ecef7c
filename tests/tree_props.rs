use proptest::prelude::*;

use hlbrowse::{CallNumber, CallNumberRange, RangeSet, RangeTree, TopicPath};

fn call_number() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("P"), Just("PS"), Just("Q"), Just("QA"), Just("QB")],
        0u32..400,
        proptest::option::of(0u32..100),
    )
        .prop_map(|(letters, number, fraction)| match fraction {
            Some(fraction) => format!("{letters}{number}.{fraction}"),
            None => format!("{letters}{number}"),
        })
}

fn topic_path() -> impl Strategy<Value = TopicPath> {
    (0usize..4).prop_map(|i| vec!["Subject".to_string(), format!("Topic {i}")])
}

/// A range from two generated call numbers, endpoints swapped into order
/// when necessary so the result is always valid.
fn range() -> impl Strategy<Value = CallNumberRange> {
    (call_number(), call_number(), topic_path()).prop_map(|(a, b, path)| {
        let candidate = CallNumberRange::new(&a, &b, path.clone());
        if candidate.is_valid() {
            candidate
        } else {
            let swapped = CallNumberRange::new(&b, &a, path);
            assert!(swapped.is_valid(), "neither orientation of {a}/{b} is valid");
            swapped
        }
    })
}

proptest! {
    /// Central correctness property: the augmented tree never omits or
    /// invents a covering range relative to a brute-force linear scan.
    #[test]
    fn stabbing_query_matches_linear_scan(
        ranges in proptest::collection::vec(range(), 0..64),
        probes in proptest::collection::vec(call_number(), 1..16),
    ) {
        let tree = RangeTree::from_ranges(ranges.iter().cloned());
        prop_assert_eq!(tree.len(), ranges.len());

        for probe in &probes {
            let key = CallNumber::parse(probe).unwrap().floor_key();

            let mut expected: Vec<&CallNumberRange> =
                ranges.iter().filter(|r| r.contains(key)).collect();
            let mut actual = tree.query_covering(key);
            expected.sort();
            actual.sort();
            prop_assert_eq!(&actual, &expected, "divergence for probe {}", probe);
        }
    }

    /// The query-facing wrapper agrees with a scan after topic-path dedup.
    #[test]
    fn topics_for_matches_scan_with_dedup(
        ranges in proptest::collection::vec(range(), 0..48),
        probe in call_number(),
    ) {
        let set = RangeSet::from_ranges(ranges.iter().cloned());
        let key = CallNumber::parse(&probe).unwrap().floor_key();

        let mut expected: Vec<TopicPath> = ranges
            .iter()
            .filter(|r| r.contains(key))
            .map(|r| r.topic_path().clone())
            .collect();
        expected.sort();
        expected.dedup();

        let mut actual = set.topics_for(&probe);
        actual.sort();
        prop_assert_eq!(actual, expected);
    }

    /// Containment is exactly the two endpoint comparisons.
    #[test]
    fn contains_matches_endpoint_comparison(r in range(), probe in call_number()) {
        let key = CallNumber::parse(&probe).unwrap().floor_key();
        prop_assert_eq!(r.contains(key), r.begin() <= key && key <= r.end());
    }

    /// In-order iteration visits every inserted range, sorted by begin.
    #[test]
    fn iteration_is_sorted_and_complete(ranges in proptest::collection::vec(range(), 0..48)) {
        let tree = RangeTree::from_ranges(ranges.iter().cloned());
        let visited: Vec<&CallNumberRange> = tree.iter().collect();
        prop_assert_eq!(visited.len(), ranges.len());
        for pair in visited.windows(2) {
            prop_assert!(pair[0].begin() <= pair[1].begin());
        }
    }
}
