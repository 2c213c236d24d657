//! Property tests for the contact graph's structural invariants.

use std::collections::HashMap;

use contrace_core::{ContactGraph, Frequency, RiskLevel};
use proptest::prelude::*;

/// Up to 12 people and 40 contacts, duplicates and self-contacts included.
fn arb_contacts() -> impl Strategy<Value = (usize, Vec<(usize, usize, i64)>)> {
    (1usize..12).prop_flat_map(|n| {
        let contact = (0..n, 0..n, 1i64..=7);
        (Just(n), proptest::collection::vec(contact, 0..40))
    })
}

fn build(n: usize, contacts: &[(usize, usize, i64)]) -> ContactGraph {
    let mut graph = ContactGraph::new();
    for i in 0..n {
        graph.add_person(format!("p{i}@x"), format!("P{i}"), RiskLevel::Low);
    }
    for &(a, b, f) in contacts {
        let frequency = Frequency::new(f).expect("strategy stays in range");
        graph
            .add_connection(&format!("p{a}@x"), &format!("p{b}@x"), frequency)
            .expect("endpoints registered");
    }
    graph
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn adjacency_is_symmetric((n, contacts) in arb_contacts()) {
        let graph = build(n, &contacts);

        // Multiset of (from, to, frequency) entries across all adjacency lists.
        let mut entries: HashMap<(String, String, u8), usize> = HashMap::new();
        for key in graph.keys() {
            for neighbor in graph.neighbors(key).expect("key enumerated by graph") {
                *entries
                    .entry((key.to_string(), neighbor.key.clone(), neighbor.frequency.get()))
                    .or_default() += 1;
            }
        }

        for ((from, to, f), count) in &entries {
            let mirror = entries
                .get(&(to.clone(), from.clone(), *f))
                .copied()
                .unwrap_or(0);
            prop_assert_eq!(*count, mirror, "{} -> {} ({}) has no mirror", from, to, f);
        }
    }

    #[test]
    fn adjacency_keys_are_registered((n, contacts) in arb_contacts()) {
        let graph = build(n, &contacts);
        for key in graph.keys() {
            for neighbor in graph.neighbors(key).expect("key enumerated by graph") {
                prop_assert!(graph.contains(&neighbor.key));
            }
        }
    }

    #[test]
    fn every_contact_appears_in_both_lists((n, contacts) in arb_contacts()) {
        let graph = build(n, &contacts);
        for &(a, b, _) in &contacts {
            let a_key = format!("p{a}@x");
            let b_key = format!("p{b}@x");
            let from_a = graph.neighbors(&a_key).expect("registered");
            let from_b = graph.neighbors(&b_key).expect("registered");
            prop_assert!(from_a.iter().any(|n| n.key == b_key));
            prop_assert!(from_b.iter().any(|n| n.key == a_key));
        }
        prop_assert_eq!(graph.connection_count(), contacts.len());
    }
}
