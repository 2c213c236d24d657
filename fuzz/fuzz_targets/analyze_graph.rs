#![no_main]

use contrace_analysis::bridges::find_bridges;
use contrace_analysis::risk::propagate;
use contrace_core::{ContactGraph, Frequency, RiskLevel};
use libfuzzer_sys::fuzz_target;

// Each byte triple is one contact: two person slots and a frequency.
fuzz_target!(|data: &[u8]| {
    let mut graph = ContactGraph::new();
    for i in 0..16u8 {
        graph.add_person(format!("p{i}"), format!("P{i}"), RiskLevel::Low);
    }
    for chunk in data.chunks_exact(3) {
        let a = format!("p{}", chunk[0] % 16);
        let b = format!("p{}", chunk[1] % 16);
        let frequency = Frequency::new(i64::from(chunk[2] % 7) + 1).expect("1..=7");
        graph.add_connection(&a, &b, frequency).expect("registered");
    }

    let bridges = find_bridges(&graph);
    assert!(bridges.len() <= graph.connection_count());

    let seed = format!("p{}", data.first().copied().unwrap_or(0) % 16);
    let report = propagate(&mut graph, &seed).expect("seed registered");
    assert_eq!(report.visited, graph.person_count());
    assert_eq!(graph.risk(&seed), Ok(RiskLevel::Infected));
});
