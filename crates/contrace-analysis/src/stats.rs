//! Summary statistics for a contact graph.
//!
//! # Statistics Provided
//!
//! - **person_count** / **contact_count**: graph size. Duplicate contacts
//!   count individually.
//! - **component_count**: connected components, isolated people included.
//! - **isolated_count**: people with no contacts.
//! - **max_degree**: most contacts held by one person.
//! - **bridge_count**: contacts whose removal splits a component.
//! - **risk_histogram**: people per risk level, every level listed.

use contrace_core::{ContactGraph, RiskLevel};
use petgraph::algo::connected_components;
use serde::Serialize;

use crate::bridges::find_bridges;

/// Number of people at one risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskCount {
    pub level: RiskLevel,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactStats {
    pub person_count: usize,
    pub contact_count: usize,
    pub component_count: usize,
    pub isolated_count: usize,
    pub max_degree: usize,
    pub bridge_count: usize,
    /// Lowest level first.
    pub risk_histogram: Vec<RiskCount>,
    /// Topology hash from [`ContactGraph::content_hash`].
    pub content_hash: String,
}

impl ContactStats {
    #[must_use]
    pub fn from_graph(graph: &ContactGraph) -> Self {
        let degrees: Vec<usize> = graph.adjacency_lists().iter().map(Vec::len).collect();

        let mut risk_histogram: Vec<RiskCount> = RiskLevel::ALL
            .iter()
            .map(|&level| RiskCount { level, count: 0 })
            .collect();
        for person in graph.people() {
            risk_histogram[usize::from(person.risk.as_u8())].count += 1;
        }

        Self {
            person_count: graph.person_count(),
            contact_count: graph.connection_count(),
            component_count: connected_components(graph.inner()),
            isolated_count: degrees.iter().filter(|&&d| d == 0).count(),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            bridge_count: find_bridges(graph).len(),
            risk_histogram,
            content_hash: graph.content_hash(),
        }
    }

    /// Count at `level`.
    #[must_use]
    pub fn at_risk(&self, level: RiskLevel) -> usize {
        self.risk_histogram
            .iter()
            .find(|rc| rc.level == level)
            .map_or(0, |rc| rc.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::propagate;
    use contrace_core::Frequency;

    #[test]
    fn empty_graph_is_all_zero() {
        let stats = ContactStats::from_graph(&ContactGraph::new());
        assert_eq!(stats.person_count, 0);
        assert_eq!(stats.component_count, 0);
        assert_eq!(stats.max_degree, 0);
        assert_eq!(stats.risk_histogram.len(), 6);
        assert!(stats.risk_histogram.iter().all(|rc| rc.count == 0));
    }

    #[test]
    fn counts_components_isolates_and_bridges() {
        let mut graph = ContactGraph::new();
        for key in ["a", "b", "c", "d", "e", "loner"] {
            graph.add_person(key, key, RiskLevel::Low);
        }
        let f = Frequency::new(4).expect("valid");
        for (x, y) in [("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("a", "b")] {
            graph.add_connection(x, y, f).expect("registered");
        }

        let stats = ContactStats::from_graph(&graph);
        assert_eq!(stats.person_count, 6);
        assert_eq!(stats.contact_count, 5);
        assert_eq!(stats.component_count, 3);
        assert_eq!(stats.isolated_count, 2);
        assert_eq!(stats.max_degree, 3);
        assert_eq!(stats.bridge_count, 1);
    }

    #[test]
    fn histogram_tracks_propagation() {
        let mut graph = ContactGraph::new();
        for key in ["a", "b", "c"] {
            graph.add_person(key, key, RiskLevel::Low);
        }
        graph
            .add_connection("a", "b", Frequency::new(5).expect("valid"))
            .expect("registered");
        propagate(&mut graph, "a").expect("a is known");

        let stats = ContactStats::from_graph(&graph);
        assert_eq!(stats.at_risk(RiskLevel::Infected), 1);
        assert_eq!(stats.at_risk(RiskLevel::VeryHigh), 1);
        assert_eq!(stats.at_risk(RiskLevel::Low), 1);
    }
}
