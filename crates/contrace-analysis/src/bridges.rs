//! Bridge detection: contacts whose removal splits a social cluster.
//!
//! # Algorithm
//!
//! Tarjan's bridge finding over an explicit DFS stack. Every person gets a
//! discovery order on first visit and a `low` value: the smallest discovery
//! order reachable from their DFS subtree using tree edges plus at most one
//! back edge. When a child finishes, the tree edge `parent - child` is a
//! bridge iff `low[child] > disc[parent]`, i.e. nothing under the child
//! reaches the parent or above without that edge.
//!
//! Roots are taken in person registration order so every component is
//! covered; neighbors are explored in contact order.
//!
//! # Parallel contacts
//!
//! The edge a node was entered through is skipped by edge identity rather
//! than by parent key. A second contact between the same pair is therefore a
//! back edge, and a duplicated pair is never reported as a bridge.
//!
//! # Complexity
//!
//! O(V + E) time, O(V) auxiliary state plus the DFS stack. No recursion, so
//! long chains cannot overflow the thread stack.

use contrace_core::ContactGraph;
use petgraph::graph::EdgeIndex;
use serde::Serialize;
use tracing::{debug, instrument};

/// A bridge contact, reported as `(child, parent)` in DFS-tree terms.
///
/// Callers should treat the pair as unordered; [`Bridge::contains`] and
/// [`Bridge::normalized`] exist for that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Bridge {
    pub child: String,
    pub parent: String,
}

impl Bridge {
    /// Whether this bridge joins `a` and `b`, in either order.
    #[must_use]
    pub fn contains(&self, a: &str, b: &str) -> bool {
        (self.child == a && self.parent == b) || (self.child == b && self.parent == a)
    }

    /// The endpoint keys sorted lexicographically.
    #[must_use]
    pub fn normalized(&self) -> (&str, &str) {
        if self.child <= self.parent {
            (&self.child, &self.parent)
        } else {
            (&self.parent, &self.child)
        }
    }
}

#[derive(Debug)]
struct Frame {
    node: usize,
    /// Tree edge used to enter `node`; `None` for a DFS root.
    via: Option<EdgeIndex>,
    /// Position of the next adjacency entry to examine.
    cursor: usize,
}

/// Finds every bridge in a [`ContactGraph`] without mutating it.
#[derive(Debug, Clone, Copy)]
pub struct BridgeDetector<'g> {
    graph: &'g ContactGraph,
}

impl<'g> BridgeDetector<'g> {
    #[must_use]
    pub const fn new(graph: &'g ContactGraph) -> Self {
        Self { graph }
    }

    /// Run the scan and return bridges in discovery order.
    #[must_use]
    #[instrument(skip(self), fields(people = self.graph.person_count()))]
    pub fn run(&self) -> Vec<Bridge> {
        let adjacency = self.graph.adjacency_lists();
        let n = adjacency.len();

        let mut disc: Vec<Option<usize>> = vec![None; n];
        let mut low: Vec<usize> = vec![0; n];
        let mut next_order = 0usize;
        let mut bridges = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();

        for root in 0..n {
            if disc[root].is_some() {
                continue;
            }
            disc[root] = Some(next_order);
            low[root] = next_order;
            next_order += 1;
            stack.push(Frame {
                node: root,
                via: None,
                cursor: 0,
            });

            while let Some(frame) = stack.last_mut() {
                let node = frame.node;

                if let Some(adj) = adjacency[node].get(frame.cursor) {
                    frame.cursor += 1;
                    if frame.via == Some(adj.edge) {
                        continue;
                    }

                    let next = adj.node.index();
                    if let Some(order) = disc[next] {
                        // Back edge (or the far end of one seen from below).
                        low[node] = low[node].min(order);
                    } else {
                        disc[next] = Some(next_order);
                        low[next] = next_order;
                        next_order += 1;
                        stack.push(Frame {
                            node: next,
                            via: Some(adj.edge),
                            cursor: 0,
                        });
                    }
                    continue;
                }

                // `node` is finished; settle its tree edge with the parent.
                stack.pop();
                let Some(parent) = stack.last().map(|f| f.node) else {
                    continue;
                };
                let parent_order = disc[parent].unwrap_or(0);
                if low[node] > parent_order {
                    bridges.push(self.bridge(node, parent));
                } else {
                    low[parent] = low[parent].min(low[node]);
                }
            }
        }

        debug!(bridges = bridges.len(), "bridge scan complete");
        bridges
    }

    fn bridge(&self, child: usize, parent: usize) -> Bridge {
        Bridge {
            child: self.key(child),
            parent: self.key(parent),
        }
    }

    fn key(&self, idx: usize) -> String {
        self.graph
            .person_at(petgraph::graph::NodeIndex::new(idx))
            .map_or_else(|| format!("#{idx}"), |person| person.key.clone())
    }
}

/// Find every bridge contact in `graph`.
#[must_use]
pub fn find_bridges(graph: &ContactGraph) -> Vec<Bridge> {
    BridgeDetector::new(graph).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contrace_core::{Frequency, RiskLevel};

    fn graph_with(edges: &[(&str, &str)]) -> ContactGraph {
        let mut graph = ContactGraph::new();
        for &(a, b) in edges {
            graph.add_person(a, a, RiskLevel::Low);
            graph.add_person(b, b, RiskLevel::Low);
            graph
                .add_connection(a, b, Frequency::new(3).expect("valid"))
                .expect("registered");
        }
        graph
    }

    fn pairs(bridges: &[Bridge]) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = bridges
            .iter()
            .map(|b| {
                let (x, y) = b.normalized();
                (x.to_string(), y.to_string())
            })
            .collect();
        out.sort_unstable();
        out
    }

    #[test]
    fn empty_graph_has_no_bridges() {
        assert!(find_bridges(&ContactGraph::new()).is_empty());
    }

    #[test]
    fn single_contact_is_a_bridge() {
        let bridges = find_bridges(&graph_with(&[("a", "b")]));
        assert_eq!(
            bridges,
            vec![Bridge {
                child: "b".to_string(),
                parent: "a".to_string()
            }]
        );
    }

    #[test]
    fn cycle_has_no_bridges() {
        let graph = graph_with(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")]);
        assert!(find_bridges(&graph).is_empty());
    }

    #[test]
    fn path_is_all_bridges() {
        let graph = graph_with(&[("a", "b"), ("b", "c"), ("c", "d")]);
        assert_eq!(
            pairs(&find_bridges(&graph)),
            vec![
                ("a".to_string(), "b".to_string()),
                ("b".to_string(), "c".to_string()),
                ("c".to_string(), "d".to_string()),
            ]
        );
    }

    #[test]
    fn duplicate_contact_is_not_a_bridge() {
        let graph = graph_with(&[("a", "b"), ("a", "b"), ("b", "c")]);
        assert_eq!(
            pairs(&find_bridges(&graph)),
            vec![("b".to_string(), "c".to_string())]
        );
    }

    #[test]
    fn earlier_back_edge_does_not_mask_cycle_below() {
        // c closes the triangle a-b-c back to the root before descending into
        // the c-d-e triangle; none of these contacts is a bridge.
        let graph = graph_with(&[
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
            ("c", "d"),
            ("d", "e"),
            ("e", "c"),
        ]);
        assert!(find_bridges(&graph).is_empty());
    }

    #[test]
    fn self_contact_is_ignored() {
        let graph = graph_with(&[("a", "a"), ("a", "b")]);
        assert_eq!(
            pairs(&find_bridges(&graph)),
            vec![("a".to_string(), "b".to_string())]
        );
    }

    #[test]
    fn isolated_person_contributes_nothing() {
        let mut graph = graph_with(&[("a", "b"), ("b", "c"), ("c", "a")]);
        graph.add_person("loner", "Loner", RiskLevel::Low);
        assert!(find_bridges(&graph).is_empty());
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let mut graph = ContactGraph::new();
        let n = 50_000;
        for i in 0..n {
            graph.add_person(format!("p{i}"), format!("P{i}"), RiskLevel::Low);
        }
        let f = Frequency::new(1).expect("valid");
        for i in 1..n {
            graph
                .add_connection(&format!("p{}", i - 1), &format!("p{i}"), f)
                .expect("registered");
        }
        assert_eq!(find_bridges(&graph).len(), n - 1);
    }

    #[test]
    fn bridge_contains_is_order_insensitive() {
        let bridge = Bridge {
            child: "d".to_string(),
            parent: "c".to_string(),
        };
        assert!(bridge.contains("c", "d"));
        assert!(bridge.contains("d", "c"));
        assert!(!bridge.contains("c", "e"));
        assert_eq!(bridge.normalized(), ("c", "d"));
    }
}
