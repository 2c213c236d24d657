//! Risk propagation from a positive case.
//!
//! # Overview
//!
//! A modified Dijkstra relaxation that maximizes risk instead of minimizing
//! distance:
//!
//! 1. The seed becomes [`RiskLevel::Infected`]; each direct contact is raised
//!    to at least [`RiskLevel::VeryHigh`] regardless of contact frequency.
//! 2. Every person in the graph is queued by current risk.
//! 3. The riskiest unsettled person `S` is popped and settled. For each
//!    unsettled contact `N`, `transmission_risk(risk(S), frequency)` replaces
//!    `risk(N)` when strictly higher, and `N` moves up the queue.
//! 4. The run ends when the queue is empty, so every person is settled once.
//!
//! The seed is settled like everyone else but does not relax its contacts:
//! its effect on them is exactly the step 1 bump. A frequent contact of the
//! seed is therefore very high, not infected, and passes on very high risk.
//!
//! Risk only ever rises. Levels left over from earlier runs are the starting
//! point of the next run; call [`ContactGraph::reset_risks`] first for a
//! fresh start. People with no path from the seed keep their level.
//!
//! # Complexity
//!
//! O((V + E) log V): each relaxation is one [`IndexedMaxHeap::increase_key`].

use contrace_core::{ContactGraph, Frequency, GraphError, RiskLevel};
use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::notify::{Notification, risk_notifications};
use crate::queue::IndexedMaxHeap;

/// Risk inherited by a contact of someone at `source` risk.
///
/// - `source` is low, or they meet 4+ times a week: full risk passes on.
/// - 2 or 3 times a week: one level lower.
/// - Once a week: two levels lower, floored at low.
#[must_use]
pub const fn transmission_risk(source: RiskLevel, frequency: Frequency) -> RiskLevel {
    match frequency.get() {
        _ if matches!(source, RiskLevel::Low) => source,
        4.. => source,
        2 | 3 => source.saturating_lower(1),
        _ => source.saturating_lower(2),
    }
}

/// One risk increase applied during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskChange {
    pub key: String,
    pub from: RiskLevel,
    pub to: RiskLevel,
}

/// Outcome of a single propagation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropagationReport {
    pub seed: String,
    /// People settled by the run (always the whole graph).
    pub visited: usize,
    /// Every increase, in the order it was applied. A person raised twice
    /// appears twice.
    pub changes: Vec<RiskChange>,
}

/// Runs risk propagation against a mutable [`ContactGraph`].
///
/// Holding the graph by `&mut` for the whole run keeps concurrent runs on
/// the same graph from compiling.
#[derive(Debug)]
pub struct RiskPropagator<'g> {
    graph: &'g mut ContactGraph,
    changes: Vec<RiskChange>,
}

impl<'g> RiskPropagator<'g> {
    pub fn new(graph: &'g mut ContactGraph) -> Self {
        Self {
            graph,
            changes: Vec::new(),
        }
    }

    /// Propagate risk outward from `seed`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NotFound`] if `seed` is not in the graph; nothing is
    ///   modified in that case.
    /// - [`GraphError::AlreadyVisited`] if the queue yields a settled person,
    ///   which indicates a bug.
    #[instrument(skip(self), fields(people = self.graph.person_count()))]
    pub fn run(mut self, seed: &str) -> Result<PropagationReport, GraphError> {
        let seed_idx = self.graph.index_of(seed)?;
        let adjacency = self.graph.adjacency_lists();

        self.raise(seed_idx, RiskLevel::Infected);
        for adj in &adjacency[seed_idx.index()] {
            self.raise(adj.node, RiskLevel::VeryHigh);
        }

        let n = adjacency.len();
        let mut queue = IndexedMaxHeap::with_capacity(n);
        for (idx, person) in self.graph.inner().node_indices().zip(self.graph.people()) {
            queue.push(idx.index(), person.risk);
        }

        let mut settled = FixedBitSet::with_capacity(n);
        while let Some((slot, source_risk)) = queue.pop() {
            if settled.put(slot) {
                return Err(GraphError::AlreadyVisited {
                    key: self.key(NodeIndex::new(slot)),
                });
            }
            if slot == seed_idx.index() {
                continue;
            }

            for adj in &adjacency[slot] {
                let next = adj.node.index();
                if settled.contains(next) {
                    continue;
                }
                let candidate = transmission_risk(source_risk, adj.frequency);
                if self.raise(adj.node, candidate) {
                    queue.increase_key(next, candidate);
                }
            }
        }

        debug!(
            seed,
            settled = settled.count_ones(..),
            raised = self.changes.len(),
            "risk propagation complete"
        );

        Ok(PropagationReport {
            seed: seed.to_string(),
            visited: settled.count_ones(..),
            changes: self.changes,
        })
    }

    fn raise(&mut self, idx: NodeIndex, level: RiskLevel) -> bool {
        let Some(from) = self.graph.person_at(idx).map(|p| p.risk) else {
            return false;
        };
        if !self.graph.raise_risk_at(idx, level) {
            return false;
        }
        let key = self.key(idx);
        trace!(key = %key, %from, to = %level, "risk raised");
        self.changes.push(RiskChange {
            key,
            from,
            to: level,
        });
        true
    }

    fn key(&self, idx: NodeIndex) -> String {
        self.graph
            .person_at(idx)
            .map_or_else(|| format!("#{}", idx.index()), |p| p.key.clone())
    }
}

/// Propagate risk outward from `seed`. See [`RiskPropagator::run`].
///
/// # Errors
///
/// Returns [`GraphError::NotFound`] if `seed` is not in the graph.
pub fn propagate(graph: &mut ContactGraph, seed: &str) -> Result<PropagationReport, GraphError> {
    RiskPropagator::new(graph).run(seed)
}

/// Record a positive test for `seed`: propagate risk, then build the risk
/// notices for everyone in the seed's component at or above `min_risk`.
///
/// # Errors
///
/// Returns [`GraphError::NotFound`] if `seed` is not in the graph.
pub fn positive_case(
    graph: &mut ContactGraph,
    seed: &str,
    min_risk: RiskLevel,
) -> Result<(PropagationReport, Vec<Notification>), GraphError> {
    let report = propagate(graph, seed)?;
    let notices = risk_notifications(graph, seed, min_risk)?;
    Ok((report, notices))
}
