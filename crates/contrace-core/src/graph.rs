//! In-memory undirected contact graph.
//!
//! # Overview
//!
//! [`ContactGraph`] owns every [`Person`] and every contact between them.
//! It is backed by a petgraph [`UnGraph`] whose node weights are people and
//! whose edge weights are weekly [`Frequency`] values, plus a key map from
//! person key to [`NodeIndex`].
//!
//! ## Ordering
//!
//! Node indices are handed out in registration order and edge indices in
//! contact order, and petgraph never reorders them while nothing is removed.
//! Every enumeration this type exposes follows those indices:
//!
//! - [`ContactGraph::keys`] / [`ContactGraph::people`] yield people in
//!   registration order.
//! - [`ContactGraph::neighbors`] and [`ContactGraph::adjacency`] yield a
//!   person's contacts in the order the contacts were added.
//!
//! Bridge detection picks DFS roots and propagation breaks priority ties by
//! these orders, so fixtures are reproducible.
//!
//! ## Duplicates
//!
//! Registering a key twice keeps the first definition. Adding the same
//! contact twice keeps both entries; nothing is merged.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::warn;

use crate::error::GraphError;
use crate::model::{Contact, Frequency, Person, RiskLevel};

/// One entry of a person's adjacency, keyed by person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub key: String,
    pub frequency: Frequency,
}

/// One entry of a node's adjacency, keyed by graph index.
///
/// `edge` identifies the contact itself so that two contacts between the
/// same pair of people stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent {
    pub node: NodeIndex,
    pub edge: EdgeIndex,
    pub frequency: Frequency,
}

/// Undirected weighted contact graph with a mutable risk label per person.
#[derive(Debug, Clone, Default)]
pub struct ContactGraph {
    graph: UnGraph<Person, Frequency>,
    node_map: HashMap<String, NodeIndex>,
}

impl ContactGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a person unless the key is already known.
    ///
    /// Returns `true` when the person was inserted. A later definition of an
    /// existing key is ignored, including its name and risk.
    pub fn add_person(
        &mut self,
        key: impl Into<String>,
        name: impl Into<String>,
        initial_risk: RiskLevel,
    ) -> bool {
        let key = key.into();
        if let Some(&idx) = self.node_map.get(&key) {
            let name = name.into();
            if self.graph[idx].name != name {
                warn!(
                    key = %key,
                    kept = %self.graph[idx].name,
                    ignored = %name,
                    "duplicate person definition ignored"
                );
            }
            return false;
        }

        let idx = self.graph.add_node(Person {
            key: key.clone(),
            name: name.into(),
            risk: initial_risk,
        });
        self.node_map.insert(key, idx);
        true
    }

    /// Record a contact between two registered people.
    ///
    /// Both directions become navigable. Repeated contacts between the same
    /// pair are kept side by side.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if either key is unregistered.
    pub fn add_connection(&mut self, a: &str, b: &str, frequency: Frequency) -> Result<(), GraphError> {
        let a_idx = self.index_of(a)?;
        let b_idx = self.index_of(b)?;
        self.graph.add_edge(a_idx, b_idx, frequency);
        Ok(())
    }

    /// Register both endpoints of a parsed contact at [`RiskLevel::Low`] and
    /// connect them.
    pub fn add_contact(&mut self, contact: &Contact) {
        self.add_person(contact.a.key.as_str(), contact.a.name.as_str(), RiskLevel::Low);
        self.add_person(contact.b.key.as_str(), contact.b.name.as_str(), RiskLevel::Low);
        let a = self.node_map[&contact.a.key];
        let b = self.node_map[&contact.b.key];
        self.graph.add_edge(a, b, contact.frequency);
    }

    /// Look up a person by key.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if the key is unregistered.
    pub fn person(&self, key: &str) -> Result<&Person, GraphError> {
        self.index_of(key).map(|idx| &self.graph[idx])
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.node_map.contains_key(key)
    }

    /// Resolve a person key to its graph index.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if the key is unregistered.
    pub fn index_of(&self, key: &str) -> Result<NodeIndex, GraphError> {
        self.node_map
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::not_found(key))
    }

    /// The person stored at `idx`, if any.
    #[must_use]
    pub fn person_at(&self, idx: NodeIndex) -> Option<&Person> {
        self.graph.node_weight(idx)
    }

    /// A person's contacts in the order they were added.
    ///
    /// Empty for a registered person with no contacts.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if the key is unregistered.
    pub fn neighbors(&self, key: &str) -> Result<Vec<Neighbor>, GraphError> {
        let idx = self.index_of(key)?;
        Ok(self
            .adjacency(idx)
            .into_iter()
            .map(|adj| Neighbor {
                key: self.graph[adj.node].key.clone(),
                frequency: adj.frequency,
            })
            .collect())
    }

    /// Adjacency of a single node in contact order.
    #[must_use]
    pub fn adjacency(&self, idx: NodeIndex) -> Vec<Adjacent> {
        let mut entries: Vec<Adjacent> = self
            .graph
            .edges(idx)
            .map(|edge| Adjacent {
                node: if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                },
                edge: edge.id(),
                frequency: *edge.weight(),
            })
            .collect();
        entries.sort_unstable_by_key(|adj| adj.edge);
        entries
    }

    /// Adjacency of every node, indexed by `NodeIndex::index()`.
    ///
    /// Built in one pass over the contacts, so each list is already in
    /// contact order. A self-contact appears once in its owner's list.
    #[must_use]
    pub fn adjacency_lists(&self) -> Vec<Vec<Adjacent>> {
        let mut lists: Vec<Vec<Adjacent>> = vec![Vec::new(); self.graph.node_count()];
        for edge in self.graph.edge_references() {
            let (a, b) = (edge.source(), edge.target());
            let frequency = *edge.weight();
            lists[a.index()].push(Adjacent {
                node: b,
                edge: edge.id(),
                frequency,
            });
            if a != b {
                lists[b.index()].push(Adjacent {
                    node: a,
                    edge: edge.id(),
                    frequency,
                });
            }
        }
        lists
    }

    /// Person keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.people().map(|person| person.key.as_str())
    }

    /// People in registration order.
    pub fn people(&self) -> impl Iterator<Item = &Person> + '_ {
        self.graph.node_weights()
    }

    /// Contacts in the order they were added, as `(key_a, key_b, frequency)`.
    pub fn connections(&self) -> impl Iterator<Item = (&str, &str, Frequency)> + '_ {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].key.as_str(),
                self.graph[edge.target()].key.as_str(),
                *edge.weight(),
            )
        })
    }

    #[must_use]
    pub fn person_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Current risk level of a person.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if the key is unregistered.
    pub fn risk(&self, key: &str) -> Result<RiskLevel, GraphError> {
        self.person(key).map(|person| person.risk)
    }

    /// Raise a person's risk to `level` if that is higher than the current
    /// level. Returns whether the level changed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotFound`] if the key is unregistered.
    pub fn raise_risk(&mut self, key: &str, level: RiskLevel) -> Result<bool, GraphError> {
        let idx = self.index_of(key)?;
        Ok(self.raise_risk_at(idx, level))
    }

    /// Index-based form of [`ContactGraph::raise_risk`]. Unknown indices are
    /// left alone and report no change.
    pub fn raise_risk_at(&mut self, idx: NodeIndex, level: RiskLevel) -> bool {
        match self.graph.node_weight_mut(idx) {
            Some(person) if level > person.risk => {
                person.risk = level;
                true
            }
            _ => false,
        }
    }

    /// Put every person back to [`RiskLevel::Low`].
    pub fn reset_risks(&mut self) {
        for person in self.graph.node_weights_mut() {
            person.risk = RiskLevel::Low;
        }
    }

    /// Read-only access to the underlying petgraph graph.
    #[must_use]
    pub const fn inner(&self) -> &UnGraph<Person, Frequency> {
        &self.graph
    }

    /// BLAKE3 hash over people and contacts in graph order.
    ///
    /// Risk levels are excluded, so the hash identifies topology only.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for person in self.people() {
            hasher.update(person.key.as_bytes());
            hasher.update(b"\x00");
            hasher.update(person.name.as_bytes());
            hasher.update(b"\n");
        }
        hasher.update(b"\x01");
        for (a, b, frequency) in self.connections() {
            hasher.update(a.as_bytes());
            hasher.update(b"\x00");
            hasher.update(b.as_bytes());
            hasher.update(b"\x00");
            hasher.update(&[frequency.get()]);
            hasher.update(b"\n");
        }
        format!("blake3:{}", hasher.finalize().to_hex())
    }
}

impl<'a> FromIterator<&'a Contact> for ContactGraph {
    fn from_iter<I: IntoIterator<Item = &'a Contact>>(iter: I) -> Self {
        let mut graph = Self::new();
        for contact in iter {
            graph.add_contact(contact);
        }
        graph
    }
}
