//! Notifications built from analysis results.
//!
//! Two kinds of notice exist:
//!
//! - **Bridge**: both people on a bridge contact are told that their contact
//!   is the only link between two social circles.
//! - **Risk**: after a positive case, everyone in the seed's connected
//!   component at or above a minimum level is told their current risk.
//!
//! Building notices never re-runs propagation; it reads the risk labels the
//! last run left behind. Delivery goes through a [`NotificationSink`].

use std::collections::VecDeque;
use std::io::Write;

use contrace_core::{ContactGraph, GraphError, Person, RiskLevel};
use fixedbitset::FixedBitSet;
use serde::Serialize;

use crate::bridges::Bridge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Bridge,
    Risk,
}

/// A message addressed to one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient_key: String,
    pub recipient_name: String,
    pub kind: NotificationKind,
    /// Recipient's risk when the notice was built.
    pub risk: RiskLevel,
    pub message: String,
}

impl Notification {
    fn to(person: &Person, kind: NotificationKind, message: String) -> Self {
        Self {
            recipient_key: person.key.clone(),
            recipient_name: person.name.clone(),
            kind,
            risk: person.risk,
            message,
        }
    }
}

/// Two notices per bridge, one for each endpoint, in bridge order.
///
/// # Errors
///
/// Returns [`GraphError::NotFound`] if a bridge names a person the graph
/// does not contain.
pub fn bridge_notifications(
    graph: &ContactGraph,
    bridges: &[Bridge],
) -> Result<Vec<Notification>, GraphError> {
    let mut notices = Vec::with_capacity(bridges.len() * 2);
    for bridge in bridges {
        let child = graph.person(&bridge.child)?;
        let parent = graph.person(&bridge.parent)?;
        for (recipient, other) in [(child, parent), (parent, child)] {
            let message = format!(
                "Hi {}, your contact with {} ({}) is the only link between your \
                 social circles. An infection on either side can cross over \
                 through it.",
                recipient.name, other.name, other.key
            );
            notices.push(Notification::to(recipient, NotificationKind::Bridge, message));
        }
    }
    Ok(notices)
}

/// Risk notices for the seed's connected component.
///
/// Walks the component breadth-first from `seed`, visiting each person once,
/// and addresses everyone whose risk is at least `min_risk`. The seed always
/// comes first.
///
/// # Errors
///
/// Returns [`GraphError::NotFound`] if `seed` is not in the graph.
pub fn risk_notifications(
    graph: &ContactGraph,
    seed: &str,
    min_risk: RiskLevel,
) -> Result<Vec<Notification>, GraphError> {
    let start = graph.index_of(seed)?;
    let seed_name = graph.person(seed)?.name.clone();

    let mut seen = FixedBitSet::with_capacity(graph.person_count());
    let mut queue = VecDeque::from([start]);
    seen.insert(start.index());
    let mut notices = Vec::new();

    while let Some(idx) = queue.pop_front() {
        let Some(person) = graph.person_at(idx) else {
            continue;
        };

        if idx == start {
            let message = format!(
                "Hi {}, your positive result has been recorded. Your contacts \
                 are being notified; please isolate.",
                person.name
            );
            notices.push(Notification::to(person, NotificationKind::Risk, message));
        } else if person.risk >= min_risk {
            let message = format!(
                "Hi {}, someone in your contact network ({}) tested positive. \
                 Your exposure risk is {}.",
                person.name, seed_name, person.risk
            );
            notices.push(Notification::to(person, NotificationKind::Risk, message));
        }

        for adj in graph.adjacency(idx) {
            if !seen.put(adj.node.index()) {
                queue.push_back(adj.node);
            }
        }
    }

    Ok(notices)
}

/// Destination for notices.
pub trait NotificationSink {
    /// Deliver one notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the notice could not be delivered.
    fn deliver(&mut self, notice: &Notification) -> anyhow::Result<()>;
}

/// Collects notices in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub delivered: Vec<Notification>,
}

impl NotificationSink for MemorySink {
    fn deliver(&mut self, notice: &Notification) -> anyhow::Result<()> {
        self.delivered.push(notice.clone());
        Ok(())
    }
}

/// Writes one line per notice: `name <key>: message`.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> NotificationSink for WriterSink<W> {
    fn deliver(&mut self, notice: &Notification) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} <{}>: {}",
            notice.recipient_name, notice.recipient_key, notice.message
        )?;
        Ok(())
    }
}

/// Deliver every notice in order; returns how many were delivered.
///
/// # Errors
///
/// Stops at and returns the first delivery failure.
pub fn dispatch<S: NotificationSink + ?Sized>(
    sink: &mut S,
    notices: &[Notification],
) -> anyhow::Result<usize> {
    for notice in notices {
        sink.deliver(notice)?;
    }
    Ok(notices.len())
}
