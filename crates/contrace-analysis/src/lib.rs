#![forbid(unsafe_code)]
//! contrace-analysis library.
//!
//! Analyses over a [`contrace_core::ContactGraph`]:
//!
//! - [`bridges`]: contacts that are the only link between social circles.
//! - [`risk`]: infection-risk propagation from a positive case.
//! - [`notify`]: notices built from both results and their delivery.
//! - [`stats`]: summary statistics.
//!
//! Both analyses are synchronous and single-threaded. Bridge detection only
//! reads the graph; risk propagation takes `&mut ContactGraph` and only ever
//! raises risk labels.
//!
//! # Conventions
//!
//! - **Errors**: Graph lookups fail with [`contrace_core::GraphError`]; sinks use `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod bridges;
pub mod notify;
pub mod queue;
pub mod risk;
pub mod stats;

pub use bridges::{Bridge, BridgeDetector, find_bridges};
pub use notify::{Notification, NotificationKind, NotificationSink};
pub use risk::{PropagationReport, RiskChange, RiskPropagator, positive_case, propagate, transmission_risk};
pub use stats::ContactStats;
