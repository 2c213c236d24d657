#![forbid(unsafe_code)]
//! contrace-core library.
//!
//! Owns the contact graph model that every analysis reads from, the
//! contact-list parser that builds it, and configuration loading.
//!
//! # Conventions
//!
//! - **Errors**: Graph operations return [`error::GraphError`]; file and
//!   config loading use `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod model;

pub use error::{ErrorCode, GraphError};
pub use graph::{Adjacent, ContactGraph, Neighbor};
pub use model::{Contact, Frequency, Person, PersonDescriptor, RiskLevel};
