//! Contact-list parser.
//!
//! # Format
//!
//! One contact per line:
//!
//! ```text
//! name1,email1 name2,email2 frequency
//! ```
//!
//! - Tokens are separated by runs of ASCII whitespace.
//! - `frequency` is the weekly contact count, `1..=7`.
//! - Blank lines and lines starting with `#` are skipped.
//!
//! The email is the person key. A person's name comes from the first line
//! that mentions their email; later spellings are ignored by
//! [`ContactGraph::add_person`].

use std::fmt;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, instrument};

use crate::graph::ContactGraph;
use crate::model::{Contact, Frequency, PersonDescriptor};

/// Errors produced while parsing a contact list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line does not have exactly three tokens.
    TokenCount {
        /// 1-based line number.
        line: usize,
        /// Number of tokens found.
        found: usize,
    },
    /// A person token is not `name,email` with both parts present.
    MalformedPerson { line: usize, token: String },
    /// The frequency token is not an integer.
    InvalidFrequency { line: usize, token: String },
    /// The frequency is an integer outside `1..=7`.
    FrequencyOutOfRange { line: usize, value: i64 },
}

impl ParseError {
    /// The 1-based line the error refers to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::TokenCount { line, .. }
            | Self::MalformedPerson { line, .. }
            | Self::InvalidFrequency { line, .. }
            | Self::FrequencyOutOfRange { line, .. } => *line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenCount { line, found } => {
                write!(f, "line {line}: expected 3 tokens, found {found}")
            }
            Self::MalformedPerson { line, token } => {
                write!(f, "line {line}: expected `name,email`, got '{token}'")
            }
            Self::InvalidFrequency { line, token } => {
                write!(f, "line {line}: frequency is not an integer: '{token}'")
            }
            Self::FrequencyOutOfRange { line, value } => {
                write!(f, "line {line}: frequency {value} is outside 1..=7")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a single non-blank, non-comment line.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem on the line.
pub fn parse_line(raw: &str, line: usize) -> Result<Contact, ParseError> {
    let tokens: Vec<&str> = raw.split_ascii_whitespace().collect();
    let [a, b, frequency] = tokens.as_slice() else {
        return Err(ParseError::TokenCount {
            line,
            found: tokens.len(),
        });
    };

    let a = parse_person(a, line)?;
    let b = parse_person(b, line)?;

    let value: i64 = frequency.parse().map_err(|_| ParseError::InvalidFrequency {
        line,
        token: (*frequency).to_string(),
    })?;
    let frequency =
        Frequency::new(value).map_err(|_| ParseError::FrequencyOutOfRange { line, value })?;

    Ok(Contact { a, b, frequency })
}

fn parse_person(token: &str, line: usize) -> Result<PersonDescriptor, ParseError> {
    match token.split_once(',') {
        Some((name, key)) if !name.is_empty() && !key.is_empty() && !key.contains(',') => {
            Ok(PersonDescriptor::new(name, key))
        }
        _ => Err(ParseError::MalformedPerson {
            line,
            token: token.to_string(),
        }),
    }
}

/// Parse a whole contact list.
///
/// # Errors
///
/// Stops at the first malformed line and returns its [`ParseError`].
pub fn parse_contacts(input: &str) -> Result<Vec<Contact>, ParseError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, raw)| {
            let trimmed = raw.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(idx, raw)| parse_line(raw, idx + 1))
        .collect()
}

/// Parse a contact list and build the graph from it.
///
/// # Errors
///
/// Returns the first [`ParseError`] in `input`.
pub fn graph_from_str(input: &str) -> Result<ContactGraph, ParseError> {
    let contacts = parse_contacts(input)?;
    Ok(contacts.iter().collect())
}

/// Read and parse a contact list file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains a malformed line.
#[instrument]
pub fn load_graph(path: &Path) -> anyhow::Result<ContactGraph> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let graph =
        graph_from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    debug!(
        people = graph.person_count(),
        contacts = graph.connection_count(),
        "contact graph loaded"
    );
    Ok(graph)
}
