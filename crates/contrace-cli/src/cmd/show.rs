//! `ct show`: dump every person with their risk and contacts.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use contrace_core::config::EffectiveConfig;
use contrace_core::{ContactGraph, GraphError, Neighbor, RiskLevel};
use serde::Serialize;

use crate::output::{CliError, OutputMode, pretty_kv, pretty_rule, render, render_error};

/// Arguments for `ct show`.
#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Contact list to read (defaults to `[input] path` from config).
    pub file: Option<PathBuf>,

    /// Only show this person.
    #[arg(long, value_name = "KEY")]
    pub person: Option<String>,
}

#[derive(Debug, Serialize)]
struct PersonEntry {
    key: String,
    name: String,
    risk: RiskLevel,
    contacts: Vec<Neighbor>,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    content_hash: String,
    people: Vec<PersonEntry>,
}

/// Execute `ct show`.
pub fn run_show(
    args: &ShowArgs,
    output: OutputMode,
    config: &EffectiveConfig,
    project_root: &Path,
) -> anyhow::Result<()> {
    let graph = super::load_input(args.file.as_deref(), &config.project, project_root, output)?;

    let people = match args.person.as_deref() {
        Some(key) => match entry(&graph, key) {
            Ok(entry) => vec![entry],
            Err(err) => {
                render_error(output, &CliError::from(&err))?;
                return Err(err.into());
            }
        },
        None => graph
            .keys()
            .map(|key| entry(&graph, key))
            .collect::<Result<_, _>>()?,
    };

    let payload = ShowOutput {
        content_hash: graph.content_hash(),
        people,
    };
    render(output, &payload, render_show_human)
}

fn entry(graph: &ContactGraph, key: &str) -> Result<PersonEntry, GraphError> {
    let person = graph.person(key)?;
    Ok(PersonEntry {
        key: person.key.clone(),
        name: person.name.clone(),
        risk: person.risk,
        contacts: graph.neighbors(key)?,
    })
}

fn render_show_human(
    payload: &ShowOutput,
    mode: OutputMode,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    if mode.is_pretty() {
        pretty_kv(w, "graph", &payload.content_hash)?;
        pretty_kv(w, "people", payload.people.len().to_string())?;
        pretty_rule(w)?;
    }
    for person in &payload.people {
        writeln!(w, "{} <{}> [{}]", person.name, person.key, person.risk)?;
        if person.contacts.is_empty() {
            writeln!(w, "  (no contacts)")?;
        }
        for contact in &person.contacts {
            writeln!(w, "  -> {} ({}/week)", contact.key, contact.frequency)?;
        }
    }
    Ok(())
}
