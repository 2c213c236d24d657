//! `ct case`: record positive cases and report the resulting exposure risk.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use contrace_analysis::notify::{Notification, WriterSink, dispatch};
use contrace_analysis::risk::{PropagationReport, positive_case};
use contrace_core::config::EffectiveConfig;
use contrace_core::{ContactGraph, RiskLevel};
use serde::Serialize;
use tracing::info;

use crate::output::{CliError, OutputMode, pretty_section, render, render_error};

/// Arguments for `ct case`.
#[derive(Args, Debug, Default)]
pub struct CaseArgs {
    /// Contact list to read (defaults to `[input] path` from config).
    pub file: Option<PathBuf>,

    /// Email of a person who tested positive. Repeat for several cases;
    /// they are processed in order and risk accumulates between them.
    #[arg(long = "seed", short = 's', required = true, value_name = "KEY")]
    pub seeds: Vec<String>,

    /// Reset everyone to low risk before each case.
    #[arg(long)]
    pub reset: bool,

    /// Lowest risk level that still gets a notice (overrides config).
    #[arg(long, value_name = "LEVEL")]
    pub min_risk: Option<RiskLevel>,
}

#[derive(Debug, Serialize)]
struct CaseResult {
    report: PropagationReport,
    notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
struct PersonRisk {
    key: String,
    name: String,
    risk: RiskLevel,
}

#[derive(Debug, Serialize)]
struct CaseOutput {
    min_risk: RiskLevel,
    cases: Vec<CaseResult>,
    people: Vec<PersonRisk>,
}

/// Execute `ct case`.
pub fn run_case(
    args: &CaseArgs,
    output: OutputMode,
    quiet: bool,
    config: &EffectiveConfig,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut graph =
        super::load_input(args.file.as_deref(), &config.project, project_root, output)?;
    let min_risk = args.min_risk.unwrap_or(config.project.notify.min_risk);

    // Reject the whole batch before touching any risk label.
    for seed in &args.seeds {
        if let Err(err) = graph.index_of(seed) {
            render_error(output, &CliError::from(&err))?;
            return Err(err.into());
        }
    }

    let cases = run_cases(&mut graph, &args.seeds, args.reset, min_risk)?;
    info!(cases = cases.len(), "positive cases processed");

    let payload = CaseOutput {
        min_risk,
        cases,
        people: person_risks(&graph),
    };

    render(output, &payload, |report, mode, w| {
        render_case_human(report, mode, quiet, w)
    })
}

fn run_cases(
    graph: &mut ContactGraph,
    seeds: &[String],
    reset: bool,
    min_risk: RiskLevel,
) -> anyhow::Result<Vec<CaseResult>> {
    let mut cases = Vec::with_capacity(seeds.len());
    for seed in seeds {
        if reset {
            graph.reset_risks();
        }
        let (report, notifications) = positive_case(graph, seed, min_risk)?;
        cases.push(CaseResult {
            report,
            notifications,
        });
    }
    Ok(cases)
}

fn person_risks(graph: &ContactGraph) -> Vec<PersonRisk> {
    graph
        .people()
        .map(|p| PersonRisk {
            key: p.key.clone(),
            name: p.name.clone(),
            risk: p.risk,
        })
        .collect()
}

fn render_case_human(
    payload: &CaseOutput,
    mode: OutputMode,
    quiet: bool,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    for case in &payload.cases {
        if mode.is_pretty() {
            pretty_section(w, &format!("Positive case: {}", case.report.seed))?;
        } else {
            writeln!(w, "case {}", case.report.seed)?;
        }
        for change in &case.report.changes {
            writeln!(w, "  {}: {} -> {}", change.key, change.from, change.to)?;
        }
        if !quiet && !case.notifications.is_empty() {
            writeln!(w, "  notices (min {}):", payload.min_risk)?;
            let mut indented = Vec::new();
            dispatch(&mut WriterSink::new(&mut indented), &case.notifications)
                .map_err(std::io::Error::other)?;
            for line in String::from_utf8_lossy(&indented).lines() {
                writeln!(w, "    {line}")?;
            }
        }
        writeln!(w)?;
    }

    if mode.is_pretty() {
        pretty_section(w, "Risk levels")?;
    }
    for person in &payload.people {
        writeln!(w, "{:<12} {} <{}>", person.risk, person.name, person.key)?;
    }
    Ok(())
}
