//! `ct stats`: summary statistics for a contact list.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use contrace_analysis::stats::ContactStats;
use contrace_core::config::EffectiveConfig;

use crate::output::{OutputMode, pretty_kv, pretty_section, render};

/// Arguments for `ct stats`.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Contact list to read (defaults to `[input] path` from config).
    pub file: Option<PathBuf>,
}

/// Execute `ct stats`.
pub fn run_stats(
    args: &StatsArgs,
    output: OutputMode,
    config: &EffectiveConfig,
    project_root: &Path,
) -> anyhow::Result<()> {
    let graph = super::load_input(args.file.as_deref(), &config.project, project_root, output)?;
    let stats = ContactStats::from_graph(&graph);
    render(output, &stats, render_stats_human)
}

fn render_stats_human(
    stats: &ContactStats,
    mode: OutputMode,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    if mode.is_pretty() {
        pretty_section(w, "Contact graph")?;
    }
    pretty_kv(w, "people", stats.person_count.to_string())?;
    pretty_kv(w, "contacts", stats.contact_count.to_string())?;
    pretty_kv(w, "components", stats.component_count.to_string())?;
    pretty_kv(w, "isolated", stats.isolated_count.to_string())?;
    pretty_kv(w, "max degree", stats.max_degree.to_string())?;
    pretty_kv(w, "bridges", stats.bridge_count.to_string())?;
    pretty_kv(w, "hash", &stats.content_hash)?;

    writeln!(w)?;
    if mode.is_pretty() {
        pretty_section(w, "Risk levels")?;
    }
    for bucket in &stats.risk_histogram {
        pretty_kv(w, bucket.level.as_str(), bucket.count.to_string())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contrace_core::input::graph_from_str;

    #[test]
    fn renders_counts_and_histogram() {
        let graph = graph_from_str("A,a@x B,b@x 5\nB,b@x C,c@x 1\nD,d@x E,e@x 3\n")
            .expect("valid list");
        let stats = ContactStats::from_graph(&graph);

        let mut out = Vec::new();
        render_stats_human(&stats, OutputMode::Text, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("people:        5\n"));
        assert!(text.contains("components:    2\n"));
        assert!(text.contains("bridges:       3\n"));
        assert!(text.contains("low:           5\n"));
        assert!(text.contains("infected:      0\n"));
    }
}
