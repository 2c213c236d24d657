//! `ct bridges`: list contacts that are the only link between social circles.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use contrace_analysis::bridges::find_bridges;
use contrace_analysis::notify::{Notification, WriterSink, bridge_notifications, dispatch};
use contrace_core::ContactGraph;
use contrace_core::config::EffectiveConfig;
use serde::Serialize;

use crate::output::{CliError, OutputMode, pretty_section, render, render_error};

/// Arguments for `ct bridges`.
#[derive(Args, Debug, Default)]
pub struct BridgesArgs {
    /// Contact list to read (defaults to `[input] path` from config).
    pub file: Option<PathBuf>,

    /// Skip bridge notices even if `[notify] bridges` is enabled.
    #[arg(long)]
    pub no_notify: bool,
}

#[derive(Debug, Serialize)]
struct BridgeRow {
    child: String,
    child_name: String,
    parent: String,
    parent_name: String,
}

#[derive(Debug, Serialize)]
struct BridgesOutput {
    bridges: Vec<BridgeRow>,
    notifications: Vec<Notification>,
}

/// Execute `ct bridges`.
pub fn run_bridges(
    args: &BridgesArgs,
    output: OutputMode,
    quiet: bool,
    config: &EffectiveConfig,
    project_root: &Path,
) -> anyhow::Result<()> {
    let graph = super::load_input(args.file.as_deref(), &config.project, project_root, output)?;
    let bridges = find_bridges(&graph);

    let notifications = if config.project.notify.bridges && !args.no_notify {
        match bridge_notifications(&graph, &bridges) {
            Ok(notices) => notices,
            Err(err) => {
                render_error(output, &CliError::from(&err))?;
                return Err(err.into());
            }
        }
    } else {
        Vec::new()
    };

    let payload = BridgesOutput {
        bridges: bridges
            .iter()
            .map(|b| BridgeRow {
                child_name: display_name(&graph, &b.child),
                child: b.child.clone(),
                parent_name: display_name(&graph, &b.parent),
                parent: b.parent.clone(),
            })
            .collect(),
        notifications,
    };

    render(output, &payload, |report, mode, w| {
        render_bridges_human(report, mode, quiet, w)
    })
}

fn display_name(graph: &ContactGraph, key: &str) -> String {
    graph
        .person(key)
        .map_or_else(|_| key.to_string(), |p| p.name.clone())
}

fn render_bridges_human(
    payload: &BridgesOutput,
    mode: OutputMode,
    quiet: bool,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    if payload.bridges.is_empty() {
        if !quiet {
            writeln!(w, "No bridge contacts found.")?;
        }
        return Ok(());
    }

    if mode.is_pretty() {
        pretty_section(w, &format!("Bridge contacts ({})", payload.bridges.len()))?;
    }
    for row in &payload.bridges {
        writeln!(
            w,
            "{} <{}> -- {} <{}>",
            row.child_name, row.child, row.parent_name, row.parent
        )?;
    }

    if quiet || payload.notifications.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    if mode.is_pretty() {
        pretty_section(w, "Notifications")?;
    }
    dispatch(&mut WriterSink::new(w), &payload.notifications)
        .map_err(std::io::Error::other)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contrace_analysis::notify::NotificationKind;
    use contrace_core::RiskLevel;

    fn row(child: &str, parent: &str) -> BridgeRow {
        BridgeRow {
            child: format!("{child}@email.com"),
            child_name: child.to_string(),
            parent: format!("{parent}@email.com"),
            parent_name: parent.to_string(),
        }
    }

    fn rendered(payload: &BridgesOutput, mode: OutputMode, quiet: bool) -> String {
        let mut out = Vec::new();
        render_bridges_human(payload, mode, quiet, &mut out).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn bridges_args_parse_file_and_flag() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: BridgesArgs,
        }

        let parsed = Wrapper::parse_from(["test", "friends.txt", "--no-notify"]);
        assert_eq!(parsed.args.file, Some(PathBuf::from("friends.txt")));
        assert!(parsed.args.no_notify);
    }

    #[test]
    fn no_bridges_message() {
        let payload = BridgesOutput {
            bridges: Vec::new(),
            notifications: Vec::new(),
        };
        assert!(rendered(&payload, OutputMode::Text, false).contains("No bridge contacts found."));
        assert!(rendered(&payload, OutputMode::Text, true).is_empty());
    }

    #[test]
    fn lists_bridges_and_notices() {
        let payload = BridgesOutput {
            bridges: vec![row("Emma", "Liam")],
            notifications: vec![Notification {
                recipient_key: "emma@email.com".to_string(),
                recipient_name: "Emma".to_string(),
                kind: NotificationKind::Bridge,
                risk: RiskLevel::Low,
                message: "hello".to_string(),
            }],
        };

        let text = rendered(&payload, OutputMode::Pretty, false);
        assert!(text.contains("Bridge contacts (1)"));
        assert!(text.contains("Emma <emma@email.com> -- Liam <liam@email.com>"));
        assert!(text.contains("Emma <emma@email.com>: hello"));

        let quiet = rendered(&payload, OutputMode::Text, true);
        assert!(!quiet.contains("hello"));
    }
}
