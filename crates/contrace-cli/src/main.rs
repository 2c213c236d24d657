#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use contrace_core::ErrorCode;
use contrace_core::config::resolve_config;
use output::{CliError, OutputMode, render_error};
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "ct",
    author,
    version,
    about = "contrace: contact-graph bridge detection and exposure risk",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output (notices, empty-result messages).
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "List bridge contacts",
        long_about = "List contacts that are the only link between two social circles, \
                      and notify both people on each.",
        after_help = "EXAMPLES:\n    # Scan the configured contact list\n    ct bridges\n\n    # Scan a specific file without sending notices\n    ct bridges friends.txt --no-notify\n\n    # Emit machine-readable output\n    ct bridges --json"
    )]
    Bridges(cmd::bridges::BridgesArgs),

    #[command(
        about = "Record positive cases and propagate risk",
        long_about = "Mark each seed as infected, propagate exposure risk through the \
                      contact graph, and notify people at or above the configured level.",
        after_help = "EXAMPLES:\n    # One positive case\n    ct case --seed liam@email.com\n\n    # Two cases, risk accumulating between them\n    ct case friends.txt -s liam@email.com -s noah@email.com\n\n    # Fresh start for each case\n    ct case -s liam@email.com -s noah@email.com --reset"
    )]
    Case(cmd::case::CaseArgs),

    #[command(
        about = "Show people and their contacts",
        after_help = "EXAMPLES:\n    # Dump the whole graph\n    ct show\n\n    # One person\n    ct show --person emma@email.com"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        about = "Show contact graph statistics",
        after_help = "EXAMPLES:\n    ct stats friends.txt --json"
    )]
    Stats(cmd::stats::StatsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CONTRACE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "contrace=debug,info"
        } else {
            "contrace=info,warn"
        })
    });

    let format = env::var("CONTRACE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let config = match resolve_config(&project_root, cli.json) {
        Ok(config) => config,
        Err(err) => {
            let mode = if cli.json {
                OutputMode::Json
            } else {
                OutputMode::Text
            };
            render_error(
                mode,
                &CliError::from_code(format!("{err:#}"), ErrorCode::ConfigParseError),
            )?;
            return Err(err);
        }
    };
    let output = OutputMode::from_resolved(&config.resolved_output);

    match cli.command {
        Commands::Bridges(ref args) => {
            cmd::bridges::run_bridges(args, output, cli.quiet, &config, &project_root)
        }
        Commands::Case(ref args) => {
            cmd::case::run_case(args, output, cli.quiet, &config, &project_root)
        }
        Commands::Show(ref args) => cmd::show::run_show(args, output, &config, &project_root),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, output, &config, &project_root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_before_and_after_subcommand() {
        let cli = Cli::parse_from(["ct", "--json", "stats"]);
        assert!(cli.json);

        let cli = Cli::parse_from(["ct", "stats", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn quiet_and_verbose_flags_parsed() {
        let cli = Cli::parse_from(["ct", "-q", "-v", "bridges"]);
        assert!(cli.quiet);
        assert!(cli.verbose);
    }

    #[test]
    fn case_requires_a_seed() {
        assert!(Cli::try_parse_from(["ct", "case"]).is_err());
        let cli = Cli::parse_from(["ct", "case", "--seed", "a@x"]);
        assert!(matches!(cli.command, Commands::Case(_)));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["ct", "bridges"],
            vec!["ct", "bridges", "friends.txt", "--no-notify"],
            vec!["ct", "case", "friends.txt", "-s", "a@x", "--reset"],
            vec!["ct", "show", "--person", "a@x"],
            vec!["ct", "stats", "friends.txt"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?} - error: {:?}",
                args,
                result.err()
            );
        }
    }
}
