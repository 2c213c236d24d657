pub mod bridges;
pub mod case;
pub mod show;
pub mod stats;

use std::path::{Path, PathBuf};

use contrace_core::config::ProjectConfig;
use contrace_core::input::{ParseError, load_graph};
use contrace_core::{ContactGraph, ErrorCode};

use crate::output::{CliError, OutputMode, render_error};

/// Pick the contact list to read: the explicit argument, else `[input] path`
/// from the project config. Relative config paths resolve against the
/// project root.
pub fn input_path(file: Option<&Path>, config: &ProjectConfig, project_root: &Path) -> PathBuf {
    match file {
        Some(path) => path.to_path_buf(),
        None if config.input.path.is_absolute() => config.input.path.clone(),
        None => project_root.join(&config.input.path),
    }
}

/// Load the contact graph, reporting failures through the output layer.
pub fn load_input(
    file: Option<&Path>,
    config: &ProjectConfig,
    project_root: &Path,
    output: OutputMode,
) -> anyhow::Result<ContactGraph> {
    let path = input_path(file, config, project_root);
    match load_graph(&path) {
        Ok(graph) => Ok(graph),
        Err(err) => {
            let cli_error = if let Some(parse) = err.downcast_ref::<ParseError>() {
                CliError::from_code(
                    format!("{}: {parse}", path.display()),
                    ErrorCode::InputParseError,
                )
            } else {
                CliError::with_details(
                    format!("{err:#}"),
                    "pass a contact list path or set [input] path in .contrace/config.toml",
                    "input_unreadable",
                )
            };
            render_error(output, &cli_error)?;
            Err(err)
        }
    }
}
