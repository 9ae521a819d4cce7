//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads datasets through the shared cache
//! - resolves selections and composes charts
//! - prints/exports them, or hands off to the TUI

use clap::Parser;

use crate::cli::{Command, ExportArgs, PlotArgs, SelectArgs};
use crate::domain::{DashConfig, ViewMode};
use crate::error::AppError;

pub mod pipeline;

use pipeline::{Session, ViewOutput};

/// Entry point for the `rdash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `rdash` and `rdash --freq weekly` to behave like `rdash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Columns(args) => handle_columns(args),
        Command::Plot(args) => handle_plot(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_tui(args: SelectArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

fn handle_columns(args: SelectArgs) -> Result<(), AppError> {
    let config = DashConfig::from_env(args.data_dir.clone());
    let source = config.dataset_path(args.freq).display().to_string();

    let mut session = Session::new(config);
    let table = session.load(args.freq)?;

    print!("{}", crate::report::format_columns(&table, &source));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let config = DashConfig::from_env(args.select.data_dir.clone());
    let mut session = Session::new(config);
    let table = session.load(args.select.freq)?;

    let state = pipeline::selection_from_args(&table, &args.select)?;
    let output = pipeline::compose_view(&table, &state)?;

    if let ViewOutput::Empty { prompt } = output {
        return Err(AppError::input(prompt));
    }

    print!("{}", crate::report::format_selection(&state)?);
    for spec in output.charts() {
        println!();
        print!(
            "{}",
            crate::plot::render_chart_ascii(spec, args.width, args.height)
        );
    }
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = DashConfig::from_env(args.select.data_dir.clone());
    let mut session = Session::new(config);
    let table = session.load(args.select.freq)?;

    let state = pipeline::selection_from_args(&table, &args.select)?;
    let output = pipeline::compose_view(&table, &state)?;

    if let ViewOutput::Empty { prompt } = output {
        return Err(AppError::input(prompt));
    }

    let prediction = match state.view {
        ViewMode::TimeSeries => None,
        ViewMode::RegressionResults => Some(state.prediction),
    };
    let charts: Vec<_> = output.charts().into_iter().cloned().collect();
    crate::io::write_charts_json(&args.out, state.frequency, state.view, prediction, &charts)?;

    println!("Exported {} chart(s) to '{}'.", charts.len(), args.out.display());
    Ok(())
}

/// Rewrite argv so `rdash` defaults to `rdash tui`.
///
/// Rules:
/// - `rdash`                      -> `rdash tui`
/// - `rdash --freq weekly ...`    -> `rdash tui --freq weekly ...`
/// - `rdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "columns" | "plot" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["rdash"])), argv(&["rdash", "tui"]));
    }

    #[test]
    fn leading_flags_belong_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["rdash", "--freq", "weekly"])),
            argv(&["rdash", "tui", "--freq", "weekly"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["rdash", "columns", "-f", "weekly"])),
            argv(&["rdash", "columns", "-f", "weekly"])
        );
        assert_eq!(rewrite_args(argv(&["rdash", "--help"])), argv(&["rdash", "--help"]));
        assert_eq!(rewrite_args(argv(&["rdash", "-V"])), argv(&["rdash", "-V"]));
    }
}
