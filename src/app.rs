//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the spectrum and catalog files
//! - runs synthesis + overlay assembly
//! - prints the report/plot or JSON
//! - handles the auxiliary `sample` and `fetch` commands

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, FetchArgs, OverlayArgs, SampleArgs};
use crate::domain::{OverlayConfig, SampleConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `spm` binary.
pub fn run() -> Result<(), AppError> {
    // We want `spm -s obs.txt -c x.cat` to behave like `spm overlay ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the short UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Overlay(args) => handle_overlay(args),
        Command::Tui(args) => crate::tui::run(args),
        Command::Sample(args) => handle_sample(args),
        Command::Fetch(args) => handle_fetch(args),
    }
}

fn handle_overlay(args: OverlayArgs) -> Result<(), AppError> {
    let config = overlay_config_from_args(&args);
    let run = pipeline::run_overlay(&config)?;

    if config.json_stdout {
        println!("{}", crate::io::export::overlay_json_string(&run.overlay)?);
    } else {
        println!("{}", crate::report::format_run_summary(&run, &config));
        if config.plot {
            let plot = crate::plot::render_ascii_overlay(
                &run.overlay,
                config.plot_width,
                config.plot_height,
            );
            println!("{plot}");
        }
    }

    if let Some(path) = &config.export_json {
        crate::io::export::write_overlay_json(path, &run.overlay)?;
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        start_mhz: args.start,
        end_mhz: args.end,
        points: args.points,
        noise: args.noise,
        lines: args.lines,
        seed: args.seed,
    };
    let spectrum = crate::data::generate_sample(&config)?;
    crate::io::export::write_spectrum_tsv(&args.out, &spectrum)?;
    println!("Wrote {} samples to {}", spectrum.len(), args.out.display());
    Ok(())
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    let client = crate::data::CatalogClient::from_env();
    let text = client.fetch_catalog(args.tag)?;

    // Sanity-parse before writing so an HTML error page never lands on disk
    // pretending to be a catalog.
    let name = format!("c{:06}", args.tag);
    let parsed = crate::io::catalog::load_catalog(&name, &text)?;

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("{name}.cat")));
    std::fs::write(&out, &text)
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", out.display())))?;

    println!(
        "Wrote {} transitions ({} lines) to {}",
        parsed.lines_used,
        parsed.lines_read,
        out.display()
    );
    Ok(())
}

pub fn overlay_config_from_args(args: &OverlayArgs) -> OverlayConfig {
    OverlayConfig {
        spectrum_path: args.spectrum.clone(),
        catalog_paths: args.catalogs.clone(),
        column_density: args.density,
        temperature: args.temperature,
        linewidth: args.linewidth,
        linewidth_unit: args.linewidth_unit,
        frequency_offset: args.offset,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        max_warnings: args.max_warnings,
        export_json: args.export_json.clone(),
        json_stdout: args.json,
    }
}

/// Rewrite argv so flag-first invocations default to `spm overlay`.
///
/// Rules:
/// - `spm`                       -> `spm overlay` (clap then reports the
///   missing required flags)
/// - `spm -s obs.txt ...`        -> `spm overlay -s obs.txt ...`
/// - `spm --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("overlay".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "overlay" | "tui" | "sample" | "fetch");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "overlay flags".
    if arg1.starts_with('-') {
        argv.insert(1, "overlay".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_inserts_overlay_for_flag_first_invocations() {
        assert_eq!(
            rewrite_args(args(&["spm", "-s", "obs.txt"])),
            args(&["spm", "overlay", "-s", "obs.txt"])
        );
        assert_eq!(rewrite_args(args(&["spm"])), args(&["spm", "overlay"]));
    }

    #[test]
    fn rewrite_leaves_subcommands_and_help_alone() {
        assert_eq!(
            rewrite_args(args(&["spm", "tui", "-s", "obs.txt"])),
            args(&["spm", "tui", "-s", "obs.txt"])
        );
        assert_eq!(rewrite_args(args(&["spm", "--help"])), args(&["spm", "--help"]));
    }
}
