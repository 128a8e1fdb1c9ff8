//! # Scantling CLI Application
//!
//! Batch front-end of the scantling engine: reads a section file, sizes it
//! for every loading condition and writes the sized section, the report and
//! optional plot data.
//!
//! ```text
//! scantling midship.json --output-dir out --ship-plots
//! ```
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Section sized, every requirement met |
//! | 1 | Section sized, rule violations reported |
//! | 2 | Invalid input or any other fatal error |

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use scantling_core::report::{pressure_plot, ship_plot, Report};
use scantling_core::{
    load_section, load_settings, run, save_json, save_section, AnalysisSettings, CsrError, CsrResult, FileLock,
};

/// Points drawn along each bilge arc in the ship plot
const ARC_SAMPLES: usize = 16;

#[derive(Parser, Debug)]
#[command(name = "scantling")]
#[command(about = "Size a bulk carrier midship section to IACS CSR 2022")]
struct Args {
    /// Section description (JSON)
    input: PathBuf,

    /// Where to write the sized section (default: <output-dir>/<input>_sized.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write the report (default: <output-dir>/<input>_report.json)
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Analysis settings (JSON); missing keys take their defaults
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Directory for every file not given an explicit path
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Write panel and block outlines
    #[arg(long)]
    ship_plots: bool,

    /// Write block pressure grids of the last loading condition
    #[arg(long)]
    pressure_plots: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn stem(&self) -> String {
        self.input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "section".to_string())
    }

    fn in_output_dir(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{}.json", self.stem(), suffix))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match execute(&args) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::from(2)
        }
    }
}

/// Run the analysis; `Ok(true)` when rule violations were found.
fn execute(args: &Args) -> CsrResult<bool> {
    let settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => AnalysisSettings::default(),
    };

    fs::create_dir_all(&args.output_dir).map_err(|e| {
        CsrError::file_error("create directory", args.output_dir.display().to_string(), e.to_string())
    })?;
    let output = args.output.clone().unwrap_or_else(|| args.in_output_dir("sized"));
    let report_path = args.report.clone().unwrap_or_else(|| args.in_output_dir("report"));

    let _lock = FileLock::acquire(&output, whoami::username())?;

    let mut section = load_section(&args.input, &settings)?;
    let outcome = run(&mut section, &settings)?;
    let report = Report::build(&section, &outcome);

    save_section(&section, &output)?;
    save_json(&report, &report_path)?;
    if args.ship_plots {
        write_plot(&ship_plot(&section, ARC_SAMPLES), &args.in_output_dir("ship_plot"))?;
    }
    if args.pressure_plots {
        write_plot(&pressure_plot(&section), &args.in_output_dir("pressure_plot"))?;
    }

    print_summary(&report, &output, &report_path);
    Ok(outcome.has_violations())
}

fn write_plot<T: serde::Serialize>(plot: &T, path: &Path) -> CsrResult<()> {
    save_json(plot, path)?;
    log::info!("plot data written to {}", path.display());
    Ok(())
}

fn print_summary(report: &Report, output: &Path, report_path: &Path) {
    println!("═══════════════════════════════════════════════════════════");
    println!("  MIDSHIP SCANTLINGS  (run {})", report.run_id);
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("  Panel  Tag            Net (mm)  t_c (mm)  As-built (mm)  Governs");
    for row in &report.plating {
        println!(
            "  {:>5}  {:<13} {:>9.2} {:>9.1} {:>14.2}  {:?}",
            row.panel_id,
            row.tag.to_string(),
            row.t_net_mm,
            row.t_corrosion_mm,
            row.t_as_built_mm,
            row.governing
        );
    }
    println!();
    println!("Hull girder (y_n = {:.3} m):", report.neutral_axis_m);
    for row in &report.section {
        println!(
            "  {:<14} Z_deck {:.3} / Z_keel {:.3} vs {:.3} m³  {}",
            row.stage,
            row.z_deck_m3,
            row.z_keel_m3,
            row.z_required_m3.max(row.z_min_m3),
            status_icon(row.passed)
        );
    }
    println!();
    if !report.violations.is_empty() {
        println!("Rule violations:");
        for v in &report.violations {
            println!("  - {}", v);
        }
        println!();
    }
    println!("═══════════════════════════════════════════════════════════");
    println!(
        "  RESULT: {} ({} violations)",
        if report.violations.is_empty() { "PASS" } else { "FAIL" },
        report.violations.len()
    );
    println!("═══════════════════════════════════════════════════════════");
    println!("Sized section: {}", output.display());
    println!("Report:        {}", report_path.display());
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_follow_input_stem() {
        let args = Args::parse_from(["scantling", "data/midship.json", "--output-dir", "out"]);
        assert_eq!(args.in_output_dir("sized"), Path::new("out/midship_sized.json"));
        assert!(!args.ship_plots);
    }

    #[test]
    fn test_flags_parse() {
        let args = Args::parse_from([
            "scantling",
            "midship.json",
            "--ship-plots",
            "--pressure-plots",
            "--settings",
            "settings.json",
            "-o",
            "sized.json",
        ]);
        assert!(args.ship_plots && args.pressure_plots);
        assert_eq!(args.settings.as_deref(), Some(Path::new("settings.json")));
        assert_eq!(args.output.as_deref(), Some(Path::new("sized.json")));
    }

    #[test]
    fn test_fatal_input_exits_with_error() {
        let dir = std::env::temp_dir().join("scantling_cli_missing");
        let args = Args::parse_from([
            "scantling".to_string(),
            dir.join("no_such_section.json").display().to_string(),
            "--output-dir".to_string(),
            dir.display().to_string(),
        ]);
        let err = execute(&args).unwrap_err();
        assert!(err.is_fatal());
        let _ = fs::remove_dir_all(&dir);
    }
}
