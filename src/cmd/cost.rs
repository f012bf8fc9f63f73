//! Cost command implementation
//!
//! Thin presentation layer for the cost command.
//! Business logic lives in `analyzer::Analyzer`.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analyzer::{AnalysisConfig, Analyzer, DependencyCost, ProgressSink};
use crate::error::DepcostError;
use crate::fmt::{format_bytes, format_cost, CHART, CHECKMARK, CROSSMARK, ROCKET};
use crate::platform::{TargetArch, TargetOs};
use crate::toolchain;

/// Main cost command handler (presentation layer)
///
/// Builds an [`AnalysisConfig`] from the CLI arguments, runs the analyzer
/// with a progress bar attached, and renders the results as a table or JSON.
pub fn cmd_cost(
    dependencies: &[String],
    oses: &[String],
    arches: &[String],
    from_manifest: Option<&str>,
    work_dir: Option<&str>,
    json_output: bool,
) -> Result<()> {
    toolchain::ensure_cargo().map_err(|_| DepcostError::ToolMissing {
        tool: "cargo".to_string(),
        install_cmd: "curl https://sh.rustup.rs -sSf | sh".to_string(),
    })?;

    let config = build_config(dependencies, oses, arches, from_manifest, work_dir)?;

    if !json_output {
        println!(
            "{} {} Dependency Cost Analysis",
            ROCKET,
            style("depcost").bold()
        );
        println!();
    }

    let analyzer = Analyzer::new(config).with_progress(Box::new(IndicatifSink::new()));
    let results = analyzer.analyze().map_err(DepcostError::from)?;

    if json_output {
        present_json_report(&results)?;
    } else {
        present_cost_table(&results);
        present_summary(&results);
    }

    Ok(())
}

/// Translate CLI arguments into a validated analysis configuration
fn build_config(
    dependencies: &[String],
    oses: &[String],
    arches: &[String],
    from_manifest: Option<&str>,
    work_dir: Option<&str>,
) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder().dependencies(dependencies);

    if let Some(path) = from_manifest {
        let manifest =
            std::fs::read_to_string(path).map_err(|source| DepcostError::ManifestNotFound {
                path: PathBuf::from(path),
                source,
            })?;
        builder = builder
            .dependencies_from_manifest(&manifest)
            .map_err(DepcostError::from)?;
    }

    for os in oses {
        builder = builder.target_os(os.parse::<TargetOs>()?);
    }
    for arch in arches {
        builder = builder.target_arch(arch.parse::<TargetArch>()?);
    }
    if let Some(dir) = work_dir {
        builder = builder.work_root(dir);
    }

    Ok(builder.build().map_err(DepcostError::from)?)
}

/// Progress sink backed by an indicatif progress bar.
///
/// The bar is created lazily on `begin` because the total measurement count
/// is only known once the engine has expanded the platform matrix. The
/// position counts *completed* measurements: each `measuring` event first
/// closes out the previous one, so the bar never reads N/N while the last
/// build is still running.
struct IndicatifSink {
    bar: Mutex<Option<BarState>>,
}

struct BarState {
    bar: ProgressBar,
    started: bool,
}

impl IndicatifSink {
    fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    #[cfg(test)]
    fn position(&self) -> Option<u64> {
        self.bar
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|state| state.bar.position()))
    }
}

impl ProgressSink for IndicatifSink {
    fn begin(&self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("[{bar:30.cyan/dim}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(BarState {
                bar,
                started: false,
            });
        }
    }

    fn measuring(&self, label: &str) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(state) = slot.as_mut() {
                if state.started {
                    state.bar.inc(1);
                } else {
                    state.started = true;
                }
                state.bar.set_message(label.to_string());
            }
        }
    }

    fn finished(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(state) = slot.take() {
                if state.started {
                    state.bar.inc(1);
                }
                state.bar.finish_and_clear();
            }
        }
    }
}

/// Present per-combination results as an aligned table
fn present_cost_table(results: &[DependencyCost]) {
    println!(
        "{}",
        style(format!(
            "{:<20} {:<12} {:<8} {:<8} {:>10} {:>10} {:>11} {:>8}",
            "PACKAGE", "VERSION", "OS", "ARCH", "BASELINE", "WITH DEP", "COST", "TIME"
        ))
        .bold()
    );

    for result in results {
        if result.is_failure() {
            println!(
                "{:<20} {:<12} {:<8} {:<8} {}",
                result.package,
                "-",
                result.os,
                result.arch,
                style(first_line(result.error.as_deref().unwrap_or("failed"))).red()
            );
        } else {
            println!(
                "{:<20} {:<12} {:<8} {:<8} {:>10} {:>10} {} {:>7.1}s",
                result.package,
                result.version,
                result.os,
                result.arch,
                format_bytes(result.baseline_bytes),
                format_bytes(result.with_dependency_bytes),
                cost_cell(result.cost_bytes),
                result.duration.as_secs_f64()
            );
        }
    }
    println!();
}

/// Present success/failure counts for the run
fn present_summary(results: &[DependencyCost]) {
    let failures = results.iter().filter(|r| r.is_failure()).count();
    let successes = results.len() - failures;

    println!(
        "{} {} measured, {}",
        CHART,
        style(successes).green().bold(),
        if failures > 0 {
            format!("{} {}", CROSSMARK, style(failures).red().bold())
        } else {
            format!("{} all succeeded", CHECKMARK)
        }
    );
}

/// Present the full result set as JSON for CI/CD systems
fn present_json_report(results: &[DependencyCost]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(results)?);
    Ok(())
}

/// Pad the cost column before styling; ANSI escapes must not count toward
/// the column width.
fn cost_cell(cost_bytes: i64) -> String {
    let padded = format!("{:>11}", format_cost(cost_bytes));
    if cost_bytes > 0 {
        style(padded).yellow().to_string()
    } else {
        style(padded).green().to_string()
    }
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or(message)
}
