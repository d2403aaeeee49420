//! Greencover CLI - vegetation cover from NIR/red band pairs

mod scene;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use greencover_algorithms::imagery::ClassificationScheme;
use greencover_algorithms::pipeline::{VegetationPipeline, VegetationReport};
use greencover_algorithms::statistics::LandCoverSummary;

use crate::scene::{read_scene, Scene};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "greencover")]
#[command(author, version, about = "Vegetation cover analysis from NIR/red imagery", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show grid and boundary information for a scene file
    Info {
        /// Input scene (JSON)
        input: PathBuf,
    },
    /// Classify NDVI inside the boundary and report land cover fractions
    Summarize {
        /// Input scene (JSON)
        input: PathBuf,
        /// Class breaks as value:label pairs, ascending
        #[arg(long, default_value = "0.2:Sparse,0.45:Moderate,0.7:Dense")]
        thresholds: String,
        /// Label for values below the first break
        #[arg(long, default_value = "No vegetation")]
        below_label: String,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

fn load(path: &PathBuf) -> Result<Scene> {
    let pb = spinner("Reading scene...")?;
    let scene = read_scene(path).with_context(|| format!("Failed to load {}", path.display()));
    pb.finish_and_clear();
    scene
}

/// Parse `0.2:Sparse,0.45:Moderate,0.7:Dense` into (threshold, label) pairs.
fn parse_thresholds(s: &str) -> Result<Vec<(f64, String)>> {
    let pairs = s
        .split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|pair| {
            let (value, label) = pair
                .split_once(':')
                .ok_or_else(|| anyhow!("Threshold must be 'value:label', got: {}", pair))?;
            let value: f64 = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid threshold value: {}", value.trim()))?;
            Ok((value, label.trim().to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    if pairs.is_empty() {
        bail!("At least one threshold is required");
    }
    Ok(pairs)
}

fn print_summary(summary: &LandCoverSummary) {
    let width = summary
        .iter()
        .map(|c| c.label.len())
        .max()
        .unwrap_or(0)
        .max("Category".len());

    println!(
        "{:<width$}  {:>10}  {:>8}  {:>14}",
        "Category", "Pixels", "Percent", "Area"
    );
    for cat in summary.iter() {
        println!(
            "{:<width$}  {:>10}  {:>7.2}%  {:>14.2}",
            cat.label,
            cat.count,
            100.0 * cat.fraction,
            cat.area
        );
    }
    println!(
        "{:<width$}  {:>10}  {:>7.2}%  {:>14.2}",
        "Total",
        summary.total_valid,
        if summary.total_valid > 0 { 100.0 } else { 0.0 },
        summary.valid_area()
    );
    println!("  Excluded (no data): {}", summary.unclassified);
}

#[derive(Serialize)]
struct JsonReport<'a> {
    inside: usize,
    ndvi_min: Option<f64>,
    ndvi_max: Option<f64>,
    ndvi_mean: Option<f64>,
    summary: &'a LandCoverSummary,
}

impl<'a> From<&'a VegetationReport> for JsonReport<'a> {
    fn from(report: &'a VegetationReport) -> Self {
        Self {
            inside: report.mask.count_inside(),
            ndvi_min: report.index_stats.min,
            ndvi_max: report.index_stats.max,
            ndvi_mean: report.index_stats.mean,
            summary: &report.summary,
        }
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let scene = load(&input)?;
            let (rows, cols) = scene.nir.shape();
            let bounds = scene.nir.bounds();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, scene.nir.len());
            println!("Transform: {}", scene.nir.transform());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            match scene.nir.crs() {
                Some(crs) => println!("CRS: {}", crs),
                None => println!("CRS: <none>"),
            }
            if let Some(nodata) = scene.nir.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("Boundary parts: {}", scene.boundary.parts().len());
            for (name, band) in [("NIR", &scene.nir), ("Red", &scene.red)] {
                let stats = band.statistics();
                println!("\n{} band:", name);
                if let (Some(min), Some(max)) = (stats.min, stats.max) {
                    println!("  Range: {:.4} - {:.4}", min, max);
                }
                if let Some(mean) = stats.mean {
                    println!("  Mean: {:.4}", mean);
                }
                println!(
                    "  Valid cells: {} ({:.1}%)",
                    stats.valid_count,
                    100.0 * stats.valid_count as f64 / band.len().max(1) as f64
                );
            }
        }

        // ── Summarize ────────────────────────────────────────────────
        Commands::Summarize {
            input,
            thresholds,
            below_label,
            json,
        } => {
            let breaks = parse_thresholds(&thresholds)?;
            let scheme = ClassificationScheme::new(breaks, below_label)
                .context("Invalid classification scheme")?;
            let scene = load(&input)?;

            let start = Instant::now();
            let report = VegetationPipeline::new(scheme)
                .run(&scene.nir, &scene.red, &scene.boundary)
                .context("Vegetation analysis failed")?;
            let elapsed = start.elapsed();
            info!(
                inside = report.mask.count_inside(),
                valid = report.summary.total_valid,
                "analysis finished in {:.2?}",
                elapsed
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&JsonReport::from(&report))?);
            } else {
                if let Some(mean) = report.index_stats.mean {
                    println!("Mean NDVI inside boundary: {:.4}", mean);
                }
                print_summary(&report.summary);
                println!("  Processing time: {:.2?}", elapsed);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_thresholds() {
        let pairs = parse_thresholds("0.2:Sparse, 0.45:Moderate ,0.7:Dense").unwrap();
        assert_eq!(
            pairs,
            vec![
                (0.2, "Sparse".to_string()),
                (0.45, "Moderate".to_string()),
                (0.7, "Dense".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_thresholds_negative_value() {
        let pairs = parse_thresholds("-0.1:Water,0.3:Vegetation").unwrap();
        assert_eq!(pairs[0].0, -0.1);
    }

    #[test]
    fn test_parse_thresholds_errors() {
        assert!(parse_thresholds("").is_err());
        assert!(parse_thresholds("0.2").is_err());
        assert!(parse_thresholds("high:Dense").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_thresholds_build_scheme() {
        let cli = Cli::parse_from(["greencover", "summarize", "scene.json"]);
        let Commands::Summarize {
            thresholds,
            below_label,
            ..
        } = cli.command
        else {
            panic!("expected summarize");
        };
        let scheme = ClassificationScheme::new(parse_thresholds(&thresholds).unwrap(), below_label)
            .unwrap();
        assert_eq!(scheme.thresholds(), &[0.2, 0.45, 0.7]);
        assert_eq!(scheme.len(), 4);
    }
}
