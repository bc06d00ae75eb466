use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use kmer_bench_viewer::data::metrics::MetricDimension;
use kmer_bench_viewer::pipeline::build_report;
use kmer_bench_viewer::report::BenchmarkReport;
use kmer_bench_viewer::{ReportConfig, ReportError};

/// Aggregate benchmark result files and print (or export) the report.
#[derive(Parser, Debug)]
#[command(name = "bench-report", version, about)]
struct Args {
    /// JSON report configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with query-timing and construction CSVs.
    #[arg(long)]
    experiments: Option<PathBuf>,

    /// Directory with distribution and memory CSVs.
    #[arg(long)]
    distributions: Option<PathBuf>,

    /// Read-filtering results CSV.
    #[arg(long)]
    filter_results: Option<PathBuf>,

    /// Moving-average width for query timings.
    #[arg(long)]
    query_window: Option<usize>,

    /// Moving-average width for error profiles.
    #[arg(long)]
    error_window: Option<usize>,

    /// Disable all smoothing.
    #[arg(long)]
    no_smoothing: bool,

    /// Print the report as JSON instead of the text summary.
    #[arg(long)]
    json: bool,

    /// Also write the JSON report to this file.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn config_from(args: &Args) -> Result<ReportConfig> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    if let Some(dir) = &args.experiments {
        config.experiments_dir = dir.clone();
    }
    if let Some(dir) = &args.distributions {
        config.distribution_dir = dir.clone();
    }
    if let Some(path) = &args.filter_results {
        config.filter_results = path.clone();
    }
    if let Some(w) = args.query_window {
        config.query_window = w;
    }
    if let Some(w) = args.error_window {
        config.error_window = w;
    }
    if args.no_smoothing {
        config.smoothing_enabled = false;
    }
    Ok(config)
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn write_summary(out: &mut impl Write, report: &BenchmarkReport) -> std::io::Result<()> {
    let queries = &report.queries;
    writeln!(out, "== Queries (smoothing window {}) ==", queries.window)?;
    for group in &queries.full.groups {
        writeln!(out, "K = {}", group.parameter)?;
        for entry in &group.entries {
            let dims: Vec<&str> = entry.series.iter().map(|s| s.dimension.name()).collect();
            writeln!(
                out,
                "  {:<18} {:<32} series: {}",
                entry.label,
                entry.source,
                dims.join(", ")
            )?;
            for e in &entry.errors {
                writeln!(
                    out,
                    "    {} MAE {:.6} MRE {:.6}",
                    e.label, e.absolute_error, e.relative_error
                )?;
            }
        }
    }

    writeln!(out, "\n== Error vs memory ==")?;
    writeln!(
        out,
        "{:<16} {:>14} {:>12} {:>12} {:>12} {:>12}",
        "label", "sketch bytes", "MAE q", "MRE q", "MAE r", "MRE r"
    )?;
    for point in &report.memory_comparison.points {
        let value = |dimension, relative: bool| {
            point
                .error(dimension)
                .map(|e| {
                    let v = if relative { e.relative_error } else { e.absolute_error };
                    format!("{v:.6}")
                })
                .unwrap_or_else(|| "-".to_string())
        };
        writeln!(
            out,
            "{:<16} {:>14} {:>12} {:>12} {:>12} {:>12}",
            point.label,
            opt(point.sketch_memory()),
            value(MetricDimension::Quantile, false),
            value(MetricDimension::Quantile, true),
            value(MetricDimension::Rank, false),
            value(MetricDimension::Rank, true),
        )?;
    }

    writeln!(out, "\n== Distributions ==")?;
    writeln!(
        out,
        "{:<16} {:>10} {:>14} {:>14}",
        "label", "quantiles", "peak", "elements"
    )?;
    for profile in &report.error_profiles {
        let Some(comparison) = &profile.comparison else {
            continue;
        };
        writeln!(
            out,
            "{:<16} {:>10} {:>14} {:>14}",
            profile.label,
            comparison.x.len(),
            opt(comparison.peak()),
            opt(profile.element_counts()),
        )?;
    }

    writeln!(out, "\n== Construction ==")?;
    for series in &report.construction {
        let pairs: Vec<String> = series
            .n
            .iter()
            .zip(&series.mean_seconds)
            .map(|(n, t)| format!("{n}:{t:.3}s"))
            .collect();
        writeln!(out, "{:<18} {}", series.label, pairs.join(" "))?;
    }

    writeln!(out, "\n== Memory (KB) ==")?;
    writeln!(
        out,
        "{:>6} {:>12} {:>12} {:>14} {:>14} {:>14}",
        "K", "elements", "unique", "sketch", "vector", "compressed"
    )?;
    for row in &report.memory_table {
        writeln!(
            out,
            "{:>6} {:>12} {:>12} {:>14} {:>14} {:>14}",
            row.k,
            opt(row.elements),
            opt(row.unique_elements),
            opt(row.sketch_kb.map(|v| format!("{v:.2}"))),
            opt(row.vector_kb.map(|v| format!("{v:.2}"))),
            opt(row.compressed_kb.map(|v| format!("{v:.2}"))),
        )?;
    }

    if !report.filter_table.is_empty() {
        writeln!(out, "\n== Read filtering ==")?;
        writeln!(
            out,
            "{:>4} {:>7} {:>7} {:>10} {:>10} {:>12} {:>12} {:>12}",
            "K", "low q", "up q", "low bound", "up bound", "elements", "unique elim", "total elim"
        )?;
        for row in &report.filter_table {
            writeln!(
                out,
                "{:>4} {:>7} {:>7} {:>10} {:>10} {:>12} {:>12} {:>12}",
                row.k,
                row.lower_quantile,
                row.upper_quantile,
                opt(row.lower_bound),
                opt(row.upper_bound),
                opt(row.elements),
                opt(row.unique_eliminated),
                opt(row.eliminated),
            )?;
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();
    let config = config_from(&args)?;

    let report = match build_report(&config) {
        Ok(report) => report,
        Err(e) => {
            if let Some(ReportError::EmptyInput(what)) = e.downcast_ref::<ReportError>() {
                eprintln!("Nothing to do: {what}");
                return Ok(ExitCode::SUCCESS);
            }
            return Err(e);
        }
    };

    let json = serde_json::to_string_pretty(&report).context("serializing report")?;
    if let Some(path) = &args.output {
        std::fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        writeln!(out, "{json}")?;
    } else {
        write_summary(&mut out, &report)?;
    }
    Ok(ExitCode::SUCCESS)
}
