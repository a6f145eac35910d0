//! YELT analysis CLI
//!
//! Loads a year event loss table from CSV and reports AAL and EP summaries for
//! the gross losses and for every layer in the config file.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rayon::prelude::*;
use serde::Serialize;

use yelt_analytics::{from_csv, AnalysisConfig, EpSummaries, Layer, YearEventLossTable};

#[derive(Debug, Parser)]
#[command(name = "yelt", version, about = "Risk metrics from a year event loss table")]
struct Args {
    /// CSV file with Year, EventID, DayOfYear and Loss columns
    input: PathBuf,

    /// Number of modeled years (overrides the config file)
    #[arg(long)]
    n_yrs: Option<u32>,

    /// JSON analysis config with return periods and layers
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma separated return periods (overrides the config file)
    #[arg(long, value_delimiter = ',')]
    return_periods: Vec<f64>,

    /// Write the gross EP summaries to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the gross exceedance frequency curve to this CSV file
    #[arg(long)]
    curve: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct LossReport {
    name: String,
    layer: Option<Layer>,
    n_losses: usize,
    aal: f64,
    freq0: f64,
    summaries: EpSummaries,
}

impl LossReport {
    fn new(
        name: &str,
        layer: Option<Layer>,
        yelt: &YearEventLossTable,
        return_periods: &[f64],
        is_eef: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            layer,
            n_losses: yelt.len(),
            aal: yelt.aal(),
            freq0: yelt.freq0(),
            summaries: yelt.to_ep_summaries(return_periods, is_eef),
        }
    }

    fn print(&self) {
        println!("{}", self.name);
        println!("{}", "-".repeat(self.name.len().max(8)));
        if let Some(layer) = &self.layer {
            let limit = layer
                .limit()
                .map(|l| format!("{:.2}", l))
                .unwrap_or_else(|| "unlimited".to_string());
            let cap = layer
                .n_loss()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "none".to_string());
            println!(
                "  Limit: {}  Attachment: {:.2}  Occurrence cap: {}  Franchise: {}",
                limit,
                layer.xs(),
                cap,
                layer.is_franchise()
            );
        }
        println!("  Losses: {}", self.n_losses);
        println!("  AAL:    {:.2}", self.aal);
        println!("  Freq0:  {:.6}", self.freq0);
        println!();
        println!(
            "{:>12} {:>16} {:>20} {:>16}",
            "ReturnPeriod", "LossPerYear", "MaxEventLossPerYear", "EventLoss"
        );
        for row in &self.summaries.rows {
            let eef = row
                .event_loss
                .map(|l| format!("{:.2}", l))
                .unwrap_or_default();
            println!(
                "{:>12} {:>16.2} {:>20.2} {:>16}",
                row.return_period, row.loss_per_year, row.max_event_loss_per_year, eef
            );
        }
        println!();
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let n_yrs = args
        .n_yrs
        .or(config.n_yrs)
        .context("n_yrs must be given with --n-yrs or in the config file")?;

    let return_periods = if args.return_periods.is_empty() {
        config.return_periods.clone()
    } else {
        args.return_periods.clone()
    };

    let layers = config.layers().context("Invalid layer in config")?;

    let yelt = from_csv(&args.input, n_yrs)
        .with_context(|| format!("Failed to load YELT from {}", args.input.display()))?;

    let gross = LossReport::new("Gross", None, &yelt, &return_periods, config.is_eef);

    // Layers share nothing but the source table
    let layer_reports: Vec<LossReport> = layers
        .par_iter()
        .map(|(name, layer)| {
            let layered = yelt.apply_layer(layer);
            LossReport::new(
                name,
                Some(*layer),
                &layered,
                &return_periods,
                config.is_eef,
            )
        })
        .collect();

    if let Some(path) = &args.output {
        gross
            .summaries
            .write_csv_path(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("EP summaries written to {}", path.display());
    }

    if let Some(path) = &args.curve {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        yelt.to_ef_curve(config.keep_index).write_csv(file)?;
        info!("Exceedance frequency curve written to {}", path.display());
    }

    if args.json {
        let mut reports = vec![gross];
        reports.extend(layer_reports);
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("YELT Analytics v{}", env!("CARGO_PKG_VERSION"));
    println!("========================\n");
    println!(
        "Input: {} ({} years)\n",
        args.input.display(),
        yelt.n_yrs()
    );

    gross.print();
    for report in &layer_reports {
        report.print();
    }

    Ok(())
}
