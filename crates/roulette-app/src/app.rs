//! Pipeline orchestration.
//!
//! load -> aggregate -> build views -> render -> write. Each stage is a
//! function over the previous stage's output; this module only wires them
//! together and reports progress.

use crate::config::AppConfig;
use crate::error::AppResult;
use chrono::Utc;
use roulette_analysis::{build_charts, AnalysisError, Aggregator};
use roulette_persistence::{load_records, PersistenceError};
use roulette_report::{write_report, HtmlReport};
use roulette_sim::{SimConfig, SimSummary, Simulator};
use roulette_telemetry::ProgressReporter;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Result of one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRun {
    pub output_path: PathBuf,
    pub total_bets: usize,
    pub charts: usize,
    /// Whether trend charts were downsampled.
    pub binned: bool,
}

/// Bet log analyzer.
pub struct Analyzer {
    config: AppConfig,
    show_progress: bool,
}

impl Analyzer {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let show_progress = config.telemetry.progress;
        Ok(Self {
            config,
            show_progress,
        })
    }

    /// Force progress bars off regardless of config.
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn progress(&self, label: &'static str, total: u64) -> AppResult<ProgressReporter> {
        if self.show_progress && std::io::stderr().is_terminal() {
            Ok(ProgressReporter::new(label, total)?)
        } else {
            Ok(ProgressReporter::hidden(label, total))
        }
    }

    /// Produce the HTML report. Nothing is written unless every stage succeeds.
    pub fn run(&self) -> AppResult<ReportRun> {
        let input = &self.config.input;
        info!(path = %input.path.display(), chunk_size = input.chunk_size, "Reading bet log");

        let progress = self.progress("Loading", 0)?;
        let loaded = load_records(&input.path, input.chunk_size, |p| {
            progress.ensure_length(p.chunks_total as u64);
            progress.step(format!("{} rows", p.rows_loaded));
        });
        progress.finish();

        let records = match loaded {
            Ok(records) => records,
            Err(PersistenceError::FileNotFound(path)) => {
                error!(
                    path = %path.display(),
                    "Log file not found, check the input path"
                );
                return Err(PersistenceError::FileNotFound(path).into());
            }
            Err(e) => return Err(e.into()),
        };

        if records.is_empty() {
            warn!(path = %input.path.display(), "Bet log has no data rows");
            return Err(AnalysisError::EmptyDataset.into());
        }
        info!(rows = records.len(), "Data loaded, processing");

        let aggregator = Aggregator::new(self.config.aggregation.bin_target)?;
        let aggregated = aggregator.aggregate(&records);

        info!("Generating charts");
        let charts = build_charts(&records, &aggregated)?;

        let report = HtmlReport::new(self.config.report.clone());
        let progress = self.progress("Rendering", charts.len() as u64)?;
        let rendered = report.render_all(&charts, |chart| {
            progress.step(format!("{} ({:?})", chart.id, chart.mode));
        })?;
        progress.finish();

        let html = report.assemble(&rendered, records.len(), Utc::now());
        let output_path = self.config.report.output_path.clone();
        write_report(&output_path, &html)?;

        info!(
            path = %output_path.display(),
            total_bets = records.len(),
            charts = rendered.len(),
            "Report generation complete"
        );

        Ok(ReportRun {
            output_path,
            total_bets: records.len(),
            charts: rendered.len(),
            binned: aggregated.binned,
        })
    }
}

/// Run the simulator and write its bet log.
pub fn run_simulation(config: &SimConfig) -> AppResult<SimSummary> {
    let simulator = Simulator::new(config.clone())?;
    if !config.is_deterministic() {
        info!("Using random seeds; set server_seed, client_seed and start_nonce to reproduce a run");
    }

    let summary = simulator.run_to_csv(&config.output_path)?;
    summary.log();
    Ok(summary)
}

