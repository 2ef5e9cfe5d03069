//! End-to-end pipeline orchestration.
//!
//! Loading, cleaning, and aggregation run to completion or fail fast;
//! no artifact is attempted after a fatal stage error. Artifact writes
//! are independent best-effort work: one failure is recorded without
//! rolling back or blocking the others.

use std::fs;
use std::path::PathBuf;

use tracing::{error, info};

use crate::aggregate::{self, AnalysisResult};
use crate::charts;
use crate::cleaner::{self, CleaningSummary};
use crate::config::PipelineConfig;
use crate::errors::AnalysisError;
use crate::loader;
use crate::record::Dataset;
use crate::report;

use crate::constants::reports;

/// Result of one artifact write attempt.
#[derive(Clone, Debug)]
pub struct ArtifactOutcome {
    /// Short artifact label used in logs and summaries.
    pub name: &'static str,
    /// Where the artifact was (or would have been) written.
    pub path: PathBuf,
    /// Failure message, when the write failed.
    pub error: Option<String>,
}

/// Outcome of a full pipeline run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Data-quality counters from the cleaning stage.
    pub cleaning: CleaningSummary,
    /// Per-artifact write outcomes, in attempt order.
    pub artifacts: Vec<ArtifactOutcome>,
}

impl RunSummary {
    /// `true` only when every artifact was written successfully.
    pub fn is_success(&self) -> bool {
        self.artifacts.iter().all(|artifact| artifact.error.is_none())
    }

    /// Artifacts that failed to write.
    pub fn failures(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.artifacts.iter().filter(|artifact| artifact.error.is_some())
    }
}

/// Run the full pipeline: load, clean, aggregate, then write every
/// report and chart artifact.
///
/// Stage errors abort before any output is attempted; artifact errors
/// are collected in the returned [`RunSummary`] instead.
pub fn run(config: &PipelineConfig) -> Result<RunSummary, AnalysisError> {
    let table = loader::load_raw(&config.loader)?;
    let (dataset, cleaning) = cleaner::clean(table, &config.cleaner)?;
    let analysis = aggregate::analyze(&dataset);
    log_insights(&analysis);

    fs::create_dir_all(&config.report.output_dir)?;
    let artifacts = write_artifacts(config, &dataset, &analysis);

    let summary = RunSummary {
        cleaning,
        artifacts,
    };
    if summary.is_success() {
        info!("analysis complete; all artifacts written");
    } else {
        for failure in summary.failures() {
            error!(
                artifact = failure.name,
                path = %failure.path.display(),
                error = failure.error.as_deref().unwrap_or(""),
                "artifact write failed"
            );
        }
    }
    Ok(summary)
}

fn write_artifacts(
    config: &PipelineConfig,
    dataset: &Dataset,
    analysis: &AnalysisResult,
) -> Vec<ArtifactOutcome> {
    let dir = &config.report.output_dir;
    let statistics = dir.join(reports::DETAILED_STATISTICS);
    let narrative = dir.join(reports::NARRATIVE_REPORT);
    let overview = dir.join(reports::CHART_OVERVIEW);
    let customers = dir.join(reports::CHART_CUSTOMERS);
    let temporal = dir.join(reports::CHART_TEMPORAL);
    let products = dir.join(reports::CHART_PRODUCTS);

    vec![
        outcome(
            "detailed_statistics",
            report::write_detailed_statistics(&statistics, analysis),
            statistics,
        ),
        outcome(
            "narrative_report",
            report::write_narrative_report(&narrative, dataset, analysis),
            narrative,
        ),
        outcome(
            "chart_overview",
            charts::sales_overview(&overview, analysis),
            overview,
        ),
        outcome(
            "chart_customers",
            charts::customer_geography(&customers, analysis),
            customers,
        ),
        outcome(
            "chart_temporal",
            charts::temporal_patterns(&temporal, analysis),
            temporal,
        ),
        outcome(
            "chart_products",
            charts::product_analysis(&products, analysis),
            products,
        ),
    ]
}

fn outcome(
    name: &'static str,
    result: Result<(), AnalysisError>,
    path: PathBuf,
) -> ArtifactOutcome {
    match result {
        Ok(()) => {
            info!(artifact = name, path = %path.display(), "artifact written");
            ArtifactOutcome {
                name,
                path,
                error: None,
            }
        }
        Err(err) => ArtifactOutcome {
            name,
            path,
            error: Some(err.to_string()),
        },
    }
}

fn log_insights(analysis: &AnalysisResult) {
    let insights = analysis.key_insights();
    info!(
        average_order_value = ?insights.average_order_value,
        median_order_value = ?insights.median_order_value,
        top_product_line = ?insights.top_product_line,
        average_profit_margin = ?insights.average_profit_margin,
        most_active_customer = ?insights.most_active_customer,
        "key statistical insights"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_fails_when_any_artifact_failed() {
        let summary = RunSummary {
            cleaning: CleaningSummary::default(),
            artifacts: vec![
                ArtifactOutcome {
                    name: "a",
                    path: PathBuf::from("a.txt"),
                    error: None,
                },
                ArtifactOutcome {
                    name: "b",
                    path: PathBuf::from("b.png"),
                    error: Some("disk full".into()),
                },
            ],
        };
        assert!(!summary.is_success());
        assert_eq!(summary.failures().count(), 1);
    }

    #[test]
    fn summary_succeeds_with_no_failures() {
        let summary = RunSummary {
            cleaning: CleaningSummary::default(),
            artifacts: vec![ArtifactOutcome {
                name: "a",
                path: PathBuf::from("a.txt"),
                error: None,
            }],
        };
        assert!(summary.is_success());
    }
}
