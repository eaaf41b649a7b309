//! JSON output format for benchmark reports

use crate::correlate::AggregateResult;
use crate::report::BenchmarkReport;
use crate::sysbench::SysbenchResult;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A single benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRun {
    /// sysbench scenario (e.g., "oltp_point_select")
    pub scenario: String,
    pub threads: u32,
    #[serde(flatten)]
    pub sysbench: SysbenchResult,
    /// Run window as written in the marker file
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// Correlated monitoring data; `null` when none could be attributed
    pub resources: Option<AggregateResult>,
}

/// Complete JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub generated_at: String,
    /// Metric set name ("sirq" or "util")
    pub metric_set: String,
    pub metrics: Vec<String>,
    pub sample_total: usize,
    pub runs: Vec<JsonRun>,
}

impl JsonReport {
    pub fn from_report(report: &BenchmarkReport) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            metric_set: report.schema.name.clone(),
            metrics: report.schema.names().iter().map(|s| s.to_string()).collect(),
            sample_total: report.sample_total,
            runs: report
                .runs
                .iter()
                .map(|run| JsonRun {
                    scenario: run.scenario.clone(),
                    threads: run.threads,
                    sysbench: run.sysbench.clone(),
                    start_time: run.times.start.clone(),
                    end_time: run.times.end.clone(),
                    resources: run.resources.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::{report, run};

    #[test]
    fn test_json_report_shape() {
        let report = report(vec![
            run("oltp_point_select", 1, true),
            run("oltp_write_only", 8, false),
        ]);
        let json = JsonReport::from_report(&report).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metric_set"], "util");
        assert_eq!(value["sample_total"], 3600);
        assert_eq!(value["metrics"][3], "cpu_util");

        let first = &value["runs"][0];
        assert_eq!(first["scenario"], "oltp_point_select");
        assert_eq!(first["qps"], 93399.41);
        assert_eq!(first["resources"]["sample_count"], 31);
        assert_eq!(first["resources"]["tier"], "exact_window");
        assert_eq!(first["resources"]["metrics"]["io_util"], 7.0);

        assert!(value["runs"][1]["resources"].is_null());
    }

    #[test]
    fn test_json_report_roundtrip() {
        let report = report(vec![run("oltp_read_only", 32, true)]);
        let json = JsonReport::from_report(&report).to_json().unwrap();
        let parsed: JsonReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.runs.len(), 1);
        assert_eq!(parsed.runs[0].threads, 32);
        assert_eq!(parsed.runs[0].resources, report.runs[0].resources);
    }
}
