//! Benchmark report assembly
//!
//! Builds the sample store once per result directory, correlates every run
//! against it and prepares table cells shared by all output formats.

use crate::cli::OutputFormat;
use crate::config::CorrelationConfig;
use crate::html_output::HtmlOutput;
use crate::json_output::JsonReport;
use crate::markdown_output::MarkdownOutput;
use crate::run::{discover_runs, sort_by_start, BenchmarkRun};
use crate::sample_store::{MetricSchema, SampleStore};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const TSAR_LOG: &str = "tsar.log";
pub const TEST_CONFIG: &str = "test_config.txt";
pub const MYSQL_VARIABLES: &str = "mysql_variables.txt";
pub const SERVER_CONFIG: &str = "server_config.txt";
pub const REPORT_STEM: &str = "performance_report";

/// Placeholder for values that could not be determined
pub const NO_DATA: &str = "N/A";

/// Everything known about one result directory
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub result_dir: PathBuf,
    pub generated_at: NaiveDateTime,
    pub schema: MetricSchema,
    /// Samples in the monitoring log
    pub sample_total: usize,
    pub test_config: String,
    pub mysql_config: String,
    pub server_config: String,
    /// Runs in execution order
    pub runs: Vec<BenchmarkRun>,
}

impl BenchmarkReport {
    /// Collect and correlate all runs in a result directory
    pub fn collect<P: AsRef<Path>>(
        dir: P,
        schema: MetricSchema,
        config: &CorrelationConfig,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            anyhow::bail!("Result directory does not exist: {}", dir.display());
        }

        let store = SampleStore::from_file(dir.join(TSAR_LOG), schema)?;

        let mut runs: Vec<BenchmarkRun> = discover_runs(dir)?
            .iter()
            .map(|files| BenchmarkRun::load(files, &store, config))
            .collect();
        sort_by_start(&mut runs);

        let uncorrelated = runs.iter().filter(|r| r.resources.is_none()).count();
        if uncorrelated > 0 && !store.is_empty() {
            warn!(
                "{} of {} runs have no monitoring data in {}",
                uncorrelated,
                runs.len(),
                dir.display()
            );
        }
        info!(
            runs = runs.len(),
            samples = store.len(),
            dir = %dir.display(),
            "collected benchmark report"
        );

        Ok(Self {
            result_dir: dir.to_path_buf(),
            generated_at: chrono::Local::now().naive_local(),
            sample_total: store.len(),
            schema: store.schema().clone(),
            test_config: read_optional(&dir.join(TEST_CONFIG)),
            mysql_config: read_optional(&dir.join(MYSQL_VARIABLES)),
            server_config: read_optional(&dir.join(SERVER_CONFIG)),
            runs,
        })
    }

    /// Metric columns in display order: the schema's utilization metric
    /// first, then the rest in schema order
    pub fn metric_order(&self) -> Vec<&str> {
        let lead = self.schema.utilization_metric();
        lead.into_iter()
            .chain(self.schema.names().into_iter().filter(|n| Some(*n) != lead))
            .collect()
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Markdown => MarkdownOutput::new(self).to_markdown(),
            OutputFormat::Html => HtmlOutput::new(self).to_html(),
            OutputFormat::Json => JsonReport::from_report(self).to_json()?,
        })
    }

    /// Render into `<result_dir>/performance_report.<ext>`
    pub fn write(&self, format: OutputFormat) -> Result<PathBuf> {
        let path = self
            .result_dir
            .join(format!("{}.{}", REPORT_STEM, format.extension()));
        fs::write(&path, self.render(format)?)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(path)
    }
}

/// Config dumps are informational: a missing or unreadable file renders as
/// empty, and invalid UTF-8 (e.g. lscpu under a GBK locale) is replaced
fn read_optional(path: &Path) -> String {
    if !path.exists() {
        debug!("optional file not found: {}", path.display());
        return String::new();
    }
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            warn!("Failed to read {}: {}", path.display(), err);
            String::new()
        }
    }
}

/// Display label for a metric column
pub fn metric_label(name: &str) -> &str {
    match name {
        "cpu_sirq" => "CPU softirq (%)",
        "cpu_util" => "CPU util (%)",
        "cpu_user" => "CPU user (%)",
        "cpu_sys" => "CPU sys (%)",
        "cpu_wait" => "CPU wait (%)",
        "io_util" => "IO util (%)",
        other => other,
    }
}

/// tsar column name and meaning for a metric, used in report legends
pub fn metric_legend(name: &str) -> Option<(&'static str, &'static str)> {
    Some(match name {
        "cpu_sirq" => ("sirq", "CPU time servicing soft interrupts"),
        "cpu_util" => ("util", "Overall CPU utilization"),
        "cpu_user" => ("user", "CPU time in user mode"),
        "cpu_sys" => ("sys", "CPU time in kernel mode"),
        "cpu_wait" => ("wait", "CPU time waiting on IO"),
        "io_util" => ("util (io)", "Disk IO utilization"),
        _ => return None,
    })
}

/// `1234567.8` -> `1,234,568`
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return rounded;
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

/// Pre-formatted table cells for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCells {
    pub scenario: String,
    pub threads: String,
    pub qps: String,
    pub tps: String,
    pub avg_latency: String,
    pub p95_latency: String,
    /// One cell per metric in `BenchmarkReport::metric_order`
    pub metrics: Vec<String>,
    pub sample_count: String,
    pub tier: String,
    pub time_range: String,
}

impl RunCells {
    pub fn new(run: &BenchmarkRun, metric_order: &[&str]) -> Self {
        let opt = |v: Option<f64>, f: fn(f64) -> String| v.map(f).unwrap_or_else(|| NO_DATA.to_string());
        let resources = run.resources.as_ref();

        Self {
            scenario: run.scenario.clone(),
            threads: run.threads.to_string(),
            qps: opt(run.sysbench.qps, format_thousands),
            tps: opt(run.sysbench.tps, format_thousands),
            avg_latency: opt(run.sysbench.avg_latency_ms, |v| format!("{:.2}", v)),
            p95_latency: opt(run.sysbench.p95_latency_ms, |v| format!("{:.2}", v)),
            metrics: metric_order
                .iter()
                .map(|name| opt(resources.and_then(|r| r.metric(name)), |v| format!("{:.1}", v)))
                .collect(),
            sample_count: resources
                .map(|r| r.sample_count.to_string())
                .unwrap_or_else(|| NO_DATA.to_string()),
            tier: resources
                .map(|r| r.tier.to_string())
                .unwrap_or_else(|| NO_DATA.to_string()),
            time_range: run
                .times
                .display_range()
                .unwrap_or_else(|| NO_DATA.to_string()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{report, run};
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(93399.41), "93,399");
        assert_eq!(format_thousands(1234567.8), "1,234,568");
        assert_eq!(format_thousands(-1234.0), "-1,234");
        assert_eq!(format_thousands(f64::NAN), "NaN");
    }

    #[test]
    fn test_metric_order_leads_with_utilization_metric() {
        let report = report(vec![]);
        assert_eq!(
            report.metric_order(),
            vec!["cpu_util", "cpu_user", "cpu_sys", "cpu_wait", "io_util"]
        );
    }

    #[test]
    fn test_run_cells_with_resources() {
        let report = report(vec![]);
        let cells = RunCells::new(&run("oltp_point_select", 16, true), &report.metric_order());

        assert_eq!(cells.qps, "93,399");
        assert_eq!(cells.tps, "4,670");
        assert_eq!(cells.avg_latency, "0.17");
        assert_eq!(cells.p95_latency, "0.26");
        assert_eq!(cells.metrics, vec!["55.5", "41.3", "12.0", "0.5", "7.0"]);
        assert_eq!(cells.sample_count, "31");
        assert_eq!(cells.tier, "exact-window");
        assert_eq!(cells.time_range, "2025-11-22 15:33:10 ~ 2025-11-22 15:33:50");
    }

    #[test]
    fn test_run_cells_without_resources_use_placeholder() {
        let report = report(vec![]);
        let cells = RunCells::new(&run("oltp_point_select", 16, false), &report.metric_order());

        assert!(cells.metrics.iter().all(|c| c == NO_DATA));
        assert_eq!(cells.sample_count, NO_DATA);
        assert_eq!(cells.tier, NO_DATA);
    }

    #[test]
    fn test_metric_label_and_legend() {
        assert_eq!(metric_label("cpu_sirq"), "CPU softirq (%)");
        assert_eq!(metric_label("custom"), "custom");
        assert_eq!(metric_legend("io_util").unwrap().0, "util (io)");
        assert!(metric_legend("custom").is_none());
    }

    #[test]
    fn test_collect_missing_dir() {
        let err = BenchmarkReport::collect(
            "/nonexistent/results",
            MetricSchema::util(),
            &CorrelationConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_collect_one_bad_marker_spares_other_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path();
        fs::write(
            path.join(TSAR_LOG),
            "22/11/25-15:33:30 10.0 1.0 0.0 0.0 2.0 13.0\n22/11/25-15:40:30 20.0 1.0 0.0 0.0 4.0 13.0\n",
        )
        .unwrap();
        fs::write(path.join("oltp_point_select_1threads.log"), "queries: 100 (10.00 per sec.)\n").unwrap();
        fs::write(
            path.join("oltp_point_select_1threads_time.log"),
            "TEST_START_TIME: 2025-11-22 15:33:10\nTEST_END_TIME: 2025-11-22 15:33:50\n",
        )
        .unwrap();
        fs::write(path.join("oltp_write_only_8threads.log"), "queries: 50 (5.00 per sec.)\n").unwrap();
        fs::write(path.join("oltp_write_only_8threads_time.log"), b"\xb2\xe2\xca\xd4").unwrap();
        fs::write(path.join(SERVER_CONFIG), b"\xd0\xcd\xba\xc5\xc3\xfb\xb3\xc6: Kunpeng-920\n").unwrap();

        let report =
            BenchmarkReport::collect(path, MetricSchema::util(), &CorrelationConfig::default()).unwrap();
        assert_eq!(report.runs.len(), 2);
        assert!(report.server_config.contains("Kunpeng-920"));

        let healthy = report.runs.iter().find(|r| r.threads == 1).unwrap();
        assert_eq!(healthy.resources.as_ref().unwrap().metric("cpu_util"), Some(2.0));

        let garbled = report.runs.iter().find(|r| r.threads == 8).unwrap();
        assert_eq!(garbled.times, crate::run::RunTimes::default());
        assert_eq!(garbled.resources, None);
    }
}
