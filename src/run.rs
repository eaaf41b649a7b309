//! Benchmark run discovery
//!
//! A result directory holds one sysbench log per run, named
//! `<scenario>_<threads>threads.log`, next to a marker file
//! `<scenario>_<threads>threads_time.log` carrying the run's wall-clock
//! window as `TEST_START_TIME:` / `TEST_END_TIME:` lines.

use crate::config::CorrelationConfig;
use crate::correlate::{aggregate_raw, AggregateResult};
use crate::sample_store::SampleStore;
use crate::sysbench::SysbenchResult;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

pub const START_MARKER: &str = "TEST_START_TIME:";
pub const END_MARKER: &str = "TEST_END_TIME:";

/// Raw run window text from a marker file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTimes {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RunTimes {
    /// Extract start/end marker values
    ///
    /// The value is everything after the first `:` of the line, trimmed.
    /// A later marker line overrides an earlier one.
    ///
    /// # Example
    /// ```
    /// use benchmon::run::RunTimes;
    ///
    /// let times = RunTimes::parse("TEST_START_TIME: 2025-11-22 15:33:10\nTEST_END_TIME: 2025-11-22 15:33:50\n");
    /// assert_eq!(times.start.as_deref(), Some("2025-11-22 15:33:10"));
    /// assert_eq!(times.end.as_deref(), Some("2025-11-22 15:33:50"));
    /// ```
    pub fn parse(content: &str) -> Self {
        let mut times = Self::default();
        for line in content.lines() {
            let value = || {
                line.split_once(':')
                    .map(|(_, rest)| rest.trim().to_string())
            };
            if line.contains(START_MARKER) {
                times.start = value();
            } else if line.contains(END_MARKER) {
                times.end = value();
            }
        }
        times
    }

    /// Missing marker file means no window
    ///
    /// Invalid UTF-8 is replaced rather than rejected; the marker lines
    /// themselves are ASCII.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("run marker file not found: {}", path.display());
            return Ok(Self::default());
        }
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read run marker file: {}", path.display()))?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// `start ~ end`, or `None` without a start time
    pub fn display_range(&self) -> Option<String> {
        let start = self.start.as_deref().filter(|s| !s.is_empty())?;
        Some(format!("{} ~ {}", start, self.end.as_deref().unwrap_or("")))
    }
}

/// Files belonging to one benchmark run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFiles {
    pub scenario: String,
    pub threads: u32,
    pub log_path: PathBuf,
    pub time_path: PathBuf,
}

fn run_log_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<scenario>oltp_\w+)_(?P<threads>\d+)threads\.log$")
            .expect("static run log pattern")
    })
}

impl RunFiles {
    /// Recognize a sysbench log by file name
    ///
    /// # Example
    /// ```
    /// use benchmon::run::RunFiles;
    /// use std::path::Path;
    ///
    /// let run = RunFiles::from_log_path(Path::new("res/oltp_point_select_16threads.log")).unwrap();
    /// assert_eq!(run.scenario, "oltp_point_select");
    /// assert_eq!(run.threads, 16);
    /// assert_eq!(run.time_path, Path::new("res/oltp_point_select_16threads_time.log"));
    /// ```
    pub fn from_log_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let caps = run_log_pattern().captures(name)?;
        let threads = caps["threads"].parse().ok()?;
        let stem = name.strip_suffix(".log")?;

        Some(Self {
            scenario: caps["scenario"].to_string(),
            threads,
            log_path: path.to_path_buf(),
            time_path: path.with_file_name(format!("{}_time.log", stem)),
        })
    }
}

/// Find every sysbench run log in a result directory, sorted by file name
pub fn discover_runs<P: AsRef<Path>>(dir: P) -> Result<Vec<RunFiles>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read result directory: {}", dir.display()))?;

    let mut runs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(run) = RunFiles::from_log_path(&path) {
            runs.push(run);
        }
    }
    runs.sort_by(|a, b| a.log_path.cmp(&b.log_path));

    debug!(runs = runs.len(), dir = %dir.display(), "discovered benchmark runs");
    Ok(runs)
}

/// One benchmark run with its correlated resource usage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRun {
    pub scenario: String,
    pub threads: u32,
    pub sysbench: SysbenchResult,
    pub times: RunTimes,
    /// Mean resource usage during the run; `None` renders as "no data"
    pub resources: Option<AggregateResult>,
}

impl BenchmarkRun {
    /// Read a run's files and correlate it against the sample store
    ///
    /// An unreadable sysbench log degrades to empty results and an unreadable
    /// marker file to an unknown window; only this run is affected.
    pub fn load(files: &RunFiles, store: &SampleStore, config: &CorrelationConfig) -> Self {
        let sysbench = SysbenchResult::from_file(&files.log_path).unwrap_or_else(|err| {
            warn!("{:#}", err);
            SysbenchResult::default()
        });
        let times = RunTimes::from_file(&files.time_path).unwrap_or_else(|err| {
            warn!("{:#}", err);
            RunTimes::default()
        });
        let resources = aggregate_raw(store, times.start.as_deref(), times.end.as_deref(), config);

        Self {
            scenario: files.scenario.clone(),
            threads: files.threads,
            sysbench,
            times,
            resources,
        }
    }
}

/// Order runs by execution: start-time text, runs without a start first
pub fn sort_by_start(runs: &mut [BenchmarkRun]) {
    runs.sort_by(|a, b| {
        let a = a.times.start.as_deref().unwrap_or("");
        let b = b.times.start.as_deref().unwrap_or("");
        a.cmp(b)
    });
}
