// Per-environment data for the merged report

use crate::config::CorrelationConfig;
use crate::report::BenchmarkReport;
use crate::run::BenchmarkRun;
use crate::sample_store::MetricSchema;
use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Hardware and MySQL facts scraped from an environment's config dumps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentFacts {
    pub cpu_model: Option<String>,
    pub cores: Option<String>,
    pub memory: Option<String>,
    /// `innodb_buffer_pool_size` in whole GiB, e.g. "16GB"
    pub buffer_pool: Option<String>,
    /// `innodb_flush_log_at_trx_commit`
    pub flush_log: Option<String>,
}

struct Patterns {
    cpu_model: Regex,
    cores: Regex,
    cores_short: Regex,
    memory: Regex,
    buffer_pool: Regex,
    flush_log: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("static environment pattern");
        Patterns {
            // lscpu prints a localized label under zh_CN
            cpu_model: compile(r"(?m)^\s*(?:Model name|型号名称)\s*[:：]\s*(?P<value>.+?)\s*$"),
            cores: compile(r"CPU\(s\):\s*(?P<value>\d+)"),
            cores_short: compile(r"(?m)^CPU:\s+(?P<value>\d+)"),
            memory: compile(r"Mem:\s+(?P<value>\d+\w+)"),
            buffer_pool: compile(r"innodb_buffer_pool_size\s+(?P<value>\d+)"),
            flush_log: compile(r"innodb_flush_log_at_trx_commit\s+(?P<value>\d+)"),
        }
    })
}

fn capture(pattern: &Regex, content: &str) -> Option<String> {
    pattern
        .captures(content)
        .and_then(|caps| caps.name("value"))
        .map(|m| m.as_str().to_string())
}

impl EnvironmentFacts {
    pub fn extract(server_config: &str, mysql_config: &str) -> Self {
        let p = patterns();
        let buffer_pool = capture(&p.buffer_pool, mysql_config)
            .and_then(|bytes| bytes.parse::<u64>().ok())
            .map(|bytes| format!("{:.0}GB", bytes as f64 / (1u64 << 30) as f64));

        Self {
            cpu_model: capture(&p.cpu_model, server_config),
            cores: capture(&p.cores, server_config)
                .or_else(|| capture(&p.cores_short, server_config)),
            memory: capture(&p.memory, server_config),
            buffer_pool,
            flush_log: capture(&p.flush_log, mysql_config),
        }
    }
}

/// One environment's collected results
#[derive(Debug, Clone)]
pub struct EnvironmentReport {
    /// Environment name, taken from the result directory name
    pub name: String,
    pub facts: EnvironmentFacts,
    pub report: BenchmarkReport,
}

impl EnvironmentReport {
    pub fn collect(dir: &Path, schema: MetricSchema, config: &CorrelationConfig) -> Result<Self> {
        let report = BenchmarkReport::collect(dir, schema, config)?;
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        Ok(Self::from_report(name, report))
    }

    pub fn from_report(name: String, report: BenchmarkReport) -> Self {
        let facts = EnvironmentFacts::extract(&report.server_config, &report.mysql_config);
        Self {
            name,
            facts,
            report,
        }
    }

    /// First run with the given scenario and thread count
    pub fn run(&self, scenario: &str, threads: u32) -> Option<&BenchmarkRun> {
        self.report
            .runs
            .iter()
            .find(|r| r.scenario == scenario && r.threads == threads)
    }

    pub fn has_scenario(&self, scenario: &str) -> bool {
        self.report.runs.iter().any(|r| r.scenario == scenario)
    }

    pub fn qps(&self, scenario: &str, threads: u32) -> Option<f64> {
        self.run(scenario, threads).and_then(|r| r.sysbench.qps)
    }

    pub fn p95_latency(&self, scenario: &str, threads: u32) -> Option<f64> {
        self.run(scenario, threads)
            .and_then(|r| r.sysbench.p95_latency_ms)
    }
}
