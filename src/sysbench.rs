//! sysbench result parsing
//!
//! Extracts the four scalar fields a report needs from sysbench's text
//! summary. Each field is matched independently, so a truncated log still
//! yields whatever fields it does contain.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};

/// Scalar results of one sysbench run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SysbenchResult {
    /// Queries per second
    pub qps: Option<f64>,
    /// Transactions per second
    pub tps: Option<f64>,
    /// Average latency in milliseconds
    pub avg_latency_ms: Option<f64>,
    /// 95th percentile latency in milliseconds
    pub p95_latency_ms: Option<f64>,
}

struct Patterns {
    qps: Regex,
    tps: Regex,
    avg_latency: Regex,
    p95_latency: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("static sysbench pattern");
        Patterns {
            qps: compile(r"queries:\s+\d+\s+\((?P<value>\d+\.?\d*)\s+per sec\.\)"),
            tps: compile(r"transactions:\s+\d+\s+\((?P<value>\d+\.?\d*)\s+per sec\.\)"),
            avg_latency: compile(r"avg:\s+(?P<value>\d+\.?\d*)"),
            p95_latency: compile(r"95th percentile:\s+(?P<value>\d+\.?\d*)"),
        }
    })
}

fn capture(pattern: &Regex, content: &str) -> Option<f64> {
    pattern
        .captures(content)
        .and_then(|caps| caps.name("value"))
        .and_then(|m| m.as_str().parse().ok())
}

impl SysbenchResult {
    /// Parse sysbench text output
    ///
    /// # Example
    /// ```
    /// use benchmon::sysbench::SysbenchResult;
    ///
    /// let output = "    transactions:  120000 (3999.50 per sec.)\n    queries:  2400000 (79990.00 per sec.)\n";
    /// let result = SysbenchResult::parse(output);
    /// assert_eq!(result.tps, Some(3999.5));
    /// assert_eq!(result.qps, Some(79990.0));
    /// assert_eq!(result.p95_latency_ms, None);
    /// ```
    pub fn parse(content: &str) -> Self {
        let p = patterns();
        Self {
            qps: capture(&p.qps, content),
            tps: capture(&p.tps, content),
            avg_latency_ms: capture(&p.avg_latency, content),
            p95_latency_ms: capture(&p.p95_latency, content),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read sysbench log: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// True when no field could be extracted
    pub fn is_empty(&self) -> bool {
        self.qps.is_none()
            && self.tps.is_none()
            && self.avg_latency_ms.is_none()
            && self.p95_latency_ms.is_none()
    }
}
