// Integration Test Utilities
//
// Builders for result directories shaped like a real benchmark run: a tsar
// log, sysbench logs with their time marker files and the config dumps.

#![allow(dead_code)]

use chrono::{Duration, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TSAR_HEADER: &str =
    "Time              -------------cpu------------ ----traffic---- --------------------io---------------------";

/// One tsar line with all 24 fields
///
/// Column 5 carries `col5`, which the sirq and util metric sets both read
/// (as soft interrupts or overall utilization).
pub fn tsar_line(ts: NaiveDateTime, user: f64, sys: f64, wait: f64, col5: f64, io: f64) -> String {
    let mut fields = vec![
        ts.format("%d/%m/%y-%H:%M:%S").to_string(),
        format!("{:.2}", user),
        format!("{:.2}", sys),
        format!("{:.2}", wait),
        "0.00".to_string(),
        format!("{:.2}", col5),
    ];
    while fields.len() < 23 {
        fields.push("1.00".to_string());
    }
    fields.push(format!("{:.2}", io));
    fields.join(" ")
}

pub fn ts(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn sysbench_log(qps: f64, tps: f64, avg_ms: f64, p95_ms: f64) -> String {
    format!(
        "SQL statistics:
    queries performed:
        read:                            2801982
    transactions:                        {tx} ({tps:.2} per sec.)
    queries:                             {q} ({qps:.2} per sec.)

Latency (ms):
         min:                                    0.08
         avg:                                    {avg_ms:.2}
         max:                                   25.52
         95th percentile:                        {p95_ms:.2}
",
        tx = (tps * 30.0) as u64,
        q = (qps * 30.0) as u64,
    )
}

/// A result directory under construction
pub struct ResultDir {
    root: TempDir,
    name: String,
}

impl ResultDir {
    pub fn new(name: &str) -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join(name)).unwrap();
        Self {
            root,
            name: name.to_string(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().join(&self.name)
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn write(&self, file: &str, content: &str) -> &Self {
        fs::write(self.path().join(file), content).unwrap();
        self
    }

    /// Sample every second from `start` for `seconds + 1` samples with
    /// constant metrics
    pub fn tsar(&self, start: &str, seconds: i64, cpu: (f64, f64, f64, f64), io: f64) -> &Self {
        let start = ts(start);
        let mut log = format!("{}\n", TSAR_HEADER);
        for i in 0..=seconds {
            log.push_str(&tsar_line(start + Duration::seconds(i), cpu.0, cpu.1, cpu.2, cpu.3, io));
            log.push('\n');
        }
        self.write("tsar.log", &log)
    }

    pub fn run(&self, scenario: &str, threads: u32, start: &str, end: &str, qps: f64) -> &Self {
        let stem = format!("{}_{}threads", scenario, threads);
        self.write(&format!("{}.log", stem), &sysbench_log(qps, qps / 20.0, 0.17, 0.26));
        self.write(
            &format!("{}_time.log", stem),
            &format!("TEST_START_TIME: {}\nTEST_END_TIME: {}\n", start, end),
        )
    }

    pub fn configs(&self, cpu: &str, buffer_pool_bytes: u64, flush_log: u32) -> &Self {
        self.write("test_config.txt", "tables=16\ntable_size=10000000\ntime=30\n");
        self.write(
            "server_config.txt",
            &format!("CPU(s):              32\nModel name:          {}\nMem:           251Gi        12Gi       230Gi\n", cpu),
        );
        self.write(
            "mysql_variables.txt",
            &format!(
                "innodb_buffer_pool_size\t{}\ninnodb_flush_log_at_trx_commit\t{}\n",
                buffer_pool_bytes, flush_log
            ),
        )
    }
}
