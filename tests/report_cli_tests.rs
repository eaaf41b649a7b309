// Integration tests for the benchmon binary: report and merge subcommands
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

mod utils;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use utils::ResultDir;

fn idc_results() -> ResultDir {
    let dir = ResultDir::new("idc");
    dir.tsar("2025-11-22 15:32:00", 300, (40.0, 12.0, 0.5, 55.0), 7.0)
        .run(
            "oltp_point_select",
            16,
            "2025-11-22 15:33:10",
            "2025-11-22 15:33:50",
            93399.41,
        )
        .run(
            "oltp_write_only",
            8,
            "2025-11-22 15:34:10",
            "2025-11-22 15:34:40",
            20000.0,
        )
        .configs("Intel(R) Xeon(R) Gold 6230", 17179869184, 1);
    dir
}

#[test]
fn test_report_markdown_default() {
    let dir = idc_results();

    let mut cmd = Command::cargo_bin("benchmon").unwrap();
    cmd.arg("report").arg(dir.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("performance_report.md"));

    let md = fs::read_to_string(dir.path().join("performance_report.md")).unwrap();
    assert!(md.starts_with("# Benchmark Performance Report"));
    assert!(md.contains("metric set: util"));
    assert!(md.contains(
        "| oltp_point_select | 16 | 93,399 | 4,670 | 0.17 | 0.26 | 55.0 | 40.0 | 12.0 | 0.5 | 7.0 | 101 | exact-window |"
    ));
    // runs are listed in execution order
    let point = md.find("| oltp_point_select |").unwrap();
    let write = md.find("| oltp_write_only |").unwrap();
    assert!(point < write);
}

#[test]
fn test_report_html_defaults_to_sirq() {
    let dir = idc_results();

    let mut cmd = Command::cargo_bin("benchmon").unwrap();
    cmd.arg("report").arg(dir.path()).arg("--format").arg("html");
    cmd.assert().success();

    let html = fs::read_to_string(dir.path().join("performance_report.html")).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("metric set: sirq"));
    assert!(html.contains("CPU softirq (%)"));
    assert!(html.contains(r#"<td class="monitor">55.0</td>"#));
}

#[test]
fn test_report_json_with_metric_set_override() {
    let dir = idc_results();

    let mut cmd = Command::cargo_bin("benchmon").unwrap();
    cmd.arg("report")
        .arg(dir.path())
        .arg("--format")
        .arg("json")
        .arg("--metric-set")
        .arg("sirq");
    cmd.assert().success();

    let json = fs::read_to_string(dir.path().join("performance_report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metric_set"], "sirq");
    assert_eq!(value["runs"].as_array().unwrap().len(), 2);
    assert_eq!(value["runs"][0]["resources"]["metrics"]["cpu_sirq"], 55.0);
    // 30 second window padded by 30s on both ends
    assert_eq!(value["runs"][1]["resources"]["sample_count"], 91);
}

#[test]
fn test_report_without_monitoring_log() {
    let dir = ResultDir::new("bare");
    dir.run(
        "oltp_read_only",
        1,
        "2025-11-22 10:00:00",
        "2025-11-22 10:00:30",
        1000.0,
    );

    let mut cmd = Command::cargo_bin("benchmon").unwrap();
    cmd.arg("report").arg(dir.path());
    cmd.assert().success();

    let md = fs::read_to_string(dir.path().join("performance_report.md")).unwrap();
    assert!(md.contains("| oltp_read_only | 1 | 1,000 |"));
    assert!(md.contains("| N/A | N/A | N/A | N/A | N/A | N/A | N/A |"));
}

#[test]
fn test_report_missing_directory_fails() {
    let mut cmd = Command::cargo_bin("benchmon").unwrap();
    cmd.arg("report").arg("/nonexistent/benchmon/results");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_report_rejects_invalid_config() {
    let dir = idc_results();
    let config = dir.root().join("benchmon.toml");
    fs::write(&config, "[correlation]\ntight_pad_secs = 600\nwide_pad_secs = 300\n").unwrap();

    let mut cmd = Command::cargo_bin("benchmon").unwrap();
    cmd.arg("--config").arg(&config).arg("report").arg(dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("wide_pad_secs"));
}

#[test]
fn test_report_config_pads_and_metric_set() {
    let dir = idc_results();
    let config = dir.root().join("benchmon.toml");
    fs::write(
        &config,
        "[correlation]\ntight_pad_secs = 0\n\n[report]\nmetric_set = \"sirq\"\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("benchmon").unwrap();
    cmd.arg("report")
        .arg(dir.path())
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(&config);
    cmd.assert().success();

    let json = fs::read_to_string(dir.path().join("performance_report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metric_set"], "sirq");
    assert_eq!(value["runs"][0]["resources"]["sample_count"], 41);
}

#[test]
fn test_merge_environments() {
    let idc = idc_results();
    let huawei = ResultDir::new("huawei");
    huawei
        .tsar("2025-11-23 09:00:00", 120, (30.0, 10.0, 1.0, 45.0), 3.0)
        .run(
            "oltp_point_select",
            16,
            "2025-11-23 09:00:30",
            "2025-11-23 09:01:00",
            120000.0,
        )
        .configs("Kunpeng-920", 34359738368, 2);

    let output = idc.root().join("merged.md");
    let mut cmd = Command::cargo_bin("benchmon").unwrap();
    cmd.arg("merge")
        .arg(idc.path())
        .arg(huawei.path())
        .arg("-o")
        .arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2 environments"));

    let md = fs::read_to_string(&output).unwrap();
    assert!(md.contains("| **idc** | Intel(R) Xeon(R) Gold 6230 | 32 | 251Gi | 16GB | 1 |"));
    assert!(md.contains("| **huawei** | Kunpeng-920 | 32 | 251Gi | 32GB | 2 |"));
    assert!(md.contains("| **idc** | - | - | 93,399 | - | - | - |"));
    assert!(md.contains("| **huawei** | - | - | 120,000 | - | - | - |"));
    assert!(md.contains("# Chapter 1: idc"));
    assert!(md.contains("# Chapter 2: huawei"));
}

#[test]
fn test_merge_missing_environment_fails() {
    let idc = idc_results();
    let missing = idc.root().join("aliyun");

    let mut cmd = Command::cargo_bin("benchmon").unwrap();
    cmd.arg("merge")
        .arg(idc.path())
        .arg(&missing)
        .arg("-o")
        .arg(idc.root().join("merged.md"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Environment result directory not found"));
}

#[test]
fn test_merge_requires_directories() {
    let mut cmd = Command::cargo_bin("benchmon").unwrap();
    cmd.arg("merge");
    cmd.assert().failure();
}
