//! Benchmon - correlate tsar resource samples with sysbench benchmark runs
//!
//! This library parses tsar monitoring logs into a timestamp-indexed sample
//! store, matches each benchmark run's wall-clock window against it with
//! tiered fallbacks, and renders per-run resource usage alongside sysbench
//! throughput and latency as Markdown, HTML or JSON reports.

pub mod cli;
pub mod config;
pub mod correlate;
pub mod html_output;
pub mod json_output;
pub mod markdown_output;
pub mod merge;
pub mod report;
pub mod run;
pub mod sample_store;
pub mod sysbench;
