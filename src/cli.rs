//! CLI argument parsing for benchmon

use crate::sample_store::MetricSet;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for benchmark reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown tables (default)
    Markdown,
    /// Standalone HTML page with embedded styles
    Html,
    /// JSON for machine parsing
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }

    /// Metric set used when none is configured
    ///
    /// The HTML report has always shown CPU soft-interrupt time, the Markdown
    /// report overall CPU utilization.
    pub fn default_metric_set(self) -> MetricSet {
        match self {
            OutputFormat::Html => MetricSet::Sirq,
            OutputFormat::Markdown | OutputFormat::Json => MetricSet::Util,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "benchmon")]
#[command(version)]
#[command(about = "Correlate tsar resource samples with sysbench runs", long_about = None)]
pub struct Cli {
    /// TOML configuration file (correlation pads, default metric set)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug tracing output on stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a performance report for one result directory
    Report {
        /// Directory holding tsar.log and the sysbench run logs
        #[arg(value_name = "RESULT_DIR")]
        result_dir: PathBuf,

        /// Output format
        #[arg(long = "format", value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// Which CPU metric to read from tsar's sixth column
        #[arg(long = "metric-set", value_enum)]
        metric_set: Option<MetricSet>,
    },

    /// Merge several environments' results into one comparison report
    Merge {
        /// Result directories, one per environment (directory name = environment name)
        #[arg(value_name = "ENV_DIR", required = true, num_args = 1..)]
        env_dirs: Vec<PathBuf>,

        /// Where to write the merged Markdown report
        #[arg(short = 'o', long = "output", default_value = "merged_report.md")]
        output: PathBuf,

        /// Which CPU metric to read from tsar's sixth column
        #[arg(long = "metric-set", value_enum)]
        metric_set: Option<MetricSet>,
    },
}
