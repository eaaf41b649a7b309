// Declarative metric extraction schema
//
// The two report variants read the same tsar layout but disagree on what the
// sixth column means (soft-interrupt share vs overall utilization). Both are
// expressed as data here so a single parser serves either variant.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column index of the IO utilization value in the merged tsar cpu/io view
pub const IO_UTIL_COLUMN: usize = 23;

/// One metric read from a fixed whitespace-delimited column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricColumn {
    /// Metric name used as the key in samples and aggregates
    pub name: String,

    /// Zero-based field index (field 0 is the timestamp)
    pub index: usize,

    /// Required columns reject the line when missing; optional ones default to 0.0
    pub required: bool,
}

impl MetricColumn {
    pub fn required(name: &str, index: usize) -> Self {
        Self {
            name: name.to_string(),
            index,
            required: true,
        }
    }

    pub fn optional(name: &str, index: usize) -> Self {
        Self {
            name: name.to_string(),
            index,
            required: false,
        }
    }
}

/// Ordered list of (name, column) pairs extracted from each monitoring line
///
/// # Example
/// ```
/// use benchmon::sample_store::MetricSchema;
///
/// let schema = MetricSchema::util();
/// assert_eq!(schema.names(), vec!["cpu_user", "cpu_sys", "cpu_wait", "cpu_util", "io_util"]);
/// assert_eq!(schema.min_fields(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSchema {
    pub name: String,
    pub columns: Vec<MetricColumn>,
}

impl MetricSchema {
    /// CPU soft-interrupt variant (`sirq` in column 5)
    pub fn sirq() -> Self {
        Self::with_sixth_column("sirq", "cpu_sirq")
    }

    /// Overall CPU utilization variant (`util` in column 5)
    pub fn util() -> Self {
        Self::with_sixth_column("util", "cpu_util")
    }

    fn with_sixth_column(schema_name: &str, metric: &str) -> Self {
        Self {
            name: schema_name.to_string(),
            columns: vec![
                MetricColumn::required("cpu_user", 1),
                MetricColumn::required("cpu_sys", 2),
                MetricColumn::required("cpu_wait", 3),
                MetricColumn::required(metric, 5),
                MetricColumn::optional("io_util", IO_UTIL_COLUMN),
            ],
        }
    }

    /// Minimum number of fields a line needs before it is considered at all
    ///
    /// Timestamp plus every required column; never fewer than the six fields
    /// of the tsar cpu block.
    pub fn min_fields(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| c.required)
            .map(|c| c.index + 1)
            .max()
            .unwrap_or(1)
            .max(6)
    }

    /// Metric names in extraction order
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Name of the schema-specific CPU metric (the sixth column)
    pub fn utilization_metric(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.index == 5)
            .map(|c| c.name.as_str())
    }
}

/// Which metric set to extract, selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSet {
    /// CPU soft-interrupt percentage in the sixth column
    Sirq,
    /// Overall CPU utilization in the sixth column
    Util,
}

impl MetricSet {
    pub fn schema(self) -> MetricSchema {
        match self {
            MetricSet::Sirq => MetricSchema::sirq(),
            MetricSet::Util => MetricSchema::util(),
        }
    }
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricSet::Sirq => write!(f, "sirq"),
            MetricSet::Util => write!(f, "util"),
        }
    }
}
