// Timestamp-indexed multimap of resource samples

use super::parse::parse_line;
use super::schema::MetricSchema;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, trace, warn};

/// One resource-utilization observation
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedSample {
    pub timestamp: NaiveDateTime,
    pub metrics: BTreeMap<String, f64>,
}

impl TimestampedSample {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

/// Read-only collection of samples keyed by timestamp
///
/// Samples sharing a timestamp are all kept, in input order; none is
/// silently replaced. The store is immutable once built, so it can be
/// shared across threads for concurrent correlation.
///
/// # Example
/// ```
/// use benchmon::sample_store::{MetricSchema, SampleStore};
///
/// let lines = [
///     "Time              -----cpu----",
///     "22/11/25-15:33:45  10.0  2.0  0.5  0.0  1.2  13.7",
///     "not a sample",
/// ];
/// let store = SampleStore::build(lines, MetricSchema::util());
/// assert_eq!(store.len(), 1);
/// assert_eq!(store.skipped_lines(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SampleStore {
    schema: MetricSchema,
    samples: BTreeMap<NaiveDateTime, Vec<TimestampedSample>>,
    len: usize,
    skipped: usize,
}

impl SampleStore {
    /// A store with no samples; every correlation against it yields nothing
    pub fn empty(schema: MetricSchema) -> Self {
        Self {
            schema,
            samples: BTreeMap::new(),
            len: 0,
            skipped: 0,
        }
    }

    /// Build a store from raw monitoring lines
    ///
    /// Never fails: unparseable lines are skipped and counted.
    pub fn build<I, S>(lines: I, schema: MetricSchema) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::empty(schema);

        for (line_no, line) in lines.into_iter().enumerate() {
            match parse_line(line.as_ref(), &store.schema) {
                Ok(sample) => store.insert(sample),
                Err(reason) => {
                    trace!(line = line_no + 1, %reason, "skipping monitoring line");
                    store.skipped += 1;
                }
            }
        }

        debug!(
            samples = store.len,
            distinct_timestamps = store.samples.len(),
            skipped = store.skipped,
            schema = %store.schema.name,
            "built sample store"
        );
        store
    }

    /// Build a store from a tsar log file
    ///
    /// A missing file is not an error: it is logged and yields an empty store.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn from_file<P: AsRef<Path>>(path: P, schema: MetricSchema) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("monitoring log not found: {}", path.display());
            return Ok(Self::empty(schema));
        }

        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read monitoring log: {}", path.display()))?;
        let content = String::from_utf8_lossy(&bytes);

        Ok(Self::build(content.lines(), schema))
    }

    fn insert(&mut self, sample: TimestampedSample) {
        self.samples
            .entry(sample.timestamp)
            .or_default()
            .push(sample);
        self.len += 1;
    }

    pub fn schema(&self) -> &MetricSchema {
        &self.schema
    }

    /// Total number of samples, counting every duplicate timestamp
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct timestamps
    pub fn distinct_timestamps(&self) -> usize {
        self.samples.len()
    }

    /// Lines dropped during construction
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    /// All samples in timestamp order
    pub fn iter(&self) -> impl Iterator<Item = &TimestampedSample> + '_ {
        self.samples.values().flatten()
    }

    /// Samples with `lo <= timestamp <= hi`, in timestamp order
    ///
    /// An inverted range is empty.
    pub fn range(
        &self,
        lo: NaiveDateTime,
        hi: NaiveDateTime,
    ) -> impl Iterator<Item = &TimestampedSample> + '_ {
        (lo <= hi)
            .then_some(lo..=hi)
            .into_iter()
            .flat_map(move |bounds| self.samples.range(bounds))
            .flat_map(|(_, samples)| samples.iter())
    }
}
