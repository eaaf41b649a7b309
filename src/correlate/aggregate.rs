// Tiered sample selection and mean reduction

use super::window::RunWindow;
use crate::config::CorrelationConfig;
use crate::sample_store::{MetricSchema, SampleStore, TimestampedSample};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace};

/// Which fallback tier produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Absolute timestamps within the window +/- tight pad
    ExactWindow,
    /// Time of day within the window, dates ignored
    TimeOfDay,
    /// Absolute timestamps within the window +/- wide pad
    WideWindow,
}

impl MatchTier {
    /// Strict priority order
    pub const ORDER: [MatchTier; 3] = [
        MatchTier::ExactWindow,
        MatchTier::TimeOfDay,
        MatchTier::WideWindow,
    ];
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTier::ExactWindow => write!(f, "exact-window"),
            MatchTier::TimeOfDay => write!(f, "time-of-day"),
            MatchTier::WideWindow => write!(f, "wide-window"),
        }
    }
}

/// Per-metric means attributed to one run window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Arithmetic mean of each schema metric over the matched samples
    pub metrics: BTreeMap<String, f64>,

    /// Number of contributing samples, always >= 1
    pub sample_count: usize,

    /// Tier that produced the match
    pub tier: MatchTier,
}

impl AggregateResult {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// Unweighted mean of each metric; `None` for an empty selection
    fn from_samples(
        schema: &MetricSchema,
        samples: &[&TimestampedSample],
        tier: MatchTier,
    ) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let count = samples.len() as f64;
        let metrics = schema
            .columns
            .iter()
            .map(|column| {
                let sum: f64 = samples
                    .iter()
                    .map(|s| s.metric(&column.name).unwrap_or(0.0))
                    .sum();
                (column.name.clone(), sum / count)
            })
            .collect();

        Some(Self {
            metrics,
            sample_count: samples.len(),
            tier,
        })
    }
}

/// Attribute average resource utilization to a run window
///
/// Tries each `MatchTier` in order and reduces the first non-empty selection
/// to per-metric means. Returns `None` when no tier matches; callers render
/// that as "no data", never as zero.
///
/// Pure and deterministic: the store is only read.
///
/// # Example
/// ```
/// use benchmon::config::CorrelationConfig;
/// use benchmon::correlate::{aggregate, MatchTier, RunWindow};
/// use benchmon::sample_store::{MetricSchema, SampleStore};
///
/// let store = SampleStore::build(
///     [
///         "22/11/25-15:33:20 10.0 1.0 0.0 0.0 2.0 13.0",
///         "22/11/25-15:33:30 30.0 1.0 0.0 0.0 2.0 33.0",
///     ],
///     MetricSchema::util(),
/// );
/// let window = RunWindow::parse("2025-11-22 15:33:10", "2025-11-22 15:33:50").unwrap();
///
/// let result = aggregate(&store, &window, &CorrelationConfig::default()).unwrap();
/// assert_eq!(result.sample_count, 2);
/// assert_eq!(result.metric("cpu_user"), Some(20.0));
/// assert_eq!(result.tier, MatchTier::ExactWindow);
/// ```
pub fn aggregate(
    store: &SampleStore,
    window: &RunWindow,
    config: &CorrelationConfig,
) -> Option<AggregateResult> {
    if store.is_empty() {
        return None;
    }

    for tier in MatchTier::ORDER {
        let selected = select(store, window, config, tier);
        trace!(%tier, %window, matched = selected.len(), "correlation tier");

        if let Some(result) = AggregateResult::from_samples(store.schema(), &selected, tier) {
            if tier != MatchTier::ExactWindow {
                debug!(%tier, %window, samples = result.sample_count, "matched by fallback tier");
            }
            return Some(result);
        }
    }

    debug!(%window, "no monitoring samples for run window");
    None
}

/// Correlate a run whose window bounds are still raw marker text
///
/// Missing or unparseable bounds mean the run cannot be correlated; that is
/// reported as `None`, exactly like a window with no samples.
pub fn aggregate_raw(
    store: &SampleStore,
    start: Option<&str>,
    end: Option<&str>,
    config: &CorrelationConfig,
) -> Option<AggregateResult> {
    let (Some(start), Some(end)) = (start, end) else {
        trace!("run window incomplete, skipping correlation");
        return None;
    };

    match RunWindow::parse(start, end) {
        Some(window) => aggregate(store, &window, config),
        None => {
            debug!(start, end, "unparseable run window, skipping correlation");
            None
        }
    }
}

fn select<'a>(
    store: &'a SampleStore,
    window: &RunWindow,
    config: &CorrelationConfig,
    tier: MatchTier,
) -> Vec<&'a TimestampedSample> {
    match tier {
        MatchTier::ExactWindow => padded(store, window, config.tight_pad()),
        MatchTier::TimeOfDay => {
            // Literal comparison: a window crossing midnight selects nothing here
            let (start, end) = window.time_of_day();
            store
                .iter()
                .filter(|s| {
                    let t = s.timestamp.time();
                    start <= t && t <= end
                })
                .collect()
        }
        MatchTier::WideWindow => padded(store, window, config.wide_pad()),
    }
}

fn padded<'a>(
    store: &'a SampleStore,
    window: &RunWindow,
    pad: Duration,
) -> Vec<&'a TimestampedSample> {
    match (
        window.start.checked_sub_signed(pad),
        window.end.checked_add_signed(pad),
    ) {
        (Some(lo), Some(hi)) => store.range(lo, hi).collect(),
        _ => Vec::new(),
    }
}
