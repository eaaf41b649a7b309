// Run Window Correlation
//
// Attributes average resource utilization to each benchmark run, even though
// the monitoring samples and the run timer come from independent clocks.
//
// Matching degrades through three tiers, stopping at the first that finds
// anything:
//
// 1. Exact window: absolute timestamps within the run window, padded by the
//    tight pad (30s by default) to absorb small clock skew.
// 2. Time of day: dates ignored on both sides, time of day within the
//    unpadded window. Tolerates a date disagreement between the clocks.
// 3. Wide window: absolute timestamps again, padded by the wide pad
//    (5 minutes by default).
//
// Tiers never merge. If nothing matches, the result is absent and the
// renderer prints a placeholder instead of zeros.

mod aggregate;
mod window;

pub use aggregate::{aggregate, aggregate_raw, AggregateResult, MatchTier};
pub use window::{RunWindow, RUN_TIMESTAMP_FORMAT};
