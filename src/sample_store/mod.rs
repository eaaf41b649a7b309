// Resource Sample Store
//
// Parses tsar monitoring output into timestamp-ordered CPU/IO samples.
//
// Input is a whitespace-delimited columnar layout whose first token is a
// `DD/MM/YY-HH:MM:SS` timestamp. Metric values are taken by fixed column
// position, described by a `MetricSchema`, because tsar prints no stable
// header names for the merged cpu/io view.
//
// Parsing is best-effort: any line that cannot be read is dropped and counted,
// never reported as an error. A missing log produces an empty store, which in
// turn makes every correlation come back empty.

mod parse;
mod schema;
mod store;

pub use parse::{parse_line, parse_timestamp, SkipReason, HEADER_TOKEN, SEPARATOR_MARKER};
pub use schema::{MetricColumn, MetricSchema, MetricSet};
pub use store::{SampleStore, TimestampedSample};
