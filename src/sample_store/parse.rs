// Line-level parsing of tsar output
//
// Every rejection is a `SkipReason`; callers count them but never surface them.

use super::schema::MetricSchema;
use super::store::TimestampedSample;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;
use std::fmt;

/// Lines starting with this token are tsar column headers
pub const HEADER_TOKEN: &str = "Time";

/// Lines containing this marker are tsar section separators
pub const SEPARATOR_MARKER: &str = "---";

/// Why a monitoring line produced no sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    Header,
    Separator,
    TooFewFields { found: usize, required: usize },
    BadTimestamp,
    BadMetric { name: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Blank => write!(f, "blank line"),
            SkipReason::Header => write!(f, "header line"),
            SkipReason::Separator => write!(f, "separator line"),
            SkipReason::TooFewFields { found, required } => {
                write!(f, "{} fields, need at least {}", found, required)
            }
            SkipReason::BadTimestamp => write!(f, "unparseable timestamp"),
            SkipReason::BadMetric { name } => write!(f, "non-numeric {}", name),
        }
    }
}

/// Parse a tsar timestamp of the form `DD/MM/YY-HH:MM:SS`
///
/// The two-digit year always expands to `20YY`; there is no century rollover.
/// Calendar validity (e.g. 31/02) is enforced, nothing else.
///
/// # Example
/// ```
/// use benchmon::sample_store::parse_timestamp;
///
/// let ts = parse_timestamp("22/11/25-15:33:45").unwrap();
/// assert_eq!(ts.to_string(), "2025-11-22 15:33:45");
/// ```
pub fn parse_timestamp(token: &str) -> Option<NaiveDateTime> {
    let (date, time) = token.split_once('-')?;

    let mut parts = date.split('/');
    let day = parse_digits(parts.next()?, 2)?;
    let month = parse_digits(parts.next()?, 2)?;
    let year = parts.next()?;
    if parts.next().is_some() || year.len() != 2 {
        return None;
    }
    let year = 2000 + parse_digits(year, 2)? as i32;

    let time = NaiveTime::parse_from_str(time, "%H:%M:%S").ok()?;
    Some(NaiveDate::from_ymd_opt(year, month, day)?.and_time(time))
}

/// Unsigned decimal of 1..=max_len ASCII digits
fn parse_digits(s: &str, max_len: usize) -> Option<u32> {
    if s.is_empty() || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse one monitoring line against a metric schema
///
/// Required columns must be present and numeric. Optional columns beyond the
/// end of the line read as `0.0`; an optional column that is present but not
/// numeric still rejects the line.
pub fn parse_line(line: &str, schema: &MetricSchema) -> Result<TimestampedSample, SkipReason> {
    let line = line.trim();
    if line.is_empty() {
        return Err(SkipReason::Blank);
    }
    if line.starts_with(HEADER_TOKEN) {
        return Err(SkipReason::Header);
    }
    if line.contains(SEPARATOR_MARKER) {
        return Err(SkipReason::Separator);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let required = schema.min_fields();
    if fields.len() < required {
        return Err(SkipReason::TooFewFields {
            found: fields.len(),
            required,
        });
    }

    let timestamp = parse_timestamp(fields[0]).ok_or(SkipReason::BadTimestamp)?;

    let mut metrics = BTreeMap::new();
    for column in &schema.columns {
        let value = match fields.get(column.index) {
            Some(raw) => raw.parse::<f64>().map_err(|_| SkipReason::BadMetric {
                name: column.name.clone(),
            })?,
            None if column.required => {
                return Err(SkipReason::TooFewFields {
                    found: fields.len(),
                    required: column.index + 1,
                })
            }
            None => 0.0,
        };
        metrics.insert(column.name.clone(), value);
    }

    Ok(TimestampedSample { timestamp, metrics })
}
