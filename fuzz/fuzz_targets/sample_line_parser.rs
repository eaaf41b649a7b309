#![no_main]

use benchmon::sample_store::{parse_line, MetricSchema};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // tsar logs are read lossily, so every byte string is a possible line
    let input = String::from_utf8_lossy(data);
    for schema in [MetricSchema::sirq(), MetricSchema::util()] {
        if let Ok(sample) = parse_line(&input, &schema) {
            assert_eq!(sample.metrics.len(), schema.columns.len());
        }
    }
});
