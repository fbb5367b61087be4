//! Fuzz target for the data parser.
//!
//! This fuzzer tests that the CSV/TSV parser:
//! 1. Never panics on malformed input
//! 2. Produces frames a mean imputer can always be fitted against

#![no_main]

use imputer::{CleaningMode, Dataset, Imputer, ImputerParams, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let Ok(frame) = Parser::new().parse_bytes(data) else {
        return;
    };

    let numeric: Vec<String> = frame
        .schema()
        .fields
        .iter()
        .filter(|f| f.data_type.is_numeric())
        .map(|f| f.name.clone())
        .collect();
    if numeric.is_empty() {
        return;
    }

    let imputer = Imputer::new(ImputerParams::in_place(numeric).with_mode(CleaningMode::Median));
    if let Ok(model) = imputer.fit(&frame) {
        let _ = model.transform(&frame);
    }
});
