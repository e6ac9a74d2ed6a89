#![no_main]
use std::path::Path;

use libfuzzer_sys::fuzz_target;

use chutzpah_cobertura::aggregate::{Aggregator, Product};
use chutzpah_cobertura::report::{CoberturaWriter, FixedClock};

fuzz_target!(|data: &[u8]| {
    // Any report the parser accepts must render.
    if let Ok(report) = chutzpah_cobertura::parsers::chutzpah::parse(data) {
        let line_rate = Product.aggregate(&report.records);
        let clock = FixedClock(0);
        CoberturaWriter::new(Path::new("/"), &clock)
            .render(&report.records, line_rate)
            .unwrap();
    }
});
