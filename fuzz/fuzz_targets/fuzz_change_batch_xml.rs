#![no_main]

//! Request bodies come straight off the wire; parsing must never panic, and
//! whatever parses must render again.

use dnsmock::xml::{parse_change_batch_request, render_change_batch_request};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(batch) = parse_change_batch_request(data) {
        let rendered = render_change_batch_request(&batch).expect("parsed batch should render");
        let reparsed = parse_change_batch_request(&rendered).expect("rendered batch should parse");
        assert_eq!(batch.changes.len(), reparsed.changes.len());
    }
});
