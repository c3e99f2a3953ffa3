#![no_main]

use dnsmock::types::{is_within_zone, names_equal, DomainName};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Some(domain) = DomainName::from_dotted(data) {
        let s = domain.to_dotted();
        let reparsed = DomainName::from_dotted(&s);
        assert!(reparsed.is_some(), "Re-parsing to_dotted should succeed");

        // Every name is within itself, with or without the trailing dot.
        assert!(names_equal(data, &format!("{}.", s)));
        assert!(is_within_zone(data, &s));
    }
});
