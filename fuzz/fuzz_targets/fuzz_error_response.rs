#![no_main]

//! Error bodies from arbitrary endpoints always produce an error value.

use dnsmock::route53::ApiError;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (u16, &str)| {
    let (status, body) = data;
    let err = ApiError::from_response(status, body);
    assert_eq!(err.status, status);
    assert!(!err.code.is_empty());
});
