#![no_main]

use leadtime_git::{PrReference, classify};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(message) = std::str::from_utf8(data) {
        let reference = classify(message);
        if let PrReference::InlineRefs(numbers) = &reference {
            assert!(!numbers.is_empty());
        }
        assert!(reference.numbers().iter().all(|n| *n > 0));
    }
});
