#![no_main]
use libfuzzer_sys::fuzz_target;

use yastjson::parse;

fuzz_target!(|data: &[u8]| {
    // Only valid UTF-8 reaches the parser.
    if let Ok(s) = std::str::from_utf8(data) {
        // Any input may fail; none may panic. A successful parse must
        // render and parse back to the same value.
        if let Ok(value) = parse(s) {
            if let Ok(text) = value.stringify() {
                assert_eq!(parse(&text).ok(), Some(value));
            }
        }
    }
});
