//! Decoding arbitrary text must never panic, and anything that serializes
//! must decode again to the same format.

#![no_main]

use euring::decode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let record = decode(text, None);
    if let Ok(out) = record.serialize() {
        let again = decode(&out, Some(record.format()));
        assert!(again.errors().record.is_empty(), "{out}");
    }
});
