//! Conversion of arbitrary text must never panic, and a successful
//! conversion must produce a structurally valid record.

#![no_main]

use euring::{convert, decode, EuringFormat};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let target = EuringFormat::ALL[usize::from(selector) % EuringFormat::ALL.len()];
    let force = selector & 0x80 != 0;
    if let Ok(out) = convert(text, None, target, force) {
        let record = decode(&out, Some(target));
        assert!(record.errors().record.is_empty(), "{out}");
    }
});
