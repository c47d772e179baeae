#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let svg = String::from_utf8_lossy(data);
    let _ = stromtarif::graph::make_responsive(&svg);
});
