#![no_main]
use libfuzzer_sys::fuzz_target;
use stromtarif::shortcode::{ShortcodeAttrs, find_shortcodes};

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    // Spans must stay on char boundaries and escaped literals must slice cleanly
    for found in find_shortcodes(content) {
        let _ = &content[found.span.clone()];
        if found.escaped {
            let _ = found.literal(content);
        }
    }
    let _ = ShortcodeAttrs::parse(content);
});
