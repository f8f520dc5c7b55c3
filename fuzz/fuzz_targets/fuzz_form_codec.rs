//! Fuzz target: form encoding of outgoing message text
//!
//! - `encode` output is plain ASCII from `[A-Za-z0-9+%]`
//! - `decode(encode(s)) == s` for any UTF-8 input
//! - `decode` never panics on arbitrary input
//!
//! cargo fuzz run fuzz_form_codec

#![no_main]

use libfuzzer_sys::fuzz_target;
use shopwatch::app::form;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let encoded = form::encode(text);
        assert!(encoded.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'%'));
        assert_eq!(form::decode(&encoded).as_deref(), Some(text));
        let _ = form::decode(text);
    }
});
