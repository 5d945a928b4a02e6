#![no_main]

use libfuzzer_sys::fuzz_target;
use sync_protocol::{AuthMessage, Decoder};

fuzz_target!(|data: &[u8]| {
    // Fuzz auth message decoding - test for panics, crashes, infinite loops
    let mut decoder = Decoder::new(data);
    let _ = AuthMessage::decode(&mut decoder);
});
