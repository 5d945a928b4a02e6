#![no_main]

use libfuzzer_sys::fuzz_target;
use sync_protocol::{Decoder, SyncMessage};

fuzz_target!(|data: &[u8]| {
    // Fuzz sync message decoding - test for panics, crashes, infinite loops
    let mut decoder = Decoder::new(data);
    let _ = SyncMessage::decode(&mut decoder);
});
