#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    _ = anim::AnimationDocument::from_bytes(data);
});
