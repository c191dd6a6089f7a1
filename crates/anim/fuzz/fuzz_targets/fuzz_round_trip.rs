#![no_main]

use anim::AnimationDocument;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(document) = AnimationDocument::from_bytes_strict(data) else {
        return;
    };

    // Strictly decoded documents may still hold pixels outside their palette.
    if let Ok(encoded) = anim::ser::encode(&document) {
        let decoded = AnimationDocument::from_bytes_strict(&encoded)
            .expect("encoder output should always decode");

        for (original, decoded) in document.frames().iter().zip(decoded.frames()) {
            assert_eq!(original.pixels(), decoded.pixels());
        }
    }
});
