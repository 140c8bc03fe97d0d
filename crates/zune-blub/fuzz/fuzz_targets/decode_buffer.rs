#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    use zune_blub::zune_core::bytestream::ZCursor;
    use zune_blub::zune_core::options::DecoderOptions;

    // keep allocations bounded for hostile headers
    let options = DecoderOptions::default()
        .set_max_width(4096)
        .set_max_height(4096);

    let mut decoder = zune_blub::BlubDecoder::new_with_options(ZCursor::new(data), options);
    let _ = decoder.decode();
});
