/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use zune_blub::zune_core::bit_depth::BitDepth;
use zune_blub::zune_core::bytestream::ZCursor;
use zune_blub::zune_core::colorspace::ColorSpace;
use zune_blub::zune_core::options::DecoderOptions;
use zune_blub::{BlubDecodeErrors, BlubDecoder, BlubEncoder, BlubHeader, BlubOptions};

fn encode_checkerboard(width: usize, height: usize, options: BlubOptions) -> Vec<u8> {
    let pixels = (0..width * height)
        .flat_map(|i| {
            let alpha = if i % 2 == 0 { 255 } else { 0 };
            [i as u8, i as u8, i as u8, alpha]
        })
        .collect::<Vec<u8>>();

    let mut output = vec![];
    BlubEncoder::new(
        &pixels,
        width,
        height,
        ColorSpace::RGBA,
        BitDepth::Eight,
        options
    )
    .encode(&mut output)
    .unwrap();
    output
}

#[test]
fn test_header_rejection() {
    let valid = encode_checkerboard(4, 4, BlubOptions::default());

    for len in [0, 1, 4, 31] {
        let mut decoder = BlubDecoder::new(ZCursor::new(&valid[..len]));
        assert!(matches!(
            decoder.decode_headers(),
            Err(BlubDecodeErrors::HeaderTooShort(32, found)) if found == len
        ));
    }
    let mut wrong = valid.clone();
    wrong[3] = b'P';

    let mut decoder = BlubDecoder::new(ZCursor::new(&wrong));
    assert!(matches!(
        decoder.decode(),
        Err(BlubDecodeErrors::WrongMagicBytes(tag)) if tag.to_be_bytes() == *b"BLUP"
    ));
}

#[test]
fn test_dimension_limits() {
    let valid = encode_checkerboard(20, 5, BlubOptions::default());

    let options = DecoderOptions::default().set_max_width(10);
    let mut decoder = BlubDecoder::new_with_options(ZCursor::new(&valid), options);

    assert!(matches!(
        decoder.decode_headers(),
        Err(BlubDecodeErrors::TooLargeDimensions("width", 10, 20))
    ));
}

#[test]
fn test_payload_shorter_than_declared() {
    // half the pixels are masked, so the header may claim more samples
    // than were stored without exceeding the pixel count
    let valid = encode_checkerboard(8, 8, BlubOptions::default().set_exclude_masked_pixels(true));

    let mut header_bytes = [0_u8; 32];
    header_bytes.copy_from_slice(&valid[..32]);
    let mut header = BlubHeader::from_bytes(&header_bytes).unwrap();
    header.pixel_length += 5;

    let mut forged = header.to_bytes().to_vec();
    forged.extend_from_slice(&valid[32..]);

    let mut decoder = BlubDecoder::new(ZCursor::new(&forged));
    assert!(matches!(
        decoder.decode(),
        Err(BlubDecodeErrors::InsufficientData("pixel data", ..))
    ));
}

#[test]
fn test_missing_payload() {
    let valid = encode_checkerboard(8, 8, BlubOptions::default());

    let mut decoder = BlubDecoder::new(ZCursor::new(&valid[..32]));
    assert!(decoder.decode_headers().is_ok());
    assert!(decoder.decode().is_err());
}

fn forge_header(valid: &[u8], forge: impl FnOnce(&mut BlubHeader)) -> Vec<u8> {
    let mut header_bytes = [0_u8; 32];
    header_bytes.copy_from_slice(&valid[..32]);
    let mut header = BlubHeader::from_bytes(&header_bytes).unwrap();
    forge(&mut header);

    let mut forged = header.to_bytes().to_vec();
    forged.extend_from_slice(&valid[32..]);
    forged
}

#[test]
fn test_forged_lengths_rejected_before_inflating() {
    let bitmask = encode_checkerboard(4, 4, BlubOptions::default());
    let rle = encode_checkerboard(4, 4, BlubOptions::default().set_compress_alpha_mask(true));

    let cases = [
        forge_header(&bitmask, |h| {
            h.alpha_length = u32::MAX;
            h.pixel_length = u32::MAX;
        }),
        forge_header(&bitmask, |h| h.alpha_length += 1),
        forge_header(&bitmask, |h| h.alpha_length -= 1),
        forge_header(&rle, |h| h.alpha_length = 17),
        forge_header(&bitmask, |h| h.pixel_length = 17)
    ];

    for forged in cases {
        let mut decoder = BlubDecoder::new(ZCursor::new(&forged));

        assert!(matches!(
            decoder.decode_headers(),
            Err(BlubDecodeErrors::CorruptAlphaMask(_) | BlubDecodeErrors::InsufficientData(..))
        ));
        assert!(decoder.config().is_none());
        assert!(decoder.decode().is_err());
    }
}

#[test]
fn test_truncated_payload() {
    let valid = encode_checkerboard(16, 16, BlubOptions::default());
    let truncated = &valid[..valid.len() - 10];

    let mut decoder = BlubDecoder::new(ZCursor::new(truncated));
    assert!(matches!(
        decoder.decode(),
        Err(BlubDecodeErrors::InflateError("payload", _))
    ));
}
