/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::{ZByteWriterTrait, ZWriter};
use zune_core::colorspace::ColorSpace;
use zune_core::log::trace;

use crate::alpha::{encode_bitmask, encode_rle};
use crate::color::{color_to_gray, PixelLayout};
use crate::constants::{BLUB_HEADER_SIZE, BLUB_MAX_DIMENSION};
use crate::errors::BlubEncodeErrors;
use crate::header::BlubHeader;
use crate::options::BlubOptions;
use crate::pixels::encode_samples;

/// Image reduced to luma and opacity, before any section is built
struct GrayImage {
    luma:    Vec<u8>,
    opacity: Vec<bool>,
    /// Every pixel is opaque
    opaque:  bool
}

impl GrayImage {
    fn from_pixels(layout: PixelLayout, data: &[u8], pixels: usize, threshold: u8) -> GrayImage {
        let size = layout.bytes_per_pixel().unwrap_or(0);

        let mut luma = Vec::with_capacity(pixels);
        let mut opacity = Vec::with_capacity(pixels);

        for i in 0..pixels {
            let pixel = layout.pixel(&data[i * size..(i + 1) * size]);
            let (y, a) = color_to_gray(&pixel, threshold);

            luma.push(y);
            opacity.push(a);
        }
        let opaque = opacity.iter().all(|x| *x);

        GrayImage {
            luma,
            opacity,
            opaque
        }
    }
}

/// A BLUB encoder
///
/// Geometry is carried by the encoder itself rather than through
/// `EncoderOptions`, since BLUB images may have a zero width or height.
///
/// # Example
/// - Encode a 100 by 100 RGBA image with a run length encoded mask
///
/// ```
/// use zune_core::bit_depth::BitDepth;
/// use zune_core::colorspace::ColorSpace;
/// use zune_blub::{BlubEncoder, BlubEncodeErrors, BlubOptions};
///
/// const W:usize=100;
/// const H:usize=100;
///
/// fn main()->Result<(), BlubEncodeErrors>{
///     let pixels = std::array::from_fn::<u8,{W * H * 4},_>(|i| (i%256) as u8);
///     let options = BlubOptions::default().set_compress_alpha_mask(true).set_hue_shift(40);
///     let mut encoder = BlubEncoder::new(&pixels,W,H,ColorSpace::RGBA,BitDepth::Eight,options);
///     let mut sink = vec![];
///     encoder.encode(&mut sink)?;
///     Ok(())
///}
/// ```
pub struct BlubEncoder<'a> {
    pixel_data:   &'a [u8],
    width:        usize,
    height:       usize,
    colorspace:   ColorSpace,
    depth:        BitDepth,
    blub_options: BlubOptions
}

impl<'a> BlubEncoder<'a> {
    /// Create a new encoder
    ///
    /// # Arguments
    /// - data: Pixel data, size must be equal to `width*height*components*depth`
    /// - width, height: Image dimensions, either may be zero
    /// - colorspace, depth: Layout of `data`
    /// - blub_options: How the image should be stored
    pub const fn new(
        data: &'a [u8], width: usize, height: usize, colorspace: ColorSpace, depth: BitDepth,
        blub_options: BlubOptions
    ) -> BlubEncoder<'a> {
        BlubEncoder {
            pixel_data: data,
            width,
            height,
            colorspace,
            depth,
            blub_options
        }
    }

    /// Encode the image into `sink`
    ///
    /// Nothing is written if the image is rejected.
    ///
    /// # Returns
    /// - Ok(size): Bytes written to the sink
    /// - Err: The error encountered during encoding
    pub fn encode<T: ZByteWriterTrait>(&mut self, sink: T) -> Result<usize, BlubEncodeErrors> {
        let (width, height) = (self.width, self.height);

        if width > BLUB_MAX_DIMENSION {
            return Err(BlubEncodeErrors::TooLargeDimensions(width));
        }
        if height > BLUB_MAX_DIMENSION {
            return Err(BlubEncodeErrors::TooLargeDimensions(height));
        }
        let layout = PixelLayout::new(self.colorspace, self.depth);
        let pixel_size = layout
            .bytes_per_pixel()
            .ok_or(BlubEncodeErrors::Generic("Unknown bit depth"))?;
        let pixels = width * height;
        let expected_len = pixels
            .checked_mul(pixel_size)
            .ok_or(BlubEncodeErrors::Generic("Overflow"))?;

        if self.pixel_data.len() != expected_len {
            return Err(BlubEncodeErrors::LengthMismatch(
                expected_len,
                self.pixel_data.len()
            ));
        }
        if !layout.is_supported() {
            trace!("Layout {:?} has no RGBA form, every pixel is masked out", layout);
        }
        let options = self.blub_options;
        let gray = GrayImage::from_pixels(
            layout,
            self.pixel_data,
            pixels,
            options.alpha_threshold()
        );

        let use_alpha_mask = options.use_alpha_mask() && !gray.opaque;

        let alpha = if !use_alpha_mask {
            Vec::new()
        } else if options.compress_alpha_mask() {
            encode_rle(&gray.opacity)
        } else {
            encode_bitmask(&gray.opacity)
        };
        // without a mask, the decoder sees every pixel as opaque
        let samples = if use_alpha_mask {
            encode_samples(
                &gray.luma,
                &gray.opacity,
                options.uniform_hue(),
                options.exclude_masked_pixels()
            )
        } else if options.uniform_hue() {
            Vec::new()
        } else {
            gray.luma
        };

        let header = BlubHeader {
            width:        width as u16,
            height:       height as u16,
            alpha_length: u32::try_from(alpha.len())
                .map_err(|_| BlubEncodeErrors::SectionTooLarge("alpha mask", alpha.len()))?,
            pixel_length: u32::try_from(samples.len())
                .map_err(|_| BlubEncodeErrors::SectionTooLarge("pixel data", samples.len()))?,
            hue_shift:    options.hue_shift(),
            flags:        BlubHeader::flags_from_options(&options)
        };
        trace!("Image width: {}", width);
        trace!("Image height: {}", height);
        trace!("Alpha section: {} bytes", header.alpha_length);
        trace!("Pixel section: {} bytes", header.pixel_length);

        let payload = compress_sections(&alpha, &samples, options.compression_level())?;

        let mut stream = ZWriter::new(sink);

        stream
            .write_all(&header.to_bytes())
            .map_err(|e| BlubEncodeErrors::IoErrors("header", e))?;
        stream
            .write_all(&payload)
            .map_err(|e| BlubEncodeErrors::IoErrors("payload", e))?;

        let len = stream.bytes_written();

        trace!("Wrote {} bytes, {} of them compressed payload", len, payload.len());
        debug_assert_eq!(len, BLUB_HEADER_SIZE + payload.len());

        Ok(len)
    }
}

/// Run both sections through a single zlib stream
///
/// The stream is finished even when both sections are empty
fn compress_sections(alpha: &[u8], samples: &[u8], level: u8) -> Result<Vec<u8>, BlubEncodeErrors> {
    let capacity = alpha.len() + samples.len() + 64;
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(capacity),
        Compression::new(u32::from(level))
    );

    encoder
        .write_all(alpha)
        .map_err(|e| BlubEncodeErrors::Compression("alpha mask", e))?;
    encoder
        .write_all(samples)
        .map_err(|e| BlubEncodeErrors::Compression("pixel data", e))?;

    encoder
        .finish()
        .map_err(|e| BlubEncodeErrors::Compression("payload", e))
}
