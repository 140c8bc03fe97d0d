/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec;
use alloc::vec::Vec;

use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::{ZByteReaderTrait, ZReader};
use zune_core::colorspace::ColorSpace;
use zune_core::log::{trace, warn};
use zune_core::options::DecoderOptions;
use zune_inflate::{DeflateDecoder, DeflateOptions};

use crate::alpha::AlphaMaskReader;
use crate::color::gray_to_color;
use crate::constants::BLUB_HEADER_SIZE;
use crate::errors::BlubDecodeErrors;
use crate::header::{BlubConfig, BlubHeader};
use crate::pixels::SampleReader;

/// Channels in the decoded output, always RGBA
const OUTPUT_COMPONENTS: usize = 4;

/// A BLUB decoder
///
/// The decoder is initialized by calling `new`
/// and either of [`decode_headers`] to read the header
/// or [`decode`] to return RGBA pixels
///
/// Image details like width, height and the encoding options
/// are accessible via [`config`] after decoding headers
///
/// [`decode_headers`]:BlubDecoder::decode_headers
/// [`decode`]:BlubDecoder::decode
/// [`config`]:BlubDecoder::config
pub struct BlubDecoder<T>
where
    T: ZByteReaderTrait
{
    config:  Option<BlubConfig>,
    stream:  ZReader<T>,
    options: DecoderOptions
}

impl<T> BlubDecoder<T>
where
    T: ZByteReaderTrait
{
    /// Create a new decoder with the default options
    ///
    /// # Example
    ///
    /// ```no_run
    /// use zune_core::bytestream::ZCursor;
    /// let mut decoder = zune_blub::BlubDecoder::new(ZCursor::new(&[0_u8; 32]));
    /// // additional code
    /// ```
    pub fn new(data: T) -> BlubDecoder<T> {
        BlubDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder that obeys specified restrictions
    ///
    /// Width and height limits are checked right after the header is read,
    /// before anything is allocated. With strict mode the compressed payload
    /// must inflate to exactly the section lengths the header declares.
    ///
    /// # Example
    /// ```
    /// use zune_core::bytestream::ZCursor;
    /// use zune_core::options::DecoderOptions;
    /// use zune_blub::BlubDecoder;
    /// // only decode images less than 10 in both width and height
    ///
    /// let options = DecoderOptions::default().set_max_width(10).set_max_height(10);
    ///
    /// let mut decoder = BlubDecoder::new_with_options(ZCursor::new([0_u8; 32]),options);
    /// ```
    pub fn new_with_options(data: T, options: DecoderOptions) -> BlubDecoder<T> {
        BlubDecoder {
            config: None,
            stream: ZReader::new(data),
            options
        }
    }

    /// Read and validate the 32 byte header
    ///
    /// Nothing past the header is consumed.
    ///
    /// # Returns
    /// - On success: Nothing, the header summary is available through [`config`](Self::config)
    /// - On error: [`HeaderTooShort`] or [`WrongMagicBytes`] for malformed headers,
    ///   [`TooLargeDimensions`] if the image is beyond configured limits,
    ///   [`CorruptAlphaMask`] or [`InsufficientData`] if the section lengths
    ///   cannot describe an image of this size
    ///
    /// [`CorruptAlphaMask`]:BlubDecodeErrors::CorruptAlphaMask
    /// [`InsufficientData`]:BlubDecodeErrors::InsufficientData
    /// [`HeaderTooShort`]:BlubDecodeErrors::HeaderTooShort
    /// [`WrongMagicBytes`]:BlubDecodeErrors::WrongMagicBytes
    /// [`TooLargeDimensions`]:BlubDecodeErrors::TooLargeDimensions
    pub fn decode_headers(&mut self) -> Result<(), BlubDecodeErrors> {
        if self.config.is_some() {
            return Ok(());
        }
        let mut bytes = [0_u8; BLUB_HEADER_SIZE];
        let mut filled = 0;

        while filled < BLUB_HEADER_SIZE {
            let read = self
                .stream
                .read_bytes(&mut bytes[filled..])
                .map_err(|e| BlubDecodeErrors::IoErrors("header", e))?;

            if read == 0 {
                return Err(BlubDecodeErrors::HeaderTooShort(BLUB_HEADER_SIZE, filled));
            }
            filled += read;
        }
        let header = BlubHeader::from_bytes(&bytes)?;
        let config = header.config();

        if config.width() > self.options.max_width() {
            return Err(BlubDecodeErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                config.width()
            ));
        }
        if config.height() > self.options.max_height() {
            return Err(BlubDecodeErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                config.height()
            ));
        }
        // lengths drive allocation, reject them before anything is inflated
        config.check_section_lengths()?;

        trace!("Image width: {:?}", config.width());
        trace!("Image height: {:?}", config.height());
        trace!("Alpha section length: {}", config.alpha_length());
        trace!("Pixel section length: {}", config.pixel_length());
        trace!("Options: {:?}", config.options());

        self.config = Some(config);

        Ok(())
    }

    /// Return the header summary or `None` if headers haven't been decoded
    pub const fn config(&self) -> Option<BlubConfig> {
        self.config
    }

    /// Return the width and height of the image
    ///
    /// Or none if the headers haven't been decoded
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        match self.config {
            Some(config) => Some((config.width(), config.height())),
            None => None
        }
    }

    /// Return the output colorspace, always [`ColorSpace::RGBA`]
    /// once headers are decoded
    pub const fn colorspace(&self) -> Option<ColorSpace> {
        match self.config {
            Some(_) => Some(ColorSpace::RGBA),
            None => None
        }
    }

    /// Return the output bit depth
    ///
    /// This is always 8
    pub const fn bit_depth(&self) -> BitDepth {
        BitDepth::Eight
    }

    /// Return the number of bytes required to hold the decoded image
    ///
    /// # Returns
    ///  - `Some(usize)`: Minimum size for a buffer needed to decode the image
    ///  - `None`: Indicates the headers were not decoded.
    pub const fn output_buffer_size(&self) -> Option<usize> {
        match self.config {
            Some(config) => Some(config.pixel_count() * OUTPUT_COMPONENTS),
            None => None
        }
    }

    /// Decode the image, returning RGBA pixels in row major order
    ///
    /// # Returns
    /// - On success: The decoded pixels, `width*height*4` bytes
    /// - On error: An instance of [BlubDecodeErrors] giving the reason the image
    ///   could not be decoded
    ///
    /// [BlubDecodeErrors]:crate::errors::BlubDecodeErrors
    pub fn decode(&mut self) -> Result<Vec<u8>, BlubDecodeErrors> {
        self.decode_headers()?;

        let size = self
            .output_buffer_size()
            .ok_or(BlubDecodeErrors::GenericStatic("Headers not decoded"))?;
        let mut output = vec![0; size];

        self.decode_into(&mut output)?;

        Ok(output)
    }

    /// Decode the image into `pixels`
    ///
    /// Returns an error if the buffer cannot hold the whole image
    pub fn decode_into(&mut self, pixels: &mut [u8]) -> Result<(), BlubDecodeErrors> {
        self.decode_headers()?;

        let config = self
            .config
            .ok_or(BlubDecodeErrors::GenericStatic("Headers not decoded"))?;
        let expected = config.pixel_count() * OUTPUT_COMPONENTS;

        if pixels.len() < expected {
            return Err(BlubDecodeErrors::TooSmallOutput(expected, pixels.len()));
        }
        let payload = self.read_payload(&config)?;

        let alpha_length = config.alpha_length() as usize;
        let (alpha, samples) = payload.split_at(alpha_length);
        let options = config.options();

        let mut mask = if !options.use_alpha_mask() {
            AlphaMaskReader::opaque()
        } else if options.compress_alpha_mask() {
            AlphaMaskReader::rle(alpha)
        } else {
            AlphaMaskReader::bitmask(alpha, config.pixel_count())?
        };
        let mut luma = SampleReader::new(
            samples,
            options.uniform_hue(),
            options.exclude_masked_pixels()
        );
        let hue_shift = options.hue_shift();

        for pix in pixels[..expected].chunks_exact_mut(OUTPUT_COMPONENTS) {
            let opaque = mask.next_opacity()?;
            let y = luma.next_luma(opaque)?;

            pix.copy_from_slice(&gray_to_color(y, opaque, hue_shift));
        }

        if mask.bytes_consumed() != alpha.len() {
            warn!(
                "Alpha mask has {} unused bytes",
                alpha.len() - mask.bytes_consumed()
            );
        }
        if luma.bytes_consumed() != samples.len() {
            warn!(
                "Pixel data has {} unused bytes",
                samples.len() - luma.bytes_consumed()
            );
        }
        trace!("Finished decoding image");

        Ok(())
    }

    /// Inflate the payload and return exactly the alpha section
    /// followed by the pixel section
    fn read_payload(&mut self, config: &BlubConfig) -> Result<Vec<u8>, BlubDecodeErrors> {
        let alpha_length = config.alpha_length() as usize;
        let pixel_length = config.pixel_length() as usize;
        let expected = alpha_length + pixel_length;

        if expected == 0 {
            // nothing stored, the compressed stream is not needed
            return Ok(Vec::new());
        }
        let mut compressed = Vec::new();
        let mut chunk = [0_u8; 4096];

        loop {
            let read = self
                .stream
                .read_bytes(&mut chunk)
                .map_err(|e| BlubDecodeErrors::IoErrors("payload", e))?;
            if read == 0 {
                break;
            }
            compressed.extend_from_slice(&chunk[..read]);
        }
        trace!("Compressed payload: {} bytes", compressed.len());

        let mut inflate_options = DeflateOptions::default().set_size_hint(expected);

        if self.options.strict_mode() {
            inflate_options = inflate_options.set_limit(expected);
        }
        let mut decoder = DeflateDecoder::new_with_options(&compressed, inflate_options);
        let mut payload = decoder
            .decode_zlib()
            .map_err(|e| BlubDecodeErrors::InflateError("payload", e))?;

        if payload.len() < alpha_length {
            return Err(BlubDecodeErrors::InsufficientData(
                "alpha mask",
                alpha_length,
                payload.len()
            ));
        }
        if payload.len() < expected {
            return Err(BlubDecodeErrors::InsufficientData(
                "pixel data",
                pixel_length,
                payload.len() - alpha_length
            ));
        }
        if payload.len() > expected {
            warn!(
                "Ignoring {} bytes after pixel data",
                payload.len() - expected
            );
            payload.truncate(expected);
        }
        Ok(payload)
    }
}
