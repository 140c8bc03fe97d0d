/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The fixed 32 byte preamble
//!
//! Layout
//!
//! | Offset | Size | Field          | Endianness |
//! |--------|------|----------------|------------|
//! | 0      | 4    | `BLUB` tag     | big        |
//! | 4      | 2    | width          | little     |
//! | 6      | 2    | height         | little     |
//! | 8      | 4    | alpha length   | little     |
//! | 12     | 4    | pixel length   | little     |
//! | 16     | 1    | hue shift      |            |
//! | 17     | 1    | flags          |            |
//! | 18     | 14   | reserved, zero |            |
//!
//! The tag being big endian while everything after it is little endian
//! is part of the format, files in the wild depend on it.

use zune_core::log::warn;

use crate::alpha::bitmask_length;
use crate::constants::{
    BLUB_HEADER_SIZE, BLUB_MAGIC, FLAG_COMPRESS_ALPHA, FLAG_EXCLUDE_MASKED_PIXELS, FLAG_KNOWN_BITS
};
use crate::errors::BlubDecodeErrors;
use crate::options::BlubOptions;

/// Raw header fields, as stored on disk
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct BlubHeader {
    pub width:        u16,
    pub height:       u16,
    /// Length of the alpha section inside the inflated payload, `0` means no mask
    pub alpha_length: u32,
    /// Length of the pixel section inside the inflated payload, `0` means uniform hue
    pub pixel_length: u32,
    pub hue_shift:    u8,
    pub flags:        u8
}

impl BlubHeader {
    /// Parse a header, only the format tag is validated
    pub fn from_bytes(bytes: &[u8; BLUB_HEADER_SIZE]) -> Result<BlubHeader, BlubDecodeErrors> {
        let tag = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);

        if tag != BLUB_MAGIC {
            return Err(BlubDecodeErrors::WrongMagicBytes(tag));
        }
        let header = BlubHeader {
            width:        u16::from_le_bytes([bytes[4], bytes[5]]),
            height:       u16::from_le_bytes([bytes[6], bytes[7]]),
            alpha_length: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            pixel_length: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
            hue_shift:    bytes[16],
            flags:        bytes[17]
        };
        if header.flags & !FLAG_KNOWN_BITS != 0 {
            warn!("Ignoring unknown header flag bits {:#010b}", header.flags & !FLAG_KNOWN_BITS);
        }
        Ok(header)
    }

    /// Serialize the header, reserved bytes are always zero
    pub fn to_bytes(&self) -> [u8; BLUB_HEADER_SIZE] {
        let mut bytes = [0_u8; BLUB_HEADER_SIZE];

        bytes[0..4].copy_from_slice(&BLUB_MAGIC.to_be_bytes());
        bytes[4..6].copy_from_slice(&self.width.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.height.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.alpha_length.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.pixel_length.to_le_bytes());
        bytes[16] = self.hue_shift;
        bytes[17] = self.flags;

        bytes
    }

    /// Build the flags byte from encoding options
    pub const fn flags_from_options(options: &BlubOptions) -> u8 {
        let mut flags = 0;

        if options.compress_alpha_mask() {
            flags |= FLAG_COMPRESS_ALPHA;
        }
        if options.exclude_masked_pixels() {
            flags |= FLAG_EXCLUDE_MASKED_PIXELS;
        }
        flags
    }

    /// Derive the decoding configuration described by this header
    pub fn config(&self) -> BlubConfig {
        let options = BlubOptions::default()
            .set_hue_shift(self.hue_shift)
            .set_alpha_threshold(0)
            .set_use_alpha_mask(self.alpha_length > 0)
            .set_compress_alpha_mask(self.flags & FLAG_COMPRESS_ALPHA != 0)
            .set_uniform_hue(self.pixel_length == 0)
            .set_exclude_masked_pixels(self.flags & FLAG_EXCLUDE_MASKED_PIXELS != 0);

        BlubConfig {
            options,
            width: usize::from(self.width),
            height: usize::from(self.height),
            alpha_length: self.alpha_length,
            pixel_length: self.pixel_length
        }
    }
}

/// Header summary available after decoding headers
///
/// The options are consistent with the section lengths, i.e
/// `use_alpha_mask() == (alpha_length() > 0)` and
/// `uniform_hue() == (pixel_length() == 0)`
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlubConfig {
    options:      BlubOptions,
    width:        usize,
    height:       usize,
    alpha_length: u32,
    pixel_length: u32
}

impl BlubConfig {
    pub const fn options(&self) -> BlubOptions {
        self.options
    }
    pub const fn width(&self) -> usize {
        self.width
    }
    pub const fn height(&self) -> usize {
        self.height
    }
    /// Byte length of the alpha section
    pub const fn alpha_length(&self) -> u32 {
        self.alpha_length
    }
    /// Byte length of the pixel section
    pub const fn pixel_length(&self) -> u32 {
        self.pixel_length
    }
    /// Number of pixels in the image
    pub const fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Check the declared section lengths against the image size
    ///
    /// - A bit packed mask is exactly `ceil(pixels/8)` bytes
    /// - A run length encoded mask has at most one record per pixel
    /// - At most one luma sample is stored per pixel
    pub fn check_section_lengths(&self) -> Result<(), BlubDecodeErrors> {
        let pixels = self.pixel_count();
        let alpha_length = self.alpha_length as usize;
        let pixel_length = self.pixel_length as usize;

        if self.options.use_alpha_mask() {
            if self.options.compress_alpha_mask() {
                if alpha_length > pixels {
                    return Err(BlubDecodeErrors::CorruptAlphaMask(
                        "run length mask has more records than pixels"
                    ));
                }
            } else if alpha_length != bitmask_length(pixels) {
                return Err(BlubDecodeErrors::CorruptAlphaMask(
                    "bit packed mask length does not match image size"
                ));
            }
        }
        if pixel_length > pixels {
            return Err(BlubDecodeErrors::InsufficientData(
                "pixel data",
                pixel_length,
                pixels
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::BLUB_HEADER_SIZE;
    use crate::header::BlubHeader;
    use crate::options::BlubOptions;
    use crate::BlubDecodeErrors;

    #[test]
    fn test_mixed_endian_layout() {
        let header = BlubHeader {
            width:        0x0102,
            height:       0x0304,
            alpha_length: 0x0506_0708,
            pixel_length: 0x090A_0B0C,
            hue_shift:    135,
            flags:        0b1100_0000
        };
        let bytes = header.to_bytes();

        assert_eq!(&bytes[0..4], b"BLUB");
        assert_eq!(&bytes[4..6], &[0x02, 0x01]);
        assert_eq!(&bytes[6..8], &[0x04, 0x03]);
        assert_eq!(&bytes[8..12], &[0x08, 0x07, 0x06, 0x05]);
        assert_eq!(&bytes[12..16], &[0x0C, 0x0B, 0x0A, 0x09]);
        assert_eq!(bytes[16], 135);
        assert_eq!(bytes[17], 0b1100_0000);
        assert!(bytes[18..].iter().all(|x| *x == 0));

        assert_eq!(BlubHeader::from_bytes(&bytes).unwrap(), header);
    }

    #[test]
    fn test_wrong_tag() {
        let mut bytes = [0; BLUB_HEADER_SIZE];
        bytes[0..4].copy_from_slice(b"BULB");

        assert!(matches!(
            BlubHeader::from_bytes(&bytes),
            Err(BlubDecodeErrors::WrongMagicBytes(_))
        ));
    }

    #[test]
    fn test_reserved_bytes_ignored() {
        let mut bytes = BlubHeader::default().to_bytes();
        bytes[18..].iter_mut().for_each(|x| *x = 0xAB);

        assert!(BlubHeader::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_config_derivation() {
        let header = BlubHeader {
            width: 3,
            height: 4,
            alpha_length: 0,
            pixel_length: 12,
            hue_shift: 7,
            flags: BlubHeader::flags_from_options(
                &BlubOptions::default().set_exclude_masked_pixels(true)
            )
        };
        let config = header.config();
        let options = config.options();

        assert_eq!(config.pixel_count(), 12);
        assert!(!options.use_alpha_mask());
        assert!(!options.uniform_hue());
        assert!(!options.compress_alpha_mask());
        assert!(options.exclude_masked_pixels());
        assert_eq!(options.hue_shift(), 7);
        assert_eq!(options.alpha_threshold(), 0);

        let uniform = BlubHeader {
            alpha_length: 9,
            pixel_length: 0,
            flags: 0b1000_0000,
            ..header
        }
        .config();

        assert!(uniform.options().use_alpha_mask());
        assert!(uniform.options().uniform_hue());
        assert!(uniform.options().compress_alpha_mask());
    }

    #[test]
    fn test_section_length_checks() {
        let header = BlubHeader {
            width: 10,
            height: 2,
            alpha_length: 3,
            pixel_length: 20,
            ..BlubHeader::default()
        };
        assert!(header.config().check_section_lengths().is_ok());

        // 20 flags need exactly 3 bytes
        for alpha_length in [2, 4, u32::MAX] {
            let config = BlubHeader {
                alpha_length,
                ..header
            }
            .config();
            assert!(matches!(
                config.check_section_lengths(),
                Err(BlubDecodeErrors::CorruptAlphaMask(_))
            ));
        }

        let rle = BlubHeader {
            alpha_length: 20,
            flags: 0b1000_0000,
            ..header
        };
        assert!(rle.config().check_section_lengths().is_ok());

        let config = BlubHeader {
            alpha_length: 21,
            ..rle
        }
        .config();
        assert!(matches!(
            config.check_section_lengths(),
            Err(BlubDecodeErrors::CorruptAlphaMask(_))
        ));

        let config = BlubHeader {
            pixel_length: u32::MAX,
            ..header
        }
        .config();
        assert!(matches!(
            config.check_section_lengths(),
            Err(BlubDecodeErrors::InsufficientData("pixel data", _, 20))
        ));
    }
}
