/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// `BLUB` as a big endian integer, this is the first thing in every file
pub const BLUB_MAGIC: u32 = u32::from_be_bytes(*b"BLUB");

/// Size of the uncompressed preamble
pub const BLUB_HEADER_SIZE: usize = 32;

/// Largest width or height the header can carry
pub const BLUB_MAX_DIMENSION: usize = u16::MAX as usize;

/// Alpha mask is run length encoded instead of bit packed
pub const FLAG_COMPRESS_ALPHA: u8 = 0b1000_0000;
/// Masked out pixels don't store a luma sample
pub const FLAG_EXCLUDE_MASKED_PIXELS: u8 = 0b0100_0000;
/// Bits we understand, anything else in the flags byte is ignored
pub const FLAG_KNOWN_BITS: u8 = FLAG_COMPRESS_ALPHA | FLAG_EXCLUDE_MASKED_PIXELS;

// Rec.601 luma weights, sum to 1000
pub const LUMA_WEIGHT_R: u32 = 299;
pub const LUMA_WEIGHT_G: u32 = 587;
pub const LUMA_WEIGHT_B: u32 = 114;
pub const LUMA_WEIGHT_SUM: u32 = LUMA_WEIGHT_R + LUMA_WEIGHT_G + LUMA_WEIGHT_B;

/// Opacity bit of an RLE alpha record
pub const RLE_OPACITY_BIT: u8 = 0b1000_0000;
/// Length bits of an RLE alpha record
pub const RLE_LENGTH_MASK: u8 = 0b0111_1111;
/// Longest run a single RLE record can describe
pub const RLE_MAX_RUN: u8 = 127;

/// Luma used for pixels without a stored sample
pub const FULL_LUMA: u8 = 0xFF;
