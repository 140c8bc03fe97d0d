/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding and encoding the BLUB image format
//!
//! BLUB stores a single luma byte per pixel and one hue for the whole
//! image, with an optional one bit transparency mask. Everything after a
//! fixed 32 byte header is zlib compressed.
//!
//! # Features
//! - Decoding and encoding
//! - Bit packed or run length encoded alpha masks
//! - Uniform hue silhouettes, where no luma is stored at all
//!
//! # Example
//! ```
//! use zune_core::bit_depth::BitDepth;
//! use zune_core::bytestream::ZCursor;
//! use zune_core::colorspace::ColorSpace;
//! use zune_blub::{BlubDecoder, BlubEncoder, BlubOptions};
//!
//! let pixels = [255_u8, 0, 0, 255, 0, 0, 0, 0];
//!
//! let mut file = vec![];
//! BlubEncoder::new(&pixels, 2, 1, ColorSpace::RGBA, BitDepth::Eight, BlubOptions::default())
//!     .encode(&mut file)
//!     .unwrap();
//!
//! let decoded = BlubDecoder::new(ZCursor::new(&file)).decode().unwrap();
//! assert_eq!(decoded, [76, 76, 76, 255, 0, 0, 0, 0]);
//! ```
extern crate alloc;
extern crate core;

pub use color::{color_to_gray, gray_to_color, PixelLayout, ToRgba8};
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use header::{BlubConfig, BlubHeader};
pub use options::BlubOptions;
pub use zune_core;

pub mod alpha;
mod color;
pub mod constants;
mod decoder;
mod encoder;
mod errors;
mod header;
mod options;
pub mod pixels;
