/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Format options shared by the encoder and the decoder
//!
//! On the encoding side, these are requests, the encoder may override
//! some of them depending on image contents, e.g an image with no transparent
//! pixels never gets an alpha mask even if one is requested.
//!
//! On the decoding side they are reconstructed from the header and describe
//! how the payload is laid out.

/// Options describing how a BLUB image is (or was) encoded
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlubOptions {
    hue_shift:             u8,
    alpha_threshold:       u8,
    use_alpha_mask:        bool,
    compress_alpha_mask:   bool,
    uniform_hue:           bool,
    exclude_masked_pixels: bool,
    compression_level:     u8
}

impl Default for BlubOptions {
    fn default() -> Self {
        BlubOptions {
            hue_shift:             0,
            alpha_threshold:       0,
            use_alpha_mask:        true,
            compress_alpha_mask:   false,
            uniform_hue:           false,
            exclude_masked_pixels: false,
            compression_level:     6
        }
    }
}

impl BlubOptions {
    /// Global hue applied to every opaque pixel
    ///
    /// The full range `0..=255` maps to `0..360` degrees, `0` means
    /// no tint, the image is reconstructed as pure grayscale
    pub const fn hue_shift(&self) -> u8 {
        self.hue_shift
    }
    /// Set the global hue, see [`hue_shift`](Self::hue_shift)
    pub const fn set_hue_shift(mut self, hue_shift: u8) -> Self {
        self.hue_shift = hue_shift;
        self
    }
    /// Alpha value a pixel must exceed to be considered opaque
    ///
    /// A pixel whose alpha equals the threshold is masked out.
    ///
    /// This is only used when encoding, it isn't stored in the file
    /// and decoders always report `0`
    pub const fn alpha_threshold(&self) -> u8 {
        self.alpha_threshold
    }
    pub const fn set_alpha_threshold(mut self, threshold: u8) -> Self {
        self.alpha_threshold = threshold;
        self
    }
    /// Whether an alpha mask is stored
    ///
    /// When false every pixel decodes as opaque
    pub const fn use_alpha_mask(&self) -> bool {
        self.use_alpha_mask
    }
    pub const fn set_use_alpha_mask(mut self, yes: bool) -> Self {
        self.use_alpha_mask = yes;
        self
    }
    /// Whether the alpha mask is run length encoded (true)
    /// or bit packed (false)
    pub const fn compress_alpha_mask(&self) -> bool {
        self.compress_alpha_mask
    }
    pub const fn set_compress_alpha_mask(mut self, yes: bool) -> Self {
        self.compress_alpha_mask = yes;
        self
    }
    /// Whether no luma samples are stored and every pixel
    /// is rendered at full brightness
    ///
    /// The image becomes a flat silhouette shaped by the alpha mask
    pub const fn uniform_hue(&self) -> bool {
        self.uniform_hue
    }
    pub const fn set_uniform_hue(mut self, yes: bool) -> Self {
        self.uniform_hue = yes;
        self
    }
    /// Whether masked out pixels skip storing a luma sample
    pub const fn exclude_masked_pixels(&self) -> bool {
        self.exclude_masked_pixels
    }
    pub const fn set_exclude_masked_pixels(mut self, yes: bool) -> Self {
        self.exclude_masked_pixels = yes;
        self
    }
    /// Zlib compression level for the payload, `0..=9`
    ///
    /// Encoder only, values above 9 are clamped
    pub const fn compression_level(&self) -> u8 {
        self.compression_level
    }
    pub const fn set_compression_level(mut self, level: u8) -> Self {
        self.compression_level = if level > 9 { 9 } else { level };
        self
    }
}
