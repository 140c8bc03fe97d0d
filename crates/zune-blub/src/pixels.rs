/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Luma sample section
//!
//! One byte per pixel, in the same row major order as the alpha mask,
//! skipping pixels that don't store a sample (see [`stores_sample`]).
use alloc::vec::Vec;

use crate::constants::FULL_LUMA;
use crate::errors::BlubDecodeErrors;

/// Whether a pixel with the given opacity stores a luma sample
///
/// Nothing is stored under uniform hue, otherwise masked out pixels are
/// skipped only when `exclude_masked` is set.
#[inline(always)]
pub const fn stores_sample(uniform_hue: bool, exclude_masked: bool, opaque: bool) -> bool {
    !uniform_hue && (!exclude_masked || opaque)
}

/// Collect the luma samples that should be stored
pub fn encode_samples(
    luma: &[u8], opacity: &[bool], uniform_hue: bool, exclude_masked: bool
) -> Vec<u8> {
    if uniform_hue {
        return Vec::new();
    }
    luma.iter()
        .zip(opacity)
        .filter(|(_, opaque)| stores_sample(uniform_hue, exclude_masked, **opaque))
        .map(|(sample, _)| *sample)
        .collect()
}

/// Hands out luma values in lockstep with the alpha mask
pub struct SampleReader<'a> {
    data:           &'a [u8],
    position:       usize,
    uniform_hue:    bool,
    exclude_masked: bool
}

impl<'a> SampleReader<'a> {
    pub const fn new(data: &'a [u8], uniform_hue: bool, exclude_masked: bool) -> SampleReader<'a> {
        SampleReader {
            data,
            position: 0,
            uniform_hue,
            exclude_masked
        }
    }

    /// Samples consumed so far
    pub const fn bytes_consumed(&self) -> usize {
        self.position
    }

    /// Luma of the next pixel
    ///
    /// Pixels without a stored sample get full luma
    #[inline]
    pub fn next_luma(&mut self, opaque: bool) -> Result<u8, BlubDecodeErrors> {
        if !stores_sample(self.uniform_hue, self.exclude_masked, opaque) {
            return Ok(FULL_LUMA);
        }
        match self.data.get(self.position) {
            Some(sample) => {
                self.position += 1;
                Ok(*sample)
            }
            None => Err(BlubDecodeErrors::InsufficientData(
                "pixel data",
                self.position + 1,
                self.data.len()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pixels::{encode_samples, stores_sample, SampleReader};
    use crate::BlubDecodeErrors;

    #[test]
    fn test_inclusion_predicate() {
        assert!(stores_sample(false, false, false));
        assert!(stores_sample(false, false, true));
        assert!(!stores_sample(false, true, false));
        assert!(stores_sample(false, true, true));
        assert!(!stores_sample(true, false, true));
        assert!(!stores_sample(true, true, true));
    }

    #[test]
    fn test_exclude_masked() {
        let luma = [10, 20, 30, 40];
        let opacity = [true, false, false, true];

        assert_eq!(encode_samples(&luma, &opacity, false, false), luma);
        assert_eq!(encode_samples(&luma, &opacity, false, true), [10, 40]);
        assert!(encode_samples(&luma, &opacity, true, false).is_empty());

        let stored = encode_samples(&luma, &opacity, false, true);
        let mut reader = SampleReader::new(&stored, false, true);

        let decoded = opacity
            .iter()
            .map(|opaque| reader.next_luma(*opaque).unwrap())
            .collect::<Vec<u8>>();

        assert_eq!(decoded, [10, 255, 255, 40]);
        assert_eq!(reader.bytes_consumed(), 2);
    }

    #[test]
    fn test_uniform_hue_is_full_luma() {
        let mut reader = SampleReader::new(&[], true, false);

        assert_eq!(reader.next_luma(true).unwrap(), 255);
        assert_eq!(reader.next_luma(false).unwrap(), 255);
    }

    #[test]
    fn test_missing_samples() {
        let mut reader = SampleReader::new(&[1], false, false);

        assert_eq!(reader.next_luma(false).unwrap(), 1);
        assert!(matches!(
            reader.next_luma(true),
            Err(BlubDecodeErrors::InsufficientData(_, 2, 1))
        ));
    }
}
