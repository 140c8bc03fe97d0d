/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during decoding and encoding
use core::fmt::{Debug, Display, Formatter};

use zune_core::bytestream::ZByteIoError;
use zune_inflate::errors::InflateDecodeErrors;

use crate::constants::BLUB_MAX_DIMENSION;

/// Possible errors that may occur during decoding
#[non_exhaustive]
pub enum BlubDecodeErrors {
    /// The stream ended before a full header could be read
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we expected
    /// - 2nd argument is the number of bytes the stream had
    HeaderTooShort(usize, usize),
    /// The image does not start with `BLUB`
    ///
    /// The argument is the tag that was found instead
    WrongMagicBytes(u32),
    /// Image dimensions exceed the configured decoder limits
    ///
    /// # Arguments
    /// - dimension name, `width` or `height`
    /// - configured limit
    /// - value found in the header
    TooLargeDimensions(&'static str, usize, usize),
    /// A payload section is shorter than the header claims
    ///
    /// # Arguments
    /// - section name
    /// - number of bytes (or samples) expected
    /// - number actually available
    InsufficientData(&'static str, usize, usize),
    /// The alpha mask contains a record that cannot be expanded
    CorruptAlphaMask(&'static str),
    /// The output buffer is too small to hold the image
    TooSmallOutput(usize, usize),
    /// The compressed payload could not be inflated
    ///
    /// The first argument names the section being read
    InflateError(&'static str, InflateDecodeErrors),
    /// Generic message does not need heap allocation
    GenericStatic(&'static str),
    /// Reading from the underlying stream failed
    ///
    /// The first argument names the section being read
    IoErrors(&'static str, ZByteIoError)
}

impl Debug for BlubDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            BlubDecodeErrors::HeaderTooShort(expected, found) => {
                writeln!(
                    f,
                    "Header too short, expected {expected} bytes but stream has {found}"
                )
            }
            BlubDecodeErrors::WrongMagicBytes(tag) => {
                writeln!(
                    f,
                    "Wrong magic bytes, expected `BLUB` as image start but found {:?}",
                    tag.to_be_bytes()
                )
            }
            BlubDecodeErrors::TooLargeDimensions(dimension, limit, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension}, {found} exceeds configured limit {limit}"
                )
            }
            BlubDecodeErrors::InsufficientData(section, expected, found) => {
                writeln!(
                    f,
                    "Insufficient data for {section}, required {expected} but only {found} available"
                )
            }
            BlubDecodeErrors::CorruptAlphaMask(reason) => {
                writeln!(f, "Corrupt alpha mask: {reason}")
            }
            BlubDecodeErrors::TooSmallOutput(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            BlubDecodeErrors::InflateError(section, err) => {
                writeln!(f, "Could not inflate {section}: {:?}", err)
            }
            BlubDecodeErrors::GenericStatic(val) => {
                writeln!(f, "{val}")
            }
            BlubDecodeErrors::IoErrors(section, err) => {
                writeln!(f, "I/O error reading {section}: {:?}", err)
            }
        }
    }
}

impl Display for BlubDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for BlubDecodeErrors {}

impl From<&'static str> for BlubDecodeErrors {
    fn from(r: &'static str) -> Self {
        Self::GenericStatic(r)
    }
}

/// Errors encountered during encoding
#[non_exhaustive]
pub enum BlubEncodeErrors {
    /// Width or height do not fit in the 16 bit header fields
    ///
    /// The argument is the offending dimension
    TooLargeDimensions(usize),
    /// The pixel buffer length doesn't match `width*height*components`
    ///
    /// # Arguments
    /// - expected length
    /// - found length
    LengthMismatch(usize, usize),
    /// A serialized section doesn't fit in its 32 bit length field
    SectionTooLarge(&'static str, usize),
    /// The zlib stream failed while compressing a section
    Compression(&'static str, std::io::Error),
    Generic(&'static str),
    /// Writing to the sink failed
    ///
    /// The first argument names the section being written
    IoErrors(&'static str, ZByteIoError)
}

impl Debug for BlubEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            BlubEncodeErrors::TooLargeDimensions(found) => {
                writeln!(
                    f,
                    "Too large image dimensions {found}, BLUB can only encode images up to {BLUB_MAX_DIMENSION}"
                )
            }
            BlubEncodeErrors::LengthMismatch(expected, found) => {
                writeln!(
                    f,
                    "Expected pixel buffer of length {expected} but found {found}"
                )
            }
            BlubEncodeErrors::SectionTooLarge(section, length) => {
                writeln!(
                    f,
                    "Section {section} of {length} bytes does not fit in a 32 bit length"
                )
            }
            BlubEncodeErrors::Compression(section, err) => {
                writeln!(f, "Could not compress {section}: {err}")
            }
            BlubEncodeErrors::Generic(val) => {
                writeln!(f, "{}", val)
            }
            BlubEncodeErrors::IoErrors(section, v) => {
                writeln!(f, "I/O error writing {section}: {:?}", v)
            }
        }
    }
}

impl Display for BlubEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for BlubEncodeErrors {}
