/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Alpha mask encoding and decoding
//!
//! The mask is one opacity flag per pixel, in row major order.
//! It is stored either
//!
//! - Bit packed: 8 flags per byte, most significant bit first, the last
//!   byte padded with zero bits.
//! - Run length encoded: one byte per run, bit 7 holds the opacity and
//!   bits 0..=6 the run length, which is always in `1..=127`.
use alloc::vec::Vec;

use crate::constants::{RLE_LENGTH_MASK, RLE_MAX_RUN, RLE_OPACITY_BIT};
use crate::errors::BlubDecodeErrors;

/// Number of bytes a bit packed mask of `pixels` flags occupies
pub const fn bitmask_length(pixels: usize) -> usize {
    (pixels + 7) / 8
}

/// Pack opacity flags, 8 per byte, most significant bit first
pub fn encode_bitmask(opacity: &[bool]) -> Vec<u8> {
    let mut output = vec![0_u8; bitmask_length(opacity.len())];

    for (byte, flags) in output.iter_mut().zip(opacity.chunks(8)) {
        for (bit, flag) in flags.iter().enumerate() {
            if *flag {
                *byte |= 0b1000_0000 >> bit;
            }
        }
    }
    output
}

/// Run length encode opacity flags
pub fn encode_rle(opacity: &[bool]) -> Vec<u8> {
    let mut writer = RleWriter::new();

    for flag in opacity {
        writer.push(*flag);
    }
    writer.finish()
}

/// State of the run being accumulated by [`RleWriter`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RunState {
    /// No run started
    Idle,
    /// A run shorter than the record limit is being extended
    Accumulating { opaque: bool, length: u8 },
    /// The run reached the record limit, it is written before anything else
    FlushPending { opaque: bool, length: u8 }
}

/// Incremental run length encoder for opacity flags
pub struct RleWriter {
    state:  RunState,
    output: Vec<u8>
}

impl Default for RleWriter {
    fn default() -> Self {
        RleWriter::new()
    }
}

impl RleWriter {
    pub fn new() -> RleWriter {
        RleWriter {
            state:  RunState::Idle,
            output: Vec::new()
        }
    }

    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Records written so far, excluding the run in progress
    pub fn records(&self) -> &[u8] {
        &self.output
    }

    fn emit(&mut self, opaque: bool, length: u8) {
        debug_assert!((1..=RLE_MAX_RUN).contains(&length));

        let mut record = length & RLE_LENGTH_MASK;
        if opaque {
            record |= RLE_OPACITY_BIT;
        }
        self.output.push(record);
    }

    /// Add the opacity of the next pixel
    pub fn push(&mut self, opaque: bool) {
        if let RunState::FlushPending {
            opaque: full,
            length
        } = self.state
        {
            self.emit(full, length);
            self.state = RunState::Idle;
        }

        self.state = match self.state {
            RunState::Accumulating {
                opaque: current,
                length
            } if current == opaque => {
                let length = length + 1;

                if length == RLE_MAX_RUN {
                    RunState::FlushPending { opaque, length }
                } else {
                    RunState::Accumulating { opaque, length }
                }
            }
            RunState::Accumulating {
                opaque: current,
                length
            } => {
                self.emit(current, length);
                RunState::Accumulating { opaque, length: 1 }
            }
            RunState::Idle | RunState::FlushPending { .. } => {
                RunState::Accumulating { opaque, length: 1 }
            }
        };
    }

    /// Flush the run in progress and return all records
    pub fn finish(mut self) -> Vec<u8> {
        match self.state {
            RunState::Accumulating { opaque, length } | RunState::FlushPending { opaque, length } => {
                self.emit(opaque, length);
            }
            RunState::Idle => {}
        }
        self.state = RunState::Idle;

        core::mem::take(&mut self.output)
    }
}

enum MaskKind {
    /// No mask stored, everything is opaque
    Opaque,
    Bitmask,
    Rle { current: bool, remaining: u8 }
}

/// Reads opacity flags one pixel at a time
pub struct AlphaMaskReader<'a> {
    data:     &'a [u8],
    position: usize,
    bit:      u8,
    kind:     MaskKind
}

impl<'a> AlphaMaskReader<'a> {
    /// A reader for images without a stored mask
    pub const fn opaque() -> AlphaMaskReader<'static> {
        AlphaMaskReader {
            data:     &[],
            position: 0,
            bit:      0,
            kind:     MaskKind::Opaque
        }
    }

    /// A reader over a bit packed mask of `pixels` flags
    ///
    /// Errors out if `data` is too short to hold all flags
    pub fn bitmask(data: &'a [u8], pixels: usize) -> Result<AlphaMaskReader<'a>, BlubDecodeErrors> {
        let expected = bitmask_length(pixels);

        if data.len() < expected {
            return Err(BlubDecodeErrors::InsufficientData(
                "alpha mask",
                expected,
                data.len()
            ));
        }
        Ok(AlphaMaskReader {
            data,
            position: 0,
            bit: 0,
            kind: MaskKind::Bitmask
        })
    }

    /// A reader over a run length encoded mask
    ///
    /// Records are validated as they are read
    pub const fn rle(data: &'a [u8]) -> AlphaMaskReader<'a> {
        AlphaMaskReader {
            data,
            position: 0,
            bit: 0,
            kind: MaskKind::Rle {
                current:   false,
                remaining: 0
            }
        }
    }

    /// Bytes of the mask consumed so far
    pub const fn bytes_consumed(&self) -> usize {
        match self.kind {
            MaskKind::Bitmask if self.bit != 0 => self.position + 1,
            _ => self.position
        }
    }

    /// Opacity of the next pixel
    pub fn next_opacity(&mut self) -> Result<bool, BlubDecodeErrors> {
        match &mut self.kind {
            MaskKind::Opaque => Ok(true),
            MaskKind::Bitmask => {
                let byte = *self.data.get(self.position).ok_or(
                    BlubDecodeErrors::InsufficientData(
                        "alpha mask",
                        self.position + 1,
                        self.data.len()
                    )
                )?;
                let flag = (byte >> (7 - self.bit)) & 1 == 1;

                self.bit += 1;
                if self.bit == 8 {
                    self.bit = 0;
                    self.position += 1;
                }
                Ok(flag)
            }
            MaskKind::Rle { current, remaining } => {
                if *remaining == 0 {
                    let record = *self.data.get(self.position).ok_or(
                        BlubDecodeErrors::InsufficientData(
                            "alpha mask",
                            self.position + 1,
                            self.data.len()
                        )
                    )?;
                    self.position += 1;

                    *remaining = record & RLE_LENGTH_MASK;
                    *current = record & RLE_OPACITY_BIT != 0;

                    if *remaining == 0 {
                        return Err(BlubDecodeErrors::CorruptAlphaMask(
                            "run length record with zero length"
                        ));
                    }
                }
                *remaining -= 1;

                Ok(*current)
            }
        }
    }
}
