//! Frame geometry and the binary payload.

use alloc::vec::Vec;

use zerocopy::{FromBytes, byteorder::little_endian::F32};

use super::{Error, FormatError, cursor::Cursor};

/// A rectangular region of the detector read out into every frame.
///
/// Bounds are inclusive, 1-based detector coordinates, with `top` at or above
/// `bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SubImage {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub horizontal_bin: u32,
    pub vertical_bin: u32,
}

impl SubImage {
    /// Width in binned pixels, or zero if the bounds are invalid.
    pub const fn width(&self) -> u32 {
        binned(self.left, self.right, self.horizontal_bin)
    }

    /// Height in binned pixels, or zero if the bounds are invalid.
    pub const fn height(&self) -> u32 {
        binned(self.bottom, self.top, self.vertical_bin)
    }

    /// Number of binned pixels.
    pub const fn pixels(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    fn validate(&self) -> Result<(), FormatError> {
        if self.horizontal_bin == 0 || self.vertical_bin == 0 {
            Err(FormatError::InvalidSubImage("zero binning"))?;
        }
        if self.left > self.right {
            Err(FormatError::InvalidSubImage("left beyond right"))?;
        }
        if self.bottom > self.top {
            Err(FormatError::InvalidSubImage("bottom above top"))?;
        }
        if self.pixels() == 0 {
            Err(FormatError::InvalidSubImage("binning exceeds extent"))?;
        }

        Ok(())
    }
}

const fn binned(low: u32, high: u32, bin: u32) -> u32 {
    match high.checked_sub(low) {
        Some(span) if bin != 0 => span.saturating_add(1) / bin,
        _ => 0,
    }
}

/// The declared shape of a section's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Geometry {
    /// Samples in each frame.
    pub pixels_per_frame: usize,
    /// Frames in the payload.
    pub frame_count: usize,
    /// Detector regions making up each frame, in payload order.
    pub sub_images: Vec<SubImage>,
}

impl Geometry {
    /// Total samples in the payload, if it fits in memory.
    pub fn sample_count(&self) -> Option<usize> {
        self.pixels_per_frame.checked_mul(self.frame_count)
    }

    /// Payload length in bytes, if it fits in memory.
    pub fn payload_len(&self) -> Option<usize> {
        self.sample_count()?.checked_mul(size_of::<f32>())
    }

    /// Check that the sub-images are well formed and exactly cover the frame.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.pixels_per_frame == 0 || self.frame_count == 0 {
            Err(FormatError::EmptyFrame)?;
        }

        let mut computed = 0usize;
        for sub_image in &self.sub_images {
            sub_image.validate()?;
            computed = computed
                .checked_add(sub_image.pixels())
                .ok_or(FormatError::PayloadOverflow)?;
        }

        if computed != self.pixels_per_frame {
            Err(FormatError::PixelCountMismatch {
                declared: self.pixels_per_frame,
                computed,
            })?;
        }

        self.payload_len().ok_or(FormatError::PayloadOverflow)?;

        Ok(())
    }
}

/// Decode the payload following a section header.
///
/// Reads exactly `4 * pixels_per_frame * frame_count` bytes as little-endian
/// `f32`, regardless of host byte order. Frames are laid out back to back.
pub fn decode(cursor: &mut Cursor, geometry: &Geometry) -> Result<Vec<f32>, Error> {
    let offset = cursor.offset();
    let bytes = cursor.read_bytes(payload_len(offset, geometry)?)?;

    // The length is a whole number of samples and `F32` is unaligned.
    let samples = <[F32]>::ref_from_bytes(bytes)
        .map_err(|_| Error::UnexpectedEndOfInput { offset })?;

    Ok(samples.iter().map(|s| s.get()).collect())
}

/// Advance past the payload following a section header without decoding it.
pub fn skip(cursor: &mut Cursor, geometry: &Geometry) -> Result<(), Error> {
    let offset = cursor.offset();
    cursor.read_bytes(payload_len(offset, geometry)?)?;

    Ok(())
}

fn payload_len(offset: usize, geometry: &Geometry) -> Result<usize, Error> {
    geometry
        .payload_len()
        .ok_or(Error::format(offset, FormatError::PayloadOverflow))
}
