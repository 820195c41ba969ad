//! Internal decoding stages for implementing decoders.
//!
//! This module is intended for advanced applications that need fine control
//! over decoder internals. See [`crate::avec`] for a decoder producing a
//! complete document.
//!
//! # Architecture
//!
//! A SIF document is a text preamble followed by one section per acquisition
//! source. Each section is a line-oriented text header, terminated by a `Data`
//! line, followed by a binary payload of little-endian `f32` samples. Decoding
//! runs strictly forward through the stages below, each consuming from a
//! shared [`cursor::Cursor`]:
//!
//! 1. [`header::preamble`] reads the file signature, format version and the
//!    set of sources present.
//! 2. [`header::parse`] reads one section header into typed properties, raw
//!    unrecognized lines, frame geometry and calibration records.
//! 3. [`calibration::resolve`] turns each calibration record into per-pixel
//!    axis values.
//! 4. [`frame::decode`] reads the payload whose size the geometry declares.
//!
//! Every stage fails with the same [`Error`], carrying the byte offset at which
//! decoding stopped. No stage holds state between calls.

pub mod calibration;
pub mod cursor;
pub mod frame;
pub mod header;
pub mod property;

use alloc::string::String;

use thiserror::Error;

use calibration::Axis;
use header::Source;
use property::{DataType, Property};

/// Vendor status code reported for any malformed document.
pub const STATUS_FORMAT_ERROR: u32 = 22003;

/// An error decoding a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The document ended before a required field or block.
    #[error("Unexpectedly reached the end of the input at byte {offset}.")]
    UnexpectedEndOfInput { offset: usize },
    /// A line, record or field violates the format.
    #[error("Malformed data at byte {offset}: {reason}.")]
    Format { offset: usize, reason: FormatError },
    /// The document declares a format version outside the recognized range.
    #[error("Unsupported format version ({version}) at byte {offset}.")]
    UnsupportedVersion { offset: usize, version: u32 },
}

impl Error {
    pub(crate) const fn format(offset: usize, reason: FormatError) -> Self {
        Self::Format { offset, reason }
    }

    /// The byte offset at which decoding stopped.
    pub const fn offset(&self) -> usize {
        match *self {
            Error::UnexpectedEndOfInput { offset }
            | Error::Format { offset, .. }
            | Error::UnsupportedVersion { offset, .. } => offset,
        }
    }

    /// The equivalent vendor status code.
    pub const fn status(&self) -> u32 {
        STATUS_FORMAT_ERROR
    }
}

/// The cause of an [`Error::Format`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Missing file signature.
    #[error("missing file signature")]
    NotSif,
    /// Header text is not valid UTF-8.
    #[error("header text is not valid UTF-8")]
    InvalidText,
    /// A record has the wrong number of fields.
    #[error("{record} expects {expected} fields, found {found}")]
    FieldCount {
        record: &'static str,
        expected: usize,
        found: usize,
    },
    /// A structural field is not a valid number.
    #[error("{field} is not a valid number ('{text}')")]
    InvalidNumber { field: &'static str, text: String },
    /// A property declares an unrecognized data type code.
    #[error("unknown data type code '{code}' for {property}")]
    UnknownDataType { property: Property, code: String },
    /// A property value does not convert to its declared type.
    #[error("{property} is not a valid {data_type} ('{text}')")]
    InvalidValue {
        property: Property,
        data_type: DataType,
        text: String,
    },
    /// A property is declared with two different types in one document.
    #[error("{property} declared as {first} and as {second}")]
    ConflictingDataType {
        property: Property,
        first: DataType,
        second: DataType,
    },
    /// A property is declared twice in one section.
    #[error("{0} declared more than once")]
    DuplicateProperty(Property),
    /// The preamble declares no sources, or unknown ones.
    #[error("source mask {0:#x} is invalid")]
    InvalidSourceMask(u32),
    /// A section begins with the wrong source.
    #[error("expected {expected} section, found '{found}'")]
    UnexpectedSource { expected: Source, found: String },
    /// A record that may appear once appears again.
    #[error("{0} record declared more than once")]
    DuplicateRecord(&'static str),
    /// A required record is missing from a section header.
    #[error("missing {0} record")]
    MissingRecord(&'static str),
    /// The number of sub-image records differs from the frame record.
    #[error("expected {expected} sub-images, found {found}")]
    SubImageCount { expected: usize, found: usize },
    /// A sub-image has impossible bounds or binning.
    #[error("invalid sub-image ({0})")]
    InvalidSubImage(&'static str),
    /// The frame size differs from the area its sub-images cover.
    #[error("frame declares {declared} pixels but sub-images cover {computed}")]
    PixelCountMismatch { declared: usize, computed: usize },
    /// The frame holds no pixels, or there are no frames.
    #[error("frame geometry is empty")]
    EmptyFrame,
    /// The payload size does not fit in memory.
    #[error("payload size overflows")]
    PayloadOverflow,
    /// A calibration record names an unknown axis.
    #[error("unknown calibration axis '{0}'")]
    UnknownAxis(String),
    /// A calibration record has an unknown kind.
    #[error("unknown calibration kind '{0}'")]
    UnknownCalibration(String),
    /// A polynomial calibration has too many, or no, coefficients.
    #[error("{axis} calibration has {count} coefficients (expected 1 to {max})")]
    CoefficientCount { axis: Axis, count: usize, max: usize },
    /// A calibration table does not cover every pixel.
    #[error("{axis} calibration table has {found} values for {expected} pixels")]
    TableLength {
        axis: Axis,
        expected: usize,
        found: usize,
    },
    /// Bytes remain after the last section.
    #[error("{0} trailing bytes after the last section")]
    TrailingData(usize),
}
