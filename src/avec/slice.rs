//! Slice-based decoder implementation.

use alloc::{collections::BTreeMap, vec::Vec};

use crate::sans::{
    Error, FormatError,
    calibration::{self, Axis},
    cursor::Cursor,
    frame,
    header::{self, Header},
    property::{DataType, Property},
};

use super::document::{Document, FrameSet};

/// How much of each section to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Decode headers and payloads.
    #[default]
    All,
    /// Decode headers, stepping over payloads.
    HeaderOnly,
}

impl ReadMode {
    /// The vendor code for this mode (`ATSIF_ReadAll` and so on).
    pub const fn code(self) -> u32 {
        match self {
            ReadMode::All => 0x4000_0000,
            ReadMode::HeaderOnly => 0x4000_0001,
        }
    }
}

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub mode: ReadMode,
}

impl Options {
    /// Options for decoding headers only.
    pub const fn header_only() -> Self {
        Self {
            mode: ReadMode::HeaderOnly,
        }
    }
}

/// Decode a document from a slice.
///
/// This method is also re-exported as `sifter::avec::decode_slice`.
pub fn decode(r: &[u8], options: Options) -> Result<Document, Error> {
    let cursor = &mut Cursor::new(r);

    let preamble = header::preamble(cursor)?;
    log::debug!(
        "decoding version {} document with sources {:?}",
        preamble.version,
        preamble.sources
    );

    // Type of every property, as first declared in the document.
    let mut declared = BTreeMap::new();
    let mut frame_sets = BTreeMap::new();

    for source in preamble.sources {
        let header = header::parse(cursor, source)?;
        check_types(&header, &mut declared)?;

        frame_sets.insert(source, decode_section(cursor, header, options)?);
    }

    if !cursor.is_empty() {
        Err(Error::format(
            cursor.offset(),
            FormatError::TrailingData(cursor.remaining()),
        ))?;
    }

    Ok(Document::new(preamble.version, frame_sets))
}

fn check_types(header: &Header, declared: &mut BTreeMap<Property, DataType>) -> Result<(), Error> {
    for (property, value) in &header.properties {
        let second = value.data_type();
        let first = *declared.entry(*property).or_insert(second);

        if first != second {
            let offset = header.property_offsets.get(property).copied().unwrap_or_default();
            let reason = FormatError::ConflictingDataType {
                property: *property,
                first,
                second,
            };

            Err(Error::format(offset, reason))?;
        }
    }

    Ok(())
}

fn decode_section(cursor: &mut Cursor, header: Header, options: Options) -> Result<FrameSet, Error> {
    let Header {
        source,
        properties,
        raw,
        geometry,
        calibrations,
        ..
    } = header;

    let pixel_count = geometry.pixels_per_frame;
    let data_offset = cursor.offset();

    // The payload is bounds-checked against the input before any per-pixel
    // allocation, so the declared geometry cannot outgrow the file.
    let data = match options.mode {
        ReadMode::All => frame::decode(cursor, &geometry)?,
        ReadMode::HeaderOnly => {
            frame::skip(cursor, &geometry)?;
            Vec::new()
        }
    };

    let mut axes = BTreeMap::new();
    for record in &calibrations {
        axes.insert(record.axis, calibration::resolve(record, pixel_count)?);
    }

    let axis_values = axes
        .remove(&Axis::X)
        .ok_or(Error::format(data_offset, FormatError::MissingRecord("Calibration X")))?;

    let wavelengths = calibration::wavelengths(&properties, &axis_values);

    log::debug!(
        "decoded {source} section: {} frames of {pixel_count} pixels, {} properties, {} raw lines",
        geometry.frame_count,
        properties.len(),
        raw.len(),
    );

    Ok(FrameSet::new(
        properties,
        raw,
        geometry,
        axis_values,
        axes,
        wavelengths,
        data,
    ))
}
