//! Document preamble and section headers.

use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::{fmt, ops::RangeInclusive, str::FromStr};

use tartan_bitfield::bitfield;

use super::{
    Error, FormatError,
    calibration::{Axis, Calibration, Record},
    cursor::Cursor,
    frame::{Geometry, SubImage},
    property::{DataType, Property, Value},
};

/// The first line of every document.
pub const SIGNATURE: &[u8] = b"Andor Technology Multi-Channel File";

/// Format versions this decoder understands.
pub const SUPPORTED_VERSIONS: RangeInclusive<u32> = 65538..=65567;

/// An acquisition source.
///
/// Sections appear in a document in the order of this enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Source {
    Signal,
    Background,
    Reference,
    Live,
}

impl Source {
    /// Every source, in document order.
    pub const ALL: [Source; 4] = [
        Source::Signal,
        Source::Background,
        Source::Reference,
        Source::Live,
    ];

    /// The vendor code for this source (`ATSIF_Signal` and so on).
    pub const fn code(self) -> u32 {
        match self {
            Source::Signal => 0x4000_0000,
            Source::Reference => 0x4000_0001,
            Source::Background => 0x4000_0002,
            Source::Live => 0x4000_0003,
        }
    }

    /// The name of this source as it appears in a section header.
    pub const fn name(self) -> &'static str {
        match self {
            Source::Signal => "Signal",
            Source::Background => "Background",
            Source::Reference => "Reference",
            Source::Live => "Live",
        }
    }

    /// Look up a source by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The file-level fields preceding the first section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    /// Format version.
    pub version: u32,
    /// Sources with a section in the document, in document order.
    pub sources: Vec<Source>,
}

/// Decode the signature line and preamble.
pub fn preamble(cursor: &mut Cursor) -> Result<Preamble, Error> {
    let offset = cursor.offset();
    if cursor.next_line()? != SIGNATURE {
        Err(Error::format(offset, FormatError::NotSif))?;
    }

    let [version, mask] = fields::<2>(&mut cursor.line()?, "preamble")?;

    let offset = version.offset;
    let version: u32 = number(version, "version")?;
    if !SUPPORTED_VERSIONS.contains(&version) {
        Err(Error::UnsupportedVersion { offset, version })?;
    }

    let bits: u32 = number(mask, "source mask")?;
    if bits == 0 || bits & !0b1111 != 0 {
        Err(Error::format(mask.offset, FormatError::InvalidSourceMask(bits)))?;
    }

    bitfield! {
        struct SourceMask(u32) {
            [0] signal,
            [1] background,
            [2] reference,
            [3] live,
        }
    }

    let mask = SourceMask(bits);
    let present = [mask.signal(), mask.background(), mask.reference(), mask.live()];

    let sources = Source::ALL
        .into_iter()
        .zip(present)
        .filter_map(|(source, present)| present.then_some(source))
        .collect();

    Ok(Preamble { version, sources })
}

/// A header line whose leading name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RawLine {
    /// Offset of the line in the document.
    pub offset: usize,
    /// The leading token of the line.
    pub name: String,
    /// The whole line, verbatim.
    pub text: String,
}

/// A decoded section header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// The source this section belongs to.
    pub source: Source,
    /// Recognized properties.
    pub properties: BTreeMap<Property, Value>,
    /// Offset of the line declaring each property.
    pub property_offsets: BTreeMap<Property, usize>,
    /// Unrecognized lines, in document order.
    pub raw: Vec<RawLine>,
    /// Payload shape.
    pub geometry: Geometry,
    /// Calibration records, one per axis at most.
    pub calibrations: Vec<Record>,
}

/// Decode a section header, through its terminating `Data` line.
///
/// The cursor is left at the first byte of the section's payload.
pub fn parse(cursor: &mut Cursor, source: Source) -> Result<Header, Error> {
    parse_source_line(cursor, source)?;

    let mut properties = BTreeMap::new();
    let mut property_offsets = BTreeMap::new();
    let mut raw = Vec::new();
    let mut frame: Option<(usize, usize, usize, usize)> = None;
    let mut sub_images = Vec::new();
    let mut calibrations: Vec<Record> = Vec::new();

    let data_offset = loop {
        let offset = cursor.offset();
        let mut line = cursor.line()?;
        let whole = line;

        let Some(keyword) = next_field(&mut line)? else {
            continue; // Blank line.
        };

        match keyword.text {
            "Data" => {
                let [] = fields::<0>(&mut line, "Data")?;
                break offset;
            }
            "Frame" => {
                let [pixels, frames, count] = fields::<3>(&mut line, "Frame")?;

                if frame.is_some() {
                    Err(Error::format(offset, FormatError::DuplicateRecord("Frame")))?;
                }

                frame = Some((
                    offset,
                    number(pixels, "pixels per frame")?,
                    number(frames, "frame count")?,
                    number(count, "sub-image count")?,
                ));
            }
            "SubImage" => {
                let [left, top, right, bottom, hbin, vbin] = fields::<6>(&mut line, "SubImage")?;

                sub_images.push(SubImage {
                    left: number(left, "sub-image left")?,
                    top: number(top, "sub-image top")?,
                    right: number(right, "sub-image right")?,
                    bottom: number(bottom, "sub-image bottom")?,
                    horizontal_bin: number(hbin, "horizontal binning")?,
                    vertical_bin: number(vbin, "vertical binning")?,
                });
            }
            "Calibration" => {
                let record = parse_calibration(cursor, &mut line, offset)?;

                if calibrations.iter().any(|r| r.axis == record.axis) {
                    Err(Error::format(offset, FormatError::DuplicateRecord("Calibration")))?;
                }

                calibrations.push(record);
            }
            name => match Property::from_name(name) {
                Some(property) => {
                    let value = parse_property(&mut line, property)?;

                    if properties.insert(property, value).is_some() {
                        Err(Error::format(offset, FormatError::DuplicateProperty(property)))?;
                    }
                    property_offsets.insert(property, offset);
                }
                None => {
                    log::trace!("retaining unrecognized header line '{name}' at byte {offset}");

                    raw.push(RawLine {
                        offset,
                        name: name.into(),
                        text: text(offset, whole.unread())?.into(),
                    });
                }
            },
        }
    };

    let Some((frame_offset, pixels_per_frame, frame_count, count)) = frame else {
        return Err(Error::format(data_offset, FormatError::MissingRecord("Frame")));
    };

    if sub_images.len() != count {
        Err(Error::format(
            frame_offset,
            FormatError::SubImageCount {
                expected: count,
                found: sub_images.len(),
            },
        ))?;
    }

    let geometry = Geometry {
        pixels_per_frame,
        frame_count,
        sub_images,
    };

    geometry
        .validate()
        .map_err(|reason| Error::format(frame_offset, reason))?;

    if !calibrations.iter().any(|r| r.axis == Axis::X) {
        Err(Error::format(data_offset, FormatError::MissingRecord("Calibration X")))?;
    }

    Ok(Header {
        source,
        properties,
        property_offsets,
        raw,
        geometry,
        calibrations,
    })
}

fn parse_source_line(cursor: &mut Cursor, source: Source) -> Result<(), Error> {
    let offset = cursor.offset();
    let mut line = cursor.line()?;
    let whole = line;

    let unexpected = |found: &str| {
        Error::format(
            offset,
            FormatError::UnexpectedSource {
                expected: source,
                found: found.into(),
            },
        )
    };

    match next_field(&mut line)? {
        Some(keyword) if keyword.text == "Source" => {
            let [name] = fields::<1>(&mut line, "Source")?;
            if name.text != source.name() {
                Err(unexpected(name.text))?;
            }
        }
        _ => Err(unexpected(text(offset, whole.unread())?))?,
    }

    Ok(())
}

fn parse_property(line: &mut Cursor, property: Property) -> Result<Value, Error> {
    let start = line.offset();
    let Some(code) = next_field(line)? else {
        return Err(Error::format(
            start,
            FormatError::FieldCount {
                record: property.name(),
                expected: 2,
                found: 0,
            },
        ));
    };

    let data_type = parse_code(code.text)
        .and_then(DataType::from_code)
        .ok_or_else(|| {
            Error::format(
                code.offset,
                FormatError::UnknownDataType {
                    property,
                    code: code.text.into(),
                },
            )
        })?;

    if data_type == DataType::String {
        line.skip_separator();
        let offset = line.offset();

        return Ok(Value::String(text(offset, line.rest())?.into()));
    }

    let [value] = fields::<1>(line, property.name())?;

    data_type.convert(value.text).ok_or_else(|| {
        Error::format(
            value.offset,
            FormatError::InvalidValue {
                property,
                data_type,
                text: value.text.into(),
            },
        )
    })
}

/// Parse a data type code, in decimal or `0x`-prefixed hexadecimal.
fn parse_code(text: &str) -> Option<u32> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn parse_calibration(cursor: &mut Cursor, line: &mut Cursor, offset: usize) -> Result<Record, Error> {
    let leading = [next_field(line)?, next_field(line)?, next_field(line)?];

    let [Some(axis), Some(kind), Some(count)] = leading else {
        return Err(Error::format(
            offset,
            FormatError::FieldCount {
                record: "Calibration",
                expected: 3,
                found: leading.iter().flatten().count(),
            },
        ));
    };

    let axis = Axis::from_name(axis.text).ok_or_else(|| {
        Error::format(axis.offset, FormatError::UnknownAxis(axis.text.into()))
    })?;

    let count: usize = number(count, "calibration length")?;
    let mut values = Vec::new();

    let calibration = match kind.text {
        "Polynomial" => {
            while let Some(field) = next_field(line)? {
                values.push(number(field, "calibration coefficient")?);
            }

            if values.len() != count {
                Err(Error::format(
                    offset,
                    FormatError::FieldCount {
                        record: "Calibration",
                        expected: count,
                        found: values.len(),
                    },
                ))?;
            }

            Calibration::Polynomial(values)
        }
        "Table" => {
            // Values fill the rest of the record's line, then continue on the
            // lines following it.
            while values.len() < count {
                let Some(field) = next_field(line)? else {
                    break;
                };
                values.push(number(field, "calibration value")?);
            }

            if values.len() < count {
                while values.len() < count {
                    let offset = {
                        cursor.skip_whitespace();
                        cursor.offset()
                    };
                    let field = Field {
                        offset,
                        text: text(offset, cursor.next_token()?)?,
                    };
                    values.push(number(field, "calibration value")?);
                }

                // Nothing may follow the last value on its line.
                let [] = fields::<0>(&mut cursor.line()?, "Calibration")?;
            } else {
                let mut found = count;
                while next_field(line)?.is_some() {
                    found += 1;
                }

                if found != count {
                    Err(Error::format(
                        offset,
                        FormatError::FieldCount {
                            record: "Calibration",
                            expected: count,
                            found,
                        },
                    ))?;
                }
            }

            Calibration::Table(values)
        }
        other => Err(Error::format(
            kind.offset,
            FormatError::UnknownCalibration(other.into()),
        ))?,
    };

    Ok(Record {
        axis,
        offset,
        calibration,
    })
}

/// A token within a header line.
#[derive(Debug, Clone, Copy, Default)]
struct Field<'a> {
    offset: usize,
    text: &'a str,
}

/// Take the next token from a line, if one remains.
fn next_field<'a>(line: &mut Cursor<'a>) -> Result<Option<Field<'a>>, Error> {
    line.skip_whitespace();
    if line.is_empty() {
        return Ok(None);
    }

    let offset = line.offset();
    let text = text(offset, line.next_token()?)?;

    Ok(Some(Field { offset, text }))
}

/// Take exactly `N` remaining tokens from a line.
fn fields<'a, const N: usize>(
    line: &mut Cursor<'a>,
    record: &'static str,
) -> Result<[Field<'a>; N], Error> {
    let start = line.offset();
    let mut out = [Field::default(); N];
    let mut found = 0;

    while let Some(field) = next_field(line)? {
        if let Some(slot) = out.get_mut(found) {
            *slot = field;
        }
        found += 1;
    }

    if found != N {
        Err(Error::format(
            start,
            FormatError::FieldCount {
                record,
                expected: N,
                found,
            },
        ))?;
    }

    Ok(out)
}

fn number<T: FromStr>(field: Field, name: &'static str) -> Result<T, Error> {
    field.text.parse().map_err(|_| {
        Error::format(
            field.offset,
            FormatError::InvalidNumber {
                field: name,
                text: field.text.into(),
            },
        )
    })
}

fn text(offset: usize, bytes: &[u8]) -> Result<&str, Error> {
    core::str::from_utf8(bytes).map_err(|_| Error::format(offset, FormatError::InvalidText))
}
