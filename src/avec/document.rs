//! The decoded document model.

use alloc::{collections::BTreeMap, string::String, vec::Vec};

use either::Either::{self, Left, Right};
use thiserror::Error;

use crate::sans::{
    calibration::Axis,
    frame::Geometry,
    header::{RawLine, Source},
    property::{DataType, Property, Value},
};

use super::{FromFrameSets, FromProperties};

/// Vendor status code reported when a source is absent.
pub const STATUS_DATA_NOT_PRESENT: u32 = 22007;

/// A requested source has no section in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No {0} data present.")]
pub struct DataNotPresent(pub Source);

impl DataNotPresent {
    /// The equivalent vendor status code.
    pub const fn status(&self) -> u32 {
        STATUS_DATA_NOT_PRESENT
    }
}

/// A decoded SIF document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document {
    file_name: Option<String>,
    version: u32,
    frame_sets: BTreeMap<Source, FrameSet>,
}

impl Document {
    pub(crate) fn new(version: u32, frame_sets: BTreeMap<Source, FrameSet>) -> Self {
        Self {
            file_name: None,
            version,
            frame_sets,
        }
    }

    pub(crate) fn with_file_name(self, file_name: impl Into<String>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            ..self
        }
    }

    /// Decode a document held in memory, reading everything.
    pub fn decode(r: &[u8]) -> Result<Self, crate::sans::Error> {
        super::slice::decode(r, Default::default())
    }

    /// The name of the file this document was decoded from, if known.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// The declared format version.
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// The frame set for a source, if present.
    pub fn get(&self, source: Source) -> Option<&FrameSet> {
        self.frame_sets.get(&source)
    }

    /// The frame set for a source, failing if absent.
    pub fn require(&self, source: Source) -> Result<&FrameSet, DataNotPresent> {
        self.get(source).ok_or(DataNotPresent(source))
    }

    /// The signal frame set, if present.
    pub fn signal(&self) -> Option<&FrameSet> {
        self.get(Source::Signal)
    }

    /// The background frame set, if present.
    pub fn background(&self) -> Option<&FrameSet> {
        self.get(Source::Background)
    }

    /// Every frame set, in document order.
    pub fn frame_sets(&self) -> impl Iterator<Item = (Source, &FrameSet)> {
        self.frame_sets.iter().map(|(s, f)| (*s, f))
    }

    /// The sources present, in document order.
    pub fn sources(&self) -> impl Iterator<Item = Source> + '_ {
        self.frame_sets.keys().copied()
    }

    /// Publish every frame set to a receiver built from its default.
    pub fn extract<T: FromFrameSets + Default>(&self) -> T {
        let mut o = T::default();

        for (source, frame_set) in &self.frame_sets {
            if let Some(o) = o.add_frame_set(*source) {
                frame_set.publish(o);
            }
        }

        o
    }
}

/// The header, calibration and payload of one acquisition source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrameSet {
    properties: BTreeMap<Property, Value>,
    raw: Vec<RawLine>,
    geometry: Geometry,
    axis_values: Vec<f64>,
    other_axes: BTreeMap<Axis, Vec<f64>>,
    wavelengths: Option<Vec<f64>>,
    data: Vec<f32>,
}

impl FrameSet {
    pub(crate) fn new(
        properties: BTreeMap<Property, Value>,
        raw: Vec<RawLine>,
        geometry: Geometry,
        axis_values: Vec<f64>,
        other_axes: BTreeMap<Axis, Vec<f64>>,
        wavelengths: Option<Vec<f64>>,
        data: Vec<f32>,
    ) -> Self {
        Self {
            properties,
            raw,
            geometry,
            axis_values,
            other_axes,
            wavelengths,
            data,
        }
    }

    /// Every recognized property.
    pub fn properties(&self) -> &BTreeMap<Property, Value> {
        &self.properties
    }

    /// A recognized property's value.
    pub fn property(&self, property: Property) -> Option<&Value> {
        self.properties.get(&property)
    }

    /// A recognized property's declared type.
    pub fn property_type(&self, property: Property) -> Option<DataType> {
        self.property(property).map(Value::data_type)
    }

    /// Look up a header entry by name.
    ///
    /// Recognized names give their typed value. Otherwise, the text of the
    /// first unrecognized line with that name is given.
    pub fn get(&self, name: &str) -> Option<Either<&Value, &str>> {
        match Property::from_name(name) {
            Some(property) => self.property(property).map(Left),
            None => self
                .raw
                .iter()
                .find(|r| r.name == name)
                .map(|r| Right(r.text.as_str())),
        }
    }

    /// Unrecognized header lines, in document order.
    pub fn raw(&self) -> &[RawLine] {
        &self.raw
    }

    /// The declared payload shape.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Samples in each frame.
    pub fn pixel_count(&self) -> usize {
        self.geometry.pixels_per_frame
    }

    /// Frames in the payload.
    pub fn frame_count(&self) -> usize {
        self.geometry.frame_count
    }

    /// The X axis value of each pixel.
    pub fn axis_values(&self) -> &[f64] {
        &self.axis_values
    }

    /// The values of each pixel along an axis, if that axis is calibrated.
    pub fn axis(&self, axis: Axis) -> Option<&[f64]> {
        match axis {
            Axis::X => Some(&self.axis_values),
            _ => self.other_axes.get(&axis).map(Vec::as_slice),
        }
    }

    /// The value along an axis of a 1-based pixel number.
    pub fn pixel_calibration(&self, axis: Axis, pixel: usize) -> Option<f64> {
        self.axis(axis)?.get(pixel.checked_sub(1)?).copied()
    }

    /// The wavelength of each pixel in metres, if the X axis is in nanometres.
    pub fn wavelengths(&self) -> Option<&[f64]> {
        self.wavelengths.as_deref()
    }

    /// Every sample, frame after frame.
    ///
    /// Empty when the document was decoded with [`ReadMode::HeaderOnly`](super::ReadMode::HeaderOnly).
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Whether the payload was decoded.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    /// The samples of a frame, by 0-based index.
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        self.frames().nth(index)
    }

    /// Every frame, in order.
    pub fn frames(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.pixel_count())
    }

    /// Publish the header to a receiver.
    pub fn publish<O: FromProperties + ?Sized>(&self, o: &mut O) {
        for (property, value) in &self.properties {
            o.add_property(*property, value);
        }

        for line in &self.raw {
            o.add_raw(&line.name, &line.text);
        }
    }

    /// Publish the header to a receiver built from its default.
    pub fn extract<T: FromProperties + Default>(&self) -> T {
        let mut o = T::default();
        self.publish(&mut o);

        o
    }
}
