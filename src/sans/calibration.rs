//! Axis calibration records and their resolution to per-pixel values.

use alloc::{collections::BTreeMap, vec::Vec};
use core::fmt;

use super::{
    Error, FormatError,
    property::{Property, Value},
};

/// The most coefficients a polynomial calibration may declare (a cubic).
pub const MAX_COEFFICIENTS: usize = 4;

/// A calibrated axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Every axis, in order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The vendor code for this axis (`ATSIF_CalibX` and so on).
    pub const fn code(self) -> u32 {
        match self {
            Axis::X => 0x4000_0000,
            Axis::Y => 0x4000_0001,
            Axis::Z => 0x4000_0002,
        }
    }

    /// The name of this axis as it appears in a calibration record.
    pub const fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    /// Look up an axis by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// The property holding the unit of this axis.
    pub const fn unit_property(self) -> Property {
        match self {
            Axis::X => Property::XAxisUnit,
            Axis::Y => Property::YAxisUnit,
            Axis::Z => Property::ZAxisUnit,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mapping from pixel numbers to axis values.
#[derive(Debug, Clone, PartialEq)]
pub enum Calibration {
    /// Polynomial coefficients, lowest order first, evaluated at 1-based
    /// pixel numbers.
    Polynomial(Vec<f64>),
    /// One value per pixel.
    Table(Vec<f64>),
}

/// A calibration record read from a section header.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The axis calibrated.
    pub axis: Axis,
    /// Offset of the record's line, for error reporting.
    pub offset: usize,
    /// The calibration declared.
    pub calibration: Calibration,
}

/// Resolve a calibration record to one axis value per pixel.
///
/// Polynomials are evaluated at pixel numbers `1..=pixel_count`. Tables must
/// hold exactly `pixel_count` values.
pub fn resolve(record: &Record, pixel_count: usize) -> Result<Vec<f64>, Error> {
    let Record {
        axis,
        offset,
        calibration,
    } = record;

    match calibration {
        Calibration::Polynomial(c) => {
            if c.is_empty() || c.len() > MAX_COEFFICIENTS {
                Err(Error::format(
                    *offset,
                    FormatError::CoefficientCount {
                        axis: *axis,
                        count: c.len(),
                        max: MAX_COEFFICIENTS,
                    },
                ))?;
            }

            Ok((1..=pixel_count).map(|p| evaluate(c, p as f64)).collect())
        }
        Calibration::Table(values) => {
            if values.len() != pixel_count {
                Err(Error::format(
                    *offset,
                    FormatError::TableLength {
                        axis: *axis,
                        expected: pixel_count,
                        found: values.len(),
                    },
                ))?;
            }

            Ok(values.clone())
        }
    }
}

/// Evaluate a polynomial by Horner's rule.
fn evaluate(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, k| acc * x + k)
}

/// Derive wavelengths in metres from X axis values, if the X axis unit is
/// nanometres.
///
/// Returns `None` when the unit is absent, not a string, or anything other
/// than `nm` once surrounding whitespace is trimmed.
pub fn wavelengths(properties: &BTreeMap<Property, Value>, axis_values: &[f64]) -> Option<Vec<f64>> {
    let unit = properties.get(&Property::XAxisUnit)?.as_str()?;

    (unit.trim() == "nm").then(|| axis_values.iter().map(|v| v * 1e-9).collect())
}
