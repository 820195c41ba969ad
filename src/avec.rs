//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module decode a whole document into a [`Document`],
//! holding one [`FrameSet`] per acquisition source present in the file.
//!
//! To pull properties of a known shape into your own types, implement (or
//! derive) the [`FromFrameSets`] and [`FromProperties`] traits and call
//! [`Document::extract`].

pub mod document;
#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

pub use document::{DataNotPresent, Document, FrameSet};
#[cfg(feature = "std")]
pub use reader::{decode as decode_reader, decode_file};
pub use slice::{Options, ReadMode, decode as decode_slice};

pub use crate::sans::{
    calibration::Axis,
    header::Source,
    property::{DataType, FromValue, Property, Value},
};

/// Derive [`FromFrameSets`] for a struct holding the sections of a document.
///
/// _Requires Cargo feature `derive`._
///
/// # Example
///
/// To collect a source, add the `source(S)` attribute to an `Option<T>` struct
/// field, where `S` is a [`Source`] variant and `T` is a type implementing
/// [`FromProperties`] and [`Default`].
///
/// ```
/// #[derive(Debug, Default, FromFrameSets)]
/// struct Measurement {
///     #[source(Signal)]
///     signal: Option<Settings>,
///     #[source(Background)]
///     background: Option<Settings>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use sifter_derive::FromFrameSets;

/// Produce property receivers for a document.
///
/// See the [`FromFrameSets`](macro@FromFrameSets) derive macro for an automatic
/// implementation of this trait.
pub trait FromFrameSets {
    /// Retrieve a receiver for a source's frame set, if one exists.
    fn add_frame_set(&mut self, source: Source) -> Option<&mut dyn FromProperties>;
}

/// Derive [`FromProperties`] for a struct representing a frame set's settings.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// To receive a property, add the `property(P)` attribute to an `Option<T>`
/// struct field, where `P` is a [`Property`] variant and `T` implements
/// [`FromValue`]. Values whose declared type does not convert to `T` are
/// skipped.
///
/// ```
/// #[derive(Debug, Default, FromProperties)]
/// struct Settings {
///     #[property(ExposureTime)]
///     exposure_time: Option<f64>,
///     #[property(Temperature)]
///     temperature: Option<f32>,
///     #[property(XAxisUnit)]
///     x_axis_unit: Option<String>,
/// }
/// ```
///
/// To receive into arbitrary types, supply an accumulator closure. Since the
/// value type cannot be inferred, the second argument must be typed.
///
/// ```
/// #[derive(Debug, Default, FromProperties)]
/// struct Gate {
///     #[property(GateWidth, |w, v: f64| *w = Some(v * 1e-9))]
///     width_seconds: Option<f64>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use sifter_derive::FromProperties;

/// Receive the header contents of a frame set.
///
/// The default implementation of each method ignores received values.
///
/// See the [`FromProperties`](macro@FromProperties) derive macro for an
/// automatic implementation of this trait.
#[allow(unused_variables)]
pub trait FromProperties {
    /// Add a recognized property.
    fn add_property(&mut self, property: Property, value: &Value) {}
    /// Add an unrecognized header line, by its leading name.
    fn add_raw(&mut self, name: &str, text: &str) {}
}
