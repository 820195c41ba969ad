//! Data type codes, the property vocabulary, and typed property values.

use alloc::string::String;
use core::fmt;

macro_rules! data_types {
    ($($(#[$attr:meta])* $variant:ident = $code:literal, $name:literal, |$t:ident| $convert:expr;)*) => {
        /// A data type code declared alongside a property value.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub enum DataType {
            $($(#[$attr])* $variant,)*
        }

        impl DataType {
            /// Look up a data type by its code.
            ///
            /// Returns `None` for codes outside the recognized set. There is no
            /// fallback type.
            pub const fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// The code identifying this data type.
            pub const fn code(self) -> u32 {
                match self {
                    $(Self::$variant => $code,)*
                }
            }

            /// A short name for this data type.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Convert the text of a field to a value of this type.
            ///
            /// Returns `None` if the text is not a valid value of this type,
            /// including integers out of range for its width.
            pub fn convert(self, text: &str) -> Option<Value> {
                match self {
                    $(Self::$variant => {
                        let $t = text;
                        $convert
                    })*
                }
            }
        }
    };
}

data_types! {
    /// `ATSIF_AT_8`
    I8 = 0x4000_0000, "int8", |t| t.parse().ok().map(Value::I8);
    /// `ATSIF_AT_U8`
    U8 = 0x0000_0001, "uint8", |t| t.parse().ok().map(Value::U8);
    /// `ATSIF_AT_32`
    I32 = 0x4000_0002, "int32", |t| t.parse().ok().map(Value::I32);
    /// `ATSIF_AT_U32`
    U32 = 0x4000_0003, "uint32", |t| t.parse().ok().map(Value::U32);
    /// `ATSIF_AT_64`
    I64 = 0x4000_0004, "int64", |t| t.parse().ok().map(Value::I64);
    /// `ATSIF_AT_U64`
    U64 = 0x4000_0005, "uint64", |t| t.parse().ok().map(Value::U64);
    /// `ATSIF_Float`
    F32 = 0x4000_0006, "float", |t| t.parse().ok().map(Value::F32);
    /// `ATSIF_Double`
    F64 = 0x4000_0007, "double", |t| t.parse().ok().map(Value::F64);
    /// `ATSIF_String`
    String = 0x4000_0008, "string", |t| Some(Value::String(t.into()));
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A property value, tagged with its declared type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Value {
    I8(i8),
    U8(u8),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
}

impl Value {
    /// The type this value was declared with.
    pub const fn data_type(&self) -> DataType {
        match self {
            Value::I8(_) => DataType::I8,
            Value::U8(_) => DataType::U8,
            Value::I32(_) => DataType::I32,
            Value::U32(_) => DataType::U32,
            Value::I64(_) => DataType::I64,
            Value::U64(_) => DataType::U64,
            Value::F32(_) => DataType::F32,
            Value::F64(_) => DataType::F64,
            Value::String(_) => DataType::String,
        }
    }

    /// The text of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Any numeric value, widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::I8(v) => Some(v.into()),
            Value::U8(v) => Some(v.into()),
            Value::I32(v) => Some(v.into()),
            Value::U32(v) => Some(v.into()),
            Value::I64(v) => Some(v as f64),
            Value::U64(v) => Some(v as f64),
            Value::F32(v) => Some(v.into()),
            Value::F64(v) => Some(v),
            Value::String(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I8(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
        }
    }
}

/// Convert a property value to a Rust primitive.
///
/// Conversions are lossless: integers widen to larger integers of the same
/// signedness, and `f32` widens to `f64`. Anything else yields `None`.
pub trait FromValue: Sized {
    /// Convert a value, if its type allows.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! from_value {
    ($t:ty: $($variant:ident),+) => {
        impl FromValue for $t {
            fn from_value(value: &Value) -> Option<Self> {
                match *value {
                    $(Value::$variant(v) => Some(v.into()),)+
                    _ => None,
                }
            }
        }
    };
}

from_value!(i8: I8);
from_value!(u8: U8);
from_value!(i32: I8, I32);
from_value!(u32: U8, U32);
from_value!(i64: I8, I32, I64);
from_value!(u64: U8, U32, U64);
from_value!(f32: F32);
from_value!(f64: F32, F64);

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(String::from)
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

macro_rules! properties {
    ($($name:ident),* $(,)?) => {
        /// A property name from the closed vocabulary recognized in section
        /// headers.
        ///
        /// Names and spelling follow the vendor reader library exactly, since
        /// analysis scripts key on them.
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub enum Property {
            $($name,)*
        }

        impl Property {
            /// Every recognized property, in vocabulary order.
            pub const ALL: &'static [Property] = &[$(Property::$name,)*];

            /// The name of this property as it appears in a header.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Property::$name => stringify!($name),)*
                }
            }

            /// Look up a property by name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($name) => Some(Property::$name),)*
                    _ => None,
                }
            }
        }
    };
}

properties! {
    Type,
    Active,
    Version,
    Time,
    FormattedTime,
    FileName,
    Temperature,
    UnstabalizedTemperature,
    Head,
    HeadModel,
    StoreType,
    DataType,
    SIDisplacement,
    SINumberSubFrames,
    PixelReadOutTime,
    TrackHeight,
    ReadPattern,
    ReadPatternFullName,
    ShutterDelay,
    CentreRow,
    RowOffset,
    Operation,
    Mode,
    ModeFullName,
    TriggerSource,
    TriggerSourceFullName,
    TriggerLevel,
    ExposureTime,
    Delay,
    IntegrationCycleTime,
    NumberIntegrations,
    KineticCycleTime,
    FlipX,
    FlipY,
    Clock,
    AClock,
    IOC,
    Frequency,
    NumberPulses,
    FrameTransferAcquisitionMode,
    BaselineClamp,
    PreScan,
    EMRealGain,
    BaselineOffset,
    SWVersion,
    SWVersionEx,
    MCP,
    Gain,
    VerticalClockAmp,
    VerticalShiftSpeed,
    OutputAmplifier,
    PreAmplifierGain,
    Serial,
    DetectorFormatX,
    DetectorFormatZ,
    NumberImages,
    NumberSubImages,
    SubImageHBin,
    SubImageVBin,
    SubImageLeft,
    SubImageRight,
    SubImageTop,
    SubImageBottom,
    Baseline,
    CCDLeft,
    CCDRight,
    CCDTop,
    CCDBottom,
    Sensitivity,
    DetectionWavelength,
    CountConvertMode,
    IsCountConvert,
    XAxisType,
    XAxisUnit,
    YAxisType,
    YAxisUnit,
    ZAxisType,
    ZAxisUnit,
    UserText,
    IsPhotonCountingEnabled,
    NumberThresholds,
    Threshold1,
    Threshold2,
    Threshold3,
    Threshold4,
    AveragingFilterMode,
    AveragingFactor,
    FrameCount,
    NoiseFilter,
    Threshold,
    TimeStamp,
    OutputAEnabled,
    OutputAWidth,
    OutputADelay,
    OutputAPolarity,
    OutputBEnabled,
    OutputBWidth,
    OutputBDelay,
    OutputBPolarity,
    OutputCEnabled,
    OutputCWidth,
    OutputCDelay,
    OutputCPolarity,
    GateMode,
    GateWidth,
    GateDelay,
    GateDelayStep,
    GateWidthStep,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
