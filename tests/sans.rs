use std::collections::BTreeMap;

use sifter::sans::{
    Error, FormatError,
    calibration::{self, Axis, Calibration, Record},
    cursor::Cursor,
    frame::{self, Geometry, SubImage},
    header::{self, Source},
    property::{DataType, FromValue, Property, Value},
};

#[test]
fn cursor_lines_and_tokens() {
    let r = b"alpha beta\r\n\n  gamma\ttail\nlast";
    let mut cursor = Cursor::new(r);

    assert_eq!(cursor.next_line().unwrap(), b"alpha beta");
    assert_eq!(cursor.offset(), 12);
    assert_eq!(cursor.next_line().unwrap(), b"");

    let mut line = cursor.line().unwrap();
    assert_eq!(line.offset(), 13);
    assert_eq!(line.next_token().unwrap(), b"gamma");
    assert_eq!(line.offset(), 20);
    line.skip_separator();
    assert_eq!(line.rest(), b"tail");
    assert!(line.is_empty());
    assert_eq!(line.next_token(), Err(Error::UnexpectedEndOfInput { offset: 25 }));

    assert_eq!(cursor.next_line().unwrap(), b"last");
    assert!(cursor.is_empty());
    assert_eq!(cursor.line(), Err(Error::UnexpectedEndOfInput { offset: r.len() }));
}

#[test]
fn cursor_tokens_span_lines() {
    let mut cursor = Cursor::new(b"1 2\n 3\n\n4");

    let tokens: Vec<_> = (0..4).map(|_| cursor.next_token().unwrap()).collect();
    assert_eq!(tokens, [b"1", b"2", b"3", b"4"]);
    assert!(cursor.next_token().is_err());
}

#[test]
fn cursor_bytes() {
    let mut cursor = Cursor::new(&[1, 2, 3, 4, 5]);

    let saved = cursor;
    assert_eq!(cursor.read_bytes(2).unwrap(), &[1, 2]);
    assert_eq!(cursor.remaining(), 3);
    assert_eq!(cursor.unread(), &[3, 4, 5]);
    assert_eq!(cursor.read_bytes(4), Err(Error::UnexpectedEndOfInput { offset: 2 }));
    assert_eq!(cursor.read_bytes(usize::MAX), Err(Error::UnexpectedEndOfInput { offset: 2 }));
    assert_eq!(cursor.read_bytes(3).unwrap(), &[3, 4, 5]);
    assert!(cursor.is_empty());

    // Copies resume from where they were taken.
    assert_eq!(saved.offset(), 0);
}

#[test]
fn data_type_codes() {
    let cases = [
        (0x4000_0000, DataType::I8, "-5", Value::I8(-5)),
        (0x0000_0001, DataType::U8, "255", Value::U8(255)),
        (0x4000_0002, DataType::I32, "-70000", Value::I32(-70000)),
        (0x4000_0003, DataType::U32, "4000000000", Value::U32(4_000_000_000)),
        (0x4000_0004, DataType::I64, "-5000000000", Value::I64(-5_000_000_000)),
        (0x4000_0005, DataType::U64, "18446744073709551615", Value::U64(u64::MAX)),
        (0x4000_0006, DataType::F32, "0.25", Value::F32(0.25)),
        (0x4000_0007, DataType::F64, "1e-3", Value::F64(1e-3)),
        (0x4000_0008, DataType::String, "any text", Value::String("any text".into())),
    ];

    for (code, data_type, text, value) in cases {
        assert_eq!(DataType::from_code(code), Some(data_type));
        assert_eq!(data_type.code(), code);
        assert_eq!(data_type.convert(text), Some(value.clone()));
        assert_eq!(value.data_type(), data_type);
    }

    assert_eq!(DataType::from_code(0x4000_0009), None);
    assert_eq!(DataType::from_code(0), None);
    assert_eq!(DataType::from_code(2), None);

    assert_eq!(DataType::I8.convert("128"), None);
    assert_eq!(DataType::U32.convert("-1"), None);
    assert_eq!(DataType::F32.convert("fast"), None);
}

#[test]
fn value_conversions() {
    assert_eq!(i64::from_value(&Value::I8(-3)), Some(-3));
    assert_eq!(u64::from_value(&Value::U32(7)), Some(7));
    assert_eq!(f64::from_value(&Value::F32(0.5)), Some(0.5));
    assert_eq!(f32::from_value(&Value::F64(0.5)), None);
    assert_eq!(u32::from_value(&Value::I32(1)), None);
    assert_eq!(String::from_value(&Value::String("nm".into())), Some("nm".into()));
    assert_eq!(String::from_value(&Value::U8(1)), None);

    assert_eq!(Value::U64(3).as_f64(), Some(3.0));
    assert_eq!(Value::String("3".into()).as_f64(), None);
    assert_eq!(Value::String("nm".into()).as_str(), Some("nm"));
    assert_eq!(Value::F64(2.5).to_string(), "2.5");
}

#[test]
fn property_vocabulary() {
    assert_eq!(Property::ALL.len(), 108);
    assert_eq!(Property::ALL.first(), Some(&Property::Type));
    assert_eq!(Property::ALL.last(), Some(&Property::GateWidthStep));

    for property in Property::ALL {
        assert_eq!(Property::from_name(property.name()), Some(*property));
    }

    assert_eq!(
        Property::from_name("UnstabalizedTemperature"),
        Some(Property::UnstabalizedTemperature)
    );
    assert_eq!(Property::from_name("UnstabilizedTemperature"), None);
    assert_eq!(Property::from_name("exposuretime"), None);
}

#[test]
fn source_and_axis_codes() {
    assert_eq!(Source::Signal.code(), 0x4000_0000);
    assert_eq!(Source::Reference.code(), 0x4000_0001);
    assert_eq!(Source::Background.code(), 0x4000_0002);
    assert_eq!(Source::Live.code(), 0x4000_0003);
    assert_eq!(Source::from_name("Live"), Some(Source::Live));
    assert_eq!(Source::from_name("live"), None);

    assert_eq!(Axis::Z.code(), 0x4000_0002);
    assert_eq!(Axis::Y.unit_property(), Property::YAxisUnit);
    assert_eq!(Axis::from_name("X"), Some(Axis::X));
}

#[test]
fn preamble() {
    let r = b"Andor Technology Multi-Channel File\n65540 5\nSource Signal\n";
    let cursor = &mut Cursor::new(r);

    let preamble = header::preamble(cursor).unwrap();
    assert_eq!(preamble.version, 65540);
    assert_eq!(preamble.sources, [Source::Signal, Source::Reference]);
    assert_eq!(cursor.offset(), 44);
}

#[test]
fn section_header() {
    let r = b"Source Background\n\
        ExposureTime 0x40000006 0.1\n\
        Frame 3 2 1\n\
        SubImage 1 1 3 1 1 1\n\
        Calibration X Polynomial 1 5\n\
        Calibration Z Table 3 9 8 7\n\
        Comment left as is\n\
        Data\n\
        rest";
    let cursor = &mut Cursor::new(r);

    let header = header::parse(cursor, Source::Background).unwrap();

    assert_eq!(header.source, Source::Background);
    assert_eq!(header.properties[&Property::ExposureTime], Value::F32(0.1));
    assert_eq!(header.property_offsets[&Property::ExposureTime], 18);
    assert_eq!(header.geometry.pixels_per_frame, 3);
    assert_eq!(header.geometry.frame_count, 2);
    assert_eq!(header.geometry.payload_len(), Some(24));
    assert_eq!(header.calibrations.len(), 2);
    assert_eq!(header.calibrations[1].axis, Axis::Z);
    assert_eq!(header.calibrations[1].calibration, Calibration::Table(vec![9.0, 8.0, 7.0]));
    assert_eq!(header.raw.len(), 1);
    assert_eq!(header.raw[0].text, "Comment left as is");
    assert_eq!(cursor.unread(), b"rest");

    let cursor = &mut Cursor::new(r);
    let err = header::parse(cursor, Source::Signal).unwrap_err();
    assert_eq!(err.offset(), 0);
}

#[test]
fn resolve_calibrations() {
    let record = |calibration| Record {
        axis: Axis::X,
        offset: 42,
        calibration,
    };

    let linear = record(Calibration::Polynomial(vec![10.0, 2.0]));
    assert_eq!(calibration::resolve(&linear, 3).unwrap(), [12.0, 14.0, 16.0]);

    let cubic = record(Calibration::Polynomial(vec![1.0, 0.0, 0.0, 1.0]));
    assert_eq!(calibration::resolve(&cubic, 3).unwrap(), [2.0, 9.0, 28.0]);

    let quartic = record(Calibration::Polynomial(vec![1.0; 5]));
    assert_eq!(
        calibration::resolve(&quartic, 3),
        Err(Error::Format {
            offset: 42,
            reason: FormatError::CoefficientCount {
                axis: Axis::X,
                count: 5,
                max: calibration::MAX_COEFFICIENTS
            }
        })
    );

    let table = record(Calibration::Table(vec![3.0, 1.0]));
    assert_eq!(calibration::resolve(&table, 2).unwrap(), [3.0, 1.0]);
    assert!(calibration::resolve(&table, 3).is_err());
}

#[test]
fn derive_wavelengths() {
    let axis = [500.0, 600.0];
    let mut properties = BTreeMap::new();

    assert_eq!(calibration::wavelengths(&properties, &axis), None);

    properties.insert(Property::XAxisUnit, Value::String("nm\t".into()));
    assert_eq!(
        calibration::wavelengths(&properties, &axis),
        Some(vec![500.0 * 1e-9, 600.0 * 1e-9])
    );

    properties.insert(Property::XAxisUnit, Value::String("NM".into()));
    assert_eq!(calibration::wavelengths(&properties, &axis), None);

    properties.insert(Property::XAxisUnit, Value::U8(1));
    assert_eq!(calibration::wavelengths(&properties, &axis), None);
}

#[test]
fn decode_payload() {
    let geometry = Geometry {
        pixels_per_frame: 2,
        frame_count: 1,
        sub_images: vec![SubImage {
            left: 1,
            top: 1,
            right: 2,
            bottom: 1,
            horizontal_bin: 1,
            vertical_bin: 1,
        }],
    };
    geometry.validate().unwrap();

    let mut r = Vec::new();
    r.extend_from_slice(&1.5f32.to_le_bytes());
    r.extend_from_slice(&(-2.0f32).to_le_bytes());
    r.push(0xaa);

    let cursor = &mut Cursor::new(&r);
    assert_eq!(frame::decode(cursor, &geometry).unwrap(), [1.5, -2.0]);
    assert_eq!(cursor.remaining(), 1);

    let cursor = &mut Cursor::new(&r);
    frame::skip(cursor, &geometry).unwrap();
    assert_eq!(cursor.offset(), 8);

    let cursor = &mut Cursor::new(&r[..7]);
    assert_eq!(
        frame::decode(cursor, &geometry),
        Err(Error::UnexpectedEndOfInput { offset: 0 })
    );

    let huge = Geometry {
        pixels_per_frame: usize::MAX,
        frame_count: 2,
        sub_images: vec![],
    };
    assert_eq!(huge.sample_count(), None);
    assert_eq!(
        frame::decode(&mut Cursor::new(&r), &huge),
        Err(Error::Format {
            offset: 0,
            reason: FormatError::PayloadOverflow
        })
    );
}
