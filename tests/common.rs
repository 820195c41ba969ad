#![cfg(feature = "std")]

use std::path::Path;

use csv::ReaderBuilder;
use sifter::avec::{Document, Options, Property, Source};

#[test]
fn decode_slice_led_spectrum() {
    const PATH: &str = "fixtures/led-spectrum.sif";
    let data = std::fs::read(PATH).unwrap();
    let document = sifter::avec::decode_slice(&data, Options::default()).unwrap();
    Validator::new(PATH).validate(&document, true);
}

#[test]
fn decode_reader_led_spectrum() {
    const PATH: &str = "fixtures/led-spectrum.sif";
    let mut file = std::fs::File::open(PATH).unwrap();
    let document = sifter::avec::decode_reader(&mut file, Options::default()).unwrap();
    Validator::new(PATH).validate(&document, true);
}

#[test]
fn decode_file_led_spectrum() {
    const PATH: &str = "fixtures/led-spectrum.sif";
    let document = sifter::avec::decode_file(PATH, Options::default()).unwrap();
    assert_eq!(document.file_name(), Some("led-spectrum.sif"));
    Validator::new(PATH).validate(&document, true);
}

#[test]
fn decode_file_led_spectrum_header_only() {
    const PATH: &str = "fixtures/led-spectrum.sif";
    let document = sifter::avec::decode_file(PATH, Options::header_only()).unwrap();
    Validator::new(PATH).validate(&document, false);
}

struct Validator(Vec<Vec<String>>);

impl Validator {
    fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().with_extension("csv");

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .unwrap();

        let expected = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        Self(expected)
    }

    fn validate(self, document: &Document, with_data: bool) {
        assert_eq!(document.version(), 65567);
        assert_eq!(
            document.sources().collect::<Vec<_>>(),
            [Source::Signal, Source::Background]
        );

        let signal = document.signal().unwrap();
        let background = document.background().unwrap();

        assert_eq!(signal.pixel_count(), 128);
        assert_eq!(signal.frame_count(), 3);
        assert_eq!(background.frame_count(), 1);

        let mut properties = [0, 0];
        let mut raw = 0;
        let mut pixels = 0;

        for row in self.0 {
            match row[0].as_str() {
                "property" => {
                    let source = Source::from_name(&row[1]).unwrap();
                    let property = Property::from_name(&row[2]).unwrap();
                    let value = document.get(source).unwrap().property(property).unwrap();

                    assert_eq!(value.data_type().name(), row[3], "{property}");
                    assert_eq!(value.to_string(), row[4], "{property}");

                    properties[(source == Source::Background) as usize] += 1;
                }
                "raw" => {
                    assert_eq!(signal.raw()[raw].text, row[2]);
                    raw += 1;
                }
                "pixel" => {
                    let pixel: usize = row[1].parse().unwrap();
                    let i = pixel - 1;

                    let x: f64 = row[2].parse().unwrap();
                    assert_eq!(signal.axis_values()[i], x, "pixel {pixel}");
                    assert_eq!(background.pixel_calibration(sifter::avec::Axis::X, pixel), Some(x));

                    let wavelength: f64 = row[3].parse().unwrap();
                    assert_eq!(signal.wavelengths().unwrap()[i], wavelength, "pixel {pixel}");

                    if with_data {
                        for (frame, text) in row[4..7].iter().enumerate() {
                            let count: f32 = text.parse().unwrap();
                            assert_eq!(signal.frame(frame).unwrap()[i].to_bits(), count.to_bits());
                        }

                        let count: f32 = row[7].parse().unwrap();
                        assert_eq!(background.data()[i].to_bits(), count.to_bits());
                    }

                    pixels += 1;
                }
                other => panic!("unexpected row kind {other}"),
            }
        }

        assert_eq!(properties, [signal.properties().len(), background.properties().len()]);
        assert_eq!(raw, signal.raw().len());
        assert_eq!(pixels, signal.pixel_count());

        if !with_data {
            assert!(signal.data().is_empty());
            assert!(background.data().is_empty());
        }
    }
}
