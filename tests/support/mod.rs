//! A minimal SIF encoder for building test documents.

#![allow(dead_code)]

pub const SIGNATURE: &str = "Andor Technology Multi-Channel File";
pub const VERSION: u32 = 65567;

/// Install a test logger, once per test binary.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One source section: its header lines and payload.
#[derive(Debug, Clone)]
pub struct Section {
    pub source: &'static str,
    pub header: Vec<String>,
    pub data: Vec<f32>,
}

impl Section {
    /// A single-track section whose X axis is the pixel number, with the
    /// payload counting up from zero.
    pub fn new(source: &'static str, pixels: usize, frames: usize) -> Self {
        Self {
            source,
            header: vec![
                format!("Frame {pixels} {frames} 1"),
                format!("SubImage 1 1 {pixels} 1 1 1"),
                "Calibration X Polynomial 2 0 1".into(),
            ],
            data: (0..pixels * frames).map(|i| i as f32).collect(),
        }
    }

    /// Append a header line.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    /// Replace every header line starting with `prefix`.
    pub fn replace(mut self, prefix: &str, line: impl Into<String>) -> Self {
        let line = line.into();
        for l in self.header.iter_mut().filter(|l| l.starts_with(prefix)) {
            *l = line.clone();
        }
        self
    }

    /// Remove every header line starting with `prefix`.
    pub fn without(mut self, prefix: &str) -> Self {
        self.header.retain(|l| !l.starts_with(prefix));
        self
    }

    pub fn data(mut self, data: Vec<f32>) -> Self {
        self.data = data;
        self
    }
}

/// The preamble bit of a source.
pub fn source_bit(source: &str) -> u32 {
    match source {
        "Signal" => 1 << 0,
        "Background" => 1 << 1,
        "Reference" => 1 << 2,
        "Live" => 1 << 3,
        _ => panic!("unknown source {source}"),
    }
}

/// Encode sections with a preamble derived from them.
pub fn encode(sections: &[Section]) -> Vec<u8> {
    let mask = sections.iter().map(|s| source_bit(s.source)).fold(0, |a, b| a | b);
    encode_with(VERSION, mask, sections, "\n")
}

/// Encode sections with an explicit preamble and line ending.
pub fn encode_with(version: u32, mask: u32, sections: &[Section], eol: &str) -> Vec<u8> {
    let mut out = Vec::new();

    push_line(&mut out, SIGNATURE, eol);
    push_line(&mut out, &format!("{version} {mask}"), eol);

    for section in sections {
        push_line(&mut out, &format!("Source {}", section.source), eol);
        for line in &section.header {
            push_line(&mut out, line, eol);
        }
        push_line(&mut out, "Data", eol);

        for sample in &section.data {
            out.extend_from_slice(&sample.to_le_bytes());
        }
    }

    out
}

fn push_line(out: &mut Vec<u8>, line: &str, eol: &str) {
    out.extend_from_slice(line.as_bytes());
    out.extend_from_slice(eol.as_bytes());
}

/// Offset of the first occurrence of `needle` in a document.
pub fn find(document: &[u8], needle: &str) -> usize {
    document
        .windows(needle.len())
        .position(|w| w == needle.as_bytes())
        .unwrap()
}
