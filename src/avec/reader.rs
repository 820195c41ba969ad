//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::{
    fs,
    io::{self, Read},
    path::Path,
    vec::Vec,
};

use thiserror::Error;

use crate::sans::{self, STATUS_FORMAT_ERROR};

use super::{
    document::Document,
    slice::{self, Options},
};

extern crate std;

/// Vendor status code reported when a file does not exist.
pub const STATUS_FILE_NOT_FOUND: u32 = 22005;

/// Vendor status code reported when a file cannot be read.
pub const STATUS_FILE_ACCESS_ERROR: u32 = 22006;

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The document is malformed.
    #[error(transparent)]
    Decode(#[from] sans::Error),
}

impl Error {
    /// The equivalent vendor status code.
    pub fn status(&self) -> u32 {
        match self {
            Error::Io(e) if e.kind() == io::ErrorKind::NotFound => STATUS_FILE_NOT_FOUND,
            Error::Io(_) => STATUS_FILE_ACCESS_ERROR,
            Error::Decode(_) => STATUS_FORMAT_ERROR,
        }
    }
}

/// Decode a document from a reader.
///
/// The reader is read to its end before decoding.
///
/// This method is also re-exported as `sifter::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(r: &mut impl Read, options: Options) -> Result<Document, Error> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;

    Ok(slice::decode(&buf, options)?)
}

/// Decode a document from a file, recording its name.
///
/// This method is also re-exported as `sifter::avec::decode_file`.
///
/// _Requires Cargo feature `std`._
pub fn decode_file(path: impl AsRef<Path>, options: Options) -> Result<Document, Error> {
    let path = path.as_ref();
    let document = slice::decode(&fs::read(path)?, options)?;

    log::debug!("decoded {}", path.display());

    Ok(match path.file_name() {
        Some(name) => document.with_file_name(name.to_string_lossy()),
        None => document,
    })
}
