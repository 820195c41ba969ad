#![no_std]

//! A native decoder for Andor's Scientific Image Format (SIF).
//!
//! Sifter reads `.sif` files produced by Andor camera and spectrograph
//! software straight from their bytes, recovering the per-source metadata,
//! axis calibration and pixel data that the vendor reader library exposes,
//! without linking against it.
//!
//! Most users should begin with [`avec::decode_slice`] (or
//! [`avec::decode_file`]) and the [`avec::Document`] it returns. The decoding
//! stages themselves (tokenizer, header parser, calibration resolver and frame
//! decoder) are exposed in the [`sans`] module for applications needing finer
//! control.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable reader and path based decoding (default).
//! - `serde`: implement `Serialize` for the decoded document.

extern crate alloc;

pub mod avec;
pub mod sans;
