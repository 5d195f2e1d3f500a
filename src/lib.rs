//! Library to decode radiometric IS2 containers from Fluke
//! thermal cameras.
//!
//! An IS2 file is a zip archive holding the camera identity,
//! the calibration curve of the sensor, the correction
//! parameters of the shot, the raw 16-bit IR image and a few
//! JPEGs. The crate provides:
//!
//! 1. A [calibration] scanner that finds the quadratic pieces
//! of the sensor response in the undocumented calibration
//! blob, and inverts them into a lookup table from raw code
//! to apparent temperature.
//!
//! 2. [Correction](temperature::ThermalSettings) of the
//! apparent temperatures for emissivity, transmission and
//! reflected background.
//!
//! 3. [Decoding](ThermalResult::try_from_is2_path) of the
//! whole container into a temperature matrix and the
//! accompanying metadata.
//!
//! # Usage
//!
//! ```rust
//! # fn test_compile() -> anyhow::Result<()> {
//! use is2::ThermalResult;
//!
//! let result = ThermalResult::try_from_is2_path("IR00042.IS2")?;
//! let (rows, cols) = result.temperatures.dim();
//! println!(
//!     "{} {}: {}x{}, emissivity {}",
//!     result.camera.manufacturer,
//!     result.camera.model,
//!     rows,
//!     cols,
//!     result.metadata.settings.emissivity,
//! );
//! # Ok(())
//! # }
//! ```
//!
//! The container is extracted into a private temporary
//! directory which is always removed before decoding returns.
//! Use [`DecodeOptions`] to choose where that directory is
//! created.

#[macro_use]
mod parse;

pub mod error;
pub mod schema;

pub mod calibration;
pub mod container;
pub mod metadata;
pub mod raw;
pub mod temperature;

pub mod stats;
pub mod units;

#[cfg(feature = "cli")]
pub mod cli;

pub use crate::calibration::CalibrationTable;
pub use crate::container::{decode, DecodeOptions, ThermalResult};
pub use crate::error::{Error, Result};
