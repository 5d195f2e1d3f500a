//! Errors raised while decoding an IS2 container.
use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not read archive `{}`", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("expected member `{member}` not found in container")]
    MissingMember { member: String },

    #[error("could not read member `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{field}: needs bytes {start}..{end}, buffer has only {len}")]
    TruncatedMetadata {
        field: &'static str,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("no valid calibration segment found ({markers} marker matches)")]
    MalformedCalibration { markers: usize },

    #[error("calibration segment {segment} (offset {offset:#x}): {fault}")]
    CalibrationMath {
        segment: usize,
        offset: usize,
        fault: MathFault,
    },

    #[error("raw code {code} at pixel {pixel} has no calibration entry")]
    LookupMiss { code: u16, pixel: usize },

    #[error("cannot correct with emissivity {emissivity} and transmission {transmission}")]
    InvalidMetadata { emissivity: f64, transmission: f64 },

    #[error("temperature matrix shape mismatch")]
    Shape(#[from] ndarray::ShapeError),
}

/// Degenerate quadratic encountered while inverting a segment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathFault {
    #[error("leading coefficient is zero")]
    ZeroLeadingCoefficient,

    #[error("negative discriminant {discriminant} at raw code {code}")]
    NegativeDiscriminant { code: i64, discriminant: f64 },

    #[error("raw code bounds {low}..{high} are not finite")]
    NonFiniteRange { low: f64, high: f64 },
}
