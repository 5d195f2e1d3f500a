//! Layout of the IS2 container.
//!
//! The camera writes its metadata as fixed-offset blobs with
//! no self-description. Every offset the decoder relies on is
//! listed here so that a firmware change only touches this
//! table.
use std::ops::Range;

use byteordered::ByteOrdered;

use crate::{
    error::{Error, Result},
    parse::Parseable,
};

/// A named byte range within a member buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, len: usize) -> Self {
        Field { name, offset, len }
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    /// Borrow the bytes of this field, or fail with
    /// [`Error::TruncatedMetadata`] if `buf` is too short.
    pub fn slice<'a>(&self, buf: &'a [u8]) -> Result<&'a [u8]> {
        buf.get(self.range()).ok_or(Error::TruncatedMetadata {
            field: self.name,
            start: self.offset,
            end: self.offset + self.len,
            len: buf.len(),
        })
    }

    /// Decode the field as single-byte characters.
    pub fn latin1(&self, buf: &[u8]) -> Result<String> {
        Ok(self.slice(buf)?.iter().map(|&b| b as char).collect())
    }

    /// Parse the field as a little-endian value.
    pub(crate) fn parse_le<T: Parseable>(&self, buf: &[u8]) -> Result<T> {
        let bytes = self.slice(buf)?;
        T::parse(&mut ByteOrdered::le(bytes)).map_err(|_| Error::TruncatedMetadata {
            field: self.name,
            start: self.offset,
            end: self.offset + self.len,
            len: buf.len(),
        })
    }
}

// Member paths, relative to the archive root.
pub const CAMERA_INFO_MEMBER: &str = "CameraInfo.gpbenc";
pub const CALIBRATION_MEMBER: &str = "CalibrationData.gpbenc";
pub const IMAGE_DIR: &str = "Images/Main";
pub const IMAGE_INFO_MEMBER: &str = "Images/Main/IRImageInfo.gpbenc";
pub const IR_DATA_MEMBER: &str = "Images/Main/IR.data";
pub const THUMBNAIL_DIR: &str = "Thumbnails";

// CameraInfo.gpbenc
pub const CAMERA_MANUFACTURER: Field = Field::new("camera manufacturer", 76, 18);
pub const CAMERA_MODEL: Field = Field::new("camera model", 97, 6);
pub const ENGINE_SERIAL: Field = Field::new("engine serial", 104, 8);
pub const CAMERA_SERIAL: Field = Field::new("camera serial", 115, 9);

// CalibrationData.gpbenc
pub const CALIBRATION_RANGE: Field = Field::new("calibration range", 18, 1);
pub const CURVE_MARKER: [u8; 3] = [0x4a, 0x19, 0x0d];
pub const CURVE_RECORD_LEN: usize = 24;
pub const MIN_CURVE_TEMPERATURE: f32 = -180.;

// IRImageInfo.gpbenc
pub const EMISSIVITY: Field = Field::new("emissivity", 33, 4);
pub const BACKGROUND_TEMPERATURE: Field = Field::new("background temperature", 38, 4);
pub const TRANSMISSION: Field = Field::new("transmission", 43, 4);

// IR.data, as 16-bit words
pub const IR_DIMENSIONS: Field = Field::new("IR image dimensions", 2 * 192, 4);
