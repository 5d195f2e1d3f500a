//! Fixed-offset metadata of the container.
//!
//! None of the fields are validated beyond bounds checks: a
//! firmware that moves them yields plausible but wrong values.
use serde_derive::*;

use crate::{
    error::Result,
    schema::{
        CALIBRATION_RANGE, CAMERA_MANUFACTURER, CAMERA_MODEL, CAMERA_SERIAL, ENGINE_SERIAL,
    },
    temperature::ThermalSettings,
};

/// Identity of the camera, from `CameraInfo.gpbenc`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CameraInfo {
    pub manufacturer: String,
    pub model: String,
    pub engine_serial: String,
    pub camera_serial: String,
}

impl CameraInfo {
    pub fn extract(camera_info: &[u8]) -> Result<Self> {
        Ok(CameraInfo {
            manufacturer: CAMERA_MANUFACTURER.latin1(camera_info)?,
            model: CAMERA_MODEL.latin1(camera_info)?,
            engine_serial: ENGINE_SERIAL.latin1(camera_info)?,
            camera_serial: CAMERA_SERIAL.latin1(camera_info)?,
        })
    }
}

/// Calibration range selected on the camera (auto range 1,
/// 2, ...), from `CalibrationData.gpbenc`.
pub fn extract_calibration_range(calibration: &[u8]) -> Result<u8> {
    CALIBRATION_RANGE.parse_le(calibration)
}

/// Correction parameters and dimensions of the IR image.
///
/// `width` and `height` are the first and second dimension
/// declared by the IR data, in that order. The temperature
/// matrix has `width` rows.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ImageMetadata {
    #[serde(flatten)]
    pub settings: ThermalSettings,
    pub width: usize,
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn camera_info_bytes() -> Vec<u8> {
        let mut buf = vec![0x12u8; 128];
        buf[76..94].copy_from_slice(b"Fluke Thermography");
        buf[97..103].copy_from_slice(b"Ti480P");
        buf[104..112].copy_from_slice(b"E1234567");
        buf[115..124].copy_from_slice(b"C98765432");
        buf
    }

    #[test]
    fn extracts_camera_identity() -> Result<()> {
        let info = CameraInfo::extract(&camera_info_bytes())?;
        assert_eq!(info.manufacturer, "Fluke Thermography");
        assert_eq!(info.model, "Ti480P");
        assert_eq!(info.engine_serial, "E1234567");
        assert_eq!(info.camera_serial, "C98765432");
        Ok(())
    }

    #[test]
    fn short_camera_info_is_truncated() {
        let buf = camera_info_bytes();
        match CameraInfo::extract(&buf[..120]) {
            Err(Error::TruncatedMetadata { field, end, .. }) => {
                assert_eq!(field, "camera serial");
                assert_eq!(end, 124);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn reads_calibration_range() -> Result<()> {
        let mut buf = vec![0u8; 32];
        buf[18] = 2;
        assert_eq!(extract_calibration_range(&buf)?, 2);
        assert!(extract_calibration_range(&buf[..18]).is_err());
        Ok(())
    }
}
