//! Functions to compute temperature from raw sensor values.
//!
//! The camera has already mapped raw codes to an apparent
//! temperature through its [calibration
//! curve](crate::calibration). What remains is a single-point
//! correction for the emissivity of the object, the
//! transmission of the optical path and the reflected
//! background:
//!
//! ```text
//! T = (T_apparent - (2 - τ - ε) · T_bg) / (τ · ε)
//! ```
use serde_derive::*;

use crate::{
    error::{Error, Result},
    schema::{BACKGROUND_TEMPERATURE, EMISSIVITY, TRANSMISSION},
};

/// Parameters to correct apparent temperatures.
///
/// Read from `IRImageInfo.gpbenc` of the container.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ThermalSettings {
    pub emissivity: f64,
    pub transmission: f64,
    /// Reflected background temperature in celsius.
    pub background_temperature: f64,
}

impl ThermalSettings {
    /// Read the settings from an image-info buffer.
    pub fn extract(image_info: &[u8]) -> Result<Self> {
        let transmission: f32 = TRANSMISSION.parse_le(image_info)?;
        let emissivity: f32 = EMISSIVITY.parse_le(image_info)?;
        let background_temperature: f32 = BACKGROUND_TEMPERATURE.parse_le(image_info)?;

        Ok(ThermalSettings {
            emissivity: emissivity as f64,
            transmission: transmission as f64,
            background_temperature: background_temperature as f64,
        })
    }

    /// Transform from apparent temperature (as given by the
    /// calibration curve) to object temperature. Fails if the
    /// correction would divide by zero.
    pub fn temperature_transform(&self) -> Result<impl Fn(f64) -> f64> {
        let gain = self.transmission * self.emissivity;
        if self.transmission == 0. || self.emissivity == 0. || !gain.is_finite() {
            return Err(Error::InvalidMetadata {
                emissivity: self.emissivity,
                transmission: self.transmission,
            });
        }
        let background = (2. - self.transmission - self.emissivity) * self.background_temperature;

        Ok(move |apparent: f64| (apparent - background) / gain)
    }

    pub fn apparent_to_temp(&self, apparent: f64) -> Result<f64> {
        Ok(self.temperature_transform()?(apparent))
    }
}
