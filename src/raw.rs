//! Raw IR data and its conversion to temperatures.
//!
//! `IR.data` is a flat sequence of little-endian 16-bit
//! words. Words 192 and 193 declare the two dimensions of the
//! image; the pixels start at the word indexed by the second
//! dimension.
use ndarray::Array2;

use crate::{
    calibration::CalibrationTable,
    error::{Error, Result},
    schema::{Field, IR_DIMENSIONS},
    temperature::ThermalSettings,
};

declare_parseable_struct! {
    struct IrDimensions {
        width => u16 as usize,
        height => u16 as usize,
    }
}

/// Raw sensor codes of the IR image.
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    /// Codes in `(width, height)` shape, as declared.
    pub image: Array2<u16>,
}

impl RawImage {
    pub fn parse(ir_data: &[u8]) -> Result<Self> {
        let IrDimensions { width, height } = IR_DIMENSIONS.parse_le(ir_data)?;

        let pixels = Field::new("IR pixel data", 2 * height, 2 * width * height).slice(ir_data)?;
        let values: Vec<u16> = pixels
            .chunks_exact(2)
            .map(|w| u16::from_le_bytes([w[0], w[1]]))
            .collect();

        Ok(RawImage {
            image: Array2::from_shape_vec((width, height), values)?,
        })
    }

    pub fn width(&self) -> usize {
        self.image.nrows()
    }

    pub fn height(&self) -> usize {
        self.image.ncols()
    }

    /// Convert every code to a corrected temperature. The
    /// result has the same shape as the raw image.
    pub fn temperatures(
        &self,
        table: &CalibrationTable,
        settings: &ThermalSettings,
    ) -> Result<Array2<f64>> {
        let transform = settings.temperature_transform()?;

        let temps = self
            .image
            .iter()
            .enumerate()
            .map(|(pixel, &code)| {
                table
                    .get(code)
                    .map(&transform)
                    .ok_or(Error::LookupMiss { code, pixel })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Array2::from_shape_vec(self.image.dim(), temps)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationSegment;

    /// Encode an IR data member. `height` must leave room for
    /// the header words.
    fn ir_bytes(width: u16, height: u16, pixels: &[u16]) -> Vec<u8> {
        let mut words = vec![0u16; height as usize + pixels.len()];
        words[192] = width;
        words[193] = height;
        words[height as usize..].copy_from_slice(pixels);
        words.iter().flat_map(|w| w.to_le_bytes().to_vec()).collect()
    }

    fn quadratic_table() -> CalibrationTable {
        let segment = CalibrationSegment {
            offset: 0,
            low_temperature: -20.,
            high_temperature: 50.,
            a: 0.01,
            b: 2.,
            c: 100.,
        };
        CalibrationTable::from_segments(&[segment]).unwrap()
    }

    fn pixels(n: usize) -> Vec<u16> {
        (0..n).map(|i| 64 + (i % 161) as u16).collect()
    }

    #[test]
    fn parses_declared_shape() -> Result<()> {
        let values = pixels(2 * 197);
        let raw = RawImage::parse(&ir_bytes(2, 197, &values))?;

        assert_eq!(raw.image.dim(), (2, 197));
        assert_eq!((raw.width(), raw.height()), (2, 197));
        assert_eq!(raw.image[(0, 0)], values[0]);
        assert_eq!(raw.image[(0, 1)], values[1]);
        assert_eq!(raw.image[(1, 0)], values[197]);
        Ok(())
    }

    #[test]
    fn short_header_is_truncated() {
        match RawImage::parse(&[0u8; 200]) {
            Err(Error::TruncatedMetadata { field, .. }) => assert_eq!(field, "IR image dimensions"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn short_pixel_data_is_truncated() {
        let mut bytes = ir_bytes(2, 197, &pixels(2 * 197));
        bytes.truncate(bytes.len() - 1);
        match RawImage::parse(&bytes) {
            Err(Error::TruncatedMetadata { field, .. }) => assert_eq!(field, "IR pixel data"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unit_settings_return_table_values() -> Result<()> {
        let table = quadratic_table();
        let raw = RawImage::parse(&ir_bytes(3, 200, &pixels(600)))?;
        let settings = ThermalSettings {
            emissivity: 1.,
            transmission: 1.,
            background_temperature: -12.5,
        };

        let temps = raw.temperatures(&table, &settings)?;
        assert_eq!(temps.dim(), (3, 200));
        for (temp, code) in temps.iter().zip(raw.image.iter()) {
            assert_eq!(Some(*temp), table.get(*code));
        }
        Ok(())
    }

    #[test]
    fn missing_code_is_reported_with_pixel() -> Result<()> {
        let mut values = pixels(2 * 197);
        values[5] = 500;
        let raw = RawImage::parse(&ir_bytes(2, 197, &values))?;
        let settings = ThermalSettings {
            emissivity: 0.95,
            transmission: 1.,
            background_temperature: 20.,
        };

        match raw.temperatures(&quadratic_table(), &settings) {
            Err(Error::LookupMiss { code, pixel }) => assert_eq!((code, pixel), (500, 5)),
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn zero_transmission_is_invalid() -> Result<()> {
        let raw = RawImage::parse(&ir_bytes(2, 197, &pixels(2 * 197)))?;
        let settings = ThermalSettings {
            emissivity: 0.95,
            transmission: 0.,
            background_temperature: 20.,
        };
        assert!(matches!(
            raw.temperatures(&quadratic_table(), &settings),
            Err(Error::InvalidMetadata { .. })
        ));
        Ok(())
    }
}
