//! Temperature scales for reporting.
use std::{fmt, str::FromStr};

use serde_derive::*;

const KELVIN_OFFSET: f64 = 273.15;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureScale {
    Celsius,
    Kelvin,
    Fahrenheit,
    Newton,
}

impl Default for TemperatureScale {
    fn default() -> Self {
        TemperatureScale::Celsius
    }
}

impl TemperatureScale {
    /// Convert a temperature level from celsius.
    pub fn convert(self, c: f64) -> f64 {
        match self {
            TemperatureScale::Kelvin => c + KELVIN_OFFSET,
            TemperatureScale::Fahrenheit => c * 9. / 5. + 32.,
            _ => self.convert_delta(c),
        }
    }

    /// Convert a temperature difference from celsius.
    pub fn convert_delta(self, dc: f64) -> f64 {
        match self {
            TemperatureScale::Celsius | TemperatureScale::Kelvin => dc,
            TemperatureScale::Fahrenheit => dc * 9. / 5.,
            TemperatureScale::Newton => dc * 33. / 100.,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "°C",
            TemperatureScale::Kelvin => "K",
            TemperatureScale::Fahrenheit => "°F",
            TemperatureScale::Newton => "°N",
        }
    }
}

impl FromStr for TemperatureScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" | "c" => Ok(TemperatureScale::Celsius),
            "K" | "k" => Ok(TemperatureScale::Kelvin),
            "F" | "f" => Ok(TemperatureScale::Fahrenheit),
            "N" | "n" => Ok(TemperatureScale::Newton),
            _ => Err(format!("unknown temperature scale `{}` (use C, K, F or N)", s)),
        }
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_levels_and_differences() {
        use TemperatureScale::*;
        assert_eq!(Kelvin.convert(-273.15), 0.);
        assert_eq!(Fahrenheit.convert(100.), 212.);
        assert_eq!(Fahrenheit.convert_delta(10.), 18.);
        assert_eq!(Newton.convert(100.), 33.);
        assert_eq!(Celsius.convert(21.5), 21.5);
    }

    #[test]
    fn parses_scale_letters() {
        assert_eq!("k".parse::<TemperatureScale>(), Ok(TemperatureScale::Kelvin));
        assert!("R".parse::<TemperatureScale>().is_err());
    }
}
