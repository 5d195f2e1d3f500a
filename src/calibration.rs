//! Calibration curve of the sensor.
//!
//! `CalibrationData.gpbenc` stores the response of the sensor
//! as a piecewise quadratic `raw = a·T² + b·T + c`. Each piece
//! is a 24-byte record following the marker `4a 19 0d`. The
//! blob is otherwise undocumented and contains look-alike
//! markers; these are told apart by an implausible lower
//! temperature bound.
//!
//! The pieces are inverted into a [`CalibrationTable`] that
//! maps every raw code the sensor can produce to a
//! temperature in celsius.
use std::{collections::BTreeMap, ops::Range};

use byteordered::ByteOrdered;
use tracing::{debug, trace};

use crate::{
    error::{Error, MathFault, Result},
    parse::Parseable,
    schema::{CURVE_MARKER, CURVE_RECORD_LEN, MIN_CURVE_TEMPERATURE},
};

declare_parseable_struct! {
    /// Record following a curve marker. Values are separated
    /// by single tag bytes; the coefficients are stored
    /// constant term first.
    struct CurveRecord {
        low_temperature => f32,
        _tag0 => u8,
        high_temperature => f32,
        _tag1 => u8,
        c => f32,
        _tag2 => u8,
        b => f32,
        _tag3 => u8,
        a => f32,
    }
}

/// One quadratic piece of the calibration curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationSegment {
    /// Offset of the marker in the calibration buffer.
    pub offset: usize,
    pub low_temperature: f32,
    pub high_temperature: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl CalibrationSegment {
    fn from_record(offset: usize, record: CurveRecord) -> Self {
        CalibrationSegment {
            offset,
            low_temperature: record.low_temperature,
            high_temperature: record.high_temperature,
            a: record.a,
            b: record.b,
            c: record.c,
        }
    }

    /// Raw code produced by the sensor at `temp`.
    pub fn raw_at(&self, temp: f64) -> f64 {
        let (a, b, c) = self.coefficients();
        a * temp * temp + b * temp + c
    }

    /// Temperature at which the sensor produces `code`: the
    /// positive root of `a·T² + b·T + (c - code) = 0`.
    pub fn temperature_at(&self, code: i64) -> Result<f64, MathFault> {
        let (a, b, c) = self.coefficients();
        if a == 0. {
            return Err(MathFault::ZeroLeadingCoefficient);
        }
        let discriminant = b * b - 4. * a * (c - code as f64);
        if discriminant < 0. {
            return Err(MathFault::NegativeDiscriminant { code, discriminant });
        }
        Ok((-b + discriminant.sqrt()) / (2. * a))
    }

    /// Integer raw codes covered by this piece. Bounds are
    /// rounded up, and the upper bound is exclusive.
    pub fn code_range(&self) -> Result<Range<i64>, MathFault> {
        let low = self.raw_at(self.low_temperature as f64);
        let high = self.raw_at(self.high_temperature as f64);
        if !low.is_finite() || !high.is_finite() {
            return Err(MathFault::NonFiniteRange { low, high });
        }
        Ok(low.ceil() as i64..high.ceil() as i64)
    }

    fn coefficients(&self) -> (f64, f64, f64) {
        (self.a as f64, self.b as f64, self.c as f64)
    }
}

/// Result of scanning a calibration buffer.
#[derive(Debug, Default)]
pub struct CurveScan {
    pub segments: Vec<CalibrationSegment>,
    /// Marker hits, including rejected ones.
    pub markers: usize,
}

/// Slide a window over `buf` and collect every curve record
/// that follows a marker, in buffer order.
pub fn scan_segments(buf: &[u8]) -> CurveScan {
    let mut scan = CurveScan::default();

    for (offset, window) in buf.windows(CURVE_MARKER.len()).enumerate() {
        if window != &CURVE_MARKER[..] {
            continue;
        }
        scan.markers += 1;

        let start = offset + CURVE_MARKER.len();
        let bytes = match buf.get(start..start + CURVE_RECORD_LEN) {
            Some(bytes) => bytes,
            None => {
                trace!(offset, "curve marker too close to end of buffer");
                continue;
            }
        };
        let record = match CurveRecord::parse(&mut ByteOrdered::le(bytes)) {
            Ok(record) => record,
            Err(e) => {
                trace!(offset, error = %e, "unreadable curve record");
                continue;
            }
        };

        // NaN bounds are noise too
        if !(record.low_temperature >= MIN_CURVE_TEMPERATURE) {
            trace!(offset, low = record.low_temperature, "rejecting curve marker");
            continue;
        }

        let segment = CalibrationSegment::from_record(offset, record);
        debug!(
            offset,
            low = segment.low_temperature,
            high = segment.high_temperature,
            a = segment.a,
            b = segment.b,
            c = segment.c,
            "found calibration segment"
        );
        scan.segments.push(segment);
    }
    scan
}

/// Temperature for each raw sensor code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationTable {
    entries: BTreeMap<u16, f64>,
}

impl CalibrationTable {
    /// Build the table from a `CalibrationData.gpbenc` buffer.
    pub fn scan(buf: &[u8]) -> Result<Self> {
        let CurveScan { segments, markers } = scan_segments(buf);
        if segments.is_empty() {
            return Err(Error::MalformedCalibration { markers });
        }
        Self::from_segments(&segments)
    }

    /// Build the table from segments in scan order. Where
    /// segments overlap, the later one wins.
    pub fn from_segments(segments: &[CalibrationSegment]) -> Result<Self> {
        let mut table = CalibrationTable::default();
        for (idx, segment) in segments.iter().enumerate() {
            table.insert_segment(idx, segment)?;
        }
        Ok(table)
    }

    fn insert_segment(&mut self, idx: usize, segment: &CalibrationSegment) -> Result<()> {
        let fail = |fault| Error::CalibrationMath {
            segment: idx,
            offset: segment.offset,
            fault,
        };
        if segment.a == 0. {
            return Err(fail(MathFault::ZeroLeadingCoefficient));
        }

        // Codes outside the sensor range never occur in an image.
        let codes = segment.code_range().map_err(fail)?;
        let start = codes.start.max(0);
        let end = codes.end.min(u16::MAX as i64 + 1);
        for code in start..end {
            let temp = segment.temperature_at(code).map_err(fail)?;
            self.entries.insert(code as u16, temp);
        }
        Ok(())
    }

    pub fn get(&self, code: u16) -> Option<f64> {
        self.entries.get(&code).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.entries.iter().map(|(&code, &temp)| (code, temp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    /// Encode a marker and its curve record.
    fn curve_bytes(low: f32, high: f32, a: f32, b: f32, c: f32) -> Vec<u8> {
        let mut out = CURVE_MARKER.to_vec();
        out.extend_from_slice(&low.to_le_bytes());
        out.push(0x15);
        out.extend_from_slice(&high.to_le_bytes());
        out.push(0x1d);
        out.extend_from_slice(&c.to_le_bytes());
        out.push(0x25);
        out.extend_from_slice(&b.to_le_bytes());
        out.push(0x2d);
        out.extend_from_slice(&a.to_le_bytes());
        out
    }

    fn padded(parts: &[Vec<u8>]) -> Vec<u8> {
        let mut buf = vec![0x08, 0x01, 0x12, 0x00];
        for part in parts {
            buf.extend_from_slice(part);
            buf.extend_from_slice(&[0x00, 0x10, 0x02]);
        }
        buf
    }

    #[test]
    fn boundary_codes_invert_to_bounds() -> Result<()> {
        let buf = padded(&[curve_bytes(-20., 50., 0.01, 2.0, 100.0)]);
        let scan = scan_segments(&buf);
        assert_eq!(scan.segments.len(), 1);
        let segment = scan.segments[0];
        assert_eq!(segment.offset, 4);

        let codes = segment.code_range()?;
        assert_eq!(codes, 64..225);
        assert!((segment.temperature_at(codes.start)? + 20.).abs() < 1e-3);
        assert!((segment.temperature_at(codes.end)? - 50.).abs() < 1e-3);

        let table = CalibrationTable::scan(&buf)?;
        assert!((table.get(64).unwrap() + 20.).abs() < 1e-3);
        Ok(())
    }

    #[test]
    fn every_code_in_range_has_an_entry() -> Result<()> {
        let buf = padded(&[curve_bytes(-20., 50., 0.01, 2.0, 100.0)]);
        let table = CalibrationTable::scan(&buf)?;

        assert_eq!(table.len(), 225 - 64);
        assert!((64..225).all(|code| table.get(code).is_some()));
        assert_eq!(table.get(63), None);
        assert_eq!(table.get(225), None);

        let temps: Vec<f64> = table.iter().map(|(_, t)| t).collect();
        assert!(temps.windows(2).all(|w| w[0] < w[1]));
        Ok(())
    }

    #[test]
    fn later_segment_wins_on_overlap() -> Result<()> {
        let buf = padded(&[
            curve_bytes(-20., 50., 0.01, 2.0, 100.0),
            curve_bytes(0., 10., 0.01, 2.0, 110.0),
        ]);
        let scan = scan_segments(&buf);
        assert_eq!(scan.segments.len(), 2);
        let later = scan.segments[1];
        assert_eq!(later.code_range()?, 110..131);

        let table = CalibrationTable::scan(&buf)?;
        assert_eq!(table.get(120), Some(later.temperature_at(120)?));
        assert_eq!(table.get(131), Some(scan.segments[0].temperature_at(131)?));
        Ok(())
    }

    #[test]
    fn implausible_lower_bound_is_noise() -> Result<()> {
        let buf = padded(&[
            curve_bytes(-500., 50., 0.5, 1.0, 7.0),
            curve_bytes(-20., 50., 0.01, 2.0, 100.0),
        ]);
        let scan = scan_segments(&buf);
        assert_eq!(scan.markers, 2);
        assert_eq!(scan.segments.len(), 1);
        assert_eq!(scan.segments[0].low_temperature, -20.);

        let table = CalibrationTable::scan(&buf)?;
        assert_eq!(table.len(), 225 - 64);
        Ok(())
    }

    #[test]
    fn no_valid_segment_is_malformed() {
        let buf = padded(&[curve_bytes(-500., 50., 0.01, 2.0, 100.0)]);
        match CalibrationTable::scan(&buf) {
            Err(Error::MalformedCalibration { markers }) => assert_eq!(markers, 1),
            other => panic!("unexpected result: {:?}", other),
        }

        match CalibrationTable::scan(&[0u8; 64]) {
            Err(Error::MalformedCalibration { markers }) => assert_eq!(markers, 0),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn truncated_record_is_skipped() {
        let mut buf = curve_bytes(-20., 50., 0.01, 2.0, 100.0);
        buf.truncate(CURVE_MARKER.len() + CURVE_RECORD_LEN - 1);

        let scan = scan_segments(&buf);
        assert_eq!(scan.markers, 1);
        assert!(scan.segments.is_empty());
    }

    #[test]
    fn zero_leading_coefficient_is_degenerate() {
        let buf = padded(&[
            curve_bytes(-20., 50., 0.01, 2.0, 100.0),
            curve_bytes(0., 10., 0., 2.0, 100.0),
        ]);
        match CalibrationTable::scan(&buf) {
            Err(Error::CalibrationMath {
                segment, fault, ..
            }) => {
                assert_eq!(segment, 1);
                assert_eq!(fault, MathFault::ZeroLeadingCoefficient);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn negative_discriminant_is_degenerate() {
        let segment = CalibrationSegment {
            offset: 0,
            low_temperature: 0.,
            high_temperature: 1.,
            a: 1.,
            b: 0.,
            c: 10.,
        };
        match segment.temperature_at(5) {
            Err(MathFault::NegativeDiscriminant { code, discriminant }) => {
                assert_eq!(code, 5);
                assert_eq!(discriminant, -20.);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn codes_outside_sensor_range_are_dropped() -> Result<()> {
        let segment = CalibrationSegment {
            offset: 0,
            low_temperature: -20.,
            high_temperature: 20.,
            a: 0.01,
            b: 2.,
            c: 0.,
        };
        assert_eq!(segment.code_range()?, -36..44);

        let table = CalibrationTable::from_segments(&[segment])?;
        assert_eq!(table.iter().next().map(|(code, _)| code), Some(0));
        assert_eq!(table.len(), 44);
        Ok(())
    }
}
