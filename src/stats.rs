//! Summary statistics over temperature values.
use std::ops::AddAssign;

use ndarray::Array2;
use serde_derive::*;

/// Running count, extrema and moments of a set of values.
/// NaNs are skipped.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub sum_sq: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.,
            sum_sq: 0.,
        }
    }
}

impl Stats {
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let var = self.sum_sq / self.count as f64 - mean * mean;
        Some(var.max(0.).sqrt())
    }
}

impl AddAssign<f64> for Stats {
    fn add_assign(&mut self, val: f64) {
        if val.is_nan() {
            return;
        }
        self.count += 1;
        self.min = self.min.min(val);
        self.max = self.max.max(val);
        self.sum += val;
        self.sum_sq += val * val;
    }
}

impl AddAssign<&Stats> for Stats {
    fn add_assign(&mut self, other: &Stats) {
        self.count += other.count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
    }
}

/// A located value in a matrix.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

/// Coldest and hottest pixel of a temperature matrix.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    pub min: Location,
    pub max: Location,
}

impl Extrema {
    /// Returns `None` if the matrix holds no comparable
    /// value. The first occurrence wins on ties.
    pub fn locate(values: &Array2<f64>) -> Option<Self> {
        let mut extrema: Option<Extrema> = None;
        for ((row, col), &value) in values.indexed_iter() {
            if value.is_nan() {
                continue;
            }
            let here = Location { row, col, value };
            match &mut extrema {
                None => {
                    extrema = Some(Extrema {
                        min: here,
                        max: here,
                    })
                }
                Some(e) => {
                    if value < e.min.value {
                        e.min = here;
                    }
                    if value > e.max.value {
                        e.max = here;
                    }
                }
            }
        }
        extrema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn accumulates_and_merges() {
        let mut a = Stats::default();
        for v in &[1., 2., f64::NAN, 3.] {
            a += *v;
        }
        let mut b = Stats::default();
        b += 6.;

        assert_eq!(a.count, 3);
        assert_eq!(a.mean(), Some(2.));

        a += &b;
        assert_eq!(a.count, 4);
        assert_eq!((a.min, a.max), (1., 6.));
        assert_eq!(a.mean(), Some(3.));
        assert!((a.std_dev().unwrap() - 3.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_stats_have_no_mean() {
        let stats = Stats::default();
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.std_dev(), None);
    }

    #[test]
    fn locates_extrema() {
        let values = array![[20.5, f64::NAN, 31.], [18., 31., 25.]];
        let e = Extrema::locate(&values).unwrap();
        assert_eq!((e.min.row, e.min.col, e.min.value), (1, 0, 18.));
        assert_eq!((e.max.row, e.max.col, e.max.value), (0, 2, 31.));

        assert_eq!(Extrema::locate(&array![[f64::NAN]]), None);
    }
}
