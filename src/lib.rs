//! A resistor combination finder for circuit design.
//!
//! Given a target resistance (or a ratio, or a set of weights) it walks the values of a standard
//! E-series and reports the pairs or sets of parts that approximate the target best, along with
//! every candidate under a chosen relative error threshold.
//!
//! Four searches are provided in [`search`]:
//!
//! * [`search::parallel_pair`]: two resistors in parallel, `a || b ~ r`
//! * [`search::series_pair`]: two resistors in series, `a + b ~ r`
//! * [`search::ratio_pair`]: two resistors with `a / b ~ r`
//! * [`search::weighted_set`]: `n` resistors proportional to `n` weights
//!
//! # Example
//! ```rust
//! use resistor_search::*;
//!
//! let res = search::parallel_pair(150.0, &E24, 0.0).unwrap();
//! let best = res.best();
//!
//! assert!(res.exact_in_series());
//! assert_eq!(best.set.r(1).value(), 160.0);
//! assert_eq!(best.set.r(2).value(), 2400.0);
//! assert!(best.error < 1e-12);
//! ```
//!
//! Running the `restool` binary with the same input produces:
//! ```text
//! $ restool 150
//! The input value is present in the selected series of values.
//! Attempting to find combinations without 0R or open circuit.
//!
//! 160.0 || 2.400k	Error: 0%
//! The best parallel resistor combination:
//! 160.0 || 2.400k	Error: 0%
//! ```

#[macro_use]
extern crate lazy_static;

use itertools::Itertools;

use std::fmt;
use std::str::FromStr;

mod error;
pub mod format;
pub mod search;
mod value;

pub use error::{Error, Result};
pub use search::{Match, RRes, RSet, Topology};
pub use value::RValue;

/// Largest accepted relative error threshold.
pub const MAX_THRESHOLD: f64 = 0.101;

lazy_static! {
    /// RSeries constant for the E3 standard series
    pub static ref E3: RSeries = RSeries::from_table(&[1.0, 2.2, 4.7]);
    /// RSeries constant for the E6 standard series
    pub static ref E6: RSeries = RSeries::extend(&E3, &[1.5, 3.3, 6.8]);
    /// RSeries constant for the E12 standard series
    pub static ref E12: RSeries = RSeries::extend(&E6, &[1.2, 1.8, 2.7, 3.9, 5.6, 8.2]);
    /// RSeries constant for the E24 standard series
    pub static ref E24: RSeries = RSeries::extend(
        &E12,
        &[1.1, 1.3, 1.6, 2.0, 2.4, 3.0, 3.6, 4.3, 5.1, 6.2, 7.5, 9.1],
    );
    /// RSeries constant for the E48 standard series
    pub static ref E48: RSeries = RSeries::from_table(&[
        1.00, 1.05, 1.10, 1.15, 1.21, 1.27, 1.33, 1.40, 1.47, 1.54, 1.62, 1.69, 1.78, 1.87, 1.96, 2.05,
        2.15, 2.26, 2.37, 2.49, 2.61, 2.74, 2.87, 3.01, 3.16, 3.32, 3.48, 3.65, 3.83, 4.02, 4.22, 4.42,
        4.64, 4.87, 5.11, 5.36, 5.62, 5.90, 6.19, 6.49, 6.81, 7.15, 7.50, 7.87, 8.25, 8.66, 9.09, 9.53,
    ]);
    /// RSeries constant for the E96 standard series
    pub static ref E96: RSeries = RSeries::from_table(&[
        1.00, 1.02, 1.05, 1.07, 1.10, 1.13, 1.15, 1.18, 1.21, 1.24, 1.27, 1.30, 1.33, 1.37, 1.40, 1.43,
        1.47, 1.50, 1.54, 1.58, 1.62, 1.65, 1.69, 1.74, 1.78, 1.82, 1.87, 1.91, 1.96, 2.00, 2.05, 2.10,
        2.15, 2.21, 2.26, 2.32, 2.37, 2.43, 2.49, 2.55, 2.61, 2.67, 2.74, 2.80, 2.87, 2.94, 3.01, 3.09,
        3.16, 3.24, 3.32, 3.40, 3.48, 3.57, 3.65, 3.74, 3.83, 3.92, 4.02, 4.12, 4.22, 4.32, 4.42, 4.53,
        4.64, 4.75, 4.87, 4.99, 5.11, 5.23, 5.36, 5.49, 5.62, 5.76, 5.90, 6.04, 6.19, 6.34, 6.49, 6.65,
        6.81, 6.98, 7.15, 7.32, 7.50, 7.68, 7.87, 8.06, 8.25, 8.45, 8.66, 8.87, 9.09, 9.31, 9.53, 9.76,
    ]);
    /// RSeries constant for the E192 standard series
    pub static ref E192: RSeries = RSeries::from_table(&[
        1.00, 1.01, 1.02, 1.04, 1.05, 1.06, 1.07, 1.09, 1.10, 1.11, 1.13, 1.14, 1.15, 1.17, 1.18, 1.20,
        1.21, 1.23, 1.24, 1.26, 1.27, 1.29, 1.30, 1.32, 1.33, 1.35, 1.37, 1.38, 1.40, 1.42, 1.43, 1.45,
        1.47, 1.49, 1.50, 1.52, 1.54, 1.56, 1.58, 1.60, 1.62, 1.64, 1.65, 1.67, 1.69, 1.72, 1.74, 1.76,
        1.78, 1.80, 1.82, 1.84, 1.87, 1.89, 1.91, 1.93, 1.96, 1.98, 2.00, 2.03, 2.05, 2.08, 2.10, 2.13,
        2.15, 2.18, 2.21, 2.23, 2.26, 2.29, 2.32, 2.34, 2.37, 2.40, 2.43, 2.46, 2.49, 2.52, 2.55, 2.58,
        2.61, 2.64, 2.67, 2.71, 2.74, 2.77, 2.80, 2.84, 2.87, 2.91, 2.94, 2.98, 3.01, 3.05, 3.09, 3.12,
        3.16, 3.20, 3.24, 3.28, 3.32, 3.36, 3.40, 3.44, 3.48, 3.52, 3.57, 3.61, 3.65, 3.70, 3.74, 3.79,
        3.83, 3.88, 3.92, 3.97, 4.02, 4.07, 4.12, 4.17, 4.22, 4.27, 4.32, 4.37, 4.42, 4.48, 4.53, 4.59,
        4.64, 4.70, 4.75, 4.81, 4.87, 4.93, 4.99, 5.05, 5.11, 5.17, 5.23, 5.30, 5.36, 5.42, 5.49, 5.56,
        5.62, 5.69, 5.76, 5.83, 5.90, 5.97, 6.04, 6.12, 6.19, 6.26, 6.34, 6.42, 6.49, 6.57, 6.65, 6.73,
        6.81, 6.90, 6.98, 7.06, 7.15, 7.23, 7.32, 7.41, 7.50, 7.59, 7.68, 7.77, 7.87, 7.96, 8.06, 8.16,
        8.25, 8.35, 8.45, 8.56, 8.66, 8.76, 8.87, 8.98, 9.09, 9.20, 9.31, 9.42, 9.53, 9.65, 9.76, 9.88,
    ]);
}

/// A series of resistor mantissas for a single decade, constants are provided for the standard
/// series. Every mantissa lies in `[1, 10)` and the list is strictly increasing. The value after
/// the last mantissa is the first mantissa of the next decade.
#[derive(Debug)]
pub struct RSeries {
    values: Box<[f64]>,
    // mantissas * 1000, snapped to integers where the table allows it
    milli: Box<[f64]>,
}

impl RSeries {
    /// Defines a new series from the mantissas of one decade.
    /// # Example
    /// ```
    ///     # use resistor_search::*;
    ///     let piher = RSeries::new(&[1.0, 2.0, 2.2, 2.5, 4.7, 5.0]).unwrap();
    ///     assert_eq!(piher.len(), 6);
    ///
    ///     assert!(RSeries::new(&[1.0, 10.0]).is_err());
    ///     assert!(RSeries::new(&[2.2, 1.0]).is_err());
    /// ```
    pub fn new(series: &[f64]) -> Result<Self> {
        if series.is_empty() {
            return Err(Error::InvalidSeries("no mantissas given".into()));
        }
        if let Some(m) = series.iter().find(|m| !(**m >= 1.0 && **m < 10.0)) {
            return Err(Error::InvalidSeries(format!(
                "mantissa {} is outside [1, 10)",
                m
            )));
        }
        if let Some((a, b)) = series.iter().tuple_windows().find(|(a, b)| a >= b) {
            return Err(Error::InvalidSeries(format!(
                "mantissas must be strictly increasing, {} is followed by {}",
                a, b
            )));
        }
        Ok(RSeries::from_vec(series.to_vec()))
    }

    fn from_vec(values: Vec<f64>) -> Self {
        let milli = values.iter().map(|&m| snap_milli(m)).collect::<Vec<f64>>();
        RSeries {
            values: values.into_boxed_slice(),
            milli: milli.into_boxed_slice(),
        }
    }

    fn from_table(series: &[f64]) -> Self {
        match RSeries::new(series) {
            Ok(s) => s,
            Err(e) => panic!("built-in series table is malformed: {}", e),
        }
    }

    fn extend(base: &RSeries, add: &[f64]) -> Self {
        RSeries::from_vec(
            base.iter()
                .cloned()
                .chain(add.iter().cloned())
                .sorted_by(|a, b| a.partial_cmp(b).expect("No NaNs"))
                .into_iter()
                .dedup()
                .collect(),
        )
    }

    /// The mantissas of one decade, in ascending order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of mantissas per decade.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    fn iter(&self) -> impl Iterator<Item = &f64> + Clone {
        self.values.iter()
    }

    /// Mantissa at `idx` times 1000, where `idx == len()` is the first mantissa of the next
    /// decade. Exact for tables with at most three decimals.
    pub(crate) fn milli(&self, idx: usize) -> f64 {
        if idx == self.milli.len() {
            self.milli[0] * 10.0
        } else {
            self.milli[idx]
        }
    }
}

/// `m * 1000`, snapped to the nearest integer when it is within float noise of one.
pub(crate) fn snap_milli(m: f64) -> f64 {
    let scaled = m * 1000.0;
    if (scaled - scaled.round()).abs() < 1e-6 {
        scaled.round()
    } else {
        scaled
    }
}

/// Identifies one of the built-in series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesId {
    E3,
    E6,
    E12,
    E24,
    E48,
    E96,
    E192,
}

impl SeriesId {
    pub const ALL: [SeriesId; 7] = [
        SeriesId::E3,
        SeriesId::E6,
        SeriesId::E12,
        SeriesId::E24,
        SeriesId::E48,
        SeriesId::E96,
        SeriesId::E192,
    ];

    /// The mantissa table for this series.
    pub fn series(self) -> &'static RSeries {
        match self {
            SeriesId::E3 => &*E3,
            SeriesId::E6 => &*E6,
            SeriesId::E12 => &*E12,
            SeriesId::E24 => &*E24,
            SeriesId::E48 => &*E48,
            SeriesId::E96 => &*E96,
            SeriesId::E192 => &*E192,
        }
    }

    fn count(self) -> usize {
        match self {
            SeriesId::E3 => 3,
            SeriesId::E6 => 6,
            SeriesId::E12 => 12,
            SeriesId::E24 => 24,
            SeriesId::E48 => 48,
            SeriesId::E96 => 96,
            SeriesId::E192 => 192,
        }
    }
}

impl Default for SeriesId {
    fn default() -> Self {
        SeriesId::E24
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "E{}", self.count())
    }
}

impl FromStr for SeriesId {
    type Err = Error;

    /// Accepts `e24`, `E24` or `24`.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches(|c| c == 'e' || c == 'E');
        SeriesId::ALL
            .iter()
            .find(|id| digits.parse::<usize>().ok() == Some(id.count()))
            .cloned()
            .ok_or_else(|| Error::UnknownSeries(s.to_string()))
    }
}

/// Series and error threshold shared by every search of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    series: SeriesId,
    threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            series: SeriesId::default(),
            threshold: 0.0,
        }
    }
}

impl SearchConfig {
    /// Creates a config, rejecting thresholds outside `[0, MAX_THRESHOLD]`.
    /// # Examples
    /// ```
    ///     # use resistor_search::*;
    ///     let cfg = SearchConfig::new(SeriesId::E96, 0.01).unwrap();
    ///     assert_eq!(cfg.series_id(), SeriesId::E96);
    ///
    ///     assert!(SearchConfig::new(SeriesId::E24, 0.5).is_err());
    /// ```
    pub fn new(series: SeriesId, threshold: f64) -> Result<Self> {
        Ok(SearchConfig {
            series,
            threshold: error::check_threshold(threshold)?,
        })
    }

    /// Creates a config for the given series with a zero threshold.
    pub fn for_series(series: SeriesId) -> Self {
        SearchConfig {
            series,
            ..Default::default()
        }
    }

    pub fn with_series(self, series: SeriesId) -> Self {
        SearchConfig { series, ..self }
    }

    pub fn with_threshold(self, threshold: f64) -> Result<Self> {
        SearchConfig::new(self.series, threshold)
    }

    pub fn series_id(&self) -> SeriesId {
        self.series
    }

    pub fn series(&self) -> &'static RSeries {
        self.series.series()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// See [`search::parallel_pair`].
    pub fn parallel_pair(&self, r: f64) -> Result<RRes<'static>> {
        search::parallel_pair(r, self.series(), self.threshold)
    }

    /// See [`search::series_pair`].
    pub fn series_pair(&self, r: f64) -> Result<RRes<'static>> {
        search::series_pair(r, self.series(), self.threshold)
    }

    /// See [`search::combination`].
    pub fn combination(&self, r: f64) -> Result<(RRes<'static>, RRes<'static>)> {
        search::combination(r, self.series(), self.threshold)
    }

    /// See [`search::ratio_pair`].
    pub fn ratio_pair(&self, r: f64) -> Result<RRes<'static>> {
        search::ratio_pair(r, self.series(), self.threshold)
    }

    /// See [`search::weighted_set`].
    pub fn weighted_set(&self, weights: &[f64]) -> Result<RRes<'static>> {
        search::weighted_set(weights, self.series(), self.threshold)
    }
}
