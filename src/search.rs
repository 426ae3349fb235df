//! Combination searches over a resistor series.
//!
//! Every search is a bounded sweep: one value walks monotonically through the series while its
//! partner (or partners) is derived from it, so there is no backtracking. Each step is scored
//! with a relative error; every step scoring at or below the threshold is kept as a match, and
//! the lowest scoring step is kept as the best result.

use std::panic;
use std::thread;

use tracing::{debug, trace};

use crate::error::{check_positive, check_threshold, Error, Result};
use crate::{RSeries, RValue};

/// Upper bound on the denominator of a ratio search and on the smallest member of a weighted set.
pub const VALUE_CEILING: f64 = 10_000.0;

/// Value the smallest weight of a weighted set (and the denominator of a ratio) starts at.
pub const VALUE_FLOOR: f64 = 1_000.0;

/// How the values of a result are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Parallel,
    Series,
    Ratio,
    Weighted,
}

impl Topology {
    /// Separator used between the values of a set when printing.
    pub fn separator(self) -> &'static str {
        match self {
            Topology::Parallel => " || ",
            Topology::Series => " + ",
            Topology::Ratio | Topology::Weighted => " : ",
        }
    }
}

/// A binding of series values to the resistors of a combination.
#[derive(Debug, Clone, PartialEq)]
pub struct RSet<'a>(Box<[RValue<'a>]>);

impl<'a> RSet<'a> {
    /// Retrieves R{idx}, starting from R1, R2, ..., Rn
    /// # Examples
    /// ```
    ///     # use resistor_search::*;
    ///     let res = search::series_pair(150.0, &E24, 0.0).unwrap();
    ///     let set = &res.best().set;
    ///     assert_eq!(set.r(1).value() + set.r(2).value(), 150.0);
    /// ```
    pub fn r(&self, idx: usize) -> RValue<'a> {
        self.0[idx - 1]
    }

    pub fn values(&self) -> &[RValue<'a>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One scored combination.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub topology: Topology,
    pub set: RSet<'a>,
    pub error: f64,
}

/// Stores the result of a search.
#[derive(Debug, Clone)]
pub struct RRes<'a> {
    topology: Topology,
    matches: Vec<Match<'a>>,
    best: Match<'a>,
    exact_in_series: bool,
}

impl<'a> RRes<'a> {
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// The combination with the lowest error. When several share it, the first one found wins.
    pub fn best(&self) -> &Match<'a> {
        &self.best
    }

    /// Every combination whose error was within the threshold, in the order they were visited.
    pub fn matches(&self) -> &[Match<'a>] {
        &self.matches
    }

    /// True when the target of a parallel or series search is itself a value of the series, in
    /// which case the single part was skipped to look for genuine pairs.
    pub fn exact_in_series(&self) -> bool {
        self.exact_in_series
    }
}

/// Keeps the best-so-far combination and the matches under the threshold.
struct Tracker<'a> {
    topology: Topology,
    threshold: f64,
    matches: Vec<Match<'a>>,
    best: Match<'a>,
}

impl<'a> Tracker<'a> {
    fn new(topology: Topology, threshold: f64, set: &[RValue<'a>], error: f64) -> Self {
        Tracker {
            topology,
            threshold,
            matches: Vec::new(),
            best: Match {
                topology,
                set: RSet(set.into()),
                error,
            },
        }
    }

    fn offer(&mut self, set: &[RValue<'a>], error: f64) {
        trace!(?set, error, "candidate");
        if error <= self.threshold {
            self.matches.push(Match {
                topology: self.topology,
                set: RSet(set.into()),
                error,
            });
        }
        if error < self.best.error {
            self.best = Match {
                topology: self.topology,
                set: RSet(set.into()),
                error,
            };
        }
    }

    fn finish(self, exact_in_series: bool) -> RRes<'a> {
        debug!(
            topology = ?self.topology,
            matches = self.matches.len(),
            best_error = self.best.error,
            "search finished"
        );
        RRes {
            topology: self.topology,
            matches: self.matches,
            best: self.best,
            exact_in_series,
        }
    }
}

fn parallel_error(a: f64, b: f64, r: f64) -> f64 {
    ((a * b / (a + b)) / r - 1.0).abs()
}

fn series_error(a: f64, b: f64, r: f64) -> f64 {
    ((a + b) / r - 1.0).abs()
}

fn ratio_error(a: f64, b: f64, r: f64) -> f64 {
    ((a / b) / r - 1.0).abs()
}

/// The series value closest to the partner that puts `a || b` exactly on `r`. Requires `a > r`.
fn parallel_partner<'a>(a: &RValue<'a>, r: f64) -> Result<RValue<'a>> {
    let av = a.value();
    RValue::round(r / (1.0 - r / av), a.series())
}

/// Finds the best match of two parallel resistors.
///
/// The first resistor starts at the smallest series value above `r` and climbs; the second is the
/// series value nearest to the exact complement. The sweep stops once the first overtakes the
/// second, since the remaining pairs are mirror images of the visited ones. If `r` itself is in
/// the series it is skipped, so that the result is a real pair rather than one part and an open
/// circuit.
/// # Examples
/// ```
///     # use resistor_search::*;
///     let res = search::parallel_pair(12_340.0, &E24, 0.01).unwrap();
///     let best = res.best();
///     assert!(best.error < 0.01);
///     assert!(res.matches().iter().all(|m| m.error <= 0.01));
/// ```
pub fn parallel_pair<'a>(r: f64, series: &'a RSeries, threshold: f64) -> Result<RRes<'a>> {
    let r = check_positive(r)?;
    let threshold = check_threshold(threshold)?;
    debug!(target_value = r, threshold, "parallel pair search");

    let mut a = RValue::ceil(r, series)?;
    let exact = a.value() == r;
    while a.value() <= r {
        a.increment();
    }
    let mut b = parallel_partner(&a, r)?;

    let mut tracker = Tracker::new(
        Topology::Parallel,
        threshold,
        &[a, b],
        parallel_error(a.value(), b.value(), r),
    );
    while a.value() <= b.value() {
        tracker.offer(&[a, b], parallel_error(a.value(), b.value(), r));
        a.increment();
        b = parallel_partner(&a, r)?;
    }
    Ok(tracker.finish(exact))
}

/// Finds the best match of two series resistors.
///
/// Mirrors [`parallel_pair`]: the first resistor starts at the largest series value below `r`
/// and descends, the second is the series value nearest to the remainder, and the sweep stops
/// once the second overtakes the first.
pub fn series_pair<'a>(r: f64, series: &'a RSeries, threshold: f64) -> Result<RRes<'a>> {
    let r = check_positive(r)?;
    let threshold = check_threshold(threshold)?;
    debug!(target_value = r, threshold, "series pair search");

    let mut a = RValue::floor(r, series)?;
    let exact = a.value() == r;
    while a.value() >= r {
        a.decrement();
    }
    let mut b = RValue::round(r - a.value(), series)?;

    let mut tracker = Tracker::new(
        Topology::Series,
        threshold,
        &[a, b],
        series_error(a.value(), b.value(), r),
    );
    while a.value() >= b.value() {
        tracker.offer(&[a, b], series_error(a.value(), b.value(), r));
        a.decrement();
        b = RValue::round(r - a.value(), series)?;
    }
    Ok(tracker.finish(exact))
}

/// Runs [`parallel_pair`] and [`series_pair`] for the same target, side by side.
pub fn combination<'a>(
    r: f64,
    series: &'a RSeries,
    threshold: f64,
) -> Result<(RRes<'a>, RRes<'a>)> {
    let (par, ser) = thread::scope(|s| {
        let par = s.spawn(|| parallel_pair(r, series, threshold));
        let ser = series_pair(r, series, threshold);
        (par.join(), ser)
    });
    let par = par.unwrap_or_else(|e| panic::resume_unwind(e));
    Ok((par?, ser?))
}

/// Finds the best match of two resistors with the ratio `a / b ~ r`.
///
/// `b` walks the series from 1k up to and including 10k, and `a` is the series value nearest to
/// `b * r` at every step.
/// # Examples
/// ```
///     # use resistor_search::*;
///     let res = search::ratio_pair(2.0, &E24, 0.0).unwrap();
///     let best = res.best();
///     assert_eq!(best.set.r(1).value(), 2000.0);
///     assert_eq!(best.set.r(2).value(), 1000.0);
/// ```
pub fn ratio_pair<'a>(r: f64, series: &'a RSeries, threshold: f64) -> Result<RRes<'a>> {
    let r = check_positive(r)?;
    let threshold = check_threshold(threshold)?;
    debug!(ratio = r, threshold, "ratio search");

    let mut a = RValue::round(VALUE_FLOOR * r, series)?;
    let mut b = RValue::round(VALUE_FLOOR, series)?;

    let mut tracker = Tracker::new(
        Topology::Ratio,
        threshold,
        &[a, b],
        ratio_error(a.value(), b.value(), r),
    );
    while b.value() <= VALUE_CEILING {
        tracker.offer(&[a, b], ratio_error(a.value(), b.value(), r));
        b.increment();
        a = RValue::round(b.value() * r, series)?;
    }
    Ok(tracker.finish(false))
}

/// Value/weight statistics of a weighted set.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spread {
    /// Smallest value in the set.
    lowest: f64,
    /// First position holding the smallest value/weight ratio.
    min_pos: usize,
    /// `max(value/weight) / min(value/weight) - 1`
    error: f64,
}

impl Spread {
    fn of(set: &[RValue], weights: &[f64]) -> Spread {
        let mut lowest = f64::INFINITY;
        let mut min_ratio = f64::INFINITY;
        let mut max_ratio = 0.0;
        let mut min_pos = 0;
        for (i, (v, w)) in set.iter().zip(weights).enumerate() {
            let value = v.value();
            let ratio = value / w;
            if value < lowest {
                lowest = value;
            }
            if ratio < min_ratio {
                min_ratio = ratio;
                min_pos = i;
            }
            if ratio > max_ratio {
                max_ratio = ratio;
            }
        }
        Spread {
            lowest,
            min_pos,
            error: max_ratio / min_ratio - 1.0,
        }
    }
}

/// Finds the best match of `n` resistors proportional to `n` weights.
///
/// The set starts with the smallest weight mapped to 1k. At every step the resistor with the
/// lowest value/weight ratio is advanced to its next series value, until the smallest resistor
/// reaches 10k. This is a greedy walk, not an exhaustive one.
/// # Examples
/// Resistors for a 5-bit DAC ladder:
/// ```
///     # use resistor_search::*;
///     let res = search::weighted_set(&[1.0, 2.0, 4.0, 8.0, 16.0], &E24, 0.0).unwrap();
///     assert_eq!(res.best().set.len(), 5);
///     assert!(res.best().error < 0.06);
/// ```
pub fn weighted_set<'a>(weights: &[f64], series: &'a RSeries, threshold: f64) -> Result<RRes<'a>> {
    if weights.is_empty() {
        return Err(Error::EmptyWeights);
    }
    for &w in weights {
        check_positive(w)?;
    }
    let threshold = check_threshold(threshold)?;
    debug!(?weights, threshold, "weighted set search");

    let lw = weights.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut set = weights
        .iter()
        .map(|w| RValue::round(VALUE_FLOOR * w / lw, series))
        .collect::<Result<Vec<_>>>()?;

    let mut spread = Spread::of(&set, weights);
    let mut tracker = Tracker::new(Topology::Weighted, threshold, &set, spread.error);
    loop {
        tracker.offer(&set, spread.error);
        if spread.lowest >= VALUE_CEILING {
            break;
        }
        set[spread.min_pos].increment();
        spread = Spread::of(&set, weights);
    }
    Ok(tracker.finish(false))
}
