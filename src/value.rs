use std::fmt;
use std::ptr;

use crate::error::{check_finite, Error, Result};
use crate::{snap_milli, RSeries};

/// A resistance drawn from a series: `mantissa[index] * 10^exponent`, or zero.
///
/// Values are only created by rounding an arbitrary number onto a series, and only move by
/// stepping to the neighbouring series value, so `index` always points into the series table.
#[derive(Clone, Copy)]
pub struct RValue<'a> {
    series: &'a RSeries,
    index: usize,
    exponent: i32,
    zero: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Policy {
    Nearest,
    Ceil,
    Floor,
}

/// `x * 10^e`, dividing for negative exponents so exact decades stay exact.
pub(crate) fn shift(x: f64, e: i32) -> f64 {
    // 10^e overflows past 308, and subnormal inputs shift further than that
    const STEP: i32 = 300;
    if e > STEP {
        shift(x * 1e300, e - STEP)
    } else if e < -STEP {
        shift(x / 1e300, e + STEP)
    } else if e >= 0 {
        x * 10f64.powi(e)
    } else {
        x / 10f64.powi(-e)
    }
}

/// Splits `x > 0` into a mantissa in `[1, 10)` and a decade exponent.
fn normalize(x: f64) -> (f64, i32) {
    let mut e = x.log10().floor() as i32;
    let mut m = shift(x, -e);
    // log10 can land on the wrong side of a decade boundary
    if m < 1.0 {
        e -= 1;
        m = shift(x, -e);
    } else if m >= 10.0 {
        e += 1;
        m = shift(x, -e);
    }
    assert!(
        m >= 1.0 && m < 10.0,
        "mantissa {} of {} escaped the decade",
        m,
        x
    );
    (m, e)
}

impl<'a> RValue<'a> {
    /// The zero sentinel for `series`.
    pub fn zero(series: &'a RSeries) -> Self {
        RValue {
            series,
            index: 0,
            exponent: 0,
            zero: true,
        }
    }

    /// Rounds `x` to the series value with the smallest multiplicative distance from it. When
    /// both neighbours are equally far the lower one wins.
    /// # Examples
    /// ```
    ///     # use resistor_search::*;
    ///     assert_eq!(RValue::round(12_340.0, &E24).unwrap().value(), 12_000.0);
    ///     assert_eq!(RValue::round(0.0, &E24).unwrap().value(), 0.0);
    ///     assert!(RValue::round(-1.0, &E24).is_err());
    /// ```
    pub fn round(x: f64, series: &'a RSeries) -> Result<Self> {
        RValue::convert(x, series, Policy::Nearest)
    }

    /// Rounds `x` up to the smallest series value that is not below it.
    pub fn ceil(x: f64, series: &'a RSeries) -> Result<Self> {
        RValue::convert(x, series, Policy::Ceil)
    }

    /// Rounds `x` down to the largest series value that is not above it.
    pub fn floor(x: f64, series: &'a RSeries) -> Result<Self> {
        RValue::convert(x, series, Policy::Floor)
    }

    fn convert(x: f64, series: &'a RSeries, policy: Policy) -> Result<Self> {
        let x = check_finite(x)?;
        if x < 0.0 {
            return Err(Error::NegativeValue(x));
        }
        if x == 0.0 {
            return Ok(RValue::zero(series));
        }

        // compare in the units of the table so that series values match exactly
        let (m, e) = normalize(x);
        let m = snap_milli(m);
        let n = series.len();
        let i = (0..=n)
            .find(|&i| series.milli(i) >= m)
            .unwrap_or_else(|| unreachable!("no mantissa of the series reaches {}", m));

        let mut ret = RValue {
            series,
            index: i,
            exponent: e,
            zero: false,
        };
        let above = series.milli(i);
        let below = if i == 0 {
            series.milli(n - 1) / 10.0
        } else {
            series.milli(i - 1)
        };
        let take_below = match policy {
            Policy::Ceil => false,
            Policy::Floor => above > m,
            Policy::Nearest => above > m && m / below <= above / m,
        };
        if take_below {
            if i == 0 {
                ret.index = n - 1;
                ret.exponent -= 1;
            } else {
                ret.index = i - 1;
            }
        }
        if ret.index == n {
            ret.index = 0;
            ret.exponent += 1;
        }
        Ok(ret)
    }

    /// Steps to the next larger value of the series, moving into the next decade after the last
    /// mantissa. The zero sentinel doesn't move.
    pub fn increment(&mut self) {
        if self.zero {
            return;
        }
        self.index += 1;
        if self.index >= self.series.len() {
            self.index = 0;
            self.exponent += 1;
        }
    }

    /// Steps to the next smaller value of the series. The zero sentinel doesn't move.
    pub fn decrement(&mut self) {
        if self.zero {
            return;
        }
        if self.index == 0 {
            self.index = self.series.len() - 1;
            self.exponent -= 1;
        } else {
            self.index -= 1;
        }
    }

    pub fn next(mut self) -> Self {
        self.increment();
        self
    }

    pub fn prev(mut self) -> Self {
        self.decrement();
        self
    }

    /// The resistance this value stands for.
    pub fn value(&self) -> f64 {
        if self.zero {
            0.0
        } else {
            shift(self.series.milli(self.index), self.exponent - 3)
        }
    }

    pub fn series(&self) -> &'a RSeries {
        self.series
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_zero(&self) -> bool {
        self.zero
    }
}

impl<'a> PartialEq for RValue<'a> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.series, other.series)
            && self.zero == other.zero
            && self.index == other.index
            && self.exponent == other.exponent
    }
}

impl<'a> fmt::Debug for RValue<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RValue")
            .field("index", &self.index)
            .field("exponent", &self.exponent)
            .field("zero", &self.zero)
            .field("value", &self.value())
            .finish()
    }
}
