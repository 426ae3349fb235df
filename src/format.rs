//! Printing and parsing of resistances and errors.

use std::convert::TryFrom;
use std::fmt;

use colored::Colorize;
use itertools::Itertools;
use signifix::metric::Signifix;

use crate::error::{check_threshold, Error, Result};
use crate::search::{Match, RRes, Topology};
use crate::RValue;

/// Renders a resistance with a metric prefix and four significant digits, e.g. `12.34k`.
/// # Examples
/// ```
///     # use resistor_search::format::format_value;
///     assert_eq!(format_value(0.0), "0");
///     assert!(format_value(2400.0).ends_with('k'));
/// ```
pub fn format_value(r: f64) -> String {
    if r == 0.0 {
        return "0".to_string();
    }
    match Signifix::try_from(r) {
        Ok(sig) => sig.to_string().trim_end().to_string(),
        Err(_) => format!("{}", r),
    }
}

/// Formats `v` like C's `%.2g`: two significant digits, trailing zeros dropped.
pub fn two_digits(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{}", v);
    }
    let sci = format!("{:.1e}", v);
    let mut parts = sci.splitn(2, 'e');
    let (mantissa, exp) = match (parts.next(), parts.next()) {
        (Some(m), Some(e)) => (m, e.parse::<i32>().unwrap_or(0)),
        _ => return sci.clone(),
    };
    if exp < -4 || exp >= 2 {
        let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else {
        let fixed = format!("{:.*}", (1 - exp) as usize, v);
        if fixed.contains('.') {
            fixed
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        } else {
            fixed
        }
    }
}

fn multiplier(c: char) -> Option<f64> {
    match c {
        'n' => Some(1e-9),
        'u' | 'µ' => Some(1e-6),
        'm' => Some(1e-3),
        'R' => Some(1.0),
        'k' => Some(1e3),
        'M' => Some(1e6),
        'G' => Some(1e9),
        _ => None,
    }
}

#[cfg(feature = "expr_input")]
fn eval_expr(s: &str) -> Result<f64> {
    meval::eval_str(s)
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::ParseValue(s.to_string()))
}

#[cfg(not(feature = "expr_input"))]
fn eval_expr(s: &str) -> Result<f64> {
    Err(Error::ParseValue(s.to_string()))
}

/// Parses a value such as `12.34`, `12.34k` or `12k34`. The prefix may be one of
/// `n u m R k M G`; when digits follow it, it stands in for the decimal point. With the
/// `expr_input` feature anything else is evaluated as an arithmetic expression.
/// # Examples
/// ```
///     # use resistor_search::format::parse_value;
///     assert_eq!(parse_value("4k7").unwrap(), 4700.0);
///     assert_eq!(parse_value("150").unwrap(), 150.0);
///     assert!(parse_value("12.34k56").is_err());
/// ```
pub fn parse_value(s: &str) -> Result<f64> {
    let s = s.trim();
    let parsed = match s.char_indices().find(|&(_, c)| multiplier(c).is_some()) {
        None => s.parse::<f64>().ok(),
        Some((pos, c)) => {
            let (head, tail) = (&s[..pos], &s[pos + c.len_utf8()..]);
            let mult = multiplier(c).unwrap_or(1.0);
            if head.is_empty() {
                None
            } else if tail.is_empty() {
                head.parse::<f64>().ok().map(|v| v * mult)
            } else if head.chars().all(|c| c.is_ascii_digit())
                && tail.chars().all(|c| c.is_ascii_digit())
            {
                format!("{}.{}", head, tail)
                    .parse::<f64>()
                    .ok()
                    .map(|v| v * mult)
            } else {
                None
            }
        }
    };
    match parsed {
        Some(v) => Ok(v),
        None => eval_expr(s),
    }
}

/// Parses an error threshold given as a fraction (`0.01`) or a percentage (`1%`).
/// # Examples
/// ```
///     # use resistor_search::format::parse_threshold;
///     assert_eq!(parse_threshold("5%").unwrap(), 0.05);
///     assert!(parse_threshold("20%").is_err());
/// ```
pub fn parse_threshold(s: &str) -> Result<f64> {
    let s = s.trim();
    let fail = || Error::ParseValue(s.to_string());
    let et = match s.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().map_err(|_| fail())? / 100.0,
        None => s.parse::<f64>().map_err(|_| fail())?,
    };
    check_threshold(et)
}

impl<'a> fmt::Display for RValue<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format_value(self.value()))
    }
}

impl<'a> fmt::Display for Match<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\tError: {}%",
            self.set.values().iter().join(self.topology.separator()),
            two_digits(self.error * 100.0)
        )
    }
}

impl<'a> RRes<'a> {
    fn heading(&self) -> &'static str {
        match self.topology() {
            Topology::Parallel => "The best parallel resistor combination:",
            Topology::Series => "The best series resistor combination:",
            Topology::Ratio => "The closest ratio found:",
            Topology::Weighted => "The closest match found:",
        }
    }

    /// Print every combination within the threshold, in search order.
    pub fn print_matches(&self) {
        for m in self.matches() {
            println!("{}", m);
        }
    }

    /// Print the best combination under a bold heading.
    pub fn print_best(&self) {
        println!("{}", self.heading().bold());
        println!("{}", self.best().to_string().bold());
    }

    /// Print the full report: the exact-value notice of a parallel search, the matches and the
    /// best combination.
    pub fn print(&self) {
        if self.exact_in_series() && self.topology() == Topology::Parallel {
            println!(
                "{}",
                "The input value is present in the selected series of values.".bold()
            );
            println!(
                "{}\n",
                "Attempting to find combinations without 0R or open circuit.".bold()
            );
        }
        self.print_matches();
        self.print_best();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search;
    use crate::E24;

    #[test]
    fn two_significant_digits() {
        assert_eq!(two_digits(0.0), "0");
        assert_eq!(two_digits(2.0), "2");
        assert_eq!(two_digits(0.5), "0.5");
        assert_eq!(two_digits(3.333), "3.3");
        assert_eq!(two_digits(0.01234), "0.012");
        assert_eq!(two_digits(12.6), "13");
        assert_eq!(two_digits(150.0), "1.5e+02");
        assert_eq!(two_digits(100.0), "1e+02");
        assert_eq!(two_digits(0.00001234), "1.2e-05");
    }

    #[test]
    fn parse_plain_and_prefixed() {
        assert_eq!(parse_value("12.34").unwrap(), 12.34);
        assert_eq!(parse_value(" 150 ").unwrap(), 150.0);
        assert_eq!(parse_value("1e3").unwrap(), 1000.0);
        assert_eq!(parse_value("12k").unwrap(), 12_000.0);
        assert_eq!(parse_value("2M").unwrap(), 2e6);
        assert_eq!(parse_value("4R7").unwrap(), 4.7);
        assert_eq!(parse_value("1k05").unwrap(), 1_050.0);
        assert_eq!(parse_value("100n").unwrap(), 100.0 * 1e-9);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            parse_value("12.34k56"),
            Err(Error::ParseValue("12.34k56".into()))
        );
        assert!(parse_value("k7").is_err());
        assert!(parse_value("12x").is_err());
        assert!(parse_value("").is_err());
    }

    #[cfg(feature = "expr_input")]
    #[test]
    fn parse_expression() {
        assert_eq!(parse_value("1000/4").unwrap(), 250.0);
        assert!(parse_value("1/0").is_err());
    }

    #[test]
    fn thresholds() {
        assert_eq!(parse_threshold("0.01").unwrap(), 0.01);
        assert_eq!(parse_threshold("10%").unwrap(), 0.1);
        assert_eq!(parse_threshold("0").unwrap(), 0.0);
        assert_eq!(
            parse_threshold("0.2"),
            Err(Error::ThresholdOutOfRange(0.2))
        );
        assert!(parse_threshold("abc%").is_err());
    }

    #[test]
    fn match_display() {
        let res = search::series_pair(150.0, &E24, 0.0).unwrap();
        let line = res.best().to_string();
        assert!(line.contains(" + "));
        assert!(line.ends_with("\tError: 0%"));

        let res = search::weighted_set(&[1.0, 1.0, 1.0], &E24, 0.0).unwrap();
        assert_eq!(res.best().to_string().matches(" : ").count(), 2);
    }
}
