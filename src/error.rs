use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported for invalid input. None of these are transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("resistance must not be negative, got {0}")]
    NegativeValue(f64),

    #[error("value must be greater than zero, got {0}")]
    NonPositive(f64),

    #[error("value must be finite, got {0}")]
    NonFinite(f64),

    #[error("error threshold must be within [0, {max}], got {0}", max = crate::MAX_THRESHOLD)]
    ThresholdOutOfRange(f64),

    #[error("at least one weight is required")]
    EmptyWeights,

    #[error("invalid series: {0}")]
    InvalidSeries(String),

    #[error("unknown series '{0}', expected one of e3, e6, e12, e24, e48, e96, e192")]
    UnknownSeries(String),

    #[error("can't parse '{0}' as a value")]
    ParseValue(String),

    #[error("voltage divider weight derivation is not supported")]
    DividerUnsupported,
}

/// Rejects NaN and infinities.
pub(crate) fn check_finite(x: f64) -> Result<f64> {
    if x.is_finite() {
        Ok(x)
    } else {
        Err(Error::NonFinite(x))
    }
}

/// Rejects anything that isn't a finite number strictly above zero.
pub(crate) fn check_positive(x: f64) -> Result<f64> {
    let x = check_finite(x)?;
    if x > 0.0 {
        Ok(x)
    } else {
        Err(Error::NonPositive(x))
    }
}

pub(crate) fn check_threshold(et: f64) -> Result<f64> {
    if (0.0..=crate::MAX_THRESHOLD).contains(&et) {
        Ok(et)
    } else {
        Err(Error::ThresholdOutOfRange(et))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_checks() {
        assert_eq!(check_positive(1.5), Ok(1.5));
        assert_eq!(check_positive(0.0), Err(Error::NonPositive(0.0)));
        assert_eq!(check_positive(-2.0), Err(Error::NonPositive(-2.0)));
        assert!(matches!(
            check_positive(std::f64::NAN),
            Err(Error::NonFinite(_))
        ));
        assert_eq!(
            check_positive(std::f64::INFINITY),
            Err(Error::NonFinite(std::f64::INFINITY))
        );
    }

    #[test]
    fn threshold_range() {
        assert_eq!(check_threshold(0.0), Ok(0.0));
        assert_eq!(check_threshold(0.101), Ok(0.101));
        assert_eq!(check_threshold(0.2), Err(Error::ThresholdOutOfRange(0.2)));
        assert_eq!(check_threshold(-0.01), Err(Error::ThresholdOutOfRange(-0.01)));
        assert!(check_threshold(std::f64::NAN).is_err());
    }

    #[test]
    fn messages() {
        assert_eq!(
            Error::ThresholdOutOfRange(0.5).to_string(),
            "error threshold must be within [0, 0.101], got 0.5"
        );
        assert_eq!(
            Error::UnknownSeries("e7".into()).to_string(),
            "unknown series 'e7', expected one of e3, e6, e12, e24, e48, e96, e192"
        );
    }
}
