//! Shared traits, errors and numeric helpers.

use num_traits::FromPrimitive;
use rill_flow::Transformer;
use rust_decimal::Decimal;
use thiserror::Error;

pub use rill_core::Input;

/// A cloneable transformer producing one decimal per emitted tick.
///
/// Blanket-implemented, so every composition of combinators with a decimal output
/// qualifies. Indicator constructors return `impl Indicator<I>`.
pub trait Indicator<I>: Transformer<Input = I, Output = Decimal> + Clone {}

impl<I, T> Indicator<I> for T where T: Transformer<Input = I, Output = Decimal> + Clone {}

/// Errors raised while configuring indicators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    /// The lookback period is invalid for the indicator.
    #[error("{name} period must be greater than zero (got {period})")]
    InvalidPeriod {
        /// Indicator name.
        name: &'static str,
        /// Requested period.
        period: usize,
    },
    /// A non-period parameter is outside its accepted range.
    #[error("{name} parameter `{parameter}` is invalid: {value}")]
    InvalidParameter {
        /// Indicator name.
        name: &'static str,
        /// Parameter name.
        parameter: &'static str,
        /// Rejected value.
        value: String,
    },
    /// A preset was asked to build a pipeline without any indicators.
    #[error("preset contains no indicators")]
    EmptyPreset,
}

impl IndicatorError {
    /// Helper for constructing an [`IndicatorError::InvalidPeriod`].
    pub fn invalid_period(name: &'static str, period: usize) -> Self {
        Self::InvalidPeriod { name, period }
    }

    /// Helper for constructing an [`IndicatorError::InvalidParameter`].
    pub fn invalid_parameter(
        name: &'static str,
        parameter: &'static str,
        value: impl ToString,
    ) -> Self {
        Self::InvalidParameter {
            name,
            parameter,
            value: value.to_string(),
        }
    }
}

/// Rejects a zero period.
pub(crate) fn ensure_period(name: &'static str, period: usize) -> Result<usize, IndicatorError> {
    if period == 0 {
        Err(IndicatorError::invalid_period(name, period))
    } else {
        Ok(period)
    }
}

/// Converts a window length into a decimal divisor.
pub(crate) fn decimal_from_usize(value: usize) -> Decimal {
    Decimal::from_usize(value).unwrap_or(Decimal::MAX)
}

/// Divides, yielding zero when the denominator is zero.
pub(crate) fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Smoothing factor `2 / (period + 1)` used by exponential averages.
pub(crate) fn ema_factor(period: usize) -> Decimal {
    Decimal::TWO / decimal_from_usize(period + 1)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn errors_render_their_context() {
        let err = IndicatorError::invalid_period("SMA", 0);
        assert_eq!(err.to_string(), "SMA period must be greater than zero (got 0)");
        let err = IndicatorError::invalid_parameter("EMA", "factor", dec!(1.5));
        assert_eq!(err.to_string(), "EMA parameter `factor` is invalid: 1.5");
    }

    #[test]
    fn division_by_zero_falls_back_to_zero() {
        assert_eq!(ratio_or_zero(dec!(3), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(ratio_or_zero(dec!(3), dec!(2)), dec!(1.5));
        assert_eq!(ema_factor(3), dec!(0.5));
    }
}
