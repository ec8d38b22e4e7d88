//! Stochastic oscillator and Williams %R.

use rill_core::Candle;
use rill_flow::{fork, identity, map, pipe, Transformer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{ensure_period, Indicator, IndicatorError};
use crate::indicators::sma;
use crate::math;
use crate::price::{close, high, low};

/// Smoothed %K and its %D signal line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochOutput {
    /// Smoothed position of the close within the recent range, 0 to 100.
    pub k: Decimal,
    /// Moving average of `k`.
    pub d: Decimal,
}

/// Stochastic oscillator. Raw %K compares the close with the high/low range of the
/// last `k_period` candles, is smoothed by an SMA of `k_slowing`, and %D is an SMA of
/// `d_period` over the smoothed %K. Lookback `k_period + k_slowing + d_period - 3`.
pub fn stoch(
    k_period: usize,
    k_slowing: usize,
    d_period: usize,
) -> Result<impl Transformer<Input = Candle, Output = StochOutput> + Clone, IndicatorError> {
    let k_period = ensure_period("Stoch", k_period)?;
    Ok(rill_flow::pipe!(
        math::stoch(
            close(),
            pipe(high(), math::max(k_period)?),
            pipe(low(), math::min(k_period)?),
            Decimal::ONE_HUNDRED,
        ),
        sma::smooth(k_slowing)?,
        fork((identity(), sma::smooth(d_period)?)),
        map(|(k, d): (Decimal, Decimal)| StochOutput { k, d }),
    ))
}

/// Williams %R: `-100 * (highest high - close) / (highest high - lowest low)`.
/// Lookback `period - 1`.
pub fn willr(period: usize) -> Result<impl Indicator<Candle>, IndicatorError> {
    let period = ensure_period("WillR", period)?;
    Ok(math::stoch(
        close(),
        pipe(low(), math::min(period)?),
        pipe(high(), math::max(period)?),
        -Decimal::ONE_HUNDRED,
    ))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn candles() -> Vec<Candle> {
        vec![
            Candle::new(dec!(9), dec!(10), dec!(8), dec!(9), dec!(1)),
            Candle::new(dec!(9), dec!(12), dec!(9), dec!(11), dec!(1)),
            Candle::new(dec!(11), dec!(11), dec!(7), dec!(8), dec!(1)),
        ]
    }

    #[test]
    fn k_and_d_line_up() {
        let stoch = stoch(2, 1, 2).unwrap();
        assert_eq!(stoch.lookback(), 2);
        assert_eq!(
            stoch.run(candles()),
            vec![StochOutput {
                k: dec!(20),
                d: dec!(47.5),
            }]
        );
    }

    #[test]
    fn williams_r_is_negative() {
        let outputs = willr(2).unwrap().run(candles());
        assert_eq!(outputs, vec![dec!(-25), dec!(-80)]);
    }

    #[test]
    fn rejects_zero_periods() {
        assert!(stoch(0, 3, 3).is_err());
        assert!(stoch(14, 0, 3).is_err());
        assert!(willr(0).is_err());
    }
}
