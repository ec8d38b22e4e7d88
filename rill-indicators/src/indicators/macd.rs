//! Moving Average Convergence Divergence and the absolute/percentage price oscillators.

use rill_flow::{fork, identity, map, skip, Transformer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{ema_factor, Indicator, IndicatorError, Input};
use crate::indicators::ema;
use crate::math;
use crate::price::value;

/// MACD output (line, signal line, and histogram).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line value (fast EMA minus slow EMA).
    pub macd: Decimal,
    /// Signal line value (EMA of the MACD line).
    pub signal: Decimal,
    /// Histogram representing the distance between MACD and signal lines.
    pub histogram: Decimal,
}

fn validate(name: &'static str, periods: &[usize]) -> Result<(), IndicatorError> {
    match periods.iter().find(|period| **period == 0) {
        Some(period) => Err(IndicatorError::invalid_period(name, *period)),
        None => Ok(()),
    }
}

/// MACD with fast/slow/signal EMA periods. The classic `(12, 26)` pair uses the
/// conventional factors `0.15` and `0.075`. Lookback `slow - 1`.
pub fn macd<I: Input>(
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<impl Transformer<Input = I, Output = MacdOutput> + Clone, IndicatorError> {
    validate("MACD", &[fast, slow, signal])?;
    let (fast_factor, slow_factor) = if (fast, slow) == (12, 26) {
        (Decimal::new(15, 2), Decimal::new(75, 3))
    } else {
        (ema_factor(fast), ema_factor(slow))
    };
    Ok(rill_flow::pipe!(
        value::<I>(),
        math::minus(ema::smooth(fast_factor), ema::smooth(slow_factor)),
        skip(slow - 1),
        fork((identity(), ema::smooth(ema_factor(signal)))),
        map(|(macd, signal): (Decimal, Decimal)| MacdOutput {
            macd,
            signal,
            histogram: macd - signal,
        }),
    ))
}

/// Absolute price oscillator: `ema(fast) - ema(slow)`. Lookback 1.
pub fn apo<I: Input>(fast: usize, slow: usize) -> Result<impl Indicator<I>, IndicatorError> {
    validate("APO", &[fast, slow])?;
    Ok(rill_flow::pipe!(
        value::<I>(),
        math::minus(
            ema::smooth(ema_factor(fast)),
            ema::smooth(ema_factor(slow))
        ),
        skip(1),
    ))
}

/// Percentage price oscillator: `100 * (ema(fast) - ema(slow)) / ema(slow)`. Lookback 1.
pub fn ppo<I: Input>(fast: usize, slow: usize) -> Result<impl Indicator<I>, IndicatorError> {
    validate("PPO", &[fast, slow])?;
    Ok(rill_flow::pipe!(
        value::<I>(),
        math::diff_over_long(
            ema::smooth(ema_factor(fast)),
            ema::smooth(ema_factor(slow))
        ),
        skip(1),
    ))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn step(flat: usize, value: Decimal, jump: &[Decimal]) -> Vec<Decimal> {
        let mut series = vec![value; flat];
        series.extend_from_slice(jump);
        series
    }

    #[test]
    fn emits_after_slow_warm_up() {
        let macd = macd::<Decimal>(3, 7, 3).unwrap();
        assert_eq!(macd.lookback(), 6);
        let outputs = macd.run(step(6, dec!(2), &[dec!(10), dec!(10)]));
        assert_eq!(
            outputs,
            vec![
                MacdOutput {
                    macd: dec!(2),
                    signal: dec!(2),
                    histogram: dec!(0),
                },
                MacdOutput {
                    macd: dec!(2.5),
                    signal: dec!(2.25),
                    histogram: dec!(0.25),
                },
            ]
        );
    }

    #[test]
    fn classic_periods_use_conventional_factors() {
        let outputs = macd::<Decimal>(12, 26, 9)
            .unwrap()
            .run(step(25, Decimal::ZERO, &[dec!(100)]));
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].macd, dec!(7.5));
        assert_eq!(outputs[0].histogram, Decimal::ZERO);
    }

    #[test]
    fn oscillators_skip_the_seed_tick() {
        let input = [dec!(2), dec!(2), dec!(10)];
        assert_eq!(apo::<Decimal>(3, 7).unwrap().run(input), vec![dec!(0), dec!(2)]);
        assert_eq!(ppo::<Decimal>(3, 7).unwrap().run(input), vec![dec!(0), dec!(50)]);
    }

    #[test]
    fn rejects_zero_periods() {
        assert!(macd::<Decimal>(12, 0, 9).is_err());
        assert!(apo::<Decimal>(0, 26).is_err());
    }
}
