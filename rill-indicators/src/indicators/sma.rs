//! Simple Moving Average (SMA).

use rill_flow::{map, pipe};
use rust_decimal::Decimal;

use crate::core::{decimal_from_usize, ensure_period, Indicator, IndicatorError, Input};
use crate::math;
use crate::price::value;

/// Arithmetic mean over a rolling window. Lookback `period - 1`.
pub fn sma<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    Ok(pipe(value::<I>(), smooth(period)?))
}

/// Decimal-input SMA used as a smoothing stage inside other indicators.
pub(crate) fn smooth(period: usize) -> Result<impl Indicator<Decimal>, IndicatorError> {
    let divisor = decimal_from_usize(ensure_period("SMA", period)?);
    Ok(pipe(
        math::sum(period)?,
        map(move |total: Decimal| total / divisor),
    ))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rill_core::Candle;
    use rill_flow::{Pipeline, Transformer};
    use rust_decimal::Decimal;

    use super::{sma, smooth};
    use crate::core::IndicatorError;
    use crate::price::close;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn waits_for_full_window() {
        let mut sma = sma::<Decimal>(3).unwrap().init();
        assert_eq!(sma.push(dec("1")), None);
        assert_eq!(sma.push(dec("2")), None);
        assert_eq!(sma.push(dec("3")), Some(dec("2")));
    }

    #[test]
    fn rolls_forward() {
        let outputs = sma::<Decimal>(3)
            .unwrap()
            .run(["1", "2", "3", "4", "5"].map(dec));
        assert_eq!(outputs, vec![dec("2"), dec("3"), dec("4")]);
    }

    #[test]
    fn fresh_pipelines_start_empty() {
        let sma = sma::<Decimal>(2).unwrap();
        let mut first = sma.init();
        first.push(dec("5"));
        assert_eq!(first.push(dec("7")), Some(dec("6")));
        let mut second = sma.init();
        assert_eq!(second.push(dec("9")), None);
    }

    #[test]
    fn candle_input_averages_the_close() {
        let candles = ["2", "4", "9"].map(|close| Candle::flat(dec(close)));
        let from_candles = sma::<Candle>(2).unwrap().run(candles);
        let staged = rill_flow::pipe(close(), smooth(2).unwrap()).run(candles);
        assert_eq!(from_candles, vec![dec("3"), dec("6.5")]);
        assert_eq!(from_candles, staged);
    }

    #[test]
    fn rejects_zero_period() {
        assert!(matches!(
            sma::<Decimal>(0).err(),
            Some(IndicatorError::InvalidPeriod { name: "SMA", period: 0 })
        ));
    }
}
