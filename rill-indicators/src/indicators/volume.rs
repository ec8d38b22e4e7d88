//! Volume-weighted indicators.

use rill_core::Candle;
use rill_flow::{fork, map, map_with_last_or, pipe, scan, skip};
use rust_decimal::Decimal;

use crate::core::{ema_factor, ensure_period, ratio_or_zero, Indicator, IndicatorError};
use crate::indicators::ema;
use crate::math;
use crate::price::{close, nonzero_volume, volume};

/// On-balance volume: volume added on up closes, subtracted on down closes.
/// Lookback 0.
pub fn obv() -> impl Indicator<Candle> {
    rill_flow::pipe!(
        fork((
            pipe(close(), map_with_last_or(math::direction, Decimal::ZERO)),
            volume(),
        )),
        scan(
            |obv: &Decimal, (direction, volume): (Decimal, Decimal), _| obv + volume * direction,
            Decimal::ZERO,
        ),
    )
}

/// Accumulation/distribution line. Candles without a range leave it unchanged.
/// Lookback 0.
pub fn ad() -> impl Indicator<Candle> {
    scan(
        |ad: &Decimal, candle: Candle, _| {
            let range = candle.range();
            if range.is_zero() {
                return *ad;
            }
            let location = (candle.close - candle.low) - (candle.high - candle.close);
            ad + ratio_or_zero(location, range) * candle.volume
        },
        Decimal::ZERO,
    )
}

/// Chaikin oscillator: `ema(ad, short) - ema(ad, long)`. Lookback `long - 1`.
pub fn adosc(short: usize, long: usize) -> Result<impl Indicator<Candle>, IndicatorError> {
    let short = ensure_period("ADOSC", short)?;
    let long = ensure_period("ADOSC", long)?;
    Ok(rill_flow::pipe!(
        ad(),
        math::minus(
            ema::smooth(ema_factor(short)),
            ema::smooth(ema_factor(long))
        ),
        skip(long - 1),
    ))
}

/// Volume-weighted moving average of the close. Lookback `period - 1`.
pub fn vwma(period: usize) -> Result<impl Indicator<Candle>, IndicatorError> {
    let period = ensure_period("VWMA", period)?;
    Ok(math::ratio(
        pipe(
            map(|candle: Candle| candle.close * candle.volume),
            math::sum(period)?,
        ),
        pipe(nonzero_volume(), math::sum(period)?),
        Decimal::ONE,
    ))
}

#[cfg(test)]
mod tests {
    use rill_flow::Transformer;
    use rust_decimal_macros::dec;

    use super::*;

    fn candle(close: Decimal, volume: Decimal) -> Candle {
        Candle::new(close, close + dec!(1), close - dec!(1), close, volume)
    }

    #[test]
    fn obv_follows_close_direction() {
        let candles = vec![
            candle(dec!(10), dec!(100)),
            candle(dec!(11), dec!(200)),
            candle(dec!(11), dec!(300)),
            candle(dec!(9), dec!(400)),
        ];
        assert_eq!(
            obv().run(candles),
            vec![dec!(0), dec!(200), dec!(200), dec!(-200)]
        );
    }

    #[test]
    fn ad_weights_close_location() {
        let candles = vec![
            Candle::new(dec!(9), dec!(12), dec!(8), dec!(11), dec!(100)),
            Candle::flat(dec!(11)),
        ];
        assert_eq!(ad().run(candles), vec![dec!(50), dec!(50)]);
    }

    #[test]
    fn adosc_of_steady_line_is_zero() {
        let adosc = adosc(3, 7).unwrap();
        assert_eq!(adosc.lookback(), 6);
        let candles = vec![candle(dec!(10), dec!(5)); 8];
        assert_eq!(adosc.run(candles), vec![Decimal::ZERO; 2]);
    }

    #[test]
    fn vwma_weights_by_volume() {
        let vwma = vwma(2).unwrap();
        let outputs = vwma.run(vec![candle(dec!(10), dec!(1)), candle(dec!(20), dec!(3))]);
        assert_eq!(outputs, vec![dec!(17.5)]);
        assert!(super::vwma(0).is_err());
    }
}
