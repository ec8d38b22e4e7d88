//! Wilder's smoothing.

use rill_flow::{pipe, scan, skip};
use rust_decimal::Decimal;

use crate::core::{decimal_from_usize, ensure_period, Indicator, IndicatorError, Input};
use crate::price::value;

/// Wilder's moving average: seeded with the simple mean of the first `period`
/// inputs, then `previous + (input - previous) / period`. Lookback `period - 1`.
pub fn wilders<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    Ok(pipe(value::<I>(), smooth(period)?))
}

/// Decimal-input Wilder stage.
pub(crate) fn smooth(period: usize) -> Result<impl Indicator<Decimal>, IndicatorError> {
    let period = ensure_period("Wilders", period)?;
    let divisor = decimal_from_usize(period);
    Ok(pipe(
        scan(
            move |state: &Decimal, input: Decimal, index: usize| {
                if index + 1 < period {
                    state + input
                } else if index + 1 == period {
                    (state + input) / divisor
                } else {
                    state + (input - state) / divisor
                }
            },
            Decimal::ZERO,
        ),
        skip(period - 1),
    ))
}

#[cfg(test)]
mod tests {
    use rill_flow::Transformer;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn seeds_with_simple_mean() {
        let wilders = wilders::<Decimal>(4).unwrap();
        assert_eq!(wilders.lookback(), 3);
        let outputs = wilders.run([dec!(1), dec!(2), dec!(3), dec!(6), dec!(7)]);
        assert_eq!(outputs, vec![dec!(3), dec!(4)]);
    }

    #[test]
    fn period_one_tracks_input() {
        let outputs = wilders::<Decimal>(1).unwrap().run([dec!(5), dec!(9)]);
        assert_eq!(outputs, vec![dec!(5), dec!(9)]);
    }
}
