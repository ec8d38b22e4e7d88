//! Linearly weighted moving averages.

use rill_flow::{fork, fork_with_lag_or, lag_or, map, map_indexed, pipe, scan, skip};
use rust_decimal::Decimal;

use crate::core::{decimal_from_usize, ensure_period, Indicator, IndicatorError, Input};
use crate::price::value;

/// Weighted moving average; the newest input weighs `period`, the oldest `1`.
/// Lookback `period - 1`.
pub fn wma<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    Ok(pipe(value::<I>(), smooth(ensure_period("WMA", period)?)))
}

/// Hull moving average: `wma(2 * wma(n / 2) - wma(n), floor(sqrt(n)))`.
/// Lookback `period - 1 + floor(sqrt(period)) - 1`.
pub fn hma<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    if period < 2 {
        return Err(IndicatorError::invalid_period("HMA", period));
    }
    Ok(rill_flow::pipe!(
        value::<I>(),
        fork((smooth(period / 2), smooth(period))),
        map(|(half, full): (Decimal, Decimal)| half * Decimal::TWO - full),
        smooth(integer_sqrt(period)),
    ))
}

/// Decimal-input WMA stage. `period` must be non-zero.
///
/// The weighted sum is updated in constant time: each tick adds `period * input`
/// and subtracts the plain sum of the previous window.
fn smooth(period: usize) -> impl Indicator<Decimal> {
    let weight_cap = decimal_from_usize(period);
    let divisor = decimal_from_usize(period * (period + 1) / 2);
    let weighted = map_indexed(move |input: Decimal, index: usize| {
        input * decimal_from_usize(index + 1).min(weight_cap)
    });
    let previous_window = rill_flow::pipe!(
        fork_with_lag_or(period, Decimal::ZERO),
        scan(
            |total: &Decimal, (head, tail): (Decimal, Decimal), _| total + head - tail,
            Decimal::ZERO,
        ),
        lag_or(1, Decimal::ZERO),
        map_indexed(move |total: Decimal, index: usize| {
            if index < period {
                Decimal::ZERO
            } else {
                total
            }
        }),
    );
    rill_flow::pipe!(
        fork((weighted, previous_window)),
        scan(
            |sum: &Decimal, (weighted, window): (Decimal, Decimal), _| sum + weighted - window,
            Decimal::ZERO,
        ),
        skip(period - 1),
        map(move |sum: Decimal| sum / divisor),
    )
}

fn integer_sqrt(value: usize) -> usize {
    let mut root = 1;
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use rill_flow::Transformer;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn weights_recent_values_more() {
        let wma = wma::<Decimal>(3).unwrap();
        assert_eq!(wma.lookback(), 2);
        // (1*1 + 2*2 + 3*6) / 6 and (1*2 + 2*6 + 3*3) / 6.
        let outputs = wma.run([dec!(1), dec!(2), dec!(6), dec!(3)]);
        assert_eq!(outputs, vec![dec!(23) / dec!(6), dec!(23) / dec!(6)]);
    }

    #[test]
    fn slides_past_the_first_window() {
        let outputs = wma::<Decimal>(2)
            .unwrap()
            .run([dec!(3), dec!(6), dec!(9), dec!(0)]);
        assert_eq!(outputs, vec![dec!(5), dec!(8), dec!(3)]);
    }

    #[test]
    fn hull_average_on_linear_series() {
        let hma = hma::<Decimal>(4).unwrap();
        assert_eq!(hma.lookback(), 4);
        let input: Vec<Decimal> = (1..=8).map(Decimal::from).collect();
        let outputs = hma.run(input);
        assert_eq!(outputs.len(), 4);
        // The hull average tracks a linear ramp without lag.
        for (output, expected) in outputs.iter().zip(5..) {
            assert!((*output - Decimal::from(expected)).abs() < dec!(0.000001));
        }
    }

    #[test]
    fn hull_needs_two_samples() {
        assert!(hma::<Decimal>(1).is_err());
        assert!(wma::<Decimal>(0).is_err());
        assert_eq!(integer_sqrt(15), 3);
        assert_eq!(integer_sqrt(16), 4);
    }
}
