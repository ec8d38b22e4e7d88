//! Momentum and rate-of-change indicators.

use rill_flow::{fork_with_lag, map};
use rust_decimal::Decimal;

use crate::core::{ensure_period, ratio_or_zero, Indicator, IndicatorError, Input};
use crate::price::value;

/// `input - input[period ago]`. Lookback `period`.
pub fn mom<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    let period = ensure_period("MOM", period)?;
    Ok(rill_flow::pipe!(
        value::<I>(),
        fork_with_lag(period),
        map(|(head, tail): (Decimal, Decimal)| head - tail),
    ))
}

/// `(input - input[period ago]) / input[period ago]`. Lookback `period`.
pub fn roc<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    let period = ensure_period("ROC", period)?;
    Ok(rill_flow::pipe!(
        value::<I>(),
        fork_with_lag(period),
        map(|(head, tail): (Decimal, Decimal)| ratio_or_zero(head - tail, tail)),
    ))
}

/// `input / input[period ago]`. Lookback `period`.
pub fn rocr<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    let period = ensure_period("ROCR", period)?;
    Ok(rill_flow::pipe!(
        value::<I>(),
        fork_with_lag(period),
        map(|(head, tail): (Decimal, Decimal)| ratio_or_zero(head, tail)),
    ))
}

#[cfg(test)]
mod tests {
    use rill_flow::Transformer;
    use rust_decimal_macros::dec;

    use super::*;

    fn input() -> Vec<Decimal> {
        vec![dec!(1), dec!(2), dec!(4), dec!(7)]
    }

    #[test]
    fn compares_with_lagged_value() {
        let mom = mom::<Decimal>(2).unwrap();
        assert_eq!(mom.lookback(), 2);
        assert_eq!(mom.run(input()), vec![dec!(3), dec!(5)]);
        assert_eq!(roc::<Decimal>(2).unwrap().run(input()), vec![dec!(3), dec!(2.5)]);
        assert_eq!(rocr::<Decimal>(2).unwrap().run(input()), vec![dec!(4), dec!(3.5)]);
    }

    #[test]
    fn zero_base_yields_zero_and_keeps_streaming() {
        let input = vec![dec!(0), dec!(5), dec!(10)];
        assert_eq!(rocr::<Decimal>(1).unwrap().run(input.clone()), vec![dec!(0), dec!(2)]);
        assert_eq!(roc::<Decimal>(1).unwrap().run(input.clone()), vec![dec!(0), dec!(1)]);
        assert_eq!(mom::<Decimal>(1).unwrap().run(input), vec![dec!(5), dec!(5)]);
    }

    #[test]
    fn rejects_zero_period() {
        assert!(mom::<Decimal>(0).is_err());
        assert!(roc::<Decimal>(0).is_err());
        assert!(rocr::<Decimal>(0).is_err());
    }
}
