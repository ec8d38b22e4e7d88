//! Exponential Moving Average (EMA) and its multi-pass variants.

use rill_flow::{fork, fork_with_lag, map, pipe, scan, skip};
use rust_decimal::Decimal;

use crate::core::{ema_factor, ensure_period, Indicator, IndicatorError, Input};
use crate::math::diff_over_short_value;
use crate::price::value;

/// EMA with smoothing factor `2 / (period + 1)`, seeded with the first input.
/// Lookback 0.
pub fn ema<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    let period = ensure_period("EMA", period)?;
    ema_with_factor(ema_factor(period))
}

/// EMA with an explicit smoothing factor in `(0, 1]`. Lookback 0.
pub fn ema_with_factor<I: Input>(factor: Decimal) -> Result<impl Indicator<I>, IndicatorError> {
    if factor <= Decimal::ZERO || factor > Decimal::ONE {
        return Err(IndicatorError::invalid_parameter("EMA", "factor", factor));
    }
    Ok(pipe(value::<I>(), smooth(factor)))
}

/// Decimal-input EMA stage.
pub(crate) fn smooth(factor: Decimal) -> impl Indicator<Decimal> {
    let retained = Decimal::ONE - factor;
    scan(
        move |ema: &Decimal, input: Decimal, index: usize| {
            if index == 0 {
                input
            } else {
                input * factor + ema * retained
            }
        },
        Decimal::ZERO,
    )
}

fn double(period: usize, factor: Decimal) -> impl Indicator<Decimal> {
    rill_flow::pipe!(
        smooth(factor),
        skip(period - 1),
        smooth(factor),
        skip(period - 1),
    )
}

fn triple(period: usize, factor: Decimal) -> impl Indicator<Decimal> {
    rill_flow::pipe!(double(period, factor), smooth(factor), skip(period - 1))
}

/// Double EMA: `2 * ema - ema(ema)`. Lookback `2 * (period - 1)`.
pub fn dema<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    let period = ensure_period("DEMA", period)?;
    let factor = ema_factor(period);
    Ok(rill_flow::pipe!(
        value::<I>(),
        fork((smooth(factor), double(period, factor))),
        map(|(ema1, ema2): (Decimal, Decimal)| ema1 * Decimal::TWO - ema2),
    ))
}

/// Triple EMA: `3 * ema - 3 * ema(ema) + ema(ema(ema))`. Lookback `3 * (period - 1)`.
pub fn tema<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    let period = ensure_period("TEMA", period)?;
    let factor = ema_factor(period);
    let three = Decimal::from(3);
    Ok(rill_flow::pipe!(
        value::<I>(),
        fork((
            smooth(factor),
            double(period, factor),
            triple(period, factor)
        )),
        map(move |(ema1, ema2, ema3): (Decimal, Decimal, Decimal)| {
            ema1 * three - ema2 * three + ema3
        }),
    ))
}

/// Percentage rate of change of the triple EMA. Lookback `3 * (period - 1) + 1`.
pub fn trix<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    let period = ensure_period("TRIX", period)?;
    Ok(rill_flow::pipe!(
        value::<I>(),
        triple(period, ema_factor(period)),
        fork_with_lag(1),
        map(|(current, previous): (Decimal, Decimal)| diff_over_short_value(current, previous)),
    ))
}
