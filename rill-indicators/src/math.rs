//! Arithmetic building blocks shared by the indicator implementations.

use std::cmp::Ordering;

use rill_flow::{
    fork, fork_with_lag_or, map, map_indexed, map_with_last, match_distance, match_item, pipe,
    scan, skip, Transformer,
};
use rust_decimal::Decimal;

use crate::core::{decimal_from_usize, ensure_period, ratio_or_zero, Indicator, IndicatorError};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rolling sum over `period` values. Lookback `period - 1`.
pub fn sum(period: usize) -> Result<impl Indicator<Decimal>, IndicatorError> {
    let period = ensure_period("sum", period)?;
    Ok(rill_flow::pipe!(
        fork_with_lag_or(period, Decimal::ZERO),
        scan(
            |total: &Decimal, (head, tail): (Decimal, Decimal), _| total + head - tail,
            Decimal::ZERO,
        ),
        skip(period - 1),
    ))
}

/// Zero-based position of every input.
pub fn index<T>() -> impl Transformer<Input = T, Output = usize> + Clone {
    map_indexed(|_: T, index: usize| index)
}

/// Subtracts `b` from `a`, both fed the same input.
pub fn minus<I, A, B>(a: A, b: B) -> impl Indicator<I>
where
    I: Clone,
    A: Indicator<I>,
    B: Indicator<I>,
{
    pipe(fork((a, b)), map(|(a, b): (Decimal, Decimal)| a - b))
}

/// `a / b * multiplier`, zero when `b` is zero.
pub fn ratio<I, A, B>(a: A, b: B, multiplier: Decimal) -> impl Indicator<I>
where
    I: Clone,
    A: Indicator<I>,
    B: Indicator<I>,
{
    pipe(
        fork((a, b)),
        map(move |(a, b): (Decimal, Decimal)| ratio_or_zero(a, b) * multiplier),
    )
}

/// Position of `value` between `bottom` and `top`, scaled by `multiplier`:
/// `(value - bottom) / (top - bottom) * multiplier`, zero for an empty range.
pub fn stoch<I, V, T, B>(value: V, top: T, bottom: B, multiplier: Decimal) -> impl Indicator<I>
where
    I: Clone,
    V: Indicator<I>,
    T: Indicator<I>,
    B: Indicator<I>,
{
    pipe(
        fork((value, top, bottom)),
        map(move |(value, top, bottom): (Decimal, Decimal, Decimal)| {
            ratio_or_zero(value - bottom, top - bottom) * multiplier
        }),
    )
}

fn at_least(current: &Decimal, next: &Decimal) -> bool {
    next >= current
}

fn at_most(current: &Decimal, next: &Decimal) -> bool {
    next <= current
}

/// Highest value over `period` inputs. Lookback `period - 1`.
pub fn max(period: usize) -> Result<impl Indicator<Decimal>, IndicatorError> {
    let period = ensure_period("max", period)?;
    Ok(match_item(period, at_least))
}

/// Lowest value over `period` inputs. Lookback `period - 1`.
pub fn min(period: usize) -> Result<impl Indicator<Decimal>, IndicatorError> {
    let period = ensure_period("min", period)?;
    Ok(match_item(period, at_most))
}

/// Ticks since the highest value over `period` inputs. Lookback `period - 1`.
pub fn max_distance(
    period: usize,
) -> Result<impl Transformer<Input = Decimal, Output = usize> + Clone, IndicatorError> {
    let period = ensure_period("max_distance", period)?;
    Ok(match_distance(period, at_least))
}

/// Ticks since the lowest value over `period` inputs. Lookback `period - 1`.
pub fn min_distance(
    period: usize,
) -> Result<impl Transformer<Input = Decimal, Output = usize> + Clone, IndicatorError> {
    let period = ensure_period("min_distance", period)?;
    Ok(match_distance(period, at_most))
}

/// `true` on the tick where `a` moves from at-or-below `b` to above it. Lookback 1.
pub fn crossover() -> impl Transformer<Input = (Decimal, Decimal), Output = bool> + Clone {
    map_with_last(|&(a, b): &(Decimal, Decimal), &(last_a, last_b): &(Decimal, Decimal)| {
        a > b && last_a <= last_b
    })
}

/// `true` on the tick where `a` crosses `b` in either direction. Lookback 1.
pub fn crossany() -> impl Transformer<Input = (Decimal, Decimal), Output = bool> + Clone {
    map_with_last(|&(a, b): &(Decimal, Decimal), &(last_a, last_b): &(Decimal, Decimal)| {
        (a > b && last_a <= last_b) || (a < b && last_a >= last_b)
    })
}

/// Linear decay: each tick the previous level drops by `1 / period`, unless the
/// input is higher. Never negative.
pub fn decay(period: usize) -> Result<impl Indicator<Decimal>, IndicatorError> {
    let step = Decimal::ONE / decimal_from_usize(ensure_period("decay", period)?);
    Ok(scan(
        move |level: &Decimal, value: Decimal, _| value.max(level - step).max(Decimal::ZERO),
        Decimal::ZERO,
    ))
}

/// Exponential decay: each tick the previous level is scaled by
/// `(period - 1) / period`, unless the input is higher. Never negative.
pub fn edecay(period: usize) -> Result<impl Indicator<Decimal>, IndicatorError> {
    let period = ensure_period("edecay", period)?;
    let retained = decimal_from_usize(period - 1) / decimal_from_usize(period);
    Ok(scan(
        move |level: &Decimal, value: Decimal, _| value.max(level * retained).max(Decimal::ZERO),
        Decimal::ZERO,
    ))
}

/// Percentage difference relative to the long value.
pub fn diff_over_long<I, S, L>(short: S, long: L) -> impl Indicator<I>
where
    I: Clone,
    S: Indicator<I>,
    L: Indicator<I>,
{
    oscillate(short, long, diff_over_long_value)
}

/// Percentage difference relative to the short value.
pub fn diff_over_short<I, S, L>(short: S, long: L) -> impl Indicator<I>
where
    I: Clone,
    S: Indicator<I>,
    L: Indicator<I>,
{
    oscillate(short, long, diff_over_short_value)
}

/// Share of the short value in the total, as a percentage.
pub fn short_over_sum<I, S, L>(short: S, long: L) -> impl Indicator<I>
where
    I: Clone,
    S: Indicator<I>,
    L: Indicator<I>,
{
    oscillate(short, long, short_over_sum_value)
}

/// Difference over total, as a percentage.
pub fn diff_over_sum<I, S, L>(short: S, long: L) -> impl Indicator<I>
where
    I: Clone,
    S: Indicator<I>,
    L: Indicator<I>,
{
    oscillate(short, long, diff_over_sum_value)
}

fn oscillate<I, S, L>(
    short: S,
    long: L,
    formula: fn(Decimal, Decimal) -> Decimal,
) -> impl Indicator<I>
where
    I: Clone,
    S: Indicator<I>,
    L: Indicator<I>,
{
    pipe(
        fork((short, long)),
        map(move |(short, long): (Decimal, Decimal)| formula(short, long)),
    )
}

pub(crate) fn diff_over_long_value(short: Decimal, long: Decimal) -> Decimal {
    ratio_or_zero(short - long, long) * HUNDRED
}

pub(crate) fn diff_over_short_value(short: Decimal, long: Decimal) -> Decimal {
    ratio_or_zero(short - long, short) * HUNDRED
}

pub(crate) fn short_over_sum_value(short: Decimal, long: Decimal) -> Decimal {
    ratio_or_zero(short, short + long) * HUNDRED
}

pub(crate) fn diff_over_sum_value(short: Decimal, long: Decimal) -> Decimal {
    ratio_or_zero(short - long, short + long) * HUNDRED
}

/// Sign of the change from `previous` to `current` as `-1`, `0` or `1`.
pub(crate) fn direction(current: &Decimal, previous: &Decimal) -> Decimal {
    match current.cmp(previous) {
        Ordering::Greater => Decimal::ONE,
        Ordering::Less => Decimal::NEGATIVE_ONE,
        Ordering::Equal => Decimal::ZERO,
    }
}
