//! Rolling variance, standard deviation and Bollinger Bands.

use rill_flow::{fork, map, pipe, Transformer};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::core::{ensure_period, Indicator, IndicatorError, Input};
use crate::indicators::sma;
use crate::price::value;

/// Output value of the Bollinger Bands indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsOutput {
    /// Lower band (mean - k * std dev).
    pub lower: Decimal,
    /// Middle band (rolling mean).
    pub middle: Decimal,
    /// Upper band (mean + k * std dev).
    pub upper: Decimal,
}

/// Population variance over `period` inputs: `mean(x^2) - mean(x)^2`, floored at
/// zero. Lookback `period - 1`.
pub fn variance<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    Ok(pipe(value::<I>(), variance_stage(period)?))
}

/// Population standard deviation over `period` inputs. Lookback `period - 1`.
pub fn stddev<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    Ok(pipe(value::<I>(), stddev_stage(period)?))
}

/// Bands `scale` standard deviations around the SMA. Lookback `period - 1`.
pub fn bbands<I: Input>(
    period: usize,
    scale: Decimal,
) -> Result<impl Transformer<Input = I, Output = BollingerBandsOutput> + Clone, IndicatorError> {
    if scale.is_sign_negative() {
        return Err(IndicatorError::invalid_parameter("BollingerBands", "scale", scale));
    }
    let period = ensure_period("BollingerBands", period)?;
    Ok(rill_flow::pipe!(
        value::<I>(),
        fork((sma::smooth(period)?, stddev_stage(period)?)),
        map(move |(middle, deviation): (Decimal, Decimal)| {
            let offset = deviation * scale;
            BollingerBandsOutput {
                lower: middle - offset,
                middle,
                upper: middle + offset,
            }
        }),
    ))
}

fn variance_stage(period: usize) -> Result<impl Indicator<Decimal>, IndicatorError> {
    let period = ensure_period("variance", period)?;
    Ok(pipe(
        fork((
            pipe(map(|x: Decimal| x * x), sma::smooth(period)?),
            pipe(sma::smooth(period)?, map(|mean: Decimal| mean * mean)),
        )),
        map(|(mean_of_squares, squared_mean): (Decimal, Decimal)| {
            (mean_of_squares - squared_mean).max(Decimal::ZERO)
        }),
    ))
}

fn stddev_stage(period: usize) -> Result<impl Indicator<Decimal>, IndicatorError> {
    Ok(pipe(
        variance_stage(period)?,
        map(|variance: Decimal| variance.sqrt().unwrap_or(Decimal::ZERO)),
    ))
}
