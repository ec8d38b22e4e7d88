//! Built-in indicator implementations provided by the crate.

pub mod aroon;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod momentum;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volume;
pub mod wilders;
pub mod wma;

pub use aroon::{aroon, aroonosc, AroonOutput};
pub use atr::{atr, natr, tr};
pub use bollinger::{bbands, stddev, variance, BollingerBandsOutput};
pub use ema::{dema, ema, ema_with_factor, tema, trix};
pub use macd::{apo, macd, ppo, MacdOutput};
pub use momentum::{mom, roc, rocr};
pub use rsi::{cmo, rsi};
pub use sma::sma;
pub use stochastic::{stoch, willr, StochOutput};
pub use volume::{ad, adosc, obv, vwma};
pub use wilders::wilders;
pub use wma::{hma, wma};
