//! Stateless numeric transforms over bar sequences.
//!
//! Every series-producing function returns a `Vec<Option<f64>>` aligned 1:1
//! with its input; positions inside an indicator's warm-up window are `None`,
//! never zero. Callers must treat `None` as "unavailable" and propagate the
//! absence instead of substituting a neutral value.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod pivots;
pub mod rolling;
pub mod sma;

pub use atr::atr;
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use pivots::{last_swing_low, supports};
pub use rolling::{crossed_above, crossed_below, rolling_max, rolling_min};
pub use sma::sma;
