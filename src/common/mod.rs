//! Numeric helpers and the injectable clock.

pub mod clock;
pub mod math;

pub use clock::{Clock, FixedClock, SystemClock};
