//! Momentum indicators

pub mod oscillator;

pub use oscillator::*;
