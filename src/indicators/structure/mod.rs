//! Price structure: swing pattern detection and key levels

pub mod key_levels;
pub mod market_structure;

pub use key_levels::*;
pub use market_structure::*;
