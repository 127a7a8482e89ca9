//! Signal pipeline: conditions, multi-timeframe aggregation, scoring and emission.

pub mod aggregation;
pub mod conditions;
pub mod decision;
pub mod emitter;
pub mod engine;
pub mod scoring;

pub use aggregation::*;
pub use conditions::*;
pub use decision::*;
pub use emitter::*;
pub use engine::*;
pub use scoring::*;
