//! Shared data models spanning the pipeline layers.

pub mod candle;
pub mod conditions;
pub mod indicators;
pub mod session;
pub mod signal;
pub mod timeframe;

pub use candle::Candle;
pub use conditions::{ConditionDetail, ConditionKind, ConditionOutcome, ConditionSet};
pub use indicators::{IndicatorState, OscillatorPoint, OscillatorZone};
pub use session::TradingSession;
pub use signal::{
    AggregateSignal, Direction, Stage, StageOutcome, SymbolAnalysis, TimeframeAnalysis,
};
pub use timeframe::{StageTimeframes, Timeframe};
