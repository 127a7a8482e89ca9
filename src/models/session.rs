//! Trading session windows in UTC.

use serde::{Deserialize, Serialize};

/// The three overlapping FX sessions. Each window is `[start_hour, end_hour)` UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingSession {
    Asian,
    London,
    NewYork,
}

impl TradingSession {
    pub const ALL: [TradingSession; 3] = [
        TradingSession::Asian,
        TradingSession::London,
        TradingSession::NewYork,
    ];

    /// Default window for the session; overridable through
    /// [`crate::config::PipelineConfig::session_windows`].
    pub fn default_window(&self) -> (u32, u32) {
        match self {
            TradingSession::Asian => (0, 9),
            TradingSession::London => (8, 17),
            TradingSession::NewYork => (13, 22),
        }
    }
}

/// Sessions whose window contains `hour`. Windows overlap, so more than one may match.
pub fn active_sessions(hour: u32, windows: &[(TradingSession, u32, u32)]) -> Vec<TradingSession> {
    windows
        .iter()
        .filter(|(_, start, end)| hour >= *start && hour < *end)
        .map(|(session, _, _)| *session)
        .collect()
}
