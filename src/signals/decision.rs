//! Risk parameters attached to an emitted signal.

use crate::models::Direction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopLossTakeProfit {
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Reward distance over risk distance.
    pub risk_reward: f64,
}

impl StopLossTakeProfit {
    /// Fixed price offsets around the entry: buys risk below and target above,
    /// sells the reverse. Neutral has no risk parameters.
    pub fn from_offsets(
        direction: Direction,
        entry: f64,
        stop_offset: f64,
        target_offset: f64,
    ) -> Option<Self> {
        let (stop_loss, take_profit) = match direction {
            Direction::Buy => (entry - stop_offset, entry + target_offset),
            Direction::Sell => (entry + stop_offset, entry - target_offset),
            Direction::Neutral => return None,
        };
        let risk_reward = if stop_offset > 0.0 {
            target_offset / stop_offset
        } else {
            0.0
        };
        Some(Self {
            stop_loss,
            take_profit,
            risk_reward,
        })
    }
}
