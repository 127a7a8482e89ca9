use serde::{Deserialize, Serialize};

/// One sampling interval of OHLC prices plus traded volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time in epoch milliseconds.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns why the candle is malformed, or `None` when
    /// `low <= min(open, close) <= max(open, close) <= high` holds with positive prices.
    pub fn validation_error(&self) -> Option<String> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Some("prices must be finite".to_string());
        }
        if prices.iter().any(|p| *p <= 0.0) {
            return Some("prices must be positive".to_string());
        }
        if self.high < self.low {
            return Some(format!("high {} is below low {}", self.high, self.low));
        }
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        if self.low > body_low {
            return Some(format!("low {} is above candle body {}", self.low, body_low));
        }
        if self.high < body_high {
            return Some(format!("high {} is below candle body {}", self.high, body_high));
        }
        None
    }

    pub fn is_valid(&self) -> bool {
        self.validation_error().is_none()
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}
