//! Notification channel for emitted signals (SMS gateway, webhook, log).

use crate::error::NotificationError;
use crate::models::AggregateSignal;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::info;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, signal: &AggregateSignal) -> Result<(), NotificationError>;
}

/// Alert prices always carry five decimals so the absolute SL/TP offsets stay
/// visible on large quotes such as XAUUSD.
pub fn format_price(price: f64) -> String {
    format!("{:.5}", price)
}

/// Display-ready fields of an alert message.
#[derive(Debug, Clone, Default)]
pub struct AlertFields {
    pub direction: String,
    pub symbol: String,
    pub price: String,
    pub strength: String,
    pub conditions: Vec<String>,
    pub stop_loss: String,
    pub take_profit: String,
    pub time: String,
}

impl AlertFields {
    /// SMS body. Lists at most three conditions.
    pub fn render(&self) -> String {
        let marker = match self.direction.as_str() {
            "BUY" => "🟢",
            _ => "🔴",
        };
        let conditions = if self.conditions.is_empty() {
            "N/A".to_string()
        } else {
            self.conditions
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "{} TRADING SIGNAL\n{} {}\nPrice: {}\nStrength: {}%\nConditions: {}\nSL: {}\nTP: {}\nTime: {}",
            marker,
            self.direction,
            self.symbol,
            self.price,
            self.strength,
            conditions,
            self.stop_loss,
            self.take_profit,
            self.time
        )
    }
}

impl From<&AggregateSignal> for AlertFields {
    fn from(signal: &AggregateSignal) -> Self {
        Self {
            direction: signal.direction.to_string(),
            symbol: signal.symbol.clone(),
            price: format_price(signal.entry_price),
            strength: signal.strength.to_string(),
            conditions: signal
                .conditions
                .iter()
                .map(|c| c.label().to_string())
                .collect(),
            stop_loss: format_price(signal.stop_loss),
            take_profit: format_price(signal.take_profit),
            time: signal
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        }
    }
}

/// Renders the SMS body for a signal.
pub fn format_signal_message(signal: &AggregateSignal) -> String {
    AlertFields::from(signal).render()
}

/// Writes alerts to the log instead of delivering them.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    recipient: String,
}

impl LogNotifier {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, signal: &AggregateSignal) -> Result<(), NotificationError> {
        info!(
            to = %self.recipient,
            symbol = %signal.symbol,
            signal_id = signal.id,
            message = %format_signal_message(signal),
            "SMS alert sent"
        );
        Ok(())
    }
}

/// POSTs alerts as JSON to an HTTP endpoint such as an SMS gateway.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    recipient: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, recipient: impl Into<String>) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(url, recipient, client))
    }

    pub fn with_client(
        url: impl Into<String>,
        recipient: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            url: url.into(),
            recipient: recipient.into(),
            client,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, signal: &AggregateSignal) -> Result<(), NotificationError> {
        let body = json!({
            "to": self.recipient,
            "message": format_signal_message(signal),
            "signal": signal,
        });

        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
