//! External collaborators: candle feeds and the notification channel.

pub mod market_data;
pub mod notifier;
pub mod simulated;

pub use market_data::{CandleFeed, FeedEvent, ReplayFeed};
pub use notifier::{format_signal_message, AlertFields, LogNotifier, Notifier, WebhookNotifier};
pub use simulated::SimulatedFeed;
