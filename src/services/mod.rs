//! External collaborators: market data retrieval and notification delivery.

pub mod market_data;
pub mod notifier;
pub mod yahoo;

pub use market_data::{HistoryInterval, MarketDataProvider};
pub use notifier::{LogNotifier, Notifier, WebhookNotifier};
pub use yahoo::YahooFinanceProvider;
