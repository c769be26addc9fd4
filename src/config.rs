//! Environment-driven configuration

use std::env;
use std::path::PathBuf;

use crate::core::scheduler::interval_to_cron;
use crate::error::EngineError;
use crate::signals::ClassifierKind;

pub const DEFAULT_TICKERS: [&str; 4] = ["SPXL", "TQQQ", "UDOW", "SOXL"];
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Get the deployment environment (`APP_ENV`), defaulting to `sandbox`
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub tickers: Vec<String>,
    /// Seconds between evaluation cycles.
    pub eval_interval_seconds: u64,
    /// Calendar days of daily history requested per evaluation.
    /// 400 days comfortably covers the 200 trading sessions SMA(200) needs.
    pub history_days: i64,
    pub journal_dir: PathBuf,
    pub classifier: ClassifierKind,
    pub notify_webhook_url: Option<String>,
    pub yahoo_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            eval_interval_seconds: 60,
            history_days: 400,
            journal_dir: PathBuf::from("data"),
            classifier: ClassifierKind::Threshold,
            notify_webhook_url: None,
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Build configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, EngineError> {
        let defaults = Self::default();

        let port = parse_var("PORT")?.unwrap_or(defaults.port);
        let eval_interval_seconds =
            parse_var("EVAL_INTERVAL_SECONDS")?.unwrap_or(defaults.eval_interval_seconds);
        let history_days = parse_var("HISTORY_DAYS")?.unwrap_or(defaults.history_days);

        let tickers = match env::var("TICKERS") {
            Ok(raw) => parse_tickers(&raw),
            Err(_) => defaults.tickers,
        };

        let classifier = match env::var("CLASSIFIER") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.classifier,
        };

        let journal_dir = env::var("JOURNAL_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.journal_dir);

        let notify_webhook_url = env::var("NOTIFY_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let yahoo_base_url = env::var("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url);

        let config = Self {
            port,
            tickers,
            eval_interval_seconds,
            history_days,
            journal_dir,
            classifier,
            notify_webhook_url,
            yahoo_base_url,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the runtime cannot honor
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.tickers.is_empty() {
            return Err(EngineError::Config("TICKERS must name at least one ticker".into()));
        }
        if self.history_days <= 0 {
            return Err(EngineError::Config("HISTORY_DAYS must be positive".into()));
        }
        interval_to_cron(self.eval_interval_seconds).map(|_| ())
    }
}

/// Split a comma separated ticker list, normalizing to upper case
pub fn parse_tickers(raw: &str) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for ticker in raw.split(',').map(|t| t.trim().to_uppercase()) {
        if !ticker.is_empty() && !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    tickers
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, EngineError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| EngineError::Config(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(None),
    }
}
