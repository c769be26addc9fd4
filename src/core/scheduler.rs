//! Cron-based scheduler driving periodic evaluation cycles

use std::str::FromStr;
use std::sync::Arc;

use cron::Schedule;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::core::runtime::SignalRuntime;
use crate::error::EngineError;

/// Convert an evaluation interval into a cron expression.
///
/// Cron format: second minute hour day month weekday. Cron steps restart at
/// every minute, hour or day boundary, so only intervals that evenly divide
/// the enclosing unit (seconds of a minute, minutes of an hour, hours of a
/// day) are accepted. Anything else would fire at an uneven cadence.
pub fn interval_to_cron(interval_seconds: u64) -> Result<String, EngineError> {
    match interval_seconds {
        0 => Err(EngineError::Config(
            "scheduler disabled: interval_seconds is 0".into(),
        )),
        1..=59 if 60 % interval_seconds == 0 => Ok(format!("*/{} * * * * *", interval_seconds)),
        60..=3599 if interval_seconds % 60 == 0 && 60 % (interval_seconds / 60) == 0 => {
            Ok(format!("0 */{} * * * *", interval_seconds / 60))
        }
        3600..=86_399 if interval_seconds % 3600 == 0 && 24 % (interval_seconds / 3600) == 0 => {
            Ok(format!("0 0 */{} * * *", interval_seconds / 3600))
        }
        86_400 => Ok("0 0 0 * * *".to_string()),
        _ => Err(EngineError::Config(format!(
            "interval of {}s does not evenly divide a minute, an hour or a day",
            interval_seconds
        ))),
    }
}

/// Scheduler that periodically runs an evaluation cycle over all tickers
pub struct JobScheduler {
    runtime: Arc<SignalRuntime>,
    schedule: Schedule,
    run_on_start: bool,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl JobScheduler {
    /// Create a new scheduler
    ///
    /// # Arguments
    /// * `runtime` - Runtime whose cycle is executed on every tick
    /// * `interval_seconds` - Evaluation interval in seconds (0 = disabled)
    pub fn new(runtime: Arc<SignalRuntime>, interval_seconds: u64) -> Result<Self, EngineError> {
        let cron_expr = interval_to_cron(interval_seconds)?;
        let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
            EngineError::Config(format!("invalid cron expression '{}': {}", cron_expr, e))
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            tickers = ?runtime.config().tickers,
            "JobScheduler: created with interval {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        Ok(Self {
            runtime,
            schedule,
            run_on_start: true,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Whether a cycle runs immediately when the scheduler starts (default true)
    pub fn with_run_on_start(mut self, run_on_start: bool) -> Self {
        self.run_on_start = run_on_start;
        self
    }

    /// Start the scheduler
    pub async fn start(&self) {
        let runtime = self.runtime.clone();
        let schedule = self.schedule.clone();
        let run_on_start = self.run_on_start;

        let handle = tokio::spawn(async move {
            if run_on_start {
                info!("JobScheduler: running initial cycle");
                runtime.run_cycle().await;
            }

            loop {
                let Some(next_tick) = schedule.upcoming(chrono::Utc).next() else {
                    warn!("JobScheduler: schedule has no upcoming tick, retrying in 60s");
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                };

                let now = chrono::Utc::now();
                if next_tick > now {
                    let duration = (next_tick - now).to_std().unwrap_or_default();
                    tokio::time::sleep(duration).await;
                }

                info!(
                    ticker_count = runtime.config().tickers.len(),
                    "JobScheduler: cron tick, evaluating {} tickers",
                    runtime.config().tickers.len()
                );
                runtime.run_cycle().await;
            }
        });

        *self.handle.write().await = Some(handle);
        info!("JobScheduler: started successfully");
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("JobScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}
