//! Scheduled warm-up worker: warms every configured region at start, then
//! once a day at the configured UTC hour. A failed pass retries after an
//! hour. Shutdown is signalled through a watch channel and observed inside
//! every sleep.

use crate::constants::WARMUP_RETRY_DELAY;
use crate::error::Result;
use crate::runtime::Runtime;
use crate::trending::TrendingActor;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub struct WarmupWorker {
    trending: Arc<Runtime<TrendingActor>>,
    regions: Vec<String>,
    hour_utc: u32,
}

impl WarmupWorker {
    pub fn new(trending: Arc<Runtime<TrendingActor>>, regions: Vec<String>, hour_utc: u32) -> Self {
        Self {
            trending,
            regions,
            hour_utc,
        }
    }

    /// Spawn the worker loop. Dropping `true` into the shutdown channel
    /// stops it at the next sleep or between regions.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let pause = match self.run_all().await {
                    Ok(()) => {
                        let wait = until_next_run(Utc::now(), self.hour_utc);
                        info!(seconds = wait.as_secs(), "warm-up pass done, sleeping to next run");
                        wait
                    }
                    Err(e) => {
                        warn!(error = %e, "warm-up pass failed, retrying in an hour");
                        WARMUP_RETRY_DELAY
                    }
                };
                tokio::select! {
                    () = tokio::time::sleep(pause) => {}
                    changed = shutdown.changed() => {
                        // A dropped sender means the process is going away.
                        if changed.is_err() || *shutdown.borrow() {
                            info!("warm-up worker shutting down");
                            return;
                        }
                    }
                }
            }
        })
    }

    async fn run_all(&self) -> Result<()> {
        for region in &self.regions {
            self.trending.warm_up(region).await?;
        }
        Ok(())
    }
}

/// Time until the next occurrence of `hour_utc:00:00`.
fn until_next_run(now: DateTime<Utc>, hour_utc: u32) -> Duration {
    let today_run = now
        .date_naive()
        .and_hms_opt(hour_utc, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(now);
    let next = if now < today_run {
        today_run
    } else {
        today_run + ChronoDuration::days(1)
    };
    (next - now).to_std().unwrap_or(Duration::from_secs(60 * 60))
}

/// Convenience for the common shape: worker plus its shutdown sender.
pub fn spawn_warmup(
    trending: Arc<Runtime<TrendingActor>>,
    regions: Vec<String>,
    hour_utc: u32,
) -> (watch::Sender<bool>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(false);
    let handle = WarmupWorker::new(trending, regions, hour_utc).spawn(rx);
    (tx, handle)
}
