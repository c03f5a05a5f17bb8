//! Elapsed-time ticker for an in-flight generation.
//!
//! Purely informational: it logs on its own cadence and never touches the
//! generation itself. Stopping (or dropping) aborts the background task.

use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::info;

const MIN_CADENCE: Duration = Duration::from_millis(10);

pub struct ProgressTicker {
    started: Instant,
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    /// Spawns the ticker. Must be called inside a tokio runtime.
    pub fn start(label: &str, cadence: Duration) -> Self {
        let started = Instant::now();
        let cadence = cadence.max(MIN_CADENCE);
        let label = label.to_string();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(cadence);
            interval.tick().await; // first tick completes immediately
            loop {
                interval.tick().await;
                info!(
                    "{label}: generating… {:.1}s elapsed",
                    started.elapsed().as_secs_f64()
                );
            }
        });

        Self {
            started,
            handle: Some(handle),
        }
    }

    /// Stops ticking and returns the total elapsed time.
    pub fn stop(mut self) -> Duration {
        self.abort();
        self.started.elapsed()
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_alive(ticker: &ProgressTicker) -> bool {
        ticker.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    #[tokio::test]
    async fn test_ticker_runs_until_stopped() {
        let ticker = ProgressTicker::start("test", Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(35)).await;
        assert!(task_alive(&ticker));

        let elapsed = ticker.stop();
        assert!(elapsed >= Duration::from_millis(35));
    }

    #[tokio::test]
    async fn test_zero_cadence_is_clamped() {
        // tokio::time::interval panics on a zero period.
        let ticker = ProgressTicker::start("test", Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(task_alive(&ticker));
        drop(ticker);
    }
}
