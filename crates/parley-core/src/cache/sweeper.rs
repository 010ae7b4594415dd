use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::ResponseCache;

/// Longest accepted sweep period (one year).
const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Spawn the periodic expiry sweep for `cache`.
///
/// The first sweep runs one full `period` after spawning, then every
/// `period` after that. Missed ticks are delayed rather than bunched up.
/// The task exits when `cancel` fires. Periods above one year are capped.
pub fn spawn_sweeper(
    cache: Arc<ResponseCache>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let period = period.min(MAX_PERIOD);
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Cache sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = cache.sweep();
                    debug!(removed, remaining = cache.len(), "Cache sweep finished");
                }
            }
        }
    })
}
