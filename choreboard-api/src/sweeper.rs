/// Expired-session sweeper for the in-memory store
///
/// Redis expires keys on its own. The in-memory store only hides expired
/// entries on read, so a periodic sweep keeps it from growing without
/// bound.

use choreboard_shared::session::MemorySessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How often the sweeper runs by default
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Spawns the sweeper; it stops when `shutdown` is cancelled.
pub fn spawn_session_sweeper(
    store: Arc<MemorySessionStore>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::debug!("Session sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let purged = store.purge_expired().await;
                    if purged > 0 {
                        tracing::debug!(purged, "Purged expired sessions");
                    }
                }
            }
        }
    })
}
