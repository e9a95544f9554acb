use crate::session::GameHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

/// Drives a session until it finishes or shutdown is requested.
///
/// The period is re-read every iteration so speed changes through the handle
/// take effect mid-run; a slow tick is skipped rather than bursted.
pub async fn run_session_loop(handle: GameHandle) {
    let mut period = handle.tick_period();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        if handle.should_shutdown() {
            info!("session shutdown requested");
            break;
        }

        let current = handle.tick_period();
        if current != period {
            period = current;
            ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        }

        if handle.step_one_tick().await {
            info!("session finished");
            break;
        }
    }
}

/// Spawns the session loop as a tokio task.
pub fn spawn_session_loop(handle: GameHandle) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run_session_loop(handle))
}
