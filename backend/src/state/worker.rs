//! Agent worker loop
//!
//! Starting an agent flips it to `running`, logs the action and spawns a tokio
//! task that appends a heartbeat entry every interval. Stopping flips it to
//! `stopped`, logs the action and cancels the task. The registry lock is held
//! across each check-and-update so two starts can never leave two live loops.

use super::app_state::{Agent, AgentName, AgentStatus, AppState};
use crate::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Registry shared between HTTP handlers, the GUI and worker tasks
pub type SharedState = Arc<RwLock<AppState>>;

/// Log message appended when an agent is started
pub const STARTED_MESSAGE: &str = "Agent started";

/// Log message appended when an agent is stopped
pub const STOPPED_MESSAGE: &str = "Agent stopped";

/// Heartbeat message for an agent (`Listener heartbeat`)
pub fn heartbeat_message(name: AgentName) -> String {
    format!("{} heartbeat", name)
}

/// Start an agent's worker loop
///
/// A no-op when the agent is already running: no log entry is written and
/// no second worker is spawned. Must be called from within a tokio runtime.
///
/// # Returns
/// * `Ok(Agent)` - Snapshot of the agent after the action
/// * `Err(AppError)` - If the agent is not registered
pub async fn start_agent(state: &SharedState, name: AgentName) -> Result<Agent, AppError> {
    let mut guard = state.write().await;

    if guard.status(name)? == AgentStatus::Running {
        debug!(agent = %name, "Start ignored, agent already running");
        return Ok(guard.agent(name)?.clone());
    }

    guard.set_status(name, AgentStatus::Running)?;
    guard.append_log(name, STARTED_MESSAGE)?;

    let token = CancellationToken::new();
    if let Some(stale) = guard.replace_worker(name, Some(token.clone()))? {
        stale.cancel();
    }

    let interval = guard.heartbeat_interval();
    let snapshot = guard.agent(name)?.clone();
    drop(guard);

    tokio::spawn(run_worker(state.clone(), name, interval, token));
    info!(agent = %name, interval_ms = interval.as_millis() as u64, "Agent started");

    Ok(snapshot)
}

/// Stop an agent's worker loop
///
/// A no-op when the agent is not running. Does not wait for the worker task
/// to finish; the cancelled worker appends nothing further.
pub async fn stop_agent(state: &SharedState, name: AgentName) -> Result<Agent, AppError> {
    let mut guard = state.write().await;

    if guard.status(name)? != AgentStatus::Running {
        debug!(agent = %name, "Stop ignored, agent not running");
        return Ok(guard.agent(name)?.clone());
    }

    guard.set_status(name, AgentStatus::Stopped)?;
    guard.append_log(name, STOPPED_MESSAGE)?;
    if let Some(token) = guard.replace_worker(name, None)? {
        token.cancel();
    }

    info!(agent = %name, "Agent stopped");
    Ok(guard.agent(name)?.clone())
}

/// Cancel every worker loop without touching statuses or logs
pub async fn shutdown_all(state: &SharedState) {
    let tokens = state.write().await.take_all_workers();
    let count = tokens.len();
    for token in tokens {
        token.cancel();
    }
    if count > 0 {
        info!(workers = count, "Cancelled agent workers");
    }
}

async fn run_worker(
    state: SharedState,
    name: AgentName,
    period: Duration,
    token: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                let mut guard = state.write().await;
                // Re-check under the lock: stop may have won the race for it
                if token.is_cancelled() || !matches!(guard.status(name), Ok(AgentStatus::Running)) {
                    break;
                }
                if guard.append_log(name, heartbeat_message(name)).is_err() {
                    break;
                }
            }
        }
    }

    debug!(agent = %name, "Agent worker exited");
}
