// Application state management
// Contains the agent registry: per-agent status and log history

use crate::error::AppError;
use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Number of log lines the dashboard shows per agent
pub const DEFAULT_LOG_DISPLAY_LIMIT: usize = 10;

/// Default pause between two heartbeats of a running agent
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(2);

/// Shortest accepted heartbeat interval
pub const MIN_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Name of one of the simulated agents
///
/// The set is fixed; ordering follows the dashboard's display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentName {
    /// Listens for incoming work
    Listener,
    /// Plans the work
    Planner,
    /// Carries the work out
    Executor,
}

impl AgentName {
    /// Every agent, in display order
    pub const ALL: [AgentName; 3] = [AgentName::Listener, AgentName::Planner, AgentName::Executor];

    /// Display name of the agent
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentName::Listener => "Listener",
            AgentName::Planner => "Planner",
            AgentName::Executor => "Executor",
        }
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentName {
    type Err = AppError;

    /// Parse an agent name, ignoring ASCII case (`listener` works in URLs)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::UnknownAgent(s.to_string()))
    }
}

/// Agent status enumeration
/// Represents the current lifecycle state of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Agent has never been started
    Idle,
    /// Agent's worker loop is emitting heartbeats
    Running,
    /// Agent has been stopped
    Stopped,
}

impl AgentStatus {
    /// Lower-case label (`idle`, `running`, `stopped`)
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Running => "running",
            AgentStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped log line, rendered as `[HH:MM:SS] message`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    timestamp: NaiveTime,
    message: String,
}

impl LogEntry {
    /// Create an entry stamped with the current local time
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(Local::now().time(), message)
    }

    /// Create an entry with an explicit timestamp
    pub fn at(timestamp: NaiveTime, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    /// Message without the timestamp prefix
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

// Serialized as the rendered line; the entry is an opaque text record to clients
impl Serialize for LogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Agent structure
/// Holds the status, the full log history and the handle of its worker loop
#[derive(Debug, Clone)]
pub struct Agent {
    /// Name of the agent
    pub name: AgentName,
    /// Current status of the agent
    pub status: AgentStatus,
    log: Vec<LogEntry>,
    worker: Option<CancellationToken>,
}

impl Agent {
    /// Create an idle agent with an empty log
    pub fn new(name: AgentName) -> Self {
        Self {
            name,
            status: AgentStatus::Idle,
            log: Vec::new(),
            worker: None,
        }
    }

    /// The last `n` log entries, oldest first
    pub fn recent_logs(&self, n: usize) -> &[LogEntry] {
        let start = self.log.len().saturating_sub(n);
        &self.log[start..]
    }

    /// The complete log history
    pub fn logs(&self) -> &[LogEntry] {
        &self.log
    }

    /// Total number of log entries ever appended
    pub fn log_len(&self) -> usize {
        self.log.len()
    }
}

/// Main application state
/// The registry of all agents plus the dashboard settings that drive them
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry of all agents (name -> Agent)
    agents: BTreeMap<AgentName, Agent>,
    heartbeat_interval: Duration,
    log_display_limit: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(DEFAULT_HEARTBEAT_INTERVAL, DEFAULT_LOG_DISPLAY_LIMIT)
    }
}

impl AppState {
    /// Create the registry with every agent idle and default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the registry with a custom heartbeat interval and display limit
    ///
    /// The interval is raised to at least `MIN_HEARTBEAT_INTERVAL` and the
    /// limit is kept within `1..=DEFAULT_LOG_DISPLAY_LIMIT`.
    pub fn with_settings(heartbeat_interval: Duration, log_display_limit: usize) -> Self {
        Self {
            agents: AgentName::ALL
                .into_iter()
                .map(|name| (name, Agent::new(name)))
                .collect(),
            heartbeat_interval: heartbeat_interval.max(MIN_HEARTBEAT_INTERVAL),
            log_display_limit: log_display_limit.clamp(1, DEFAULT_LOG_DISPLAY_LIMIT),
        }
    }

    /// Pause between two heartbeats of a running agent
    pub fn heartbeat_interval(&self) -> Duration {
        self.heartbeat_interval
    }

    /// Number of log lines shown per agent
    pub fn log_display_limit(&self) -> usize {
        self.log_display_limit
    }

    /// Get an agent by name
    pub fn agent(&self, name: AgentName) -> Result<&Agent, AppError> {
        self.agents
            .get(&name)
            .ok_or_else(|| AppError::UnknownAgent(name.to_string()))
    }

    fn agent_mut(&mut self, name: AgentName) -> Result<&mut Agent, AppError> {
        self.agents
            .get_mut(&name)
            .ok_or_else(|| AppError::UnknownAgent(name.to_string()))
    }

    /// Current status of an agent
    pub fn status(&self, name: AgentName) -> Result<AgentStatus, AppError> {
        Ok(self.agent(name)?.status)
    }

    /// Set an agent's status
    pub fn set_status(&mut self, name: AgentName, status: AgentStatus) -> Result<(), AppError> {
        self.agent_mut(name)?.status = status;
        Ok(())
    }

    /// Append a timestamped message to an agent's log
    /// Returns the entry that was appended
    pub fn append_log(
        &mut self,
        name: AgentName,
        message: impl Into<String>,
    ) -> Result<LogEntry, AppError> {
        let entry = LogEntry::new(message);
        self.agent_mut(name)?.log.push(entry.clone());
        Ok(entry)
    }

    /// The last `n` log entries of an agent, oldest first
    pub fn recent_logs(&self, name: AgentName, n: usize) -> Result<Vec<LogEntry>, AppError> {
        Ok(self.agent(name)?.recent_logs(n).to_vec())
    }

    /// All agents in display order
    pub fn agents_list(&self) -> Vec<&Agent> {
        self.agents.values().collect()
    }

    /// Install the cancellation token of a freshly spawned worker
    /// Returns the token of the previous worker, if one was still attached
    pub(crate) fn replace_worker(
        &mut self,
        name: AgentName,
        token: Option<CancellationToken>,
    ) -> Result<Option<CancellationToken>, AppError> {
        let agent = self.agent_mut(name)?;
        Ok(std::mem::replace(&mut agent.worker, token))
    }

    /// Detach every worker token (used on shutdown)
    pub(crate) fn take_all_workers(&mut self) -> Vec<CancellationToken> {
        self.agents
            .values_mut()
            .filter_map(|agent| agent.worker.take())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        let agents = state.agents_list();
        assert_eq!(agents.len(), 3);
        assert!(agents.iter().all(|a| a.status == AgentStatus::Idle));
        assert!(agents.iter().all(|a| a.log_len() == 0));
    }

    #[test]
    fn test_with_settings_clamps_interval_and_limit() {
        let state = AppState::with_settings(Duration::ZERO, 50);
        assert_eq!(state.heartbeat_interval(), MIN_HEARTBEAT_INTERVAL);
        assert_eq!(state.log_display_limit(), DEFAULT_LOG_DISPLAY_LIMIT);

        let state = AppState::with_settings(Duration::from_secs(5), 0);
        assert_eq!(state.heartbeat_interval(), Duration::from_secs(5));
        assert_eq!(state.log_display_limit(), 1);
    }

    #[test]
    fn test_agents_list_in_display_order() {
        let state = AppState::new();
        let names: Vec<AgentName> = state.agents_list().iter().map(|a| a.name).collect();
        assert_eq!(
            names,
            vec![AgentName::Listener, AgentName::Planner, AgentName::Executor]
        );
    }

    #[test]
    fn test_agent_name_parsing() {
        assert_eq!("Listener".parse::<AgentName>().unwrap(), AgentName::Listener);
        assert_eq!("planner".parse::<AgentName>().unwrap(), AgentName::Planner);
        assert_eq!(" EXECUTOR ".parse::<AgentName>().unwrap(), AgentName::Executor);

        match "Watcher".parse::<AgentName>() {
            Err(AppError::UnknownAgent(name)) => assert_eq!(name, "Watcher"),
            other => panic!("Expected UnknownAgent error, got: {:?}", other),
        }
    }

    #[test]
    fn test_set_status() {
        let mut state = AppState::new();
        state
            .set_status(AgentName::Planner, AgentStatus::Running)
            .unwrap();
        assert_eq!(
            state.status(AgentName::Planner).unwrap(),
            AgentStatus::Running
        );
        assert_eq!(
            state.status(AgentName::Listener).unwrap(),
            AgentStatus::Idle
        );
    }

    #[test]
    fn test_log_entry_format() {
        let time = NaiveTime::from_hms_opt(9, 5, 3).unwrap();
        let entry = LogEntry::at(time, "Agent started");
        assert_eq!(entry.to_string(), "[09:05:03] Agent started");
        assert_eq!(entry.message(), "Agent started");
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            "\"[09:05:03] Agent started\""
        );
    }

    #[test]
    fn test_append_log_is_timestamped() {
        let mut state = AppState::new();
        let entry = state
            .append_log(AgentName::Executor, "Executor heartbeat")
            .unwrap();
        let line = entry.to_string();
        // "[HH:MM:SS] " prefix
        assert_eq!(&line[0..1], "[");
        assert_eq!(&line[9..11], "] ");
        assert!(line.ends_with("Executor heartbeat"));
        assert_eq!(state.agent(AgentName::Executor).unwrap().log_len(), 1);
    }

    #[test]
    fn test_recent_logs_truncates_to_last_n() {
        let mut state = AppState::new();
        for i in 0..25 {
            state
                .append_log(AgentName::Listener, format!("line {}", i))
                .unwrap();
        }

        let recent = state
            .recent_logs(AgentName::Listener, DEFAULT_LOG_DISPLAY_LIMIT)
            .unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].message(), "line 15");
        assert_eq!(recent[9].message(), "line 24");

        // Full history is kept
        assert_eq!(state.agent(AgentName::Listener).unwrap().log_len(), 25);
    }

    #[test]
    fn test_recent_logs_short_history() {
        let mut state = AppState::new();
        state.append_log(AgentName::Planner, "only").unwrap();
        let recent = state.recent_logs(AgentName::Planner, 10).unwrap();
        assert_eq!(recent.len(), 1);
        assert!(state
            .recent_logs(AgentName::Listener, 10)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AgentStatus::Running).unwrap(),
            "\"running\""
        );
        assert_eq!(AgentStatus::Stopped.to_string(), "stopped");
    }

    #[test]
    fn test_replace_worker_returns_previous() {
        let mut state = AppState::new();
        let first = CancellationToken::new();
        assert!(state
            .replace_worker(AgentName::Listener, Some(first.clone()))
            .unwrap()
            .is_none());

        let previous = state
            .replace_worker(AgentName::Listener, Some(CancellationToken::new()))
            .unwrap();
        assert!(previous.is_some());

        assert_eq!(state.take_all_workers().len(), 1);
        assert!(state.take_all_workers().is_empty());
    }
}
