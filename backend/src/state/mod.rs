// State management module
// Handles the agent registry and its worker loops

pub mod app_state;
pub mod worker;

pub use app_state::{
    Agent, AgentName, AgentStatus, AppState, LogEntry, DEFAULT_HEARTBEAT_INTERVAL,
    DEFAULT_LOG_DISPLAY_LIMIT, MIN_HEARTBEAT_INTERVAL,
};
pub use worker::{
    heartbeat_message, shutdown_all, start_agent, stop_agent, SharedState, STARTED_MESSAGE,
    STOPPED_MESSAGE,
};
