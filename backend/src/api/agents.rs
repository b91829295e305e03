//! Agent dashboard API handlers
//!
//! Status and log views plus the start/stop actions.

use crate::error::AppError;
use crate::state::{self, Agent, AgentName, AgentStatus, LogEntry, SharedState};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

/// Agent response type
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    /// Name of the agent
    pub name: AgentName,
    /// Current status of the agent
    pub status: AgentStatus,
    /// Most recent log lines, oldest first
    pub logs: Vec<LogEntry>,
    /// Total number of log lines recorded
    pub total_logs: usize,
}

impl AgentResponse {
    fn from_agent(agent: &Agent, limit: usize) -> Self {
        Self {
            name: agent.name,
            status: agent.status,
            logs: agent.recent_logs(limit).to_vec(),
            total_logs: agent.log_len(),
        }
    }
}

/// Agents list response
#[derive(Serialize)]
pub struct AgentsListResponse {
    /// All agents in display order
    pub agents: Vec<AgentResponse>,
    /// Total number of agents
    pub count: usize,
}

/// Recent logs response
#[derive(Serialize)]
pub struct LogsResponse {
    /// Name of the agent
    pub name: AgentName,
    /// Most recent log lines, oldest first
    pub logs: Vec<LogEntry>,
}

/// Query parameters for the logs endpoint
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// Number of lines wanted; capped at the display limit
    pub limit: Option<usize>,
}

/// GET /api/agents - List all agents
pub async fn list_agents(
    State(state): State<SharedState>,
) -> Result<Json<AgentsListResponse>, AppError> {
    let state = state.read().await;
    let limit = state.log_display_limit();
    let agents: Vec<AgentResponse> = state
        .agents_list()
        .into_iter()
        .map(|agent| AgentResponse::from_agent(agent, limit))
        .collect();

    Ok(Json(AgentsListResponse {
        count: agents.len(),
        agents,
    }))
}

/// GET /api/agents/:name - Get a specific agent
pub async fn get_agent(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<AgentResponse>, AppError> {
    let name: AgentName = name.parse()?;
    let state = state.read().await;
    let agent = state.agent(name)?;

    Ok(Json(AgentResponse::from_agent(
        agent,
        state.log_display_limit(),
    )))
}

/// GET /api/agents/:name/logs - Recent log lines of an agent
pub async fn get_agent_logs(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, AppError> {
    let name: AgentName = name.parse()?;
    let state = state.read().await;
    let max = state.log_display_limit();
    let limit = query.limit.unwrap_or(max).min(max);

    Ok(Json(LogsResponse {
        name,
        logs: state.recent_logs(name, limit)?,
    }))
}

/// POST /api/agents/:name/start - Start an agent
pub async fn start_agent(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<AgentResponse>, AppError> {
    let name: AgentName = name.parse()?;
    let agent = state::start_agent(&state, name).await?;
    let limit = state.read().await.log_display_limit();

    Ok(Json(AgentResponse::from_agent(&agent, limit)))
}

/// POST /api/agents/:name/stop - Stop an agent
pub async fn stop_agent(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<AgentResponse>, AppError> {
    let name: AgentName = name.parse()?;
    let agent = state::stop_agent(&state, name).await?;
    let limit = state.read().await.log_display_limit();

    Ok(Json(AgentResponse::from_agent(&agent, limit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn create_test_state() -> SharedState {
        Arc::new(RwLock::new(AppState::new()))
    }

    #[tokio::test]
    async fn test_list_agents_initially_idle() {
        let state = create_test_state();
        let response = list_agents(State(state)).await.unwrap();
        assert_eq!(response.count, 3);
        assert!(response
            .agents
            .iter()
            .all(|a| a.status == AgentStatus::Idle && a.logs.is_empty()));
    }

    #[tokio::test]
    async fn test_start_and_stop_agent() {
        let state = create_test_state();

        let started = start_agent(State(state.clone()), Path("listener".to_string()))
            .await
            .unwrap();
        assert_eq!(started.name, AgentName::Listener);
        assert_eq!(started.status, AgentStatus::Running);

        let stopped = stop_agent(State(state.clone()), Path("Listener".to_string()))
            .await
            .unwrap();
        assert_eq!(stopped.status, AgentStatus::Stopped);
        assert!(stopped
            .logs
            .last()
            .unwrap()
            .message()
            .ends_with("Agent stopped"));
    }

    #[tokio::test]
    async fn test_get_agent_not_found() {
        let state = create_test_state();
        let result = get_agent(State(state), Path("nonexistent".to_string())).await;
        match result.unwrap_err() {
            AppError::UnknownAgent(name) => assert_eq!(name, "nonexistent"),
            other => panic!("Expected UnknownAgent error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_logs_capped_at_display_limit() {
        let state = create_test_state();
        {
            let mut guard = state.write().await;
            for i in 0..30 {
                guard
                    .append_log(AgentName::Planner, format!("entry {}", i))
                    .unwrap();
            }
        }

        let response = get_agent_logs(
            State(state.clone()),
            Path("Planner".to_string()),
            Query(LogsQuery { limit: Some(500) }),
        )
        .await
        .unwrap();
        assert_eq!(response.logs.len(), 10);
        assert_eq!(response.logs[9].message(), "entry 29");

        let response = get_agent_logs(
            State(state),
            Path("Planner".to_string()),
            Query(LogsQuery { limit: Some(3) }),
        )
        .await
        .unwrap();
        assert_eq!(response.logs.len(), 3);
    }
}
