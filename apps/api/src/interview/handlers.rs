//! Axum route handlers for the Interview API.
//!
//! Each handler holds the session's mutex for the whole turn and runs the
//! orchestrator on a copy of the state. The copy replaces the stored state only
//! when the turn succeeds.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::guardrail::Classification;
use crate::interview::job::{JobProfile, JOB};
use crate::interview::orchestrator::Turn;
use crate::interview::phase::PhaseKind;
use crate::interview::scoring::Breakdown;
use crate::interview::session::{InterviewState, Progress};
use crate::interview::store::SessionHandle;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: Option<String>,
    /// Index into the quick options of the open question.
    pub quick_option: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub session_id: Uuid,
    pub reply: String,
    pub phase: PhaseKind,
    /// Display heading for the current phase.
    pub phase_label: &'static str,
    pub quick_options: &'static [&'static str],
    pub progress: Progress,
    pub classification: Classification,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub session_id: Uuid,
    pub summary: String,
    pub breakdown: Breakdown,
}

impl TurnResponse {
    fn from_turn(turn: &Turn) -> Self {
        Self {
            session_id: turn.state.id,
            reply: turn.reply.clone(),
            phase: turn.state.phase.kind(),
            phase_label: turn.state.phase.kind().label(),
            quick_options: turn.state.phase.quick_options(),
            progress: turn.state.progress(),
            classification: turn.classification,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/job
pub async fn handle_get_job() -> Json<JobProfile> {
    Json(JOB)
}

/// POST /api/v1/interviews
///
/// Opens a session and returns the welcome with the first question.
pub async fn handle_create_interview(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TurnResponse>), AppError> {
    let turn = state.interviewer.greet(InterviewState::new());
    let response = TurnResponse::from_turn(&turn);

    state.sessions.insert(turn.state).await;
    info!(
        "Interview session {} created ({} active)",
        response.session_id,
        state.sessions.len().await
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/interviews/:id/messages
///
/// Processes one candidate message, typed or picked from the quick options.
pub async fn handle_send_message(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let handle = session(&state, session_id).await?;
    let mut session = handle.lock().await;

    let message = match (request.message, request.quick_option) {
        (Some(message), _) => message,
        (None, Some(choice)) => session
            .phase
            .quick_options()
            .get(choice)
            .map(|option| option.to_string())
            .ok_or_else(|| {
                AppError::Validation(format!("quick_option {choice} is not available"))
            })?,
        (None, None) => {
            return Err(AppError::Validation(
                "either message or quick_option is required".to_string(),
            ))
        }
    };

    let turn = state.interviewer.respond(session.clone(), &message).await?;
    let response = TurnResponse::from_turn(&turn);
    *session = turn.state;

    Ok(Json(response))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Progress>, AppError> {
    let handle = session(&state, session_id).await?;
    let session = handle.lock().await;
    Ok(Json(session.progress()))
}

/// POST /api/v1/interviews/:id/decision
///
/// Ends the questions early and returns the decision.
pub async fn handle_force_decision(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<TurnResponse>, AppError> {
    let handle = session(&state, session_id).await?;
    let mut session = handle.lock().await;

    let turn = state.interviewer.force_decision(session.clone()).await?;
    let response = TurnResponse::from_turn(&turn);
    *session = turn.state;

    Ok(Json(response))
}

/// GET /api/v1/interviews/:id/report
///
/// Recruiter report: text summary plus the structured breakdown.
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ReportResponse>, AppError> {
    let handle = session(&state, session_id).await?;
    let session = handle.lock().await;

    Ok(Json(ReportResponse {
        session_id,
        summary: session.tracker.summary(session.disqualified),
        breakdown: session.tracker.breakdown(session.disqualified),
    }))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(session_id).await {
        return Err(not_found(session_id));
    }
    info!("Interview session {session_id} removed");
    Ok(StatusCode::NO_CONTENT)
}

async fn session(state: &AppState, session_id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| not_found(session_id))
}

fn not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("Interview {session_id} not found"))
}
