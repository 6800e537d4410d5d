use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use posture_core::{
    number_frames, EvaluationResult, FrameInput, PostureType, SessionSummary, Timing,
};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::extractors::JsonBody;
use crate::response::{created, ok, paginated, AppError};
use crate::routes::analysis::{check_frame_count, run_batch};
use crate::state::AppState;
use crate::store::operations::posture_sessions::PostureSession;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/frames", post(append_frames))
        .route("/:id/results", get(get_results))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest {
    posture_type: PostureType,
    /// Omitted for a still-image session.
    fps: Option<f64>,
    label: Option<String>,
}

async fn create_session(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = PostureSession::new(req.posture_type, req.fps, req.label);
    state.store().create_session(&session)?;
    tracing::info!(session_id = %session.id, posture_type = %session.posture_type, "Session started");
    Ok(created(session))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListSessionsQuery {
    page: Option<u64>,
    per_page: Option<u64>,
}

impl ListSessionsQuery {
    fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }
    fn per_page(&self) -> u64 {
        self.per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(q): Query<ListSessionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = q.page();
    let per_page = q.per_page();
    let offset = page.saturating_sub(1).saturating_mul(per_page) as usize;
    let sessions = state.store().list_sessions(per_page as usize, offset)?;
    let total = state.store().count_sessions() as u64;
    Ok(paginated(sessions, total, page, per_page))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionDetail {
    #[serde(flatten)]
    session: PostureSession,
    summary: SessionSummary,
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.store().require_session(&id)?;
    let results: Vec<EvaluationResult> = state
        .store()
        .get_results(&id)?
        .into_iter()
        .map(|(_, result)| result)
        .collect();
    let summary = SessionSummary::from_results(&results);
    Ok(ok(SessionDetail { session, summary }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendFramesRequest {
    frames: Vec<FrameInput>,
}

async fn append_frames(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<AppendFramesRequest>,
) -> Result<impl IntoResponse, AppError> {
    check_frame_count(&state, req.frames.len())?;
    let session = state.store().require_session(&id)?;
    let timing = match session.fps {
        Some(fps) => Timing::video(fps)?,
        None => Timing::Image,
    };

    // Unindexed frames continue after the last frame this session has seen.
    let mut frames = req.frames;
    number_frames(&mut frames, session.last_frame_index.unwrap_or(0));

    let report = run_batch(frames, session.posture_type, timing).await?;

    let store = state.store_handle();
    let session_id = id.clone();
    let stored = {
        let report = report.clone();
        tokio::task::spawn_blocking(move || store.append_results(&session_id, &report))
            .await
            .map_err(|e| AppError::internal(&format!("append task failed: {e}")))??
    };

    tracing::info!(
        session_id = %id,
        evaluated = report.results.len(),
        skipped = report.skipped_frames.len(),
        rejected = report.rejected.len(),
        total = stored.result_count,
        "Frames appended"
    );
    Ok(ok(report))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameResult {
    frame_index: u64,
    #[serde(flatten)]
    result: EvaluationResult,
}

async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.store().require_session(&id)?;
    let results: Vec<FrameResult> = state
        .store()
        .get_results(&id)?
        .into_iter()
        .map(|(frame_index, result)| FrameResult {
            frame_index,
            result,
        })
        .collect();
    Ok(ok(results))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeletedSession {
    id: String,
    deleted: bool,
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.store().delete_session(&id)?;
    tracing::info!(session_id = %session.id, "Session deleted");
    Ok(ok(DeletedSession {
        id: session.id,
        deleted: true,
    }))
}
