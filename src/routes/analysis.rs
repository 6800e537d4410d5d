use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use posture_core::{
    analyze_batch, analyze_frame, BatchReport, FrameInput, LandmarkSet, PostureType, Timing,
};
use serde::{Deserialize, Deserializer};

use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(analyze))
}

/// Either a video batch (`frames`, optional `fps`) or a single still image
/// (`landmarks`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest {
    posture_type: PostureType,
    fps: Option<f64>,
    frames: Option<Vec<FrameInput>>,
    /// Outer `None`: key absent. `Some(None)`: the detector found no body.
    #[serde(default, deserialize_with = "present")]
    landmarks: Option<Option<LandmarkSet>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

async fn analyze(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AnalysisRequest>,
) -> Result<impl IntoResponse, AppError> {
    let report = match (req.frames, req.landmarks) {
        (Some(frames), None) => {
            let fps = req.fps.unwrap_or(state.analysis().default_fps);
            let timing = Timing::video(fps)?;
            check_frame_count(&state, frames.len())?;
            run_batch(frames, req.posture_type, timing).await?
        }
        (None, Some(Some(landmarks))) => {
            let result = analyze_frame(&landmarks, req.posture_type, 0.0)?;
            BatchReport {
                results: vec![result],
                evaluated_frames: vec![1],
                ..BatchReport::default()
            }
        }
        (None, Some(None)) => {
            tracing::debug!(posture_type = %req.posture_type, "No body detected in image");
            BatchReport {
                skipped_frames: vec![1],
                ..BatchReport::default()
            }
        }
        _ => {
            return Err(AppError::bad_request(
                "INVALID_ANALYSIS_REQUEST",
                "Provide exactly one of `frames` or `landmarks`",
            ))
        }
    };

    Ok(ok(report))
}

pub(crate) fn check_frame_count(state: &AppState, count: usize) -> Result<(), AppError> {
    let max = state.analysis().max_frames_per_request;
    if count == 0 {
        return Err(AppError::bad_request(
            "EMPTY_FRAMES",
            "`frames` must contain at least one frame",
        ));
    }
    if count > max {
        return Err(AppError::bad_request(
            "TOO_MANY_FRAMES",
            &format!("At most {max} frames per request, got {count}"),
        ));
    }
    Ok(())
}

/// Evaluate a batch on the blocking pool.
pub(crate) async fn run_batch(
    frames: Vec<FrameInput>,
    posture_type: PostureType,
    timing: Timing,
) -> Result<BatchReport, AppError> {
    tokio::task::spawn_blocking(move || analyze_batch(&frames, posture_type, timing))
        .await
        .map_err(|e| AppError::internal(&format!("analysis task failed: {e}")))
}
