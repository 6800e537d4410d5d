//! Posture classification from 2-D body landmarks.
//!
//! Takes the normalized landmark coordinates produced by an external pose
//! estimator (MediaPipe Pose layout) and turns them into a per-frame verdict:
//! good/bad posture, feedback text, the supporting joint angles and warnings.
//!
//! ## Modules
//! - `geometry`: angle at a vertex from three points
//! - `landmarks`: joint names, landmark sets, side-indexed joint lookup
//! - `facing`: camera-relative facing direction
//! - `rules`: ordered threshold rules for each posture type
//! - `evaluator`: squat and sitting evaluation, result records
//! - `session`: frame batches, timestamps and per-session summaries

pub mod error;
pub mod evaluator;
pub mod facing;
pub mod geometry;
pub mod landmarks;
pub mod rules;
pub mod session;

use serde::{Deserialize, Serialize};

pub use error::{PostureError, PostureResult};
pub use evaluator::{analyze_frame, evaluate, AngleSet, EvaluationResult, PostureType, Verdict};
pub use facing::{detect_facing, Facing};
pub use geometry::angle_at_vertex;
pub use landmarks::{Joint, JointRole, LandmarkSet};
pub use session::{
    analyze_batch, number_frames, AngleAverage, BatchReport, FrameInput, RejectedFrame,
    SessionSummary, Timing, WarningCount,
};

/// 2-D point in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
