//! Frame batches and per-session summaries.
//!
//! A batch is the landmark output of one video (or one still image) in frame
//! order. Frames without landmarks are skipped, malformed frames are rejected
//! with a reason, and every other frame contributes one
//! [`EvaluationResult`] to the ordered result sequence.

use serde::{Deserialize, Serialize};

use crate::error::{PostureError, PostureResult};
use crate::evaluator::{analyze_frame, EvaluationResult, PostureType};
use crate::facing::Facing;
use crate::geometry::round1;
use crate::landmarks::LandmarkSet;

/// Landmark output of the external detector for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameInput {
    /// Host frame counter; the 1-based position in the batch when absent.
    #[serde(default)]
    pub frame_index: Option<u64>,
    /// `None` when detection found no body in this frame.
    #[serde(default)]
    pub landmarks: Option<LandmarkSet>,
}

impl FrameInput {
    pub fn new(frame_index: u64, landmarks: Option<LandmarkSet>) -> Self {
        Self {
            frame_index: Some(frame_index),
            landmarks,
        }
    }
}

/// How frame indices map to timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timing {
    /// Still image: every result is stamped `0`.
    Image,
    /// Video decoded at `fps` frames per second.
    Video { fps: f64 },
}

impl Timing {
    pub fn video(fps: f64) -> PostureResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(PostureError::InvalidFrameRate(fps));
        }
        Ok(Timing::Video { fps })
    }

    pub fn timestamp(&self, frame_index: u64) -> f64 {
        match *self {
            Timing::Image => 0.0,
            Timing::Video { fps } => frame_index as f64 / fps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedFrame {
    pub frame_index: u64,
    pub reason: String,
}

/// Results of one batch, in input order.
///
/// `evaluated_frames[i]` is the frame index `results[i]` was computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub results: Vec<EvaluationResult>,
    pub evaluated_frames: Vec<u64>,
    pub skipped_frames: Vec<u64>,
    pub rejected: Vec<RejectedFrame>,
}

impl BatchReport {
    pub fn indexed_results(&self) -> impl Iterator<Item = (u64, &EvaluationResult)> {
        self.evaluated_frames.iter().copied().zip(self.results.iter())
    }

    pub fn frame_count(&self) -> usize {
        self.results.len() + self.skipped_frames.len() + self.rejected.len()
    }

    /// Highest frame index the batch saw, whether evaluated, skipped or
    /// rejected.
    pub fn last_frame_index(&self) -> Option<u64> {
        self.evaluated_frames
            .iter()
            .chain(&self.skipped_frames)
            .chain(self.rejected.iter().map(|r| &r.frame_index))
            .copied()
            .max()
    }
}

/// Give every frame without a host index the number `after + position`
/// (1-based), so a batch continues a sequence that already ends at `after`.
pub fn number_frames(frames: &mut [FrameInput], after: u64) {
    for (position, frame) in frames.iter_mut().enumerate() {
        frame.frame_index.get_or_insert(after + position as u64 + 1);
    }
}

/// Evaluate every frame of a batch.
pub fn analyze_batch(
    frames: &[FrameInput],
    posture_type: PostureType,
    timing: Timing,
) -> BatchReport {
    let mut report = BatchReport::default();

    for (position, frame) in frames.iter().enumerate() {
        let frame_index = frame.frame_index.unwrap_or(position as u64 + 1);
        let Some(landmarks) = frame.landmarks.as_ref() else {
            report.skipped_frames.push(frame_index);
            continue;
        };

        match analyze_frame(landmarks, posture_type, timing.timestamp(frame_index)) {
            Ok(result) => {
                report.results.push(result);
                report.evaluated_frames.push(frame_index);
            }
            Err(e) => {
                tracing::warn!(frame_index, error = %e, "Rejecting malformed frame");
                report.rejected.push(RejectedFrame {
                    frame_index,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        posture_type = %posture_type,
        evaluated = report.results.len(),
        skipped = report.skipped_frames.len(),
        rejected = report.rejected.len(),
        "Batch analysis complete"
    );
    report
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningCount {
    pub warning: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleAverage {
    pub name: String,
    pub mean: f64,
}

/// Aggregate view over a session's result sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub evaluated_frames: u64,
    pub good_frames: u64,
    pub good_ratio: f64,
    /// Ordered by first appearance in the sequence.
    pub warning_counts: Vec<WarningCount>,
    pub average_angles: Vec<AngleAverage>,
    pub dominant_facing: Option<Facing>,
    pub duration_secs: f64,
}

impl SessionSummary {
    pub fn from_results(results: &[EvaluationResult]) -> Self {
        let evaluated_frames = results.len() as u64;
        let good_frames = results.iter().filter(|r| r.is_good_posture).count() as u64;
        let good_ratio = if evaluated_frames > 0 {
            good_frames as f64 / evaluated_frames as f64
        } else {
            0.0
        };

        let mut warning_counts: Vec<WarningCount> = Vec::new();
        let mut angle_sums: Vec<(&'static str, f64, u64)> = Vec::new();
        let mut left = 0_u64;
        let mut right = 0_u64;

        for result in results {
            for warning in &result.warnings {
                match warning_counts.iter_mut().find(|w| &w.warning == warning) {
                    Some(entry) => entry.count += 1,
                    None => warning_counts.push(WarningCount {
                        warning: warning.clone(),
                        count: 1,
                    }),
                }
            }
            for (name, value) in result.angles.entries() {
                match angle_sums.iter_mut().find(|(n, _, _)| *n == name) {
                    Some((_, sum, count)) => {
                        *sum += value;
                        *count += 1;
                    }
                    None => angle_sums.push((name, value, 1)),
                }
            }
            match result.facing {
                Facing::Left => left += 1,
                Facing::Right => right += 1,
            }
        }

        let average_angles = angle_sums
            .into_iter()
            .map(|(name, sum, count)| AngleAverage {
                name: name.to_string(),
                mean: round1(sum / count as f64),
            })
            .collect();

        let dominant_facing = match (left, right) {
            (0, 0) => None,
            (l, r) if r > l => Some(Facing::Right),
            _ => Some(Facing::Left),
        };

        let (first, last) = results
            .iter()
            .map(|r| r.timestamp)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
                (lo.min(t), hi.max(t))
            });
        let duration_secs = if results.is_empty() { 0.0 } else { last - first };

        Self {
            evaluated_frames,
            good_frames,
            good_ratio,
            warning_counts,
            average_angles,
            dominant_facing,
            duration_secs,
        }
    }
}
