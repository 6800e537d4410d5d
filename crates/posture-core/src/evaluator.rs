//! Squat and sitting evaluation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PostureError, PostureResult};
use crate::facing::{detect_facing, Facing};
use crate::geometry::{angle_at_vertex, round1};
use crate::landmarks::{JointRole, LandmarkSet};
use crate::rules::{
    collect_warnings, SittingMeasurements, SquatMeasurements, SITTING_RULES, SQUAT_RULES,
};
use crate::Point;

pub const FEEDBACK_SQUAT_GOOD: &str = "Good squat form";
pub const FEEDBACK_SQUAT_BAD: &str = "Adjust your squat form";
pub const FEEDBACK_SITTING_GOOD: &str = "Good sitting posture";
pub const FEEDBACK_SITTING_BAD: &str = "Adjust your sitting position";

/// Scale applied to the ear/shoulder horizontal offset to get the neck metric.
const NECK_OFFSET_SCALE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureType {
    Squat,
    Sitting,
}

impl PostureType {
    pub fn as_str(self) -> &'static str {
        match self {
            PostureType::Squat => "squat",
            PostureType::Sitting => "sitting",
        }
    }
}

impl fmt::Display for PostureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "squat" => Ok(PostureType::Squat),
            "sitting" => Ok(PostureType::Sitting),
            other => Err(format!("unknown posture type: {other}")),
        }
    }
}

/// Angles reported with a verdict, in degrees rounded to one decimal.
///
/// Serializes as a flat object (`{"knee": .., "back": ..}` or
/// `{"neck": .., "back": ..}`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AngleSet {
    Squat { knee: f64, back: f64 },
    Sitting { neck: f64, back: f64 },
}

impl AngleSet {
    /// Named angles in reporting order.
    pub fn entries(&self) -> [(&'static str, f64); 2] {
        match *self {
            AngleSet::Squat { knee, back } => [("knee", knee), ("back", back)],
            AngleSet::Sitting { neck, back } => [("neck", neck), ("back", back)],
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}

/// Outcome of evaluating one landmark set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_good_posture: bool,
    pub feedback: String,
    pub angles: AngleSet,
    pub warnings: Vec<String>,
    pub facing: Facing,
}

impl Verdict {
    fn from_warnings(
        warnings: Vec<String>,
        angles: AngleSet,
        facing: Facing,
        good: &str,
        bad: &str,
    ) -> Self {
        let is_good_posture = warnings.is_empty();
        Self {
            is_good_posture,
            feedback: if is_good_posture { good } else { bad }.to_string(),
            angles,
            warnings,
            facing,
        }
    }

    pub fn at(self, timestamp: f64, posture_type: PostureType) -> EvaluationResult {
        EvaluationResult {
            is_good_posture: self.is_good_posture,
            feedback: self.feedback,
            angles: self.angles,
            warnings: self.warnings,
            timestamp,
            posture_type,
            facing: self.facing,
        }
    }
}

/// One entry of a session's result sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub is_good_posture: bool,
    pub feedback: String,
    pub angles: AngleSet,
    pub warnings: Vec<String>,
    /// Seconds from the start of the video; `0` for a still image.
    pub timestamp: f64,
    pub posture_type: PostureType,
    pub facing: Facing,
}

/// Evaluate `landmarks` against the rule set of `posture_type`, reading the
/// joints on the side given by `facing`.
pub fn evaluate(
    landmarks: &LandmarkSet,
    facing: Facing,
    posture_type: PostureType,
) -> PostureResult<Verdict> {
    match posture_type {
        PostureType::Squat => evaluate_squat(landmarks, facing),
        PostureType::Sitting => evaluate_sitting(landmarks, facing),
    }
}

/// Facing detection followed by [`evaluate`], stamped with `timestamp`.
pub fn analyze_frame(
    landmarks: &LandmarkSet,
    posture_type: PostureType,
    timestamp: f64,
) -> PostureResult<EvaluationResult> {
    let facing = detect_facing(landmarks)?;
    let verdict = evaluate(landmarks, facing, posture_type)?;
    Ok(verdict.at(timestamp, posture_type))
}

fn evaluate_squat(landmarks: &LandmarkSet, facing: Facing) -> PostureResult<Verdict> {
    let hip = landmarks.side(facing, JointRole::Hip)?;
    let knee = landmarks.side(facing, JointRole::Knee)?;
    let ankle = landmarks.side(facing, JointRole::Ankle)?;
    let toe = landmarks.side(facing, JointRole::Toe)?;
    let shoulder = landmarks.side(facing, JointRole::Shoulder)?;

    let measurements = SquatMeasurements {
        facing,
        knee,
        toe,
        knee_angle: joint_angle("knee", hip, knee, ankle)?,
        back_angle: joint_angle("hip", shoulder, hip, knee)?,
    };

    let warnings = collect_warnings(SQUAT_RULES, &measurements);
    let angles = AngleSet::Squat {
        knee: round1(measurements.knee_angle),
        back: round1(measurements.back_angle),
    };
    Ok(Verdict::from_warnings(
        warnings,
        angles,
        facing,
        FEEDBACK_SQUAT_GOOD,
        FEEDBACK_SQUAT_BAD,
    ))
}

fn evaluate_sitting(landmarks: &LandmarkSet, facing: Facing) -> PostureResult<Verdict> {
    let ear = landmarks.side(facing, JointRole::Ear)?;
    let shoulder = landmarks.side(facing, JointRole::Shoulder)?;
    let hip = landmarks.side(facing, JointRole::Hip)?;
    let knee = landmarks.side(facing, JointRole::Knee)?;

    // Scaled horizontal offset rather than a geometric angle; the head-posture
    // threshold is expressed in these units.
    let measurements = SittingMeasurements {
        neck_angle: (ear.x - shoulder.x).abs() * NECK_OFFSET_SCALE,
        back_angle: joint_angle("hip", shoulder, hip, knee)?,
    };

    let warnings = collect_warnings(SITTING_RULES, &measurements);
    let angles = AngleSet::Sitting {
        neck: round1(measurements.neck_angle),
        back: round1(measurements.back_angle),
    };
    Ok(Verdict::from_warnings(
        warnings,
        angles,
        facing,
        FEEDBACK_SITTING_GOOD,
        FEEDBACK_SITTING_BAD,
    ))
}

fn joint_angle(vertex: &str, a: Point, b: Point, c: Point) -> PostureResult<f64> {
    angle_at_vertex(a, b, c).map_err(|_| PostureError::DegenerateAngle {
        vertex: vertex.to_string(),
    })
}
