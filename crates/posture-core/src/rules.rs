//! Threshold rules for each posture type.
//!
//! A rule is an independent predicate over the measurements of one frame plus
//! the warning it raises. Rule lists are evaluated exhaustively and in order,
//! so the warning order of a result is the order of the list.

use std::ops::RangeInclusive;

use crate::facing::Facing;
use crate::Point;

/// Acceptable hip angle (shoulder-hip-knee) during a squat.
pub const SQUAT_BACK_RANGE: RangeInclusive<f64> = 30.0..=60.0;
/// Acceptable knee angle (hip-knee-ankle) at squat depth.
pub const SQUAT_KNEE_RANGE: RangeInclusive<f64> = 80.0..=120.0;
/// Upper bound of the scaled ear/shoulder horizontal offset while seated.
pub const SITTING_NECK_MAX: f64 = 10.0;
/// Acceptable hip angle (shoulder-hip-knee) while seated.
pub const SITTING_BACK_RANGE: RangeInclusive<f64> = 80.0..=115.0;

pub const WARN_KNEE_OVER_TOE: &str = "Knee extends beyond toe - risk of injury";
pub const WARN_SQUAT_BACK: &str =
    "Back angle too upright or too low - maintain natural forward lean (30° to 60° wrt thigh)";
pub const WARN_SQUAT_DEPTH: &str =
    "Squat depth needs improvement - aim for 90-degree knee bend (80° to 120°)";
pub const WARN_HEAD_POSTURE: &str = "Adjust head posture - align ears over shoulders";
pub const WARN_SITTING_BACK: &str = "Back not straight - maintain neutral spine (80° to 115°)";

pub struct Rule<M> {
    pub name: &'static str,
    pub violated: fn(&M) -> bool,
    pub warning: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SquatMeasurements {
    pub facing: Facing,
    pub knee: Point,
    pub toe: Point,
    pub knee_angle: f64,
    pub back_angle: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SittingMeasurements {
    pub neck_angle: f64,
    pub back_angle: f64,
}

pub const SQUAT_RULES: &[Rule<SquatMeasurements>] = &[
    Rule {
        name: "knee_over_toe",
        violated: knee_past_toe,
        warning: WARN_KNEE_OVER_TOE,
    },
    Rule {
        name: "back_angle",
        violated: |m| !SQUAT_BACK_RANGE.contains(&m.back_angle),
        warning: WARN_SQUAT_BACK,
    },
    Rule {
        name: "squat_depth",
        violated: |m| !SQUAT_KNEE_RANGE.contains(&m.knee_angle),
        warning: WARN_SQUAT_DEPTH,
    },
];

pub const SITTING_RULES: &[Rule<SittingMeasurements>] = &[
    Rule {
        name: "head_posture",
        violated: |m| m.neck_angle > SITTING_NECK_MAX,
        warning: WARN_HEAD_POSTURE,
    },
    Rule {
        name: "back_angle",
        violated: |m| !SITTING_BACK_RANGE.contains(&m.back_angle),
        warning: WARN_SITTING_BACK,
    },
];

/// "Forward" is image-right when facing right and image-left when facing left,
/// so the comparison flips with the side.
fn knee_past_toe(m: &SquatMeasurements) -> bool {
    match m.facing {
        Facing::Right => m.knee.x > m.toe.x,
        Facing::Left => m.knee.x < m.toe.x,
    }
}

/// Warnings of every violated rule, in rule order.
pub fn collect_warnings<M>(rules: &[Rule<M>], measurements: &M) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| {
            let violated = (rule.violated)(measurements);
            if violated {
                tracing::trace!(rule = rule.name, "Posture rule violated");
            }
            violated
        })
        .map(|rule| rule.warning.to_string())
        .collect()
}
