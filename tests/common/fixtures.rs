use serde_json::{json, Value};

/// Left-facing seated subject, upright with a bent knee: good posture.
pub fn good_sitting() -> Value {
    json!({
        "NOSE": { "x": 0.35, "y": 0.18 },
        "LEFT_EAR": { "x": 0.42, "y": 0.2 },
        "LEFT_SHOULDER": { "x": 0.40, "y": 0.35 },
        "RIGHT_SHOULDER": { "x": 0.42, "y": 0.35 },
        "LEFT_HIP": { "x": 0.40, "y": 0.6 },
        "LEFT_KNEE": { "x": 0.15, "y": 0.62 }
    })
}

/// Ear, shoulder, hip and knee on one vertical line: back angle 180.
pub fn straight_sitting() -> Value {
    json!({
        "NOSE": { "x": 0.35, "y": 0.18 },
        "LEFT_EAR": { "x": 0.40, "y": 0.2 },
        "LEFT_SHOULDER": { "x": 0.40, "y": 0.35 },
        "RIGHT_SHOULDER": { "x": 0.42, "y": 0.35 },
        "LEFT_HIP": { "x": 0.40, "y": 0.6 },
        "LEFT_KNEE": { "x": 0.40, "y": 0.9 }
    })
}

/// Standing straight, facing left: knee 180, back 180.
pub fn collinear_squat() -> Value {
    json!({
        "NOSE": { "x": 0.45, "y": 0.1 },
        "LEFT_SHOULDER": { "x": 0.5, "y": 0.3 },
        "RIGHT_SHOULDER": { "x": 0.52, "y": 0.3 },
        "LEFT_HIP": { "x": 0.5, "y": 0.5 },
        "LEFT_KNEE": { "x": 0.5, "y": 0.65 },
        "LEFT_ANKLE": { "x": 0.5, "y": 0.85 },
        "LEFT_FOOT_INDEX": { "x": 0.45, "y": 0.85 }
    })
}

/// Shoulders and nose only; every evaluator needs more.
pub fn torso_only() -> Value {
    json!({
        "NOSE": { "x": 0.35, "y": 0.18 },
        "LEFT_SHOULDER": { "x": 0.40, "y": 0.35 },
        "RIGHT_SHOULDER": { "x": 0.42, "y": 0.35 }
    })
}

pub fn frame(index: u64, landmarks: Value) -> Value {
    json!({ "frameIndex": index, "landmarks": landmarks })
}

pub fn empty_frame(index: u64) -> Value {
    json!({ "frameIndex": index, "landmarks": null })
}
