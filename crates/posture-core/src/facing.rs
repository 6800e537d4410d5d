//! Camera-relative facing direction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PostureResult;
use crate::landmarks::{Joint, LandmarkSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn as_str(self) -> &'static str {
        match self {
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }

    pub(crate) fn side_index(self) -> usize {
        match self {
            Facing::Left => 0,
            Facing::Right => 1,
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the subject as facing left or right.
///
/// The nose lying to the image-right of either shoulder means `Right`,
/// otherwise `Left`. Every frame is classified on its own, so jitter near the
/// boundary is expected.
pub fn detect_facing(landmarks: &LandmarkSet) -> PostureResult<Facing> {
    let left_shoulder = landmarks.get(Joint::LeftShoulder)?.x;
    let right_shoulder = landmarks.get(Joint::RightShoulder)?.x;
    let nose = landmarks.get(Joint::Nose)?.x;

    if nose > right_shoulder || nose > left_shoulder {
        Ok(Facing::Right)
    } else {
        Ok(Facing::Left)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::PostureError;
    use crate::Point;

    fn frame(nose: f64, left_shoulder: f64, right_shoulder: f64) -> LandmarkSet {
        LandmarkSet::from_points([
            (Joint::Nose, Point::new(nose, 0.1)),
            (Joint::LeftShoulder, Point::new(left_shoulder, 0.3)),
            (Joint::RightShoulder, Point::new(right_shoulder, 0.3)),
        ])
        .unwrap()
    }

    #[test]
    fn nose_right_of_both_shoulders() {
        assert_eq!(detect_facing(&frame(0.7, 0.5, 0.55)).unwrap(), Facing::Right);
    }

    #[test]
    fn nose_right_of_one_shoulder_is_enough() {
        assert_eq!(detect_facing(&frame(0.52, 0.5, 0.55)).unwrap(), Facing::Right);
        assert_eq!(detect_facing(&frame(0.52, 0.55, 0.5)).unwrap(), Facing::Right);
    }

    #[test]
    fn nose_left_of_both_shoulders() {
        assert_eq!(detect_facing(&frame(0.3, 0.5, 0.55)).unwrap(), Facing::Left);
    }

    #[test]
    fn tie_with_shoulders_is_left() {
        assert_eq!(detect_facing(&frame(0.5, 0.5, 0.5)).unwrap(), Facing::Left);
    }

    #[test]
    fn missing_nose_is_precondition_violation() {
        let set = LandmarkSet::from_points([
            (Joint::LeftShoulder, Point::new(0.5, 0.3)),
            (Joint::RightShoulder, Point::new(0.5, 0.3)),
        ])
        .unwrap();
        assert_eq!(
            detect_facing(&set),
            Err(PostureError::MissingLandmark { joint: Joint::Nose })
        );
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&Facing::Right).unwrap(), "\"right\"");
        assert_eq!(
            serde_json::from_str::<Facing>("\"left\"").unwrap(),
            Facing::Left
        );
    }

    proptest! {
        #[test]
        fn pt_facing_is_total(
            nose in 0.0_f64..1.0,
            left in 0.0_f64..1.0,
            right in 0.0_f64..1.0,
        ) {
            let facing = detect_facing(&frame(nose, left, right)).unwrap();
            let expected = if nose > left || nose > right { Facing::Right } else { Facing::Left };
            prop_assert_eq!(facing, expected);
        }
    }
}
