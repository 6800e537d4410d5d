//! Body joints and landmark sets.
//!
//! Joint names and indices follow the MediaPipe Pose layout (33 landmarks).
//! A [`LandmarkSet`] can be built from a name-keyed map or from the
//! index-ordered list the detector emits; either way it is validated once
//! and then read-only.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::{PostureError, PostureResult};
use crate::facing::Facing;
use crate::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Joint {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl Joint {
    pub const COUNT: usize = 33;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Nose,
        Joint::LeftEyeInner,
        Joint::LeftEye,
        Joint::LeftEyeOuter,
        Joint::RightEyeInner,
        Joint::RightEye,
        Joint::RightEyeOuter,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::MouthLeft,
        Joint::MouthRight,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftPinky,
        Joint::RightPinky,
        Joint::LeftIndex,
        Joint::RightIndex,
        Joint::LeftThumb,
        Joint::RightThumb,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
        Joint::LeftHeel,
        Joint::RightHeel,
        Joint::LeftFootIndex,
        Joint::RightFootIndex,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Joint::Nose => "NOSE",
            Joint::LeftEyeInner => "LEFT_EYE_INNER",
            Joint::LeftEye => "LEFT_EYE",
            Joint::LeftEyeOuter => "LEFT_EYE_OUTER",
            Joint::RightEyeInner => "RIGHT_EYE_INNER",
            Joint::RightEye => "RIGHT_EYE",
            Joint::RightEyeOuter => "RIGHT_EYE_OUTER",
            Joint::LeftEar => "LEFT_EAR",
            Joint::RightEar => "RIGHT_EAR",
            Joint::MouthLeft => "MOUTH_LEFT",
            Joint::MouthRight => "MOUTH_RIGHT",
            Joint::LeftShoulder => "LEFT_SHOULDER",
            Joint::RightShoulder => "RIGHT_SHOULDER",
            Joint::LeftElbow => "LEFT_ELBOW",
            Joint::RightElbow => "RIGHT_ELBOW",
            Joint::LeftWrist => "LEFT_WRIST",
            Joint::RightWrist => "RIGHT_WRIST",
            Joint::LeftPinky => "LEFT_PINKY",
            Joint::RightPinky => "RIGHT_PINKY",
            Joint::LeftIndex => "LEFT_INDEX",
            Joint::RightIndex => "RIGHT_INDEX",
            Joint::LeftThumb => "LEFT_THUMB",
            Joint::RightThumb => "RIGHT_THUMB",
            Joint::LeftHip => "LEFT_HIP",
            Joint::RightHip => "RIGHT_HIP",
            Joint::LeftKnee => "LEFT_KNEE",
            Joint::RightKnee => "RIGHT_KNEE",
            Joint::LeftAnkle => "LEFT_ANKLE",
            Joint::RightAnkle => "RIGHT_ANKLE",
            Joint::LeftHeel => "LEFT_HEEL",
            Joint::RightHeel => "RIGHT_HEEL",
            Joint::LeftFootIndex => "LEFT_FOOT_INDEX",
            Joint::RightFootIndex => "RIGHT_FOOT_INDEX",
        }
    }

    /// Joint playing `role` on the side visible for `facing`.
    pub fn for_side(facing: Facing, role: JointRole) -> Joint {
        SIDE_TABLE[facing.side_index()][role as usize]
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anatomical role of a joint, independent of body side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointRole {
    Ear = 0,
    Shoulder = 1,
    Hip = 2,
    Knee = 3,
    Ankle = 4,
    Toe = 5,
}

/// `Facing × JointRole → Joint`; rows follow [`Facing::side_index`], columns
/// follow the `JointRole` discriminants.
const SIDE_TABLE: [[Joint; 6]; 2] = [
    [
        Joint::LeftEar,
        Joint::LeftShoulder,
        Joint::LeftHip,
        Joint::LeftKnee,
        Joint::LeftAnkle,
        Joint::LeftFootIndex,
    ],
    [
        Joint::RightEar,
        Joint::RightShoulder,
        Joint::RightHip,
        Joint::RightKnee,
        Joint::RightAnkle,
        Joint::RightFootIndex,
    ],
];

/// Wire forms accepted for a landmark set: a joint-name map or the
/// index-ordered list of the 33-point topology.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LandmarkInput {
    Named(BTreeMap<Joint, Point>),
    Indexed(Vec<Point>),
}

/// Landmarks detected in one frame, keyed by joint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "LandmarkInput")]
pub struct LandmarkSet {
    points: BTreeMap<Joint, Point>,
}

impl LandmarkSet {
    pub fn from_points<I>(points: I) -> PostureResult<Self>
    where
        I: IntoIterator<Item = (Joint, Point)>,
    {
        let points: BTreeMap<Joint, Point> = points.into_iter().collect();
        if let Some((joint, _)) = points.iter().find(|(_, p)| !p.is_finite()) {
            return Err(PostureError::InvalidCoordinate { joint: *joint });
        }
        Ok(Self { points })
    }

    /// Build from the index-ordered list a MediaPipe-style detector emits.
    pub fn from_indexed(points: &[Point]) -> PostureResult<Self> {
        if points.len() > Joint::COUNT {
            return Err(PostureError::InvalidLandmarkIndex(points.len() - 1));
        }
        Self::from_points(
            points
                .iter()
                .enumerate()
                .filter_map(|(i, p)| Joint::from_index(i).map(|j| (j, *p))),
        )
    }

    /// Point for `joint`; a missing joint is a malformed frame.
    pub fn get(&self, joint: Joint) -> PostureResult<Point> {
        self.points
            .get(&joint)
            .copied()
            .ok_or(PostureError::MissingLandmark { joint })
    }

    pub fn side(&self, facing: Facing, role: JointRole) -> PostureResult<Point> {
        self.get(Joint::for_side(facing, role))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, Point)> + '_ {
        self.points.iter().map(|(j, p)| (*j, *p))
    }
}

impl TryFrom<LandmarkInput> for LandmarkSet {
    type Error = PostureError;

    fn try_from(value: LandmarkInput) -> Result<Self, Self::Error> {
        match value {
            LandmarkInput::Named(points) => Self::from_points(points),
            LandmarkInput::Indexed(points) => Self::from_indexed(&points),
        }
    }
}

impl Serialize for LandmarkSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.points.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip_covers_all_joints() {
        for (i, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
            assert_eq!(Joint::from_index(i), Some(*joint));
        }
        assert_eq!(Joint::from_index(Joint::COUNT), None);
    }

    #[test]
    fn display_matches_serde_name() {
        for joint in Joint::ALL {
            let json = serde_json::to_string(&joint).unwrap();
            assert_eq!(json, format!("\"{}\"", joint));
        }
    }

    #[test]
    fn side_table_picks_same_letter_side() {
        assert_eq!(Joint::for_side(Facing::Left, JointRole::Knee), Joint::LeftKnee);
        assert_eq!(Joint::for_side(Facing::Left, JointRole::Toe), Joint::LeftFootIndex);
        assert_eq!(Joint::for_side(Facing::Left, JointRole::Ear), Joint::LeftEar);
        assert_eq!(Joint::for_side(Facing::Right, JointRole::Hip), Joint::RightHip);
        assert_eq!(Joint::for_side(Facing::Right, JointRole::Ankle), Joint::RightAnkle);
        assert_eq!(
            Joint::for_side(Facing::Right, JointRole::Shoulder),
            Joint::RightShoulder
        );
    }

    #[test]
    fn missing_joint_is_reported() {
        let set = LandmarkSet::from_points([(Joint::Nose, Point::new(0.5, 0.1))]).unwrap();
        assert_eq!(
            set.get(Joint::LeftKnee),
            Err(PostureError::MissingLandmark {
                joint: Joint::LeftKnee
            })
        );
    }

    #[test]
    fn non_finite_point_rejected() {
        let err = LandmarkSet::from_points([(Joint::LeftHip, Point::new(f64::INFINITY, 0.5))])
            .unwrap_err();
        assert_eq!(
            err,
            PostureError::InvalidCoordinate {
                joint: Joint::LeftHip
            }
        );
    }

    #[test]
    fn deserializes_named_map() {
        let json = r#"{"NOSE": {"x": 0.5, "y": 0.1}, "LEFT_KNEE": {"x": 0.4, "y": 0.7, "visibility": 0.9}}"#;
        let set: LandmarkSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(Joint::LeftKnee).unwrap(), Point::new(0.4, 0.7));
    }

    #[test]
    fn deserializes_indexed_list() {
        let points: Vec<serde_json::Value> = (0..Joint::COUNT)
            .map(|i| serde_json::json!({"x": i as f64 / 100.0, "y": 0.5, "z": 0.0}))
            .collect();
        let set: LandmarkSet = serde_json::from_value(serde_json::Value::Array(points)).unwrap();
        assert_eq!(set.len(), Joint::COUNT);
        assert_eq!(set.get(Joint::LeftShoulder).unwrap().x, 0.11);
        assert_eq!(set.get(Joint::RightFootIndex).unwrap().x, 0.32);
    }

    #[test]
    fn indexed_list_too_long_rejected() {
        let points = vec![Point::new(0.5, 0.5); Joint::COUNT + 1];
        assert!(LandmarkSet::from_indexed(&points).is_err());
    }

    #[test]
    fn unknown_joint_name_rejected() {
        let json = r#"{"LEFT_ELBOW_TIP": {"x": 0.5, "y": 0.1}}"#;
        assert!(serde_json::from_str::<LandmarkSet>(json).is_err());
    }

    #[test]
    fn serializes_as_named_map() {
        let set = LandmarkSet::from_points([(Joint::RightEar, Point::new(0.25, 0.75))]).unwrap();
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value["RIGHT_EAR"]["x"], 0.25);
        assert_eq!(value["RIGHT_EAR"]["y"], 0.75);
    }
}
