use thiserror::Error;

use crate::landmarks::Joint;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PostureError {
    #[error("missing landmark: {joint}")]
    MissingLandmark { joint: Joint },
    #[error("non-finite coordinate for landmark {joint}")]
    InvalidCoordinate { joint: Joint },
    #[error("degenerate angle at {vertex}: zero-length or non-finite ray")]
    DegenerateAngle { vertex: String },
    #[error("invalid landmark index: {0}")]
    InvalidLandmarkIndex(usize),
    #[error("invalid frame rate: {0}")]
    InvalidFrameRate(f64),
}

pub type PostureResult<T> = Result<T, PostureError>;
