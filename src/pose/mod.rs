pub mod keypoint;

pub use keypoint::{KeypointIndex, Point, Pose};
