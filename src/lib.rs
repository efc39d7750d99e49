pub mod config;
pub mod error;
pub mod exercise;
pub mod frames;
pub mod geometry;
pub mod pose;
pub mod tracker;

pub use error::{RepError, RepResult};
pub use exercise::{Exercise, Stage};
pub use pose::{KeypointIndex, Point, Pose};
pub use tracker::{PersonRegistry, PersonSnapshot, PersonState, TrackId};
