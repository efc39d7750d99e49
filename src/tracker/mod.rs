pub mod person;
pub mod registry;
pub mod smooth;

pub use person::{CountingRules, Observation, PersonSnapshot, PersonState, RepCounts, TrackId};
pub use registry::{FrameReport, PersonRegistry};
pub use smooth::AngleSmoother;
