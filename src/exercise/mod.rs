pub mod classifier;
pub mod counter;

pub use classifier::{BodySide, Exercise, ExerciseClassifier, JointSide, JointTriple};
pub use counter::{RepCounter, Stage, Step};
