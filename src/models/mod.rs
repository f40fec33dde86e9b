pub mod problem;

pub use problem::{AnnotationStatus, ProblemCollection, ProblemRecord};
