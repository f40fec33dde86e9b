pub mod controller;
pub mod session;

pub use controller::{AnnotationController, SaveOutcome};
pub use session::{Direction, SessionState};
