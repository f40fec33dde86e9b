pub mod backend;
pub mod problem_client;

#[cfg(test)]
pub(crate) mod fake;

pub use backend::{ProblemBackend, UploadFile};
pub use problem_client::ProblemClient;
