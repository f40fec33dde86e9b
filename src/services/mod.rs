pub mod notation;
pub mod preview;

pub use notation::{DisplayMode, NotationRenderer, Rendered};
pub use preview::PreviewWriter;
