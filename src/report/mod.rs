//! Report model finalization, display formatting and rendering

mod builder;
mod error;
mod format;
mod render;

pub use builder::{build_model, VERSION};
pub use error::ReportError;
pub use format::{format_duration, format_size};
pub use render::{HtmlRenderer, JsonRenderer, RenderFormat, Renderer};
