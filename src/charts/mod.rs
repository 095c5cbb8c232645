//! Charts module - static chart rendering

pub mod palette;
mod renderer;

pub use renderer::{ChartRenderer, Panel, RenderError, RenderOutcome};
