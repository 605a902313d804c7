//! Terminal front-end pieces for the menu display tools
//!
//! - Status messages and formatting helpers
//! - Spinners while data loads
//! - Rendering of the chip row, product cards and empty state

#![warn(missing_docs)]

pub mod output;
pub mod progress;
pub mod render;

pub use render::Renderer;
