//! Configuration loading and schema definitions
//!
//! Menu presentation settings read from `.menu-display.toml`.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
