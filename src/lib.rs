// Library exports for the term-settings binary and its tests.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod debug;

pub use term_settings_model as model;
