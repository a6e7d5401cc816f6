pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod timeline;

#[cfg(test)]
mod config_test;

pub use config::*;
pub use document::*;
pub use editor::*;
pub use error::*;
pub use timeline::*;

/// Seconds of document time (or of a device's own clock).
pub type Time = f64;

/// Identifies a media source; devices are registered under it.
pub type SourceId = String;
