//! Frame-accurate playback of a document made of media slices and silence.
//!
//! [`player::Engine`] owns the timeline derived from the editor state, the
//! registry of media devices and the cooperative tick loop that keeps them in
//! step with one logical document time.

pub mod core;
pub mod player;
pub mod sources;
