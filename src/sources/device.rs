use crate::core::{Resolution, Time};

/// A playable media handle owned by the UI layer (a video element, a decoder
/// pipeline, ...). The player only positions, starts and stops it.
pub trait Device {
    /// Position inside the source, in seconds.
    fn current_time(&self) -> Time;

    fn set_current_time(&mut self, time: Time);

    fn play(&mut self);

    fn pause(&mut self);

    fn is_playing(&self) -> bool;

    /// Length of the source, once known.
    fn duration(&self) -> Option<Time>;

    /// Frame size, once known. Audio-only sources never report one.
    fn resolution(&self) -> Option<Resolution>;
}
