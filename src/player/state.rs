use crate::core::{Segment, Time};

/// Requests the player sends back to the editor state store.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Logical playback position moved.
    SetPlayerTime(Time),
    /// Playback reached the end of the timeline; the store should clear its
    /// playing flag.
    SetPlay(bool),
}

/// Outward-facing playback status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Paused,
}

/// Authoritative position and the playing flag as last seen from the store.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackState {
    pub time: Time,
    pub playing: bool,
}

/// What the driver is currently doing. Every running tick chain carries the
/// id it was started with; only the chain whose id matches keeps going.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverState {
    Idle,
    PlayingMedia {
        segment: Segment,
        chain: u64,
        entered_at: Time,
    },
    PlayingSilence {
        segment: Segment,
        chain: u64,
        entered_at: Time,
        /// Document time the wall clock counts from.
        base: Time,
        /// Wall clock reading at `base`.
        started: Time,
    },
}

impl DriverState {
    pub fn segment(&self) -> Option<&Segment> {
        match self {
            DriverState::Idle => None,
            DriverState::PlayingMedia { segment, .. } | DriverState::PlayingSilence { segment, .. } => Some(segment),
        }
    }

    pub fn chain(&self) -> Option<u64> {
        match self {
            DriverState::Idle => None,
            DriverState::PlayingMedia { chain, .. } | DriverState::PlayingSilence { chain, .. } => Some(*chain),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DriverState::Idle)
    }
}
