use crate::core::Time;

/// Errors raised while reading document content.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid document item at index {index}: {reason}")]
    InvalidItem { index: usize, reason: String },
}

/// Errors raised by the playback driver and the state synchronizer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    /// Logical time reached the end of a segment without ever moving past the
    /// time it was entered at. The backing device (or the timeline) is broken.
    #[error("playback clock stalled: segment starting at {segment_start:.3}s ended at {time:.3}s without advancing")]
    ClockStalled { segment_start: Time, time: Time },

    #[error("no segment covers time {time:.3}s")]
    NoSegment { time: Time },

    #[error("selection starts at item {start_index} but the document only has {len} items")]
    SelectionOutOfRange { start_index: usize, len: usize },
}
