use crate::core::document::{document_render_items, render_items, timed_document_items, DocumentItem};
use crate::core::editor::{selected_items, Selection};
use crate::core::{SourceId, Time};

/// A contiguous slice of document time, played either from a source
/// (starting at `source_start` inside it) or as silence.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub absolute_start: Time,
    pub length: Time,
    pub source: Option<SourceId>,
    pub source_start: Time,
}

impl Segment {
    pub fn media(absolute_start: Time, length: Time, source: SourceId, source_start: Time) -> Self {
        Self {
            absolute_start,
            length,
            source: Some(source),
            source_start,
        }
    }

    pub fn silence(absolute_start: Time, length: Time) -> Self {
        Self {
            absolute_start,
            length,
            source: None,
            source_start: 0.0,
        }
    }

    pub fn end(&self) -> Time {
        self.absolute_start + self.length
    }

    pub fn contains(&self, time: Time) -> bool {
        self.absolute_start <= time && time <= self.end()
    }

    /// Document time corresponding to a position inside the source.
    pub fn to_document_time(&self, source_time: Time) -> Time {
        source_time - self.source_start + self.absolute_start
    }

    /// Position inside the source corresponding to a document time.
    pub fn to_source_time(&self, time: Time) -> Time {
        self.source_start + (time - self.absolute_start)
    }

    /// Whether `next` picks up exactly where this segment leaves off, both in
    /// document time and inside the source.
    pub(crate) fn continues_into(&self, next: &Segment, epsilon: Time) -> bool {
        if self.source != next.source || (self.end() - next.absolute_start).abs() > epsilon {
            return false;
        }
        match self.source {
            Some(_) => (self.source_start + self.length - next.source_start).abs() <= epsilon,
            None => true,
        }
    }
}

/// Ordered, immutable list of segments. Replaced wholesale whenever the
/// selection or the document changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn start(&self) -> Option<Time> {
        self.first().map(|segment| segment.absolute_start)
    }

    pub fn end(&self) -> Option<Time> {
        self.last().map(Segment::end)
    }

    /// The last segment whose closed range contains `time`. Preferring the
    /// later segment makes an exact boundary belong to the segment that starts
    /// there, so playback moves forward instead of re-entering the one that
    /// just finished. Overlapping segments are resolved the same way.
    pub fn segment_at(&self, time: Time) -> Option<&Segment> {
        self.segments.iter().rev().find(|segment| segment.contains(time))
    }

    /// `time` forced into `[start, end]`, or `None` when it already lies
    /// inside (or the timeline is empty).
    pub fn clamp(&self, time: Time) -> Option<Time> {
        let (start, end) = (self.start()?, self.end()?);
        if time < start {
            Some(start)
        } else if time > end {
            Some(end)
        } else {
            None
        }
    }
}

/// Builds the timeline for the current selection, or for the whole document
/// when nothing is selected.
pub fn derive_timeline(selection: Option<&Selection>, content: &[DocumentItem], epsilon: Time) -> Timeline {
    let timed = timed_document_items(content);
    let selected = selected_items(selection, &timed);

    if selected.is_empty() {
        Timeline::new(document_render_items(content, epsilon))
    } else {
        Timeline::new(render_items(selected, epsilon))
    }
}
