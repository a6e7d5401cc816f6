use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::core::error::DocumentError;
use crate::core::timeline::Segment;
use crate::core::{SourceId, Time};

/// One entry of the document content.
///
/// Only words and silences carry a length; paragraph markers sit between them
/// and occupy no document time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentItem {
    ParagraphStart {
        #[serde(default)]
        speaker: Option<String>,
    },
    ParagraphEnd,
    Word {
        source: SourceId,
        source_start: Time,
        length: Time,
        word: String,
        #[serde(default)]
        conf: f64,
    },
    Silence {
        source: SourceId,
        source_start: Time,
        length: Time,
    },
    ArtificialSilence {
        length: Time,
    },
}

impl DocumentItem {
    pub fn length(&self) -> Option<Time> {
        match self {
            DocumentItem::Word { length, .. }
            | DocumentItem::Silence { length, .. }
            | DocumentItem::ArtificialSilence { length } => Some(*length),
            DocumentItem::ParagraphStart { .. } | DocumentItem::ParagraphEnd => None,
        }
    }

    /// The slice of media this item plays, if it plays a source at all.
    pub fn source(&self) -> Option<(&SourceId, Time)> {
        match self {
            DocumentItem::Word { source, source_start, .. }
            | DocumentItem::Silence { source, source_start, .. } => Some((source, *source_start)),
            _ => None,
        }
    }

    fn validate(&self, index: usize) -> Result<(), DocumentError> {
        let invalid = |reason: String| DocumentError::InvalidItem { index, reason };

        if let Some(length) = self.length() {
            if !length.is_finite() || length < 0.0 {
                return Err(invalid(format!("length must be a non-negative number, got {}", length)));
            }
        }
        if let Some((source, source_start)) = self.source() {
            if source.is_empty() {
                return Err(invalid("source id is empty".to_string()));
            }
            if !source_start.is_finite() || source_start < 0.0 {
                return Err(invalid(format!("source_start must be a non-negative number, got {}", source_start)));
            }
        }
        Ok(())
    }
}

/// True for items that occupy document time.
pub fn is_paragraph_item(item: &DocumentItem) -> bool {
    item.length().is_some()
}

/// Immutable document content. Cloning shares the item list, so two snapshots
/// of an unchanged document compare equal without walking the items.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub content: Rc<Vec<DocumentItem>>,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.content, &other.content) || self.content == other.content
    }
}

impl Document {
    pub fn new(content: Vec<DocumentItem>) -> Result<Self, DocumentError> {
        for (index, item) in content.iter().enumerate() {
            item.validate(index)?;
        }
        Ok(Self { content: Rc::new(content) })
    }

    /// Parses a JSON array of items. Unknown item types, missing fields and
    /// negative lengths are rejected.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let content: Vec<DocumentItem> = serde_json::from_str(json)?;
        Self::new(content)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self.content.as_ref())?)
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Every source referenced by the document, in order of first use.
    pub fn sources(&self) -> Vec<SourceId> {
        let mut sources: Vec<SourceId> = Vec::new();
        for item in self.content.iter() {
            if let Some((source, _)) = item.source() {
                if !sources.contains(source) {
                    sources.push(source.clone());
                }
            }
        }
        sources
    }
}

/// A document item together with its position in document time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedItem<'a> {
    pub item: &'a DocumentItem,
    pub absolute_start: Time,
}

impl TimedItem<'_> {
    /// End of the item in document time; markers end where they start.
    pub fn absolute_end(&self) -> Time {
        self.absolute_start + self.item.length().unwrap_or(0.0)
    }
}

pub fn timed_document_items(content: &[DocumentItem]) -> Vec<TimedItem<'_>> {
    let mut position = 0.0;
    content
        .iter()
        .map(|item| {
            let timed = TimedItem { item, absolute_start: position };
            position += item.length().unwrap_or(0.0);
            timed
        })
        .collect()
}

/// Turns timed items into playable segments, merging runs that play one
/// source continuously (or are silent back to back).
pub fn render_items(items: &[TimedItem<'_>], epsilon: Time) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for timed in items {
        let Some(length) = timed.item.length() else {
            continue;
        };
        let mut piece = match timed.item.source() {
            Some((source, source_start)) => Segment::media(timed.absolute_start, length, source.clone(), source_start),
            None => Segment::silence(timed.absolute_start, length),
        };

        // Adjacent segments share their boundary exactly; summed lengths can
        // otherwise leave a one-ulp gap after a merged run.
        if let Some(last) = segments.last() {
            if (last.end() - piece.absolute_start).abs() <= epsilon {
                piece.absolute_start = last.end();
            }
        }

        match segments.last_mut() {
            Some(last) if last.continues_into(&piece, epsilon) => last.length += piece.length,
            _ => segments.push(piece),
        }
    }

    segments
}

pub fn document_render_items(content: &[DocumentItem], epsilon: Time) -> Vec<Segment> {
    render_items(&timed_document_items(content), epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(source: &str, source_start: Time, length: Time) -> DocumentItem {
        DocumentItem::Word {
            source: source.to_string(),
            source_start,
            length,
            word: "w".to_string(),
            conf: 1.0,
        }
    }

    #[test]
    fn test_timed_items_skip_markers() {
        let content = vec![
            DocumentItem::ParagraphStart { speaker: Some("A".to_string()) },
            word("a", 0.0, 1.5),
            DocumentItem::ArtificialSilence { length: 0.5 },
            DocumentItem::ParagraphEnd,
            word("a", 3.0, 1.0),
        ];
        let timed = timed_document_items(&content);

        let starts: Vec<Time> = timed.iter().map(|t| t.absolute_start).collect();
        assert_eq!(starts, vec![0.0, 0.0, 1.5, 2.0, 2.0]);
        assert_eq!(timed[3].absolute_end(), 2.0);
        assert_eq!(timed[4].absolute_end(), 3.0);
    }

    #[test]
    fn test_render_items_merges_continuous_source() {
        let content = vec![
            DocumentItem::ParagraphStart { speaker: None },
            word("a", 10.0, 1.0),
            word("a", 11.0, 2.0),
            // jump inside the same source starts a new segment
            word("a", 20.0, 1.0),
            DocumentItem::ArtificialSilence { length: 0.5 },
            DocumentItem::ArtificialSilence { length: 0.5 },
            word("b", 0.0, 1.0),
            DocumentItem::ParagraphEnd,
        ];
        let segments = document_render_items(&content, 1e-6);

        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], Segment::media(0.0, 3.0, "a".to_string(), 10.0));
        assert_eq!(segments[1], Segment::media(3.0, 1.0, "a".to_string(), 20.0));
        assert_eq!(segments[2], Segment::silence(4.0, 1.0));
        assert_eq!(segments[3], Segment::media(5.0, 1.0, "b".to_string(), 0.0));
    }

    #[test]
    fn test_merged_run_shares_boundary_with_next_segment() {
        // 0.1 + 0.1 + 0.4 sums to 0.6000000000000001, 0.1 + 0.5 to 0.6
        let content = vec![
            DocumentItem::ArtificialSilence { length: 0.1 },
            word("a", 0.0, 0.1),
            word("a", 0.1, 0.4),
            word("b", 0.0, 1.0),
        ];
        let segments = document_render_items(&content, 1e-6);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].source.as_deref(), Some("a"));
        assert_eq!(segments[1].absolute_start, segments[0].end());
        assert_eq!(segments[2].absolute_start, segments[1].end());
        assert!(segments[2].contains(segments[1].end()));
    }

    #[test]
    fn test_source_silence_is_media() {
        let content = vec![
            word("a", 0.0, 1.0),
            DocumentItem::Silence { source: "a".to_string(), source_start: 1.0, length: 2.0 },
        ];
        let segments = document_render_items(&content, 1e-6);

        assert_eq!(segments, vec![Segment::media(0.0, 3.0, "a".to_string(), 0.0)]);
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"type": "paragraph_start", "speaker": "Host"},
            {"type": "word", "source": "cam1", "source_start": 0.0, "length": 0.4, "word": "hello"},
            {"type": "artificial_silence", "length": 1.0},
            {"type": "paragraph_end"}
        ]"#;
        let document = Document::from_json(json).expect("valid document");

        assert_eq!(document.len(), 4);
        assert!(is_paragraph_item(&document.content[1]));
        assert!(!is_paragraph_item(&document.content[3]));
        assert_eq!(document.sources(), vec!["cam1".to_string()]);
    }

    #[test]
    fn test_to_json_reads_back() {
        let document = Document::new(vec![
            DocumentItem::ParagraphStart { speaker: Some("Host".to_string()) },
            word("cam1", 2.0, 0.5),
            DocumentItem::ParagraphEnd,
        ])
        .unwrap();

        let json = document.to_json().expect("serializable document");
        assert!(json.contains("\"type\": \"paragraph_start\""));
        assert_eq!(Document::from_json(&json).unwrap(), document);
    }

    #[test]
    fn test_unknown_item_type_is_rejected() {
        let json = r#"[{"type": "sticker", "length": 1.0}]"#;
        let result = Document::from_json(json);

        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }

    #[test]
    fn test_negative_length_is_rejected() {
        let json = r#"[
            {"type": "artificial_silence", "length": 1.0},
            {"type": "artificial_silence", "length": -2.0}
        ]"#;
        match Document::from_json(json) {
            Err(DocumentError::InvalidItem { index, .. }) => assert_eq!(index, 1),
            other => panic!("Expected InvalidItem, got {:?}", other),
        }
    }

    #[test]
    fn test_document_equality_shares_content() {
        let document = Document::new(vec![DocumentItem::ParagraphEnd]).unwrap();
        let shared = document.clone();
        let rebuilt = Document::new(vec![DocumentItem::ParagraphEnd]).unwrap();
        let different = Document::new(vec![]).unwrap();

        assert_eq!(document, shared);
        assert_eq!(document, rebuilt);
        assert_ne!(document, different);
    }
}
