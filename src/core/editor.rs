use serde::{Deserialize, Serialize};

use crate::core::document::{Document, TimedItem};

/// Selected range of document items; `end_index` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start_index: usize,
    pub end_index: usize,
}

/// Who moved the cursor last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorOrigin {
    /// The cursor follows playback.
    #[default]
    Player,
    /// The user placed the cursor in front of `Cursor::user_index`.
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    pub current: CursorOrigin,
    pub user_index: usize,
}

/// Read-only snapshot of the editor state the player reacts to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    pub playing: bool,
    pub selection: Option<Selection>,
    pub document: Document,
    pub cursor: Cursor,
}

/// The timed items covered by the selection, clamped to the document.
/// Empty without a selection.
pub fn selected_items<'t, 'a>(selection: Option<&Selection>, timed: &'t [TimedItem<'a>]) -> &'t [TimedItem<'a>] {
    match selection {
        Some(selection) => {
            let end = selection.end_index.min(timed.len());
            let start = selection.start_index.min(end);
            &timed[start..end]
        }
        None => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::{timed_document_items, DocumentItem};

    #[test]
    fn test_selected_items_is_clamped() {
        let content = vec![
            DocumentItem::ArtificialSilence { length: 1.0 },
            DocumentItem::ArtificialSilence { length: 2.0 },
        ];
        let timed = timed_document_items(&content);

        let inside = Selection { start_index: 1, end_index: 2 };
        assert_eq!(selected_items(Some(&inside), &timed).len(), 1);
        assert_eq!(selected_items(Some(&inside), &timed)[0].absolute_start, 1.0);

        let overhanging = Selection { start_index: 1, end_index: 10 };
        assert_eq!(selected_items(Some(&overhanging), &timed).len(), 1);

        let reversed = Selection { start_index: 5, end_index: 1 };
        assert!(selected_items(Some(&reversed), &timed).is_empty());

        assert!(selected_items(None, &timed).is_empty());
    }

    #[test]
    fn test_cursor_origin_serialization() {
        let cursor = Cursor { current: CursorOrigin::User, user_index: 3 };
        let json = serde_json::to_string(&cursor).expect("Failed to serialize cursor");

        assert_eq!(json, r#"{"current":"user","user_index":3}"#);
        assert_eq!(Cursor::default().current, CursorOrigin::Player);
    }
}
