use crate::core::{
    derive_timeline, timed_document_items, CursorOrigin, Document, EditorState, PlaybackError, Selection, Time,
    TimedItem,
};
use crate::player::Player;

#[derive(Debug, Clone, PartialEq)]
struct PlayingInputs {
    playing: bool,
    selection: Option<Selection>,
    document: Document,
}

#[derive(Debug, Clone, PartialEq)]
struct TimelineInputs {
    selection: Option<Selection>,
    document: Document,
}

#[derive(Debug, Clone, PartialEq)]
struct UserSeekInputs {
    origin: CursorOrigin,
    user_index: usize,
    document: Document,
}

/// Stores `next` and reports whether it differs from what was stored.
fn changed<T: PartialEq>(memo: &mut Option<T>, next: T) -> bool {
    if memo.as_ref() == Some(&next) {
        return false;
    }
    *memo = Some(next);
    true
}

/// Position a user-placed cursor stands for: the start of the item at
/// `index`, or the end of the document when the index is past the last item.
pub fn user_seek_time(timed: &[TimedItem<'_>], index: usize) -> Option<Time> {
    match timed.get(index) {
        Some(item) => Some(item.absolute_start),
        None => timed.last().map(TimedItem::absolute_end),
    }
}

/// Turns editor state changes into player calls.
///
/// Each reaction watches its own slice of the state and only runs when that
/// slice changed. The order (playing, timeline, user seek) is fixed.
#[derive(Debug, Default)]
pub struct Synchronizer {
    playing_inputs: Option<PlayingInputs>,
    timeline_inputs: Option<TimelineInputs>,
    user_seek_inputs: Option<UserSeekInputs>,
    merge_epsilon: Time,
}

impl Synchronizer {
    pub fn new(merge_epsilon: Time) -> Self {
        Self {
            merge_epsilon,
            ..Default::default()
        }
    }

    /// Runs every reaction whose inputs changed. All of them run even if an
    /// earlier one fails; the first error is returned.
    pub fn update(&mut self, state: &EditorState, player: &mut Player) -> Result<(), PlaybackError> {
        let playing = PlayingInputs {
            playing: state.playing,
            selection: state.selection,
            document: state.document.clone(),
        };
        let playing_result = if changed(&mut self.playing_inputs, playing) {
            Self::on_playing_changed(state, player)
        } else {
            Ok(())
        };

        let timeline = TimelineInputs {
            selection: state.selection,
            document: state.document.clone(),
        };
        let timeline_result = if changed(&mut self.timeline_inputs, timeline) {
            self.on_timeline_changed(state, player)
        } else {
            Ok(())
        };

        let user_seek = UserSeekInputs {
            origin: state.cursor.current,
            user_index: state.cursor.user_index,
            document: state.document.clone(),
        };
        let user_seek_result = if changed(&mut self.user_seek_inputs, user_seek) {
            Self::on_user_seek(state, player)
        } else {
            Ok(())
        };

        playing_result.and(timeline_result).and(user_seek_result)
    }

    fn on_playing_changed(state: &EditorState, player: &mut Player) -> Result<(), PlaybackError> {
        player.set_playing(state.playing);
        if !state.playing {
            player.pause();
            return Ok(());
        }

        if let Some(selection) = &state.selection {
            let timed = timed_document_items(&state.document.content);
            let first = timed.get(selection.start_index).ok_or(PlaybackError::SelectionOutOfRange {
                start_index: selection.start_index,
                len: timed.len(),
            })?;
            player.set_time(first.absolute_start);
        }

        log::info!("Starting playback at {:.3}s", player.time());
        player.play()
    }

    fn on_timeline_changed(&self, state: &EditorState, player: &mut Player) -> Result<(), PlaybackError> {
        player.pause();
        player.set_timeline(derive_timeline(
            state.selection.as_ref(),
            &state.document.content,
            self.merge_epsilon,
        ));
        if player.is_playing() {
            player.play()
        } else {
            Ok(())
        }
    }

    /// The store already holds the new time for user seeks, so it is not
    /// published back.
    fn on_user_seek(state: &EditorState, player: &mut Player) -> Result<(), PlaybackError> {
        if state.cursor.current != CursorOrigin::User {
            return Ok(());
        }
        player.pause();

        let timed = timed_document_items(&state.document.content);
        let Some(time) = user_seek_time(&timed, state.cursor.user_index) else {
            log::debug!("Ignoring user seek on an empty document");
            return Ok(());
        };
        log::debug!("User seek to item {} at {:.3}s", state.cursor.user_index, time);
        player.set_time(time);
        player.preview_current_time();

        if player.is_playing() {
            player.play()
        } else {
            Ok(())
        }
    }
}
