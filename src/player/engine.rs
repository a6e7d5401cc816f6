use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::mpsc;

use crate::core::{EditorState, PlaybackError, PlayerConfig, Resolution, Segment, SourceId, Time};
use crate::player::{Clock, PlaybackStatus, Player, PlayerEvent, Synchronizer, Task};
use crate::sources::{Device, SourceRegistry};

/// The playback engine as the application sees it.
///
/// Feed it every new editor state with `on_state_change` and call `run_frame`
/// once per frame. Events for the store come out of the receiver returned by
/// `new`.
pub struct Engine {
    player: Player,
    sync: Synchronizer,
    events: mpsc::UnboundedSender<PlayerEvent>,
}

impl Engine {
    pub fn new(config: &PlayerConfig, clock: Rc<dyn Clock>) -> (Self, mpsc::UnboundedReceiver<PlayerEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let sources = SourceRegistry::new(config.default_resolution);

        (
            Engine {
                player: Player::new(sources, clock),
                sync: Synchronizer::new(config.merge_epsilon),
                events,
            },
            receiver,
        )
    }

    /// Reacts to a new editor state. Runs synchronously; everything it
    /// publishes goes out on a later frame.
    pub fn on_state_change(&mut self, state: &EditorState) -> Result<(), PlaybackError> {
        self.sync.update(state, &mut self.player)
    }

    /// Runs everything queued for this frame: pending ticks of the playing
    /// segment and deferred notifications. Remaining tasks still run after a
    /// failed tick; the first error is returned.
    pub fn run_frame(&mut self) -> Result<(), PlaybackError> {
        let mut result = Ok(());

        for task in self.player.take_frame() {
            match task {
                Task::Tick { chain } => {
                    if let Err(e) = self.player.tick(chain) {
                        if result.is_ok() {
                            result = Err(e);
                        }
                    }
                }
                Task::Notify(event) => {
                    if let Err(e) = self.events.send(event) {
                        log::error!("Failed to deliver player event {:?}: receiver is gone", e.0);
                    }
                }
            }
        }

        result
    }

    pub fn register_source<D: Device + 'static>(&mut self, id: impl Into<SourceId>, device: &Rc<RefCell<D>>) {
        self.player.sources_mut().register(id, device);
    }

    pub fn unregister_source(&mut self, id: &str) {
        self.player.sources_mut().unregister(id);
    }

    pub fn resolution(&self, id: &str) -> Option<Resolution> {
        self.player.sources().resolution(id)
    }

    pub fn duration(&self, id: &str) -> Option<Time> {
        self.player.sources().duration(id)
    }

    pub fn target_resolution(&self) -> Resolution {
        self.player.sources().target_resolution()
    }

    pub fn current_render_item(&self) -> Option<&Segment> {
        self.player.current_render_item()
    }

    pub fn current_time(&self) -> Time {
        self.player.time()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.player.status()
    }

    pub fn has_pending_work(&self) -> bool {
        self.player.has_pending_work()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }
}
