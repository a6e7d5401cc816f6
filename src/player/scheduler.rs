use std::collections::VecDeque;

use crate::player::PlayerEvent;

/// Work waiting for the next scheduling tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Sample the clock of the running segment again.
    Tick { chain: u64 },
    /// Hand an event to the editor state store.
    Notify(PlayerEvent),
}

/// Single-threaded frame queue. Nothing here runs on its own: the host calls
/// `take_frame` once per frame and runs what comes out, so anything queued
/// while a frame runs waits for the next one.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: VecDeque<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arms a tick chain for the next frame.
    pub fn schedule_tick(&mut self, chain: u64) {
        self.queue.push_back(Task::Tick { chain });
    }

    /// Queues an event for the next frame. A time update queued right after
    /// another pending one replaces it.
    pub fn defer(&mut self, event: PlayerEvent) {
        if let PlayerEvent::SetPlayerTime(time) = event {
            if let Some(Task::Notify(PlayerEvent::SetPlayerTime(pending))) = self.queue.back_mut() {
                *pending = time;
                return;
            }
        }
        self.queue.push_back(Task::Notify(event));
    }

    pub fn take_frame(&mut self) -> Vec<Task> {
        self.queue.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_updates_are_batched() {
        let mut scheduler = Scheduler::new();
        scheduler.defer(PlayerEvent::SetPlayerTime(1.0));
        scheduler.defer(PlayerEvent::SetPlayerTime(2.0));
        scheduler.defer(PlayerEvent::SetPlay(false));
        scheduler.defer(PlayerEvent::SetPlayerTime(3.0));

        assert_eq!(
            scheduler.take_frame(),
            vec![
                Task::Notify(PlayerEvent::SetPlayerTime(2.0)),
                Task::Notify(PlayerEvent::SetPlay(false)),
                Task::Notify(PlayerEvent::SetPlayerTime(3.0)),
            ]
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_ticks_keep_their_order() {
        let mut scheduler = Scheduler::new();
        scheduler.defer(PlayerEvent::SetPlayerTime(1.0));
        scheduler.schedule_tick(4);
        scheduler.defer(PlayerEvent::SetPlayerTime(2.0));

        assert_eq!(
            scheduler.take_frame(),
            vec![
                Task::Notify(PlayerEvent::SetPlayerTime(1.0)),
                Task::Tick { chain: 4 },
                Task::Notify(PlayerEvent::SetPlayerTime(2.0)),
            ]
        );
    }
}
