// =============================================================================
// PLAYBACK DRIVER - DOCUMENT TIME OVER MANY DEVICES
// =============================================================================
//
// The driver walks the timeline one segment at a time. Entering a segment
// positions its device (or notes the wall clock for silence) and starts a
// tick chain: every tick samples the segment's clock, converts it to document
// time, publishes it and decides whether to keep going, move on to the next
// segment or stop at the end of the timeline.
//
// Ticks never block. A tick that wants to continue re-arms itself on the
// scheduler; pausing cancels by making sure no tick of the old chain acts
// again.
//
// =============================================================================

use std::mem;
use std::rc::Rc;

use crate::core::{PlaybackError, Segment, Time, Timeline};
use crate::player::{Clock, DriverState, PlaybackState, PlaybackStatus, PlayerEvent, Scheduler, Task};
use crate::sources::SourceRegistry;

pub struct Player {
    /// `None` until the first timeline has been derived.
    timeline: Option<Timeline>,
    sources: SourceRegistry,
    state: PlaybackState,
    driver: DriverState,
    last_chain: u64,
    scheduler: Scheduler,
    clock: Rc<dyn Clock>,
}

impl Player {
    pub fn new(sources: SourceRegistry, clock: Rc<dyn Clock>) -> Self {
        Self {
            timeline: None,
            sources,
            state: PlaybackState::default(),
            driver: DriverState::Idle,
            last_chain: 0,
            scheduler: Scheduler::new(),
            clock,
        }
    }

    // =========================================================================
    // STATE ACCESS
    // =========================================================================

    pub fn time(&self) -> Time {
        self.state.time
    }

    /// Moves the logical position without telling the store.
    pub fn set_time(&mut self, time: Time) {
        self.state.time = time;
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.state.playing = playing;
    }

    pub fn driver_state(&self) -> &DriverState {
        &self.driver
    }

    /// `Playing` while a segment chain runs, `Paused` when stopped on a
    /// loaded timeline, `Idle` when there is nothing to play.
    pub fn status(&self) -> PlaybackStatus {
        if !self.driver.is_idle() {
            PlaybackStatus::Playing
        } else if self.timeline.as_ref().is_some_and(|timeline| !timeline.is_empty()) {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Idle
        }
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Replaces the timeline. Callers pause first; a running chain keeps the
    /// segment it entered until then.
    pub fn set_timeline(&mut self, timeline: Timeline) {
        log::debug!(
            "Timeline replaced: {} segments, {:.3}s..{:.3}s",
            timeline.len(),
            timeline.start().unwrap_or(0.0),
            timeline.end().unwrap_or(0.0)
        );
        self.timeline = Some(timeline);
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn sources_mut(&mut self) -> &mut SourceRegistry {
        &mut self.sources
    }

    pub fn has_pending_work(&self) -> bool {
        !self.scheduler.is_empty()
    }

    pub(crate) fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub(crate) fn take_frame(&mut self) -> Vec<Task> {
        self.scheduler.take_frame()
    }

    /// The segment covering the current time. On a boundary this is the
    /// segment that starts there.
    pub fn current_render_item(&self) -> Option<&Segment> {
        self.timeline.as_ref()?.segment_at(self.state.time)
    }

    // =========================================================================
    // TIME PUBLICATION
    // =========================================================================

    /// Sets the position right away and tells the store on the next frame.
    pub fn update_current_time(&mut self, time: Time) {
        self.state.time = time;
        log::trace!("Player time {:.3}s", time);
        self.scheduler.defer(PlayerEvent::SetPlayerTime(time));
    }

    fn clamp_current_time(&mut self) {
        let clamped = self.timeline.as_ref().and_then(|timeline| timeline.clamp(self.state.time));
        if let Some(time) = clamped {
            log::debug!("Clamping player time {:.3}s to {:.3}s", self.state.time, time);
            self.update_current_time(time);
        }
    }

    /// Positions the device under the current time so it shows the right
    /// frame, whether or not anything is playing.
    pub fn preview_current_time(&mut self) {
        let Some(segment) = self.current_render_item() else {
            return;
        };
        if let Some(source) = &segment.source {
            let source_time = segment.to_source_time(self.state.time);
            log::debug!("Seeking {} to {:.3}s for preview", source, source_time);
            self.sources.seek(source, source_time);
        }
    }

    // =========================================================================
    // TRANSPORT
    // =========================================================================

    /// Starts the segment under the current time and runs its first tick.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        self.stop_segment();

        let Some(timeline) = self.timeline.as_ref() else {
            log::debug!("No timeline yet, nothing to play");
            return Ok(());
        };
        if timeline.is_empty() {
            log::warn!("Timeline is empty, stopping playback");
            self.stop_playback();
            return Ok(());
        }

        self.clamp_current_time();

        let time = self.state.time;
        let segment = self
            .timeline
            .as_ref()
            .and_then(|timeline| timeline.segment_at(time))
            .cloned()
            .ok_or(PlaybackError::NoSegment { time })?;

        self.last_chain += 1;
        let chain = self.last_chain;
        let source = segment.source.clone();
        let device = source.as_deref().and_then(|source| self.sources.get(source));

        match (source, device) {
            (Some(source), Some(device)) => {
                let source_time = segment.to_source_time(time);
                log::debug!(
                    "Playing {} from {:.3}s (segment {:.3}s..{:.3}s)",
                    source,
                    source_time,
                    segment.absolute_start,
                    segment.end()
                );
                {
                    let mut device = device.borrow_mut();
                    device.set_current_time(source_time);
                    device.play();
                }
                self.driver = DriverState::PlayingMedia { segment, chain, entered_at: time };
            }
            (source, _) => {
                match source {
                    Some(source) => log::warn!("Source {} is not ready, keeping time with the wall clock", source),
                    None => log::debug!("Playing silence {:.3}s..{:.3}s", segment.absolute_start, segment.end()),
                }
                self.driver = DriverState::PlayingSilence {
                    segment,
                    chain,
                    entered_at: time,
                    base: time,
                    started: self.clock.now(),
                };
            }
        }

        self.tick(chain)
    }

    /// Pauses every device and cancels the running chain. Safe to call at any
    /// time, any number of times.
    pub fn pause(&mut self) {
        if !self.driver.is_idle() {
            log::debug!("Pausing at {:.3}s", self.state.time);
        }
        self.driver = DriverState::Idle;
        self.sources.pause_all();
    }

    /// One step of the running chain. Ticks from any other chain are ignored.
    pub fn tick(&mut self, chain: u64) -> Result<(), PlaybackError> {
        if self.driver.chain() != Some(chain) {
            log::trace!("Dropping tick of finished chain {}", chain);
            return Ok(());
        }
        if !self.state.playing {
            self.stop_segment();
            return Ok(());
        }

        let (segment, entered_at) = match &self.driver {
            DriverState::PlayingMedia { segment, entered_at, .. }
            | DriverState::PlayingSilence { segment, entered_at, .. } => (segment.clone(), *entered_at),
            DriverState::Idle => return Ok(()),
        };

        // Never run past the segment, even if the device overshoots
        let time = self.sample_clock().min(segment.end());
        self.update_current_time(time);

        let timeline_end = self.timeline.as_ref().and_then(Timeline::end).unwrap_or(segment.end());
        if time >= timeline_end {
            log::info!("Reached the end of the timeline at {:.3}s", time);
            self.stop_segment();
            self.stop_playback();
            return Ok(());
        }

        if time >= segment.end() {
            if time <= entered_at {
                self.stop_segment();
                self.stop_playback();
                let error = PlaybackError::ClockStalled {
                    segment_start: segment.absolute_start,
                    time,
                };
                log::error!("{}", error);
                return Err(error);
            }
            log::debug!("Segment {:.3}s..{:.3}s finished", segment.absolute_start, segment.end());
            return self.play();
        }

        self.scheduler.schedule_tick(chain);
        Ok(())
    }

    /// Reads the clock of the running segment, in document time.
    fn sample_clock(&mut self) -> Time {
        let now = self.clock.now();
        let (segment, chain, entered_at) = match &self.driver {
            DriverState::PlayingMedia { segment, chain, entered_at } => (segment.clone(), *chain, *entered_at),
            DriverState::PlayingSilence { base, started, .. } => return base + (now - started),
            DriverState::Idle => return self.state.time,
        };

        let source = segment.source.clone().unwrap_or_default();
        if let Some(device_time) = self.sources.current_time(&source) {
            return segment.to_document_time(device_time);
        }

        log::warn!("Source {} went away mid-segment, keeping time with the wall clock", source);
        let base = self.state.time;
        self.driver = DriverState::PlayingSilence {
            segment,
            chain,
            entered_at,
            base,
            started: now,
        };
        base
    }

    /// Ends the running segment: pauses its device and drops the chain.
    fn stop_segment(&mut self) {
        if let DriverState::PlayingMedia { segment, .. } = mem::replace(&mut self.driver, DriverState::Idle) {
            if let Some(source) = &segment.source {
                self.sources.pause(source);
            }
        }
    }

    /// Clears the playing flag here and asks the store to do the same.
    fn stop_playback(&mut self) {
        self.state.playing = false;
        self.scheduler.defer(PlayerEvent::SetPlay(false));
    }
}
