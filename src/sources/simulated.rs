use std::rc::Rc;

use crate::core::{Resolution, Time};
use crate::player::Clock;
use crate::sources::Device;

/// A device that plays nothing but keeps time like one: while playing, its
/// position follows the injected clock at `rate` and stops at the end of the
/// source. A rate of zero models a device whose clock froze.
pub struct SimulatedDevice {
    clock: Rc<dyn Clock>,
    duration: Time,
    resolution: Option<Resolution>,
    rate: f64,
    position: Time,
    playing_since: Option<Time>,
}

impl SimulatedDevice {
    pub fn new(clock: Rc<dyn Clock>, duration: Time) -> Self {
        Self {
            clock,
            duration,
            resolution: None,
            rate: 1.0,
            position: 0.0,
            playing_since: None,
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    pub fn set_resolution(&mut self, resolution: Option<Resolution>) {
        self.resolution = resolution;
    }

    fn position_at(&self, now: Time) -> Time {
        let position = match self.playing_since {
            Some(since) => self.position + (now - since) * self.rate,
            None => self.position,
        };
        position.clamp(0.0, self.duration)
    }
}

impl Device for SimulatedDevice {
    fn current_time(&self) -> Time {
        self.position_at(self.clock.now())
    }

    fn set_current_time(&mut self, time: Time) {
        self.position = time.clamp(0.0, self.duration);
        if self.playing_since.is_some() {
            self.playing_since = Some(self.clock.now());
        }
    }

    fn play(&mut self) {
        if self.playing_since.is_none() {
            self.playing_since = Some(self.clock.now());
        }
    }

    fn pause(&mut self) {
        let now = self.clock.now();
        self.position = self.position_at(now);
        self.playing_since = None;
    }

    fn is_playing(&self) -> bool {
        self.playing_since.is_some()
    }

    fn duration(&self) -> Option<Time> {
        Some(self.duration)
    }

    fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ManualClock;

    #[test]
    fn test_position_follows_clock_while_playing() {
        let clock = ManualClock::new();
        let mut device = SimulatedDevice::new(Rc::new(clock.clone()), 10.0);

        device.set_current_time(2.0);
        clock.advance(5.0);
        assert_eq!(device.current_time(), 2.0);

        device.play();
        clock.advance(1.5);
        assert_eq!(device.current_time(), 3.5);

        device.pause();
        clock.advance(3.0);
        assert_eq!(device.current_time(), 3.5);
    }

    #[test]
    fn test_seek_while_playing_restarts_from_new_position() {
        let clock = ManualClock::new();
        let mut device = SimulatedDevice::new(Rc::new(clock.clone()), 10.0);

        device.play();
        clock.advance(2.0);
        device.set_current_time(7.0);
        clock.advance(1.0);
        assert_eq!(device.current_time(), 8.0);
    }

    #[test]
    fn test_position_stops_at_duration() {
        let clock = ManualClock::new();
        let mut device = SimulatedDevice::new(Rc::new(clock.clone()), 4.0);

        device.play();
        clock.advance(10.0);
        assert_eq!(device.current_time(), 4.0);

        device.set_current_time(-1.0);
        assert_eq!(device.current_time(), 0.0);
    }

    #[test]
    fn test_frozen_device_does_not_move() {
        let clock = ManualClock::new();
        let mut device = SimulatedDevice::new(Rc::new(clock.clone()), 10.0).with_rate(0.0);

        device.set_current_time(1.0);
        device.play();
        clock.advance(3.0);
        assert_eq!(device.current_time(), 1.0);
        assert!(device.is_playing());
    }
}
