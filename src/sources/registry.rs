use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::core::{Resolution, SourceId, Time};
use crate::sources::Device;

/// Devices by source id.
///
/// The registry only keeps weak handles: the UI layer owns each device and
/// registers it on mount. A device that was never registered, was
/// unregistered, or whose owner dropped it is simply "not ready" and every
/// operation on it is a no-op.
#[derive(Default)]
pub struct SourceRegistry {
    devices: HashMap<SourceId, Weak<RefCell<dyn Device>>>,
    default_resolution: Resolution,
}

impl SourceRegistry {
    pub fn new(default_resolution: Resolution) -> Self {
        Self {
            devices: HashMap::new(),
            default_resolution,
        }
    }

    pub fn register<D: Device + 'static>(&mut self, id: impl Into<SourceId>, device: &Rc<RefCell<D>>) {
        let id = id.into();
        let device: Rc<RefCell<dyn Device>> = device.clone();
        if self.devices.insert(id.clone(), Rc::downgrade(&device)).is_some() {
            log::debug!("Replaced device for source {}", id);
        } else {
            log::debug!("Registered device for source {}", id);
        }
    }

    pub fn unregister(&mut self, id: &str) {
        if self.devices.remove(id).is_some() {
            log::debug!("Unregistered device for source {}", id);
        }
    }

    pub fn get(&self, id: &str) -> Option<Rc<RefCell<dyn Device>>> {
        self.devices.get(id).and_then(Weak::upgrade)
    }

    pub fn is_ready(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn play(&self, id: &str) {
        if let Some(device) = self.get(id) {
            device.borrow_mut().play();
        }
    }

    pub fn pause(&self, id: &str) {
        if let Some(device) = self.get(id) {
            device.borrow_mut().pause();
        }
    }

    pub fn seek(&self, id: &str, time: Time) {
        if let Some(device) = self.get(id) {
            device.borrow_mut().set_current_time(time);
        }
    }

    pub fn current_time(&self, id: &str) -> Option<Time> {
        self.get(id).map(|device| device.borrow().current_time())
    }

    pub fn duration(&self, id: &str) -> Option<Time> {
        self.get(id).and_then(|device| device.borrow().duration())
    }

    pub fn resolution(&self, id: &str) -> Option<Resolution> {
        self.get(id).and_then(|device| device.borrow().resolution())
    }

    /// Pauses every live device, playing or not.
    pub fn pause_all(&self) {
        for device in self.devices.values().filter_map(Weak::upgrade) {
            device.borrow_mut().pause();
        }
    }

    /// The largest width and the largest height over all devices. This is only
    /// a heuristic for a sane export default, so the two maxima may come from
    /// different sources.
    pub fn target_resolution(&self) -> Resolution {
        let resolutions: Vec<Resolution> = self
            .devices
            .values()
            .filter_map(Weak::upgrade)
            .filter_map(|device| device.borrow().resolution())
            .collect();

        if resolutions.is_empty() {
            return self.default_resolution;
        }

        Resolution {
            x: resolutions.iter().map(|r| r.x).max().unwrap_or(0),
            y: resolutions.iter().map(|r| r.y).max().unwrap_or(0),
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
