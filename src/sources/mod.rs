pub mod device;
pub mod registry;
pub mod simulated;

pub use device::Device;
pub use registry::SourceRegistry;
pub use simulated::SimulatedDevice;
