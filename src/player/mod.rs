pub mod clock;
pub mod driver;
pub mod engine;
pub mod scheduler;
pub mod state;
pub mod sync;


pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::Player;
pub use engine::Engine;
pub use scheduler::{Scheduler, Task};
pub use state::{DriverState, PlaybackState, PlaybackStatus, PlayerEvent};
pub use sync::{user_seek_time, Synchronizer};
