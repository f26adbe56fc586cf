//! The loop core shared by every game: virtual-time timers, entity slots
//! and the terminal-state latch.

pub mod arena;
pub mod ending;
pub mod scheduler;

pub use arena::{Arena, EntityId};
pub use ending::{Ending, Outcome};
pub use scheduler::{Fired, Generation, Scheduler, TimerId};
