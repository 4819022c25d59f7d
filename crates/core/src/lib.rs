#![forbid(unsafe_code)]

pub mod countdown;
pub mod error;
pub mod model;
pub mod time;

pub use countdown::{Countdown, CountdownPhase, Tick};
pub use error::{SessionIdError, StageError};
pub use time::Clock;
