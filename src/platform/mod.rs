//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (`time`): frame clocks fed by rAF timestamps or fixed steps
//! - Input (`input`): keyboard state, scripted input and the autopilot
//!
//! Settings storage lives with `Settings` itself.

pub mod input;
pub mod time;

pub use input::{Autopilot, InputSource, KeyState, KeyboardState, ScriptedInput};
pub use time::{Clock, FrameClock, ManualClock, SteppedClock, Timeline};
