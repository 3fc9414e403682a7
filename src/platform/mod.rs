//! Platform abstraction layer
//!
//! The simulation never touches a window, a mouse or a wall clock. Hosts
//! plug those in through three narrow seams:
//! - `render`: visual creation/update/destruction
//! - `input`: the point players steer toward
//! - `time`: frame time sampling

pub mod input;
pub mod render;
pub mod time;

pub use input::{FixedTarget, InputProvider, OrbitTarget};
pub use render::{RecordingRenderer, RenderBridge, VisualHandle};
pub use time::{Clock, FixedStepClock};
