//! Pivot Animation System
//!
//! Eased, time-based animation of view properties.
//!
//! # Features
//!
//! - **Easing**: linear and cubic ease-in / ease-out / ease-in-out curves
//! - **Interpolation**: `Interpolate` for scalars, geometry and view properties
//! - **Property Animators**: several view properties animated together over
//!   one duration, each track optionally restricted to a window of it
//! - **Scheduler**: single-threaded driver advanced by the host's frame loop,
//!   with completion callbacks and snap-to-end cancellation

pub mod animator;
pub mod easing;
pub mod scheduler;
pub mod values;

pub use animator::{Completion, PropertyAnimator, Track};
pub use easing::Easing;
pub use scheduler::{AnimationId, AnimationScheduler};
pub use values::Interpolate;
