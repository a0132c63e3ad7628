//! Pivot Switch
//!
//! A container that displays one child component at a time and replaces it
//! through an animated transition:
//!
//! - **Catalog**: none, fade, anti-fade, card flips and full-extent shifts
//! - **Interruption**: a new switch terminates the running transition, which
//!   lands its views and settles its children synchronously
//! - **Visibility**: children are walked one step at a time through
//!   `Hidden`, `Appearing`, `Visible` and `Disappearing`, combining the
//!   container's own visibility with the state the transition assigns them
//! - **Forwarding**: presentation questions can be delegated to the current
//!   child
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! use pivot_animation::AnimationScheduler;
//! use pivot_core::{Component, Rect, ViewId, ViewTree, VisibilityState};
//! use pivot_switch::{AnimationKind, SwitchContainer};
//!
//! struct Page(ViewId);
//!
//! impl Component for Page {
//!     fn view(&self) -> ViewId {
//!         self.0
//!     }
//!     fn begin_appearance_transition(&self, _appearing: bool, _animated: bool) {}
//!     fn end_appearance_transition(&self) {}
//! }
//!
//! let views = ViewTree::shared();
//! let scheduler = AnimationScheduler::new(views.clone());
//! let container = SwitchContainer::new(scheduler.clone(), Rect::new(0.0, 0.0, 320.0, 480.0));
//! container.set_state(VisibilityState::Visible, false);
//!
//! let page = views.borrow_mut().create_view(Rect::ZERO);
//! container.switch_view(Rc::new(Page(page)), AnimationKind::Fade, None)?;
//! scheduler.run_until_idle(Duration::from_millis(16));
//!
//! assert_eq!(views.borrow().frame(page), Some(Rect::new(0.0, 0.0, 320.0, 480.0)));
//! # Ok::<(), pivot_switch::SwitchError>(())
//! ```

pub mod config;
pub mod error;
pub mod forwarding;
pub mod switcher;
pub mod transition;

#[cfg(test)]
mod testing;

pub use config::SwitchConfig;
pub use error::{ConfigError, Result, SwitchError};
pub use forwarding::{ForwardingFlags, PresentationQuery, PresentationUpdate};
pub use switcher::SwitchContainer;
pub use transition::{
    AnimationKind, Fade, Flip, FlipSide, Shift, ShiftDirection, Stage, TransitionStrategy,
    Unanimated, ViewTransition,
};
