//! Pivot Core
//!
//! Foundational primitives for hosting switchable child components:
//!
//! - **Geometry**: points, sizes and rectangles
//! - **View Tree**: a retained hierarchy of rectangular views with
//!   animatable frame, opacity and y-axis rotation
//! - **Components**: the hooks a hosted child implements to receive
//!   appearance notifications
//! - **Visibility**: the per-container state machine that combines a
//!   container's own visibility with the state its transition logic assigns to
//!   each child, and walks every child through well-ordered notifications
//!
//! # Example
//!
//! ```rust
//! use pivot_core::{Rect, ViewTree, Visibility, VisibilityState};
//!
//! let mut tree = ViewTree::new();
//! let root = tree.create_view(Rect::new(0.0, 0.0, 320.0, 480.0));
//!
//! let mut visibility = Visibility::new();
//! visibility.set_state(VisibilityState::Visible, false).deliver();
//! assert_eq!(visibility.state(), VisibilityState::Visible);
//! assert!(tree.contains(root));
//! ```

pub mod component;
pub mod error;
pub mod geometry;
pub mod view;
pub mod visibility;

pub use component::{ChildRef, Component, VisibilityState};
pub use error::{ViewError, VisibilityError};
pub use geometry::{Point, Rect, Size};
pub use view::{PropertyKind, SharedViewTree, ViewId, ViewNode, ViewProperty, ViewTree};
pub use visibility::{
    next_step, target_state, AppearanceEvent, Dispatch, RegistrationSnapshot, Visibility,
};
