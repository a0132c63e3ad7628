//! Error types for pivot_core

use thiserror::Error;

use crate::view::ViewId;

/// Errors raised by [`ViewTree`](crate::view::ViewTree) mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The view id does not refer to a live view
    #[error("view {0:?} does not exist")]
    MissingView(ViewId),

    /// The sibling passed to an ordered insert is not a subview of the parent
    #[error("view {sibling:?} is not a subview of {parent:?}")]
    NotASubview { parent: ViewId, sibling: ViewId },

    /// Attaching the view would make it its own ancestor
    #[error("cannot attach {child:?} under {parent:?}: would create a cycle")]
    Cycle { parent: ViewId, child: ViewId },
}

/// Errors raised by the visibility propagator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VisibilityError {
    /// No registration exists for the child
    #[error("child view {0:?} is not registered with this container")]
    NotRegistered(ViewId),
}

/// Result type for view tree operations
pub type Result<T> = std::result::Result<T, ViewError>;
