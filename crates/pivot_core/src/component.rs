//! Components hosted by containers
//!
//! A [`Component`] is anything a container can display: it owns one root view
//! in the shared [`ViewTree`](crate::view::ViewTree) and receives appearance
//! notifications from the container's visibility propagator. Nested
//! containers implement this trait too, which is how appearance flows down a
//! chain of containers.

use std::rc::Rc;

use crate::view::ViewId;

/// Four-state visibility lifecycle
///
/// `Hidden` and `Visible` are settled states; `Appearing` and `Disappearing`
/// are transient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VisibilityState {
    #[default]
    Hidden,
    Visible,
    Appearing,
    Disappearing,
}

impl VisibilityState {
    pub fn is_settled(self) -> bool {
        matches!(self, VisibilityState::Hidden | VisibilityState::Visible)
    }

    pub fn is_transient(self) -> bool {
        !self.is_settled()
    }
}

/// Hooks a hosted component implements
///
/// The visibility propagator guarantees that `end_appearance_transition` is
/// only ever delivered after a matching `begin_appearance_transition`.
pub trait Component {
    /// The component's root view; also its identity within a container
    fn view(&self) -> ViewId;

    /// The component starts becoming visible (`appearing == true`) or hidden
    fn begin_appearance_transition(&self, appearing: bool, animated: bool);

    /// The transition announced by the last begin call has settled
    fn end_appearance_transition(&self);

    /// About to be attached to `parent`, or detached when `None`
    fn will_move_to_parent(&self, _parent: Option<ViewId>) {}

    /// Attachment to `parent` (or detachment) is complete
    fn did_move_to_parent(&self, _parent: Option<ViewId>) {}
}

/// Shared handle to a hosted component
pub type ChildRef = Rc<dyn Component>;
