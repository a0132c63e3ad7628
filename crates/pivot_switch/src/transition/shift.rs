//! Sliding transitions

use std::time::Duration;

use pivot_animation::AnimationId;
use pivot_core::{Rect, ViewError, ViewId, ViewProperty};

use super::animated::{self, AnimatedTransition};
use super::{DoneFn, ShiftDirection, Stage, ViewTransition};

/// Slides the new view in from one full bounds-extent away while the old view
/// slides out the opposite way
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shift {
    pub direction: ShiftDirection,
}

impl Shift {
    /// Where the new view starts
    fn entry_frame(&self, bounds: Rect) -> Rect {
        match self.direction {
            ShiftDirection::Left => bounds.offset(bounds.width(), 0.0),
            ShiftDirection::Right => bounds.offset(-bounds.width(), 0.0),
            ShiftDirection::Up => bounds.offset(0.0, bounds.height()),
            ShiftDirection::Down => bounds.offset(0.0, -bounds.height()),
        }
    }

    /// Where the old view ends
    fn exit_frame(&self, bounds: Rect) -> Rect {
        match self.direction {
            ShiftDirection::Left => bounds.offset(-bounds.width(), 0.0),
            ShiftDirection::Right => bounds.offset(bounds.width(), 0.0),
            ShiftDirection::Up => bounds.offset(0.0, -bounds.height()),
            ShiftDirection::Down => bounds.offset(0.0, bounds.height()),
        }
    }
}

impl AnimatedTransition for Shift {
    fn pre_animation(
        &self,
        stage: &Stage,
        _old: Option<ViewId>,
        new: ViewId,
    ) -> Result<(), ViewError> {
        let mut tree = stage.views.borrow_mut();
        tree.set_frame(new, self.entry_frame(stage.bounds))?;
        tree.add_subview(stage.host, new)
    }

    fn animation(
        &self,
        stage: &Stage,
        old: Option<ViewId>,
        new: ViewId,
    ) -> Vec<(ViewId, ViewProperty)> {
        let mut targets = vec![(new, ViewProperty::Frame(stage.bounds))];
        if let Some(old) = old {
            targets.push((old, ViewProperty::Frame(self.exit_frame(stage.bounds))));
        }
        targets
    }
}

impl ViewTransition for Shift {
    fn default_duration(&self) -> Duration {
        animated::DEFAULT_DURATION
    }

    fn handle_view_transition(
        &self,
        stage: &Stage,
        old: Option<ViewId>,
        new: ViewId,
        done: DoneFn,
    ) -> Result<Option<AnimationId>, ViewError> {
        animated::run(*self, stage, old, new, done)
    }

    fn abort_view_transition(
        &self,
        stage: &Stage,
        old: Option<ViewId>,
        new: ViewId,
        pending: Option<AnimationId>,
    ) -> Result<(), ViewError> {
        animated::abort(*self, stage, old, new, pending)
    }
}
