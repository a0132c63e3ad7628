//! Immediate replacement

use std::time::Duration;

use pivot_animation::AnimationId;
use pivot_core::{ViewError, ViewId};

use super::{DoneFn, Stage, ViewTransition};

/// Puts the new view in place and finishes on the spot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unanimated;

impl ViewTransition for Unanimated {
    fn default_duration(&self) -> Duration {
        Duration::ZERO
    }

    fn handle_view_transition(
        &self,
        stage: &Stage,
        _old: Option<ViewId>,
        new: ViewId,
        done: DoneFn,
    ) -> Result<Option<AnimationId>, ViewError> {
        {
            let mut tree = stage.views.borrow_mut();
            tree.set_frame(new, stage.bounds)?;
            tree.add_subview(stage.host, new)?;
        }
        done();
        Ok(None)
    }

    /// Never running long enough to be aborted
    fn abort_view_transition(
        &self,
        _stage: &Stage,
        _old: Option<ViewId>,
        _new: ViewId,
        _pending: Option<AnimationId>,
    ) -> Result<(), ViewError> {
        Ok(())
    }
}
