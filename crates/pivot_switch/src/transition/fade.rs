//! Cross-fade transitions

use std::time::Duration;

use pivot_animation::AnimationId;
use pivot_core::{ViewError, ViewId, ViewProperty};

use super::animated::{self, AnimatedTransition};
use super::{DoneFn, Stage, ViewTransition};

/// Fades the new view in on top of the old one, or with `anti` set, fades the
/// old view out on top of the new one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fade {
    pub anti: bool,
}

impl Fade {
    /// Anti-fade only applies when there is an old view to fade out
    fn fades_old(&self, old: Option<ViewId>) -> Option<ViewId> {
        old.filter(|_| self.anti)
    }
}

impl AnimatedTransition for Fade {
    fn pre_animation(
        &self,
        stage: &Stage,
        old: Option<ViewId>,
        new: ViewId,
    ) -> Result<(), ViewError> {
        let mut tree = stage.views.borrow_mut();
        tree.set_frame(new, stage.bounds)?;

        match self.fades_old(old) {
            Some(old) => {
                tree.set_opacity(new, 1.0)?;
                tree.insert_subview_below(stage.host, new, old)
            }
            None => {
                tree.set_opacity(new, 0.0)?;
                tree.add_subview(stage.host, new)
            }
        }
    }

    fn animation(
        &self,
        stage: &Stage,
        old: Option<ViewId>,
        new: ViewId,
    ) -> Vec<(ViewId, ViewProperty)> {
        let mut targets = vec![(new, ViewProperty::Frame(stage.bounds))];
        match self.fades_old(old) {
            Some(old) => targets.push((old, ViewProperty::Opacity(0.0))),
            None => targets.push((new, ViewProperty::Opacity(1.0))),
        }
        targets
    }
}

impl ViewTransition for Fade {
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
