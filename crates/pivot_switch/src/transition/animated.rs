//! Shared three-phase driver for property-animated transitions
//!
//! Fade and shift transitions only differ in where views start and end. They
//! describe that through [`AnimatedTransition`] and let [`run`] and [`abort`]
//! do the scheduling:
//!
//! 1. `pre_animation` attaches the new view at its starting placement
//! 2. `animation` lists the end values the scheduler eases towards
//! 3. `post_animation` runs once the end values are reached, whether by
//!    playing the animation out or by aborting it

use std::time::Duration;

use pivot_animation::{AnimationId, Easing, PropertyAnimator};
use pivot_core::{ViewError, ViewId, ViewProperty};

use super::{DoneFn, Stage};

pub(crate) const DEFAULT_DURATION: Duration = Duration::from_millis(250);

pub(crate) trait AnimatedTransition: Copy + 'static {
    fn pre_animation(&self, stage: &Stage, old: Option<ViewId>, new: ViewId)
        -> Result<(), ViewError>;

    /// Target values for the animated properties
    fn animation(&self, stage: &Stage, old: Option<ViewId>, new: ViewId)
        -> Vec<(ViewId, ViewProperty)>;

    fn post_animation(
        &self,
        _stage: &Stage,
        _old: Option<ViewId>,
        _new: ViewId,
    ) -> Result<(), ViewError> {
        Ok(())
    }
}

pub(crate) fn run<T: AnimatedTransition>(
    style: T,
    stage: &Stage,
    old: Option<ViewId>,
    new: ViewId,
    done: DoneFn,
) -> Result<Option<AnimationId>, ViewError> {
    style.pre_animation(stage, old, new)?;

    let duration = stage.duration_or(DEFAULT_DURATION);
    let animator = style
        .animation(stage, old, new)
        .into_iter()
        .fold(
            PropertyAnimator::new(duration).easing(Easing::EaseOut),
            |animator, (view, target)| animator.animate(view, target),
        );

    let finish_stage = stage.clone();
    let animator = animator.on_complete(move || {
        if let Err(err) = style.post_animation(&finish_stage, old, new) {
            tracing::error!("transition cleanup failed: {}", err);
        }
        done();
    });

    Ok(Some(stage.scheduler.animate(animator)))
}

pub(crate) fn abort<T: AnimatedTransition>(
    style: T,
    stage: &Stage,
    old: Option<ViewId>,
    new: ViewId,
    pending: Option<AnimationId>,
) -> Result<(), ViewError> {
    debug_assert!(pending.is_some(), "aborting a transition that never animated");
    match pending {
        Some(id) if stage.scheduler.finish_now(id) => style.post_animation(stage, old, new),
        _ => Ok(()),
    }
}
