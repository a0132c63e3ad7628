//! Card-flip transitions
//!
//! The outgoing view turns edge-on during the first half of the animation and
//! the incoming view turns back from edge-on during the second half. When
//! there is no outgoing view an empty, invisible one stands in for it.
//!
//! Flips cannot be interrupted: once started they must play out.

use std::time::Duration;

use pivot_animation::{AnimationId, Easing, PropertyAnimator};
use pivot_core::{ViewError, ViewId, ViewProperty};

use super::{DoneFn, FlipSide, Stage, ViewTransition};

const DEFAULT_DURATION: Duration = Duration::from_millis(700);

/// Rotation (degrees) at which a view is edge-on
const EDGE_ON: f32 = 90.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flip {
    pub from: FlipSide,
}

impl Flip {
    /// Final rotation of the outgoing view, which is also the starting
    /// rotation of the incoming view mirrored
    fn exit_angle(&self) -> f32 {
        match self.from {
            FlipSide::Left => EDGE_ON,
            FlipSide::Right => -EDGE_ON,
        }
    }
}

impl ViewTransition for Flip {
    fn default_duration(&self) -> Duration {
        DEFAULT_DURATION
    }

    fn is_interruptible(&self) -> bool {
        false
    }

    fn handle_view_transition(
        &self,
        stage: &Stage,
        old: Option<ViewId>,
        new: ViewId,
        done: DoneFn,
    ) -> Result<Option<AnimationId>, ViewError> {
        let (outgoing, placeholder) = {
            let mut tree = stage.views.borrow_mut();

            let outgoing = match old {
                Some(view) => view,
                None => {
                    let view = tree.create_view(stage.bounds);
                    tree.set_hidden(view, true)?;
                    tree.set_opacity(view, 0.0)?;
                    tree.add_subview(stage.host, view)?;
                    view
                }
            };

            tree.set_frame(new, stage.bounds)?;
            tree.set_rotation_y(new, -self.exit_angle())?;
            tree.add_subview(stage.host, new)?;

            (outgoing, old.is_none().then_some(outgoing))
        };

        let views = stage.views.clone();
        let animator = PropertyAnimator::new(stage.duration_or(DEFAULT_DURATION))
            .easing(Easing::EaseInOut)
            .animate(outgoing, ViewProperty::RotationY(self.exit_angle()))
            .during(0.0, 0.5)
            .animate(new, ViewProperty::RotationY(0.0))
            .during(0.5, 1.0)
            .on_complete(move || {
                // the flipped-away view leaves the hierarchy with the flip
                let mut tree = views.borrow_mut();
                let result = match placeholder {
                    Some(view) => tree.remove_view(view),
                    None => tree.remove_from_superview(outgoing),
                };
                drop(tree);
                if let Err(err) = result {
                    tracing::error!("flip cleanup failed: {}", err);
                }
                done();
            });

        Ok(Some(stage.scheduler.animate(animator)))
    }

    fn abort_view_transition(
        &self,
        _stage: &Stage,
        _old: Option<ViewId>,
        _new: ViewId,
        _pending: Option<AnimationId>,
    ) -> Result<(), ViewError> {
        panic!("flip transitions cannot be interrupted; wait for the running flip to finish");
    }
}
