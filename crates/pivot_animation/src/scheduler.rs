//! Animation scheduler
//!
//! Drives every running [`PropertyAnimator`] and writes the interpolated
//! values into the shared view tree.
//!
//! The scheduler lives on the UI thread. The host's frame loop calls
//! [`AnimationScheduler::tick`] (wall clock) or [`AnimationScheduler::advance`]
//! (explicit delta, used by tests and fixed-step hosts). Completion callbacks
//! are invoked from there, after the scheduler and the view tree have been
//! released, so a callback may freely start or cancel other animations.
//!
//! Cancelling with [`AnimationScheduler::finish_now`] snaps every track to its
//! end value and drops the completion without running it: the caller takes
//! over whatever the completion would have done.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use pivot_core::{SharedViewTree, ViewProperty};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::animator::{Completion, PropertyAnimator, Track};
use crate::easing::Easing;

new_key_type! {
    /// Handle to a running animation
    pub struct AnimationId;
}

/// A registered animation with resolved start values
struct RunningAnimation {
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
    tracks: SmallVec<[(Track, ViewProperty); 4]>,
    completion: Option<Completion>,
}

impl RunningAnimation {
    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn write(&self, views: &SharedViewTree, progress: f32) {
        let mut tree = views.borrow_mut();
        for (track, from) in &self.tracks {
            let value = if progress >= 1.0 {
                track.to
            } else {
                track.sample(from, progress, self.easing)
            };
            if let Err(err) = tree.apply(track.view, value) {
                tracing::warn!("animation: dropping write to {:?}: {}", track.view, err);
            }
        }
    }
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    views: SharedViewTree,
    animations: SlotMap<AnimationId, RunningAnimation>,
    last_frame: Instant,
}

/// Single-threaded driver for property animations
///
/// Cheap to clone; clones share the same set of running animations.
#[derive(Clone)]
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new(views: SharedViewTree) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                views,
                animations: SlotMap::with_key(),
                last_frame: Instant::now(),
            })),
        }
    }

    /// The view tree animations write into
    pub fn views(&self) -> SharedViewTree {
        self.inner.borrow().views.clone()
    }

    /// Register and start an animation
    ///
    /// Tracks without an explicit start value start from the view's current
    /// value. Tracks targeting a view that no longer exists are dropped.
    pub fn animate(&self, animator: PropertyAnimator) -> AnimationId {
        let mut inner = self.inner.borrow_mut();

        let tracks = {
            let tree = inner.views.borrow();
            animator
                .tracks
                .into_iter()
                .filter_map(|track| {
                    let from = match track.from {
                        Some(from) => Some(from),
                        None => tree.property(track.view, track.to.kind()),
                    };
                    if from.is_none() {
                        tracing::warn!("animation: view {:?} does not exist", track.view);
                    }
                    from.map(|from| (track, from))
                })
                .collect()
        };

        // Avoid a huge first delta when the host resumes ticking
        if inner.animations.is_empty() {
            inner.last_frame = Instant::now();
        }

        let id = inner.animations.insert(RunningAnimation {
            duration: animator.duration,
            elapsed: Duration::ZERO,
            easing: animator.easing,
            tracks,
            completion: animator.completion,
        });
        tracing::trace!(
            "animation: started {:?} for {:?}",
            id,
            animator.duration
        );
        id
    }

    /// Advance by wall-clock time since the previous tick
    ///
    /// Returns true if animations are still running.
    pub fn tick(&self) -> bool {
        let dt = {
            let mut inner = self.inner.borrow_mut();
            let now = Instant::now();
            let dt = now - inner.last_frame;
            inner.last_frame = now;
            dt
        };
        self.advance(dt)
    }

    /// Advance every running animation by `dt`
    ///
    /// Finished animations land exactly on their end values and are removed
    /// before their completions run, in registration order. Returns true if
    /// animations are still running.
    pub fn advance(&self, dt: Duration) -> bool {
        let finished: Vec<(AnimationId, Option<Completion>)> = {
            let mut inner = self.inner.borrow_mut();
            let views = inner.views.clone();

            let mut done = Vec::new();
            for (id, animation) in inner.animations.iter_mut() {
                animation.elapsed += dt;
                animation.write(&views, animation.progress());
                if animation.is_finished() {
                    done.push(id);
                }
            }

            done.into_iter()
                .filter_map(|id| inner.animations.remove(id).map(|a| (id, a.completion)))
                .collect()
        };

        for (id, completion) in finished {
            tracing::trace!("animation: {:?} completed", id);
            if let Some(completion) = completion {
                completion();
            }
        }

        self.has_active_animations()
    }

    /// Advance in `step` increments until nothing is running
    ///
    /// Animations started by completions are driven too.
    pub fn run_until_idle(&self, step: Duration) {
        let step = step.max(Duration::from_micros(1));
        while self.has_active_animations() {
            self.advance(step);
        }
    }

    /// Snap an animation to its end values and drop it without running its
    /// completion
    ///
    /// Returns false if the animation is not running.
    pub fn finish_now(&self, id: AnimationId) -> bool {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let views = inner.views.clone();
            inner.animations.remove(id).map(|animation| {
                animation.write(&views, 1.0);
                animation
            })
        };

        match removed {
            Some(animation) => {
                tracing::trace!("animation: {:?} finished early", id);
                drop(animation.completion);
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.inner.borrow().animations.contains_key(id)
    }

    pub fn has_active_animations(&self) -> bool {
        !self.inner.borrow().animations.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.inner.borrow().animations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivot_core::{Rect, ViewTree};
    use std::cell::Cell;

    const FRAME: Duration = Duration::from_millis(10);

    fn setup() -> (AnimationScheduler, SharedViewTree) {
        let views = ViewTree::shared();
        (AnimationScheduler::new(views.clone()), views)
    }

    #[test]
    fn test_animation_reaches_target_and_completes() {
        let (scheduler, views) = setup();
        let view = views.borrow_mut().create_view(Rect::ZERO);
        views.borrow_mut().set_opacity(view, 0.0).unwrap();

        let done = Rc::new(Cell::new(0));
        let done_clone = done.clone();
        let id = scheduler.animate(
            PropertyAnimator::new(Duration::from_millis(100))
                .animate(view, ViewProperty::Opacity(1.0))
                .on_complete(move || done_clone.set(done_clone.get() + 1)),
        );

        assert!(scheduler.advance(Duration::from_millis(50)));
        let mid = views.borrow().opacity(view).unwrap();
        assert!((mid - 0.5).abs() < 1e-4);
        assert_eq!(done.get(), 0);

        assert!(!scheduler.advance(Duration::from_millis(50)));
        assert_eq!(views.borrow().opacity(view), Some(1.0));
        assert_eq!(done.get(), 1);
        assert!(!scheduler.is_running(id));
    }

    #[test]
    fn test_finish_now_snaps_and_drops_completion() {
        let (scheduler, views) = setup();
        let view = views.borrow_mut().create_view(Rect::new(320.0, 0.0, 320.0, 480.0));

        let done = Rc::new(Cell::new(false));
        let done_clone = done.clone();
        let id = scheduler.animate(
            PropertyAnimator::new(Duration::from_millis(250))
                .easing(Easing::EaseOut)
                .animate(view, ViewProperty::Frame(Rect::new(0.0, 0.0, 320.0, 480.0)))
                .on_complete(move || done_clone.set(true)),
        );
        scheduler.advance(FRAME);

        assert!(scheduler.finish_now(id));
        assert_eq!(
            views.borrow().frame(view),
            Some(Rect::new(0.0, 0.0, 320.0, 480.0))
        );
        assert!(!done.get());

        scheduler.run_until_idle(FRAME);
        assert!(!done.get());
        assert!(!scheduler.finish_now(id));
    }

    #[test]
    fn test_zero_duration_completes_on_next_advance() {
        let (scheduler, views) = setup();
        let view = views.borrow_mut().create_view(Rect::ZERO);

        let done = Rc::new(Cell::new(false));
        let done_clone = done.clone();
        scheduler.animate(
            PropertyAnimator::new(Duration::ZERO)
                .animate(view, ViewProperty::RotationY(90.0))
                .on_complete(move || done_clone.set(true)),
        );
        assert!(!done.get());

        scheduler.advance(Duration::ZERO);
        assert!(done.get());
        assert_eq!(views.borrow().rotation_y(view), Some(90.0));
    }

    #[test]
    fn test_completion_can_start_animation() {
        let (scheduler, views) = setup();
        let view = views.borrow_mut().create_view(Rect::ZERO);

        let chained = scheduler.clone();
        scheduler.animate(
            PropertyAnimator::new(Duration::from_millis(20))
                .animate(view, ViewProperty::Opacity(0.0))
                .on_complete(move || {
                    chained.animate(
                        PropertyAnimator::new(Duration::from_millis(20))
                            .animate(view, ViewProperty::Opacity(1.0)),
                    );
                }),
        );

        scheduler.advance(Duration::from_millis(20));
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(views.borrow().opacity(view), Some(0.0));

        scheduler.run_until_idle(FRAME);
        assert_eq!(views.borrow().opacity(view), Some(1.0));
    }

    #[test]
    fn test_windowed_tracks() {
        let (scheduler, views) = setup();
        let old = views.borrow_mut().create_view(Rect::ZERO);
        let new = views.borrow_mut().create_view(Rect::ZERO);
        views.borrow_mut().set_rotation_y(new, -90.0).unwrap();

        scheduler.animate(
            PropertyAnimator::new(Duration::from_millis(100))
                .animate(old, ViewProperty::RotationY(90.0))
                .during(0.0, 0.5)
                .animate(new, ViewProperty::RotationY(0.0))
                .during(0.5, 1.0),
        );

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(views.borrow().rotation_y(old), Some(90.0));
        assert_eq!(views.borrow().rotation_y(new), Some(-90.0));

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(views.borrow().rotation_y(new), Some(0.0));
    }

    #[test]
    fn test_missing_view_track_is_dropped() {
        let (scheduler, views) = setup();
        let view = views.borrow_mut().create_view(Rect::ZERO);
        views.borrow_mut().remove_view(view).unwrap();

        let done = Rc::new(Cell::new(false));
        let done_clone = done.clone();
        scheduler.animate(
            PropertyAnimator::new(Duration::from_millis(10))
                .animate(view, ViewProperty::Opacity(0.0))
                .on_complete(move || done_clone.set(true)),
        );
        scheduler.run_until_idle(FRAME);
        assert!(done.get());
    }
}
