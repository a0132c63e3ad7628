//! Property animators
//!
//! A [`PropertyAnimator`] describes one animation: a duration, an easing
//! curve, the view properties to move and what to run once they arrive.
//! It is a plain builder; nothing moves until it is handed to
//! [`AnimationScheduler::animate`](crate::AnimationScheduler::animate).
//!
//! # Example
//!
//! ```ignore
//! use pivot_animation::{Easing, PropertyAnimator};
//! use pivot_core::ViewProperty;
//!
//! let id = scheduler.animate(
//!     PropertyAnimator::new(Duration::from_millis(250))
//!         .easing(Easing::EaseOut)
//!         .animate(new_view, ViewProperty::Opacity(1.0))
//!         .on_complete(|| println!("faded in")),
//! );
//! ```

use std::time::Duration;

use pivot_core::{ViewId, ViewProperty};
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::values::Interpolate;

/// Callback run once an animation reaches its end on its own
pub type Completion = Box<dyn FnOnce()>;

/// One animated property of one view
#[derive(Clone, Debug)]
pub struct Track {
    pub view: ViewId,
    /// Start value; `None` reads the view's value when the animation starts
    pub from: Option<ViewProperty>,
    pub to: ViewProperty,
    /// Portion of the animation's progress (`start..=end`) this track moves in
    pub window: (f32, f32),
}

impl Track {
    pub fn new(view: ViewId, to: ViewProperty) -> Self {
        Self {
            view,
            from: None,
            to,
            window: (0.0, 1.0),
        }
    }

    /// Progress of this track given the animation's overall progress
    pub fn local_progress(&self, progress: f32) -> f32 {
        let (start, end) = self.window;
        if end <= start {
            return if progress >= end { 1.0 } else { 0.0 };
        }
        ((progress - start) / (end - start)).clamp(0.0, 1.0)
    }

    /// Value at the given overall progress with the given curve
    pub fn sample(&self, from: &ViewProperty, progress: f32, easing: Easing) -> ViewProperty {
        let t = easing.apply(self.local_progress(progress));
        from.lerp(&self.to, t)
    }
}

/// Builder for an animation of one or more view properties
pub struct PropertyAnimator {
    pub(crate) duration: Duration,
    pub(crate) easing: Easing,
    pub(crate) tracks: SmallVec<[Track; 4]>,
    pub(crate) completion: Option<Completion>,
}

impl PropertyAnimator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            easing: Easing::Linear,
            tracks: SmallVec::new(),
            completion: None,
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Animate a property from its value at start time to `to`
    pub fn animate(mut self, view: ViewId, to: ViewProperty) -> Self {
        self.tracks.push(Track::new(view, to));
        self
    }

    /// Animate a property between explicit values
    pub fn animate_from(mut self, view: ViewId, from: ViewProperty, to: ViewProperty) -> Self {
        let mut track = Track::new(view, to);
        track.from = Some(from);
        self.tracks.push(track);
        self
    }

    /// Restrict the most recently added track to a window of the progress
    pub fn during(mut self, start: f32, end: f32) -> Self {
        if let Some(track) = self.tracks.last_mut() {
            track.window = (start.clamp(0.0, 1.0), end.clamp(0.0, 1.0));
        }
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.completion = Some(Box::new(f));
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivot_core::{Rect, ViewTree};

    #[test]
    fn test_windowed_progress() {
        let mut tree = ViewTree::new();
        let view = tree.create_view(Rect::ZERO);

        let animator = PropertyAnimator::new(Duration::from_millis(700))
            .animate(view, ViewProperty::RotationY(90.0))
            .during(0.0, 0.5)
            .animate(view, ViewProperty::Opacity(1.0))
            .during(0.5, 1.0);

        let first = &animator.tracks()[0];
        let second = &animator.tracks()[1];
        assert_eq!(first.local_progress(0.25), 0.5);
        assert_eq!(first.local_progress(0.75), 1.0);
        assert_eq!(second.local_progress(0.25), 0.0);
        assert_eq!(second.local_progress(0.75), 0.5);
    }

    #[test]
    fn test_sample_lands_on_target() {
        let mut tree = ViewTree::new();
        let view = tree.create_view(Rect::ZERO);
        let track = Track::new(view, ViewProperty::Opacity(1.0));

        let end = track.sample(&ViewProperty::Opacity(0.0), 1.0, Easing::EaseOut);
        assert_eq!(end, ViewProperty::Opacity(1.0));
    }
}
