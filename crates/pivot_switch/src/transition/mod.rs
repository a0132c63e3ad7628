//! Transition catalog
//!
//! Every way of replacing a container's child is a [`TransitionStrategy`]:
//! a closed set of variants, each carrying only its own parameters. All of
//! them implement [`ViewTransition`], the two entry points a running
//! transition needs:
//!
//! - `handle_view_transition` places the incoming view (and moves the
//!   outgoing one) and calls `done` once the views are in their final place,
//!   either immediately or from an animation completion
//! - `abort_view_transition` snaps both views to that final place without
//!   animating, and cancels the pending completion so `done` never runs
//!
//! The lifecycle wrapped around a strategy (visibility bookkeeping, attach
//! and detach hooks, termination) lives in [`logic`].

mod animated;
mod fade;
mod flip;
pub(crate) mod logic;
mod shift;
mod unanimated;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use pivot_animation::{AnimationId, AnimationScheduler};
use pivot_core::{Rect, SharedViewTree, ViewError, ViewId};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use fade::Fade;
pub use flip::Flip;
pub use shift::Shift;
pub use unanimated::Unanimated;

/// Called by a strategy once its views reached their final placement
pub type DoneFn = Box<dyn FnOnce()>;

// ============================================================================
// Animation kinds
// ============================================================================

/// The transition animations a caller can ask for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    #[default]
    None,
    /// The new view fades in over the old one
    Fade,
    /// The old view fades out over the new one
    AntiFade,
    FlipFromLeft,
    FlipFromRight,
    ShiftLeft,
    ShiftRight,
    ShiftUp,
    ShiftDown,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 9] = [
        AnimationKind::None,
        AnimationKind::Fade,
        AnimationKind::AntiFade,
        AnimationKind::FlipFromLeft,
        AnimationKind::FlipFromRight,
        AnimationKind::ShiftLeft,
        AnimationKind::ShiftRight,
        AnimationKind::ShiftUp,
        AnimationKind::ShiftDown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnimationKind::None => "none",
            AnimationKind::Fade => "fade",
            AnimationKind::AntiFade => "anti_fade",
            AnimationKind::FlipFromLeft => "flip_from_left",
            AnimationKind::FlipFromRight => "flip_from_right",
            AnimationKind::ShiftLeft => "shift_left",
            AnimationKind::ShiftRight => "shift_right",
            AnimationKind::ShiftUp => "shift_up",
            AnimationKind::ShiftDown => "shift_down",
        }
    }

    /// Whether a running transition of this kind may be cut short by a newer one
    pub fn is_interruptible(self) -> bool {
        TransitionStrategy::from(self).is_interruptible()
    }
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationKind {
    type Err = ConfigError;

    /// Accepts `snake_case`, `kebab-case` and `camelCase` names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        AnimationKind::ALL
            .into_iter()
            .find(|kind| kind.name().replace('_', "") == normalized)
            .ok_or_else(|| ConfigError::UnknownAnimation(s.to_string()))
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// Direction a shift transition moves content in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShiftDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Side a card flip starts from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlipSide {
    Left,
    Right,
}

/// One of the interchangeable transition behaviours
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionStrategy {
    Unanimated,
    Fade { anti: bool },
    Flip { from: FlipSide },
    Shift { direction: ShiftDirection },
}

impl From<AnimationKind> for TransitionStrategy {
    fn from(kind: AnimationKind) -> Self {
        match kind {
            AnimationKind::None => TransitionStrategy::Unanimated,
            AnimationKind::Fade => TransitionStrategy::Fade { anti: false },
            AnimationKind::AntiFade => TransitionStrategy::Fade { anti: true },
            AnimationKind::FlipFromLeft => TransitionStrategy::Flip {
                from: FlipSide::Left,
            },
            AnimationKind::FlipFromRight => TransitionStrategy::Flip {
                from: FlipSide::Right,
            },
            AnimationKind::ShiftLeft => TransitionStrategy::Shift {
                direction: ShiftDirection::Left,
            },
            AnimationKind::ShiftRight => TransitionStrategy::Shift {
                direction: ShiftDirection::Right,
            },
            AnimationKind::ShiftUp => TransitionStrategy::Shift {
                direction: ShiftDirection::Up,
            },
            AnimationKind::ShiftDown => TransitionStrategy::Shift {
                direction: ShiftDirection::Down,
            },
        }
    }
}

/// What a strategy works with: the shared tree, the animation driver, the
/// container's root view and its bounds captured when the transition started
#[derive(Clone)]
pub struct Stage {
    pub views: SharedViewTree,
    pub scheduler: AnimationScheduler,
    pub host: ViewId,
    pub bounds: Rect,
    /// Requested duration; `None` uses the strategy's default
    pub duration: Option<Duration>,
}

impl Stage {
    pub fn duration_or(&self, default: Duration) -> Duration {
        self.duration.unwrap_or(default)
    }
}

/// The capability every transition strategy provides
pub trait ViewTransition {
    /// Playback time used when the caller did not ask for one
    fn default_duration(&self) -> Duration;

    /// Whether `abort_view_transition` is supported
    fn is_interruptible(&self) -> bool {
        true
    }

    /// Place `new` inside the stage's host and run the transition
    ///
    /// Returns the animation whose completion will call `done`, or `None` if
    /// `done` was already called.
    fn handle_view_transition(
        &self,
        stage: &Stage,
        old: Option<ViewId>,
        new: ViewId,
        done: DoneFn,
    ) -> Result<Option<AnimationId>, ViewError>;

    /// Snap both views to their final placement; the `done` callback given to
    /// `handle_view_transition` must never run afterwards
    fn abort_view_transition(
        &self,
        stage: &Stage,
        old: Option<ViewId>,
        new: ViewId,
        pending: Option<AnimationId>,
    ) -> Result<(), ViewError>;
}

impl ViewTransition for TransitionStrategy {
    fn default_duration(&self) -> Duration {
        match *self {
            TransitionStrategy::Unanimated => Unanimated.default_duration(),
            TransitionStrategy::Fade { anti } => Fade { anti }.default_duration(),
            TransitionStrategy::Flip { from } => Flip { from }.default_duration(),
            TransitionStrategy::Shift { direction } => Shift { direction }.default_duration(),
        }
    }

    fn is_interruptible(&self) -> bool {
        match *self {
            TransitionStrategy::Unanimated => Unanimated.is_interruptible(),
            TransitionStrategy::Fade { anti } => Fade { anti }.is_interruptible(),
            TransitionStrategy::Flip { from } => Flip { from }.is_interruptible(),
            TransitionStrategy::Shift { direction } => Shift { direction }.is_interruptible(),
        }
    }

    fn handle_view_transition(
        &self,
        stage: &Stage,
        old: Option<ViewId>,
        new: ViewId,
        done: DoneFn,
    ) -> Result<Option<AnimationId>, ViewError> {
        match *self {
            TransitionStrategy::Unanimated => {
                Unanimated.handle_view_transition(stage, old, new, done)
            }
            TransitionStrategy::Fade { anti } => {
                Fade { anti }.handle_view_transition(stage, old, new, done)
            }
            TransitionStrategy::Flip { from } => {
                Flip { from }.handle_view_transition(stage, old, new, done)
            }
            TransitionStrategy::Shift { direction } => {
                Shift { direction }.handle_view_transition(stage, old, new, done)
            }
        }
    }

    fn abort_view_transition(
        &self,
        stage: &Stage,
        old: Option<ViewId>,
        new: ViewId,
        pending: Option<AnimationId>,
    ) -> Result<(), ViewError> {
        match *self {
            TransitionStrategy::Unanimated => {
                Unanimated.abort_view_transition(stage, old, new, pending)
            }
            TransitionStrategy::Fade { anti } => {
                Fade { anti }.abort_view_transition(stage, old, new, pending)
            }
            TransitionStrategy::Flip { from } => {
                Flip { from }.abort_view_transition(stage, old, new, pending)
            }
            TransitionStrategy::Shift { direction } => {
                Shift { direction }.abort_view_transition(stage, old, new, pending)
            }
        }
    }
}
