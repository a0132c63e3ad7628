//! Lifecycle of one child replacement
//!
//! A [`Transition`] wraps a [`TransitionStrategy`] with the bookkeeping every
//! replacement shares:
//!
//! - begin: register the incoming child, announce the parent changes, move the
//!   outgoing child to `Disappearing` and the incoming one to `Appearing`
//! - finish: settle the outgoing child in `Hidden`, detach and unregister it,
//!   settle the incoming child in `Visible`
//!
//! Finishing happens exactly once, either from the strategy's completion or
//! from [`Transition::terminate`], whichever comes first. A child may switch
//! the container again from its own hooks while the finish sequence runs; the
//! transition already counts as finished by then.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use pivot_animation::AnimationId;
use pivot_core::{ChildRef, ViewError, VisibilityState};

use super::{DoneFn, Stage, TransitionStrategy, ViewTransition};
use crate::error::{Result, SwitchError};
use crate::switcher::SwitchInner;

/// Child hooks always report an animated change, even for unanimated strategies
const ANIMATED_HOOKS: bool = true;

pub(crate) struct Transition {
    id: u64,
    container: Weak<SwitchInner>,
    strategy: TransitionStrategy,
    old: RefCell<Option<ChildRef>>,
    new: ChildRef,
    duration: Option<Duration>,
    running: Cell<bool>,
    pending: Cell<Option<AnimationId>>,
    stage: RefCell<Option<Stage>>,
    completion: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Transition {
    pub(crate) fn new(
        id: u64,
        container: Weak<SwitchInner>,
        strategy: TransitionStrategy,
        new: ChildRef,
        duration: Option<Duration>,
        completion: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            id,
            container,
            strategy,
            old: RefCell::new(None),
            new,
            duration,
            running: Cell::new(false),
            pending: Cell::new(None),
            stage: RefCell::new(None),
            completion: RefCell::new(Some(Box::new(completion))),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.get()
    }

    pub(crate) fn is_interruptible(&self) -> bool {
        self.strategy.is_interruptible()
    }

    /// Swap the container's child and hand the views to the strategy
    pub(crate) fn start(self: &Rc<Self>) -> Result<()> {
        let container = self.container.upgrade().ok_or(SwitchError::Detached)?;
        self.running.set(true);

        let old = container.child.replace(Some(self.new.clone()));
        *self.old.borrow_mut() = old.clone();

        let stage = container.stage(self.duration);
        *self.stage.borrow_mut() = Some(stage.clone());

        tracing::debug!(
            "transition {}: begin {:?} -> {:?} ({:?})",
            self.id,
            old.as_ref().map(|c| c.view()),
            self.new.view(),
            self.strategy
        );

        if let Err(err) = self.begin(&container, old.as_ref()) {
            drop(container);
            self.finalize();
            return Err(err);
        }
        drop(container);

        let weak = Rc::downgrade(self);
        let done: DoneFn = Box::new(move || {
            if let Some(transition) = weak.upgrade() {
                transition.complete();
            }
        });

        let old_view = old.as_ref().map(|c| c.view());
        match self
            .strategy
            .handle_view_transition(&stage, old_view, self.new.view(), done)
        {
            Ok(pending) => {
                // unanimated strategies finish before returning
                if self.running.get() {
                    self.pending.set(pending);
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!("transition {}: strategy failed: {}", self.id, err);
                self.finalize();
                Err(err.into())
            }
        }
    }

    /// Cut a running transition short
    ///
    /// Both views snap to their final placement and the finish sequence runs
    /// synchronously. Does nothing once the transition has finished.
    ///
    /// # Panics
    ///
    /// Panics for strategies that cannot be interrupted (card flips).
    pub(crate) fn terminate(&self) -> Result<()> {
        if !self.running.get() {
            return Ok(());
        }
        tracing::debug!("transition {}: terminated", self.id);

        let stage = self.stage.borrow().clone();
        let result = match stage {
            Some(stage) => {
                let old_view = self.old.borrow().as_ref().map(|c| c.view());
                self.strategy.abort_view_transition(
                    &stage,
                    old_view,
                    self.new.view(),
                    self.pending.take(),
                )
            }
            None => Ok(()),
        };

        self.finalize();
        result.map_err(SwitchError::from)
    }

    /// The strategy's completion
    fn complete(&self) {
        if !self.running.get() {
            return;
        }
        self.pending.set(None);
        self.finalize();
    }

    fn begin(&self, container: &SwitchInner, old: Option<&ChildRef>) -> Result<()> {
        container
            .visibility
            .borrow_mut()
            .add_child(self.new.clone());

        if let Some(old) = old {
            old.will_move_to_parent(None);
        }
        self.new.will_move_to_parent(Some(container.view));

        {
            let mut tree = container.views.borrow_mut();
            let view = self.new.view();
            tree.set_opacity(view, 1.0)?;
            tree.set_rotation_y(view, 0.0)?;
            tree.set_hidden(view, false)?;
        }

        if let Some(old) = old {
            container.set_child_state(old.view(), VisibilityState::Disappearing, ANIMATED_HOOKS)?;
        }
        container.set_child_state(self.new.view(), VisibilityState::Appearing, ANIMATED_HOOKS)
    }

    fn finalize(&self) {
        let old = self.old.borrow_mut().take();
        // cleared before any hook runs so a re-entrant switch sees it finished
        self.running.set(false);

        match self.container.upgrade() {
            Some(container) => {
                if let Err(err) = self.finish(&container, old.as_ref()) {
                    tracing::error!("transition {}: finish failed: {}", self.id, err);
                }
            }
            None => tracing::warn!("transition {}: container dropped before finish", self.id),
        }

        tracing::debug!("transition {}: finished on {:?}", self.id, self.new.view());

        let completion = self.completion.borrow_mut().take();
        if let Some(completion) = completion {
            completion();
        }
    }

    fn finish(&self, container: &SwitchInner, old: Option<&ChildRef>) -> Result<()> {
        if let Some(old) = old {
            let view = old.view();
            container.set_child_state(view, VisibilityState::Hidden, ANIMATED_HOOKS)?;
            let detached = container.views.borrow_mut().remove_from_superview(view);
            match detached {
                // already gone from the tree counts as detached
                Ok(()) | Err(ViewError::MissingView(_)) => {}
                Err(err) => return Err(err.into()),
            }
            old.did_move_to_parent(None);
            container.visibility.borrow_mut().remove_child(view);
        }

        container.set_child_state(self.new.view(), VisibilityState::Visible, ANIMATED_HOOKS)?;
        let current = container.child.borrow().as_ref().map(|c| c.view());
        if current != Some(self.new.view()) {
            tracing::debug!("transition {}: child replaced while settling", self.id);
            return Ok(());
        }
        self.new.did_move_to_parent(Some(container.view));
        Ok(())
    }
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("strategy", &self.strategy)
            .field("new", &self.new.view())
            .field("running", &self.running.get())
            .finish()
    }
}

