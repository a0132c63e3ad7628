//! The switch container
//!
//! A [`SwitchContainer`] displays exactly one child component inside its own
//! root view and replaces it through one of the catalog's transitions. At most
//! one transition runs at a time: starting a new one first terminates the
//! running one, which snaps its views to their final placement and settles
//! both of its children before anything else happens.
//!
//! The container forwards its own visibility to the children it hosts. A root
//! container is driven with [`SwitchContainer::set_state`]; a nested container
//! is driven by its parent through the [`Component`] hooks.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use pivot_animation::AnimationScheduler;
use pivot_core::{
    ChildRef, Component, Rect, RegistrationSnapshot, SharedViewTree, Size, ViewError, ViewId,
    Visibility, VisibilityState,
};

use crate::config::SwitchConfig;
use crate::error::{Result, SwitchError};
use crate::forwarding::{ForwardingFlags, PresentationQuery, PresentationUpdate};
use crate::transition::logic::Transition;
use crate::transition::{AnimationKind, Stage, TransitionStrategy};

type PresentationCallback = Rc<dyn Fn(PresentationUpdate)>;

/// State shared between a container handle and its running transition
pub(crate) struct SwitchInner {
    pub(crate) view: ViewId,
    pub(crate) views: SharedViewTree,
    pub(crate) scheduler: AnimationScheduler,
    pub(crate) child: RefCell<Option<ChildRef>>,
    pub(crate) visibility: RefCell<Visibility>,
    active: RefCell<Option<Rc<Transition>>>,
    config: RefCell<SwitchConfig>,
    /// Direction of the last begin notification received from a parent
    appearing: Cell<bool>,
    animated: Cell<bool>,
    presentation: RefCell<Option<PresentationCallback>>,
    next_transition_id: Cell<u64>,
}

impl SwitchInner {
    /// Everything a strategy needs, with the bounds as they are now
    pub(crate) fn stage(&self, duration: Option<Duration>) -> Stage {
        let bounds = self.views.borrow().bounds(self.view).unwrap_or(Rect::ZERO);
        Stage {
            views: self.views.clone(),
            scheduler: self.scheduler.clone(),
            host: self.view,
            bounds,
            duration,
        }
    }

    pub(crate) fn set_child_state(
        &self,
        view: ViewId,
        state: VisibilityState,
        animated: bool,
    ) -> Result<()> {
        let dispatch = self
            .visibility
            .borrow_mut()
            .set_child_state(view, state, animated)?;
        dispatch.deliver();
        Ok(())
    }

    fn set_state(&self, state: VisibilityState, animated: bool) {
        tracing::debug!("switch {:?}: state {:?}", self.view, state);
        let dispatch = self.visibility.borrow_mut().set_state(state, animated);
        dispatch.deliver();
    }

    /// Forget the active transition if it is still the one identified by `id`
    fn clear_transition(&self, id: u64) {
        let finished = {
            let mut active = self.active.borrow_mut();
            match active.as_ref() {
                Some(transition) if transition.id() == id => active.take(),
                _ => None,
            }
        };
        drop(finished);
    }

    fn active(&self) -> Option<Rc<Transition>> {
        self.active.borrow().clone()
    }
}

/// Single-child container with animated, interruptible replacement
///
/// Cheap to clone; clones are handles to the same container.
#[derive(Clone)]
pub struct SwitchContainer {
    inner: Rc<SwitchInner>,
}

impl SwitchContainer {
    /// Create a container whose root view lives in the scheduler's view tree
    pub fn new(scheduler: AnimationScheduler, frame: Rect) -> Self {
        let views = scheduler.views();
        let view = views.borrow_mut().create_view(frame);
        Self {
            inner: Rc::new(SwitchInner {
                view,
                views,
                scheduler,
                child: RefCell::new(None),
                visibility: RefCell::new(Visibility::new()),
                active: RefCell::new(None),
                config: RefCell::new(SwitchConfig::default()),
                appearing: Cell::new(false),
                animated: Cell::new(false),
                presentation: RefCell::new(None),
                next_transition_id: Cell::new(0),
            }),
        }
    }

    pub fn with_config(
        scheduler: AnimationScheduler,
        frame: Rect,
        config: SwitchConfig,
    ) -> Result<Self> {
        let container = Self::new(scheduler, frame);
        container.set_config(config)?;
        Ok(container)
    }

    /// The container's root view
    pub fn view(&self) -> ViewId {
        self.inner.view
    }

    pub fn views(&self) -> SharedViewTree {
        self.inner.views.clone()
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.inner.scheduler
    }

    /// The displayed child, or the one being switched to
    pub fn current_child(&self) -> Option<ChildRef> {
        self.inner.child.borrow().clone()
    }

    pub fn is_transitioning(&self) -> bool {
        self.inner.active().is_some_and(|t| t.is_running())
    }

    /// Whether a `switch_view` call right now would be allowed to cut the
    /// running transition short
    pub fn is_interruptible(&self) -> bool {
        self.inner
            .active()
            .map_or(true, |t| !t.is_running() || t.is_interruptible())
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn config(&self) -> SwitchConfig {
        self.inner.config.borrow().clone()
    }

    pub fn set_config(&self, config: SwitchConfig) -> Result<()> {
        config.validate()?;
        *self.inner.config.borrow_mut() = config;
        Ok(())
    }

    /// Playback time used when `switch_view` is given none
    pub fn set_transition_duration(&self, duration: Option<Duration>) {
        self.inner.config.borrow_mut().transition_duration = duration.map(|d| d.as_secs_f64());
    }

    pub fn set_forwarding(&self, forwarding: ForwardingFlags) {
        self.inner.config.borrow_mut().forwarding = forwarding;
    }

    /// Register the host hook asked to re-evaluate forwarded presentation
    pub fn on_presentation_update<F>(&self, callback: F)
    where
        F: Fn(PresentationUpdate) + 'static,
    {
        *self.inner.presentation.borrow_mut() = Some(Rc::new(callback));
    }

    /// The child answering `query`, if that question is forwarded
    pub fn child_for(&self, query: PresentationQuery) -> Option<ChildRef> {
        if self.inner.config.borrow().forwarding.forwards(query) {
            self.current_child()
        } else {
            None
        }
    }

    // =========================================================================
    // Switching
    // =========================================================================

    /// Replace the displayed child
    ///
    /// A running transition is terminated first. `duration` overrides the
    /// configured one, which in turn overrides the animation's default.
    ///
    /// # Panics
    ///
    /// Panics if a card flip is still running; check
    /// [`is_interruptible`](Self::is_interruptible) first.
    pub fn switch_view(
        &self,
        child: ChildRef,
        kind: AnimationKind,
        duration: Option<Duration>,
    ) -> Result<()> {
        let view = child.view();
        if self.current_child().is_some_and(|c| c.view() == view) {
            return Err(SwitchError::AlreadyDisplayed(view));
        }

        let duration = duration.or_else(|| self.inner.config.borrow().duration());

        let previous = self.inner.active.borrow_mut().take();
        if let Some(previous) = previous {
            // the previous transition finishes even when its views could not be placed
            if let Err(err) = previous.terminate() {
                tracing::warn!("switch {:?}: terminating previous transition: {}", self.view(), err);
            }
        }

        let id = self.inner.next_transition_id.get();
        self.inner.next_transition_id.set(id + 1);

        let weak = Rc::downgrade(&self.inner);
        let transition = Rc::new(Transition::new(
            id,
            weak.clone(),
            TransitionStrategy::from(kind),
            child,
            duration,
            move || {
                if let Some(inner) = weak.upgrade() {
                    inner.clear_transition(id);
                }
            },
        ));
        *self.inner.active.borrow_mut() = Some(transition.clone());

        if let Err(err) = transition.start() {
            self.inner.clear_transition(id);
            return Err(err);
        }

        self.request_presentation_updates();
        Ok(())
    }

    /// Replace the displayed child with the animation and duration of `config`
    pub fn switch_view_with(&self, child: ChildRef, config: &SwitchConfig) -> Result<()> {
        self.switch_view(child, config.animation, config.duration())
    }

    fn request_presentation_updates(&self) {
        let updates = {
            let config = self.inner.config.borrow();
            config.forwarding.updates(config.animate_forwarding_changes)
        };
        let callback = self.inner.presentation.borrow().clone();
        if let Some(callback) = callback {
            for update in updates {
                tracing::trace!("switch {:?}: presentation update {:?}", self.view(), update);
                callback(update);
            }
        }
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Drive a root container's visibility
    pub fn set_state(&self, state: VisibilityState, animated: bool) {
        self.inner.set_state(state, animated);
    }

    pub fn state(&self) -> VisibilityState {
        self.inner.visibility.borrow().state()
    }

    pub fn registration(&self, child: ViewId) -> Option<RegistrationSnapshot> {
        self.inner.visibility.borrow().registration(child)
    }

    /// Views of the children currently tracked, in registration order
    pub fn registered_children(&self) -> Vec<ViewId> {
        self.inner.visibility.borrow().children().collect()
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Resize the container's root view and lay its child out again
    pub fn set_bounds(&self, size: Size) -> Result<()> {
        {
            let mut tree = self.inner.views.borrow_mut();
            let origin = tree.frame(self.view()).unwrap_or(Rect::ZERO).origin;
            tree.set_frame(
                self.view(),
                Rect::new(origin.x, origin.y, size.width, size.height),
            )?;
        }
        self.layout()
    }

    /// Make the current child fill the container's bounds
    pub fn layout(&self) -> Result<()> {
        let Some(child) = self.current_child() else {
            return Ok(());
        };
        let mut tree = self.inner.views.borrow_mut();
        let bounds = tree
            .bounds(self.view())
            .ok_or(ViewError::MissingView(self.view()))?;
        tree.set_frame(child.view(), bounds)?;
        Ok(())
    }

    /// This container as a child of another container
    pub fn as_child(&self) -> ChildRef {
        Rc::new(self.clone())
    }
}

impl Component for SwitchContainer {
    fn view(&self) -> ViewId {
        self.inner.view
    }

    fn begin_appearance_transition(&self, appearing: bool, animated: bool) {
        self.inner.appearing.set(appearing);
        self.inner.animated.set(animated);
        let state = if appearing {
            VisibilityState::Appearing
        } else {
            VisibilityState::Disappearing
        };
        self.inner.set_state(state, animated);
    }

    fn end_appearance_transition(&self) {
        let state = if self.inner.appearing.get() {
            VisibilityState::Visible
        } else {
            VisibilityState::Hidden
        };
        self.inner.set_state(state, self.inner.animated.get());
    }
}

impl std::fmt::Debug for SwitchContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchContainer")
            .field("view", &self.inner.view)
            .field("child", &self.current_child().map(|c| c.view()))
            .field("state", &self.state())
            .field("transition", &self.inner.active())
            .finish()
    }
}
