//! Test helpers: a component that records its hooks and a ready container

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use pivot_animation::AnimationScheduler;
use pivot_core::{Component, Rect, SharedViewTree, ViewId, ViewTree, VisibilityState};

use crate::SwitchContainer;

/// Surface `tracing` output in failing tests; filter with `RUST_LOG`
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub(crate) const FRAME: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Hook {
    Begin { appearing: bool },
    End,
    WillMove(Option<ViewId>),
    DidMove(Option<ViewId>),
}

pub(crate) type HookLog = Rc<RefCell<Vec<(&'static str, Hook)>>>;

/// Component that logs every hook into a log shared between children
pub(crate) struct RecordingChild {
    name: &'static str,
    view: ViewId,
    log: HookLog,
    appearing: Cell<bool>,
    trail: RefCell<Vec<VisibilityState>>,
}

impl RecordingChild {
    /// States the child went through, as told by its hooks
    pub(crate) fn trail(&self) -> Vec<VisibilityState> {
        self.trail.borrow().clone()
    }

    pub(crate) fn state(&self) -> VisibilityState {
        self.trail.borrow().last().copied().unwrap_or_default()
    }

    pub(crate) fn hooks(&self) -> Vec<Hook> {
        self.log
            .borrow()
            .iter()
            .filter(|(name, _)| *name == self.name)
            .map(|(_, hook)| *hook)
            .collect()
    }
}

impl Component for RecordingChild {
    fn view(&self) -> ViewId {
        self.view
    }

    fn begin_appearance_transition(&self, appearing: bool, _animated: bool) {
        self.appearing.set(appearing);
        self.trail.borrow_mut().push(if appearing {
            VisibilityState::Appearing
        } else {
            VisibilityState::Disappearing
        });
        self.log.borrow_mut().push((self.name, Hook::Begin { appearing }));
    }

    fn end_appearance_transition(&self) {
        let settled = if self.appearing.get() {
            VisibilityState::Visible
        } else {
            VisibilityState::Hidden
        };
        self.trail.borrow_mut().push(settled);
        self.log.borrow_mut().push((self.name, Hook::End));
    }

    fn will_move_to_parent(&self, parent: Option<ViewId>) {
        self.log.borrow_mut().push((self.name, Hook::WillMove(parent)));
    }

    fn did_move_to_parent(&self, parent: Option<ViewId>) {
        self.log.borrow_mut().push((self.name, Hook::DidMove(parent)));
    }
}

pub(crate) struct Fixture {
    pub views: SharedViewTree,
    pub scheduler: AnimationScheduler,
    pub container: SwitchContainer,
    pub log: HookLog,
}

impl Fixture {
    /// A visible 320x480 container
    pub(crate) fn new() -> Self {
        let fixture = Self::hidden();
        fixture.container.set_state(VisibilityState::Visible, false);
        fixture
    }

    pub(crate) fn hidden() -> Self {
        init_tracing();
        let views = ViewTree::shared();
        let scheduler = AnimationScheduler::new(views.clone());
        let container = SwitchContainer::new(scheduler.clone(), Rect::new(0.0, 0.0, 320.0, 480.0));
        Self {
            views,
            scheduler,
            container,
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub(crate) fn child(&self, name: &'static str) -> Rc<RecordingChild> {
        let view = self
            .views
            .borrow_mut()
            .create_view(Rect::new(0.0, 0.0, 100.0, 100.0));
        Rc::new(RecordingChild {
            name,
            view,
            log: self.log.clone(),
            appearing: Cell::new(false),
            trail: RefCell::new(vec![VisibilityState::Hidden]),
        })
    }

    pub(crate) fn run(&self) {
        self.scheduler.run_until_idle(FRAME);
    }

    pub(crate) fn frame(&self, view: ViewId) -> Option<Rect> {
        self.views.borrow().frame(view)
    }

    pub(crate) fn subviews(&self) -> Vec<ViewId> {
        self.views.borrow().subviews(self.container.view()).to_vec()
    }

    /// Position of `(name, hook)` in the shared log
    pub(crate) fn position(&self, name: &str, hook: Hook) -> Option<usize> {
        self.log
            .borrow()
            .iter()
            .position(|(n, h)| *n == name && *h == hook)
    }
}
