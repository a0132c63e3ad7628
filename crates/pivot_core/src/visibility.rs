//! Visibility propagation
//!
//! Every container owns a [`Visibility`] propagator. It tracks two signals per
//! hosted child:
//!
//! - the **parent state**: what the container itself currently is relative to
//!   its own parent (mirrored into every registration by [`Visibility::set_state`])
//! - the **self state**: what the container's transition logic says about this
//!   particular child (appearing while switched in, disappearing while
//!   switched out)
//!
//! The two are combined into a target state, and the child's notified
//! (current) state is walked towards it one step at a time around the cycle
//! `Hidden → Appearing → Visible → Disappearing → Hidden`. Every step produces
//! exactly one appearance notification, so a child is never told it settled
//! without first being told the transition began.
//!
//! Notifications are collected into a [`Dispatch`] and handed to the children
//! by [`Dispatch::deliver`], after the propagator's bookkeeping is done. This
//! lets a child hook call back into its container without re-entering a
//! borrowed propagator.
//!
//! # Example
//!
//! ```ignore
//! let mut visibility = Visibility::new();
//! visibility.add_child(child.clone());
//! visibility.set_state(VisibilityState::Visible, false).deliver();
//!
//! // child is now told: begin appearing, then end
//! visibility
//!     .set_child_state(child.view(), VisibilityState::Visible, true)?
//!     .deliver();
//! ```

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

use crate::component::{ChildRef, VisibilityState};
use crate::error::VisibilityError;
use crate::view::ViewId;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

// ============================================================================
// Notifications
// ============================================================================

/// One appearance notification for a child
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppearanceEvent {
    /// The child starts becoming visible (`appearing`) or hidden
    Begin { appearing: bool, animated: bool },
    /// The child settled in `Visible` or `Hidden`
    End,
}

impl AppearanceEvent {
    /// The notification announcing entry into `state`
    fn entering(state: VisibilityState, animated: bool) -> Self {
        match state {
            VisibilityState::Hidden | VisibilityState::Visible => AppearanceEvent::End,
            VisibilityState::Appearing => AppearanceEvent::Begin {
                appearing: true,
                animated,
            },
            VisibilityState::Disappearing => AppearanceEvent::Begin {
                appearing: false,
                animated,
            },
        }
    }
}

/// An ordered batch of appearance notifications
#[must_use = "appearance notifications are only sent by `deliver()`"]
#[derive(Default)]
pub struct Dispatch {
    notices: SmallVec<[(ChildRef, AppearanceEvent); 4]>,
}

impl Dispatch {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, child: ChildRef, event: AppearanceEvent) {
        self.notices.push((child, event));
    }

    /// Append another batch after this one
    pub fn extend(&mut self, other: Dispatch) {
        self.notices.extend(other.notices);
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// The pending notifications, in delivery order
    pub fn iter(&self) -> impl Iterator<Item = (ViewId, AppearanceEvent)> + '_ {
        self.notices.iter().map(|(child, event)| (child.view(), *event))
    }

    /// Send every notification to its child, in order
    pub fn deliver(self) {
        for (child, event) in self.notices {
            match event {
                AppearanceEvent::Begin {
                    appearing,
                    animated,
                } => child.begin_appearance_transition(appearing, animated),
                AppearanceEvent::End => child.end_appearance_transition(),
            }
        }
    }
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
// State machine
// ============================================================================

/// Combine a container's state with a child's own state
///
/// When both signals are transient and disagree there is no settled anchor,
/// so the child keeps moving in the direction it already heads rather than
/// oscillating.
pub fn target_state(
    parent: VisibilityState,
    own: VisibilityState,
    current: VisibilityState,
) -> VisibilityState {
    use VisibilityState::*;

    if parent == Hidden || own == Hidden {
        Hidden
    } else if parent == Visible {
        own
    } else if own == Visible {
        parent
    } else if own == parent {
        own
    } else {
        match current {
            Hidden => Appearing,
            Visible => Disappearing,
            other => other,
        }
    }
}

/// The single step taken from `current` while heading for `target`
pub fn next_step(current: VisibilityState, target: VisibilityState) -> VisibilityState {
    use VisibilityState::*;

    if current == target {
        return current;
    }
    match current {
        Hidden => Appearing,
        Visible => Disappearing,
        Appearing if target == Visible => Visible,
        Appearing => Disappearing,
        Disappearing if target == Hidden => Hidden,
        Disappearing => Appearing,
    }
}

// ============================================================================
// Registrations
// ============================================================================

/// Read-only view of a child's registration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistrationSnapshot {
    pub parent_state: VisibilityState,
    pub self_state: VisibilityState,
    pub current_state: VisibilityState,
}

struct Registration {
    child: ChildRef,
    parent_state: VisibilityState,
    self_state: VisibilityState,
    current_state: VisibilityState,
}

impl Registration {
    fn new(child: ChildRef, parent_state: VisibilityState) -> Self {
        Self {
            child,
            parent_state,
            self_state: VisibilityState::Hidden,
            current_state: VisibilityState::Hidden,
        }
    }

    fn set_parent_state(&mut self, state: VisibilityState, animated: bool, out: &mut Dispatch) {
        if state != self.parent_state {
            self.parent_state = state;
            self.converge(animated, out);
        }
    }

    fn set_self_state(&mut self, state: VisibilityState, animated: bool, out: &mut Dispatch) {
        if state != self.self_state {
            self.self_state = state;
            self.converge(animated, out);
        }
    }

    fn converge(&mut self, animated: bool, out: &mut Dispatch) {
        let target = target_state(self.parent_state, self.self_state, self.current_state);

        while self.current_state != target {
            let next = next_step(self.current_state, target);
            tracing::trace!(
                "visibility: view {:?} {:?} -> {:?} (target {:?})",
                self.child.view(),
                self.current_state,
                next,
                target
            );
            self.current_state = next;
            out.push(self.child.clone(), AppearanceEvent::entering(next, animated));
        }
    }

    fn snapshot(&self) -> RegistrationSnapshot {
        RegistrationSnapshot {
            parent_state: self.parent_state,
            self_state: self.self_state,
            current_state: self.current_state,
        }
    }
}

/// Per-container visibility propagator
#[derive(Default)]
pub struct Visibility {
    state: VisibilityState,
    children: FxIndexMap<ViewId, Registration>,
}

impl Visibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// The container's own state
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Set the container's own state and re-evaluate every registered child
    pub fn set_state(&mut self, state: VisibilityState, animated: bool) -> Dispatch {
        self.state = state;
        let mut out = Dispatch::new();
        for registration in self.children.values_mut() {
            registration.set_parent_state(state, animated, &mut out);
        }
        out
    }

    /// Register a child; it starts hidden, with the container's current state
    /// as its parent state
    ///
    /// Registering an already registered child has no effect.
    pub fn add_child(&mut self, child: ChildRef) {
        let view = child.view();
        if self.children.contains_key(&view) {
            tracing::warn!("visibility: view {:?} is already registered", view);
            return;
        }
        self.children
            .insert(view, Registration::new(child, self.state));
    }

    /// Drop a child's registration
    ///
    /// # Panics
    ///
    /// Panics if the child has not been walked back to `Hidden` first.
    pub fn remove_child(&mut self, view: ViewId) -> Option<ChildRef> {
        let registration = self.children.get(&view)?;
        assert_eq!(
            registration.current_state,
            VisibilityState::Hidden,
            "child view {:?} removed before reaching Hidden",
            view
        );
        self.children.shift_remove(&view).map(|r| r.child)
    }

    /// Set the state the container's transition logic assigns to a child
    pub fn set_child_state(
        &mut self,
        view: ViewId,
        state: VisibilityState,
        animated: bool,
    ) -> Result<Dispatch, VisibilityError> {
        let registration = self
            .children
            .get_mut(&view)
            .ok_or(VisibilityError::NotRegistered(view))?;
        let mut out = Dispatch::new();
        registration.set_self_state(state, animated, &mut out);
        Ok(out)
    }

    pub fn registration(&self, view: ViewId) -> Option<RegistrationSnapshot> {
        self.children.get(&view).map(Registration::snapshot)
    }

    pub fn is_registered(&self, view: ViewId) -> bool {
        self.children.contains_key(&view)
    }

    /// Registered child views, in registration order
    pub fn children(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.children.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::geometry::Rect;
    use crate::view::ViewTree;
    use std::cell::RefCell;
    use std::rc::Rc;
    use VisibilityState::*;

    /// Records the state each notification moves it into
    struct Probe {
        view: ViewId,
        state: RefCell<VisibilityState>,
        trail: RefCell<Vec<VisibilityState>>,
    }

    impl Probe {
        fn new(tree: &mut ViewTree) -> Rc<Self> {
            Rc::new(Self {
                view: tree.create_view(Rect::ZERO),
                state: RefCell::new(Hidden),
                trail: RefCell::new(Vec::new()),
            })
        }

        fn trail(&self) -> Vec<VisibilityState> {
            self.trail.borrow().clone()
        }

        fn record(&self, state: VisibilityState) {
            *self.state.borrow_mut() = state;
            self.trail.borrow_mut().push(state);
        }
    }

    impl Component for Probe {
        fn view(&self) -> ViewId {
            self.view
        }

        fn begin_appearance_transition(&self, appearing: bool, _animated: bool) {
            self.record(if appearing { Appearing } else { Disappearing });
        }

        fn end_appearance_transition(&self) {
            let settled = match *self.state.borrow() {
                Appearing => Visible,
                Disappearing => Hidden,
                other => panic!("end notification while {:?}", other),
            };
            self.record(settled);
        }
    }

    fn current(visibility: &Visibility, view: ViewId) -> VisibilityState {
        visibility.registration(view).unwrap().current_state
    }

    #[test]
    fn test_target_rules() {
        assert_eq!(target_state(Hidden, Visible, Visible), Hidden);
        assert_eq!(target_state(Visible, Hidden, Visible), Hidden);
        assert_eq!(target_state(Visible, Appearing, Hidden), Appearing);
        assert_eq!(target_state(Disappearing, Visible, Visible), Disappearing);
        assert_eq!(target_state(Appearing, Appearing, Hidden), Appearing);

        // conflicting transient signals
        assert_eq!(target_state(Appearing, Disappearing, Hidden), Appearing);
        assert_eq!(target_state(Disappearing, Appearing, Visible), Disappearing);
        assert_eq!(target_state(Disappearing, Appearing, Appearing), Appearing);
        assert_eq!(
            target_state(Appearing, Disappearing, Disappearing),
            Disappearing
        );
    }

    #[test]
    fn test_step_table() {
        assert_eq!(next_step(Hidden, Visible), Appearing);
        assert_eq!(next_step(Visible, Hidden), Disappearing);
        assert_eq!(next_step(Appearing, Visible), Visible);
        assert_eq!(next_step(Appearing, Hidden), Disappearing);
        assert_eq!(next_step(Disappearing, Hidden), Hidden);
        assert_eq!(next_step(Disappearing, Visible), Appearing);
        assert_eq!(next_step(Visible, Visible), Visible);
    }

    #[test]
    fn test_child_of_visible_container() {
        let mut tree = ViewTree::new();
        let probe = Probe::new(&mut tree);
        let mut visibility = Visibility::new();
        visibility.set_state(Visible, false).deliver();

        visibility.add_child(probe.clone());
        visibility
            .set_child_state(probe.view, Appearing, true)
            .unwrap()
            .deliver();
        assert_eq!(probe.trail(), vec![Appearing]);

        visibility
            .set_child_state(probe.view, Visible, true)
            .unwrap()
            .deliver();
        assert_eq!(probe.trail(), vec![Appearing, Visible]);
        assert_eq!(current(&visibility, probe.view), Visible);
    }

    #[test]
    fn test_hidden_container_holds_children_back() {
        let mut tree = ViewTree::new();
        let probe = Probe::new(&mut tree);
        let mut visibility = Visibility::new();

        visibility.add_child(probe.clone());
        let dispatch = visibility.set_child_state(probe.view, Visible, false).unwrap();
        assert!(dispatch.is_empty());

        visibility.set_state(Appearing, true).deliver();
        assert_eq!(probe.trail(), vec![Appearing]);

        visibility.set_state(Visible, true).deliver();
        assert_eq!(probe.trail(), vec![Appearing, Visible]);
    }

    #[test]
    fn test_direct_settle_walks_through_transient() {
        let mut tree = ViewTree::new();
        let probe = Probe::new(&mut tree);
        let mut visibility = Visibility::new();
        visibility.set_state(Visible, false).deliver();
        visibility.add_child(probe.clone());

        let dispatch = visibility.set_child_state(probe.view, Visible, false).unwrap();
        let events: Vec<_> = dispatch.iter().map(|(_, e)| e).collect();
        assert_eq!(
            events,
            vec![
                AppearanceEvent::Begin {
                    appearing: true,
                    animated: false
                },
                AppearanceEvent::End
            ]
        );
        dispatch.deliver();

        visibility
            .set_child_state(probe.view, Hidden, false)
            .unwrap()
            .deliver();
        assert_eq!(probe.trail(), vec![Appearing, Visible, Disappearing, Hidden]);
    }

    #[test]
    fn test_container_disappears_while_child_appears() {
        let mut tree = ViewTree::new();
        let probe = Probe::new(&mut tree);
        let mut visibility = Visibility::new();
        visibility.set_state(Visible, false).deliver();
        visibility.add_child(probe.clone());

        visibility
            .set_child_state(probe.view, Appearing, true)
            .unwrap()
            .deliver();
        visibility.set_state(Disappearing, true).deliver();
        // conflicting transient signals: stay put
        assert_eq!(probe.trail(), vec![Appearing]);

        visibility.set_state(Hidden, true).deliver();
        assert_eq!(probe.trail(), vec![Appearing, Disappearing, Hidden]);
    }

    #[test]
    fn test_reversal_mid_transition() {
        let mut tree = ViewTree::new();
        let probe = Probe::new(&mut tree);
        let mut visibility = Visibility::new();
        visibility.set_state(Visible, false).deliver();
        visibility.add_child(probe.clone());

        visibility
            .set_child_state(probe.view, Appearing, true)
            .unwrap()
            .deliver();
        visibility
            .set_child_state(probe.view, Disappearing, true)
            .unwrap()
            .deliver();
        visibility
            .set_child_state(probe.view, Visible, true)
            .unwrap()
            .deliver();

        assert_eq!(
            probe.trail(),
            vec![Appearing, Disappearing, Appearing, Visible]
        );
    }

    #[test]
    fn test_unchanged_state_is_silent() {
        let mut tree = ViewTree::new();
        let probe = Probe::new(&mut tree);
        let mut visibility = Visibility::new();
        visibility.set_state(Visible, false).deliver();
        visibility.add_child(probe.clone());
        visibility
            .set_child_state(probe.view, Visible, false)
            .unwrap()
            .deliver();

        assert!(visibility
            .set_child_state(probe.view, Visible, false)
            .unwrap()
            .is_empty());
        assert!(visibility.set_state(Visible, false).is_empty());
    }

    #[test]
    fn test_never_jumps_between_settled_states() {
        let states = [Hidden, Visible, Appearing, Disappearing];
        let mut tree = ViewTree::new();

        // every pair of (parent, self) updates applied from every reachable start
        for &p1 in &states {
            for &s1 in &states {
                for &p2 in &states {
                    for &s2 in &states {
                        let probe = Probe::new(&mut tree);
                        let mut visibility = Visibility::new();
                        visibility.add_child(probe.clone());

                        for (p, s) in [(p1, s1), (p2, s2), (Visible, Visible), (Hidden, Hidden)] {
                            let mut dispatch = visibility.set_state(p, false);
                            dispatch.extend(
                                visibility.set_child_state(probe.view, s, false).unwrap(),
                            );
                            dispatch.deliver();
                        }

                        let mut walk = vec![Hidden];
                        walk.extend(probe.trail());

                        for pair in walk.windows(2) {
                            let (from, to) = (pair[0], pair[1]);
                            assert_ne!(from, to);
                            assert!(
                                !matches!((from, to), (Hidden, Visible) | (Visible, Hidden)),
                                "direct jump {:?} -> {:?} in {:?}",
                                from,
                                to,
                                walk
                            );
                        }
                        assert_eq!(current(&visibility, probe.view), Hidden);
                    }
                }
            }
        }
    }

    #[test]
    fn test_remove_hidden_child() {
        let mut tree = ViewTree::new();
        let probe = Probe::new(&mut tree);
        let mut visibility = Visibility::new();
        visibility.add_child(probe.clone());

        assert!(visibility.remove_child(probe.view).is_some());
        assert!(!visibility.is_registered(probe.view));
        assert!(visibility.remove_child(probe.view).is_none());
    }

    #[test]
    #[should_panic(expected = "removed before reaching Hidden")]
    fn test_remove_visible_child_panics() {
        let mut tree = ViewTree::new();
        let probe = Probe::new(&mut tree);
        let mut visibility = Visibility::new();
        visibility.set_state(Visible, false).deliver();
        visibility.add_child(probe.clone());
        visibility
            .set_child_state(probe.view, Visible, false)
            .unwrap()
            .deliver();

        visibility.remove_child(probe.view);
    }

    #[test]
    fn test_unknown_child() {
        let mut tree = ViewTree::new();
        let stray = tree.create_view(Rect::ZERO);
        let mut visibility = Visibility::new();

        assert_eq!(
            visibility.set_child_state(stray, Visible, false).unwrap_err(),
            VisibilityError::NotRegistered(stray)
        );
    }

    #[test]
    fn test_new_child_inherits_container_state() {
        let mut tree = ViewTree::new();
        let probe = Probe::new(&mut tree);
        let mut visibility = Visibility::new();
        visibility.set_state(Appearing, false).deliver();

        visibility.add_child(probe.clone());
        assert_eq!(
            visibility.registration(probe.view),
            Some(RegistrationSnapshot {
                parent_state: Appearing,
                self_state: Hidden,
                current_state: Hidden,
            })
        );
    }
}
