//! Retained view tree
//!
//! A minimal hierarchy of rectangular views. Each view has a frame expressed
//! in its superview's coordinate space, an opacity, a y-axis rotation (used by
//! card-flip transitions) and a hidden flag. Subviews are kept in z-order:
//! the last subview is drawn on top.
//!
//! The tree is shared between the switch containers that place views and the
//! animation scheduler that writes interpolated properties into it, so it is
//! usually held as a [`SharedViewTree`].
//!
//! # Example
//!
//! ```rust
//! use pivot_core::{Rect, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let root = tree.create_view(Rect::new(0.0, 0.0, 320.0, 480.0));
//! let child = tree.create_view(Rect::ZERO);
//!
//! tree.add_subview(root, child).unwrap();
//! assert_eq!(tree.superview(child), Some(root));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{Result, ViewError};
use crate::geometry::Rect;

new_key_type! {
    /// Handle to a view in a [`ViewTree`]
    pub struct ViewId;
}

/// A view tree shared by everything running on the UI thread
pub type SharedViewTree = Rc<RefCell<ViewTree>>;

/// Animatable view properties
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Frame,
    Opacity,
    RotationY,
}

/// A value for one of the animatable view properties
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewProperty {
    Frame(Rect),
    Opacity(f32),
    /// Rotation around the vertical axis, in degrees
    RotationY(f32),
}

impl ViewProperty {
    pub fn kind(&self) -> PropertyKind {
        match self {
            ViewProperty::Frame(_) => PropertyKind::Frame,
            ViewProperty::Opacity(_) => PropertyKind::Opacity,
            ViewProperty::RotationY(_) => PropertyKind::RotationY,
        }
    }
}

/// A single node of the view tree
#[derive(Clone, Debug)]
pub struct ViewNode {
    pub frame: Rect,
    pub opacity: f32,
    pub rotation_y: f32,
    pub hidden: bool,
    superview: Option<ViewId>,
    subviews: SmallVec<[ViewId; 4]>,
}

impl ViewNode {
    fn new(frame: Rect) -> Self {
        Self {
            frame,
            opacity: 1.0,
            rotation_y: 0.0,
            hidden: false,
            superview: None,
            subviews: SmallVec::new(),
        }
    }

    pub fn superview(&self) -> Option<ViewId> {
        self.superview
    }

    pub fn subviews(&self) -> &[ViewId] {
        &self.subviews
    }
}

/// Owner of every view node
#[derive(Default)]
pub struct ViewTree {
    nodes: SlotMap<ViewId, ViewNode>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Wrap a new, empty tree for sharing on the UI thread
    pub fn shared() -> SharedViewTree {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Create a detached view with the given frame
    pub fn create_view(&mut self, frame: Rect) -> ViewId {
        self.nodes.insert(ViewNode::new(frame))
    }

    /// Remove a view and its whole subtree
    pub fn remove_view(&mut self, id: ViewId) -> Result<()> {
        self.remove_from_superview(id)?;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.subviews);
            }
        }
        Ok(())
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node_mut(&mut self, id: ViewId) -> Result<&mut ViewNode> {
        self.nodes.get_mut(id).ok_or(ViewError::MissingView(id))
    }

    fn node(&self, id: ViewId) -> Result<&ViewNode> {
        self.nodes.get(id).ok_or(ViewError::MissingView(id))
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    pub fn superview(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(id).and_then(|n| n.superview)
    }

    pub fn subviews(&self, id: ViewId) -> &[ViewId] {
        self.nodes.get(id).map(|n| n.subviews()).unwrap_or(&[])
    }

    /// Whether `ancestor` is `id` or one of its superviews
    pub fn is_descendant_of(&self, id: ViewId, ancestor: ViewId) -> bool {
        let mut current = Some(id);
        while let Some(view) = current {
            if view == ancestor {
                return true;
            }
            current = self.superview(view);
        }
        false
    }

    fn check_attach(&self, parent: ViewId, child: ViewId) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_descendant_of(parent, child) {
            return Err(ViewError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Attach `child` on top of `parent`'s subviews
    ///
    /// A child that already has a superview is moved.
    pub fn add_subview(&mut self, parent: ViewId, child: ViewId) -> Result<()> {
        self.check_attach(parent, child)?;
        self.remove_from_superview(child)?;
        self.node_mut(parent)?.subviews.push(child);
        self.node_mut(child)?.superview = Some(parent);
        Ok(())
    }

    /// Attach `child` directly below `sibling`, which must be a subview of `parent`
    pub fn insert_subview_below(
        &mut self,
        parent: ViewId,
        child: ViewId,
        sibling: ViewId,
    ) -> Result<()> {
        self.check_attach(parent, child)?;
        if self.superview(sibling) != Some(parent) {
            return Err(ViewError::NotASubview { parent, sibling });
        }
        self.remove_from_superview(child)?;
        let subviews = &mut self.node_mut(parent)?.subviews;
        let index = subviews
            .iter()
            .position(|v| *v == sibling)
            .ok_or(ViewError::NotASubview { parent, sibling })?;
        subviews.insert(index, child);
        self.node_mut(child)?.superview = Some(parent);
        Ok(())
    }

    /// Detach a view from its superview; a detached view is left untouched
    pub fn remove_from_superview(&mut self, id: ViewId) -> Result<()> {
        let Some(parent) = self.node(id)?.superview else {
            return Ok(());
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.subviews.retain(|v| *v != id);
        }
        self.node_mut(id)?.superview = None;
        Ok(())
    }

    // =========================================================================
    // Properties
    // =========================================================================

    pub fn frame(&self, id: ViewId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.frame)
    }

    /// The view's own coordinate space: its frame size at the origin
    pub fn bounds(&self, id: ViewId) -> Option<Rect> {
        self.frame(id).map(|f| f.at_origin())
    }

    pub fn set_frame(&mut self, id: ViewId, frame: Rect) -> Result<()> {
        self.node_mut(id)?.frame = frame;
        Ok(())
    }

    pub fn opacity(&self, id: ViewId) -> Option<f32> {
        self.nodes.get(id).map(|n| n.opacity)
    }

    pub fn set_opacity(&mut self, id: ViewId, opacity: f32) -> Result<()> {
        self.node_mut(id)?.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn rotation_y(&self, id: ViewId) -> Option<f32> {
        self.nodes.get(id).map(|n| n.rotation_y)
    }

    pub fn set_rotation_y(&mut self, id: ViewId, degrees: f32) -> Result<()> {
        self.node_mut(id)?.rotation_y = degrees;
        Ok(())
    }

    pub fn is_hidden(&self, id: ViewId) -> Option<bool> {
        self.nodes.get(id).map(|n| n.hidden)
    }

    pub fn set_hidden(&mut self, id: ViewId, hidden: bool) -> Result<()> {
        self.node_mut(id)?.hidden = hidden;
        Ok(())
    }

    /// Read one animatable property
    pub fn property(&self, id: ViewId, kind: PropertyKind) -> Option<ViewProperty> {
        let node = self.nodes.get(id)?;
        Some(match kind {
            PropertyKind::Frame => ViewProperty::Frame(node.frame),
            PropertyKind::Opacity => ViewProperty::Opacity(node.opacity),
            PropertyKind::RotationY => ViewProperty::RotationY(node.rotation_y),
        })
    }

    /// Write one animatable property
    pub fn apply(&mut self, id: ViewId, value: ViewProperty) -> Result<()> {
        match value {
            ViewProperty::Frame(frame) => self.set_frame(id, frame),
            ViewProperty::Opacity(opacity) => self.set_opacity(id, opacity),
            ViewProperty::RotationY(degrees) => self.set_rotation_y(id, degrees),
        }
    }
}
