//! Per-node transform state

use std::fmt;

use bitflags::bitflags;
use glam::{Mat4, Vec3};

use crate::events::Listeners;
use crate::rotation::RotationCache;

/// Handle of a node inside a [`TransformTree`](crate::TransformTree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena index of this node
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Cached matrices that are out of date
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(
        feature = "serde-support",
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub struct DirtyFlags: u8 {
        /// Local matrix must be recomposed
        const LOCAL = 0x01;
        /// World matrix must be recomputed
        const WORLD = 0x02;
    }
}

/// One transform in the tree
///
/// `W` is the world-matrix slot of the tree's storage mode.
pub(crate) struct TransformNode<O, W> {
    pub(crate) owner: O,
    pub(crate) position: Vec3,
    pub(crate) scale: Vec3,
    pub(crate) rotation: RotationCache,
    pub(crate) local_matrix: Mat4,
    pub(crate) world: W,
    pub(crate) dirty: DirtyFlags,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) listeners: Listeners,
}

impl<O, W> TransformNode<O, W> {
    pub(crate) fn new(owner: O, world: W) -> Self {
        Self {
            owner,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: RotationCache::default(),
            local_matrix: Mat4::IDENTITY,
            world,
            dirty: DirtyFlags::LOCAL | DirtyFlags::WORLD,
            parent: None,
            children: Vec::new(),
            listeners: Listeners::default(),
        }
    }

    /// Identity-based removal; absent children are ignored
    pub(crate) fn remove_child(&mut self, child: NodeId) {
        if let Some(index) = self.children.iter().position(|&c| c == child) {
            self.children.remove(index);
        }
    }
}

impl<O: fmt::Debug, W> fmt::Debug for TransformNode<O, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformNode")
            .field("owner", &self.owner)
            .field("position", &self.position)
            .field("scale", &self.scale)
            .field("rotation", &self.rotation)
            .field("dirty", &self.dirty)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_dirty() {
        let node = TransformNode::new((), Mat4::IDENTITY);
        assert_eq!(node.dirty, DirtyFlags::LOCAL | DirtyFlags::WORLD);
        assert_eq!(node.scale, Vec3::ONE);
        assert!(node.parent.is_none());
    }

    #[test]
    fn test_remove_child_keeps_order() {
        let mut node = TransformNode::new((), Mat4::IDENTITY);
        node.children = vec![NodeId(1), NodeId(2), NodeId(3)];
        node.remove_child(NodeId(2));
        assert_eq!(node.children, vec![NodeId(1), NodeId(3)]);
    }

    #[test]
    fn test_remove_missing_child_is_noop() {
        let mut node = TransformNode::new((), Mat4::IDENTITY);
        node.children = vec![NodeId(1)];
        node.remove_child(NodeId(7));
        assert_eq!(node.children, vec![NodeId(1)]);
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(42).to_string(), "#42");
        assert_eq!(NodeId(42).index(), 42);
    }
}
