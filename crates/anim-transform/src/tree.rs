//! Transform hierarchy with lazily cached matrices
//!
//! Nodes live in an arena owned by [`TransformTree`] and refer to each other
//! by [`NodeId`]. A parent link is a plain back-reference; a parent's child
//! list records membership in insertion order.
//!
//! Mutating a node marks its local matrix stale and invalidates the world
//! matrix of the node and its subtree. Reading a matrix recomputes whatever
//! is stale, walking up the parent chain as needed. Neither direction
//! recurses, so chain depth is bounded only by memory.
//!
//! Parent cycles are not supported. Debug builds assert when `set_parent`
//! would create one; release builds do not check, and the behaviour of a
//! tree containing a cycle is undefined.

use std::marker::PhantomData;

use glam::{Mat4, Quat, Vec3};
use log::{debug, trace};

use crate::error::{Result, TransformError};
use crate::events::{Callback, ListenerId, TransformChanged};
use crate::math::compose_affine;
use crate::node::{DirtyFlags, NodeId, TransformNode};
use crate::rotation::Authority;
use crate::storage::{ExternalMatrices, MatrixStorage, OwnedMatrices, SharedMatrix};

/// Counters for the lazy recomputation paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct RecomputeStats {
    /// Local matrices composed from position/rotation/scale
    pub local_compositions: u64,
    /// World matrices brought up to date (including pinned roots)
    pub world_refreshes: u64,
    /// Parent-world by local multiplications
    pub matrix_multiplications: u64,
    /// Nodes examined by invalidation, including short-circuited ones
    pub invalidation_visits: u64,
    /// "Transform changed" notifications emitted
    pub notifications: u64,
}

/// Hierarchy of animation transforms
///
/// `O` is an opaque owner handle stored with each node. `S` selects how world
/// matrices are stored, see [`crate::storage`].
#[derive(Debug)]
pub struct TransformTree<O, S: MatrixStorage = OwnedMatrices> {
    nodes: Vec<TransformNode<O, S::WorldSlot>>,
    pub(crate) stats: RecomputeStats,
    next_listener: u64,
    _storage: PhantomData<S>,
}

impl<O> TransformTree<O, OwnedMatrices> {
    /// Create an empty tree that computes its own world matrices
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_nodes(Vec::with_capacity(capacity))
    }

    /// Add a parentless node bound to `owner`
    pub fn insert(&mut self, owner: O) -> NodeId {
        self.insert_with_slot(owner, Mat4::IDENTITY)
    }
}

impl<O> Default for TransformTree<O, OwnedMatrices> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> TransformTree<O, ExternalMatrices> {
    /// Create an empty tree whose world matrices are written externally
    pub fn external() -> Self {
        Self::external_with_capacity(0)
    }

    pub fn external_with_capacity(capacity: usize) -> Self {
        Self::from_nodes(Vec::with_capacity(capacity))
    }

    /// Add a parentless node bound to `owner` and its external world buffer
    pub fn insert(&mut self, owner: O, world: SharedMatrix) -> NodeId {
        self.insert_with_slot(owner, world)
    }
}

impl<O, S: MatrixStorage> TransformTree<O, S> {
    fn from_nodes(nodes: Vec<TransformNode<O, S::WorldSlot>>) -> Self {
        Self {
            nodes,
            stats: RecomputeStats::default(),
            next_listener: 0,
            _storage: PhantomData,
        }
    }

    /// Add a parentless node with an explicit world-matrix slot
    ///
    /// The node starts with zero position, unit scale and identity rotation,
    /// with both matrices dirty.
    pub fn insert_with_slot(&mut self, owner: O, world: S::WorldSlot) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TransformNode::new(owner, world));
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// All node ids in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + use<O, S> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&TransformNode<O, S::WorldSlot>> {
        self.nodes
            .get(id.index())
            .ok_or(TransformError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut TransformNode<O, S::WorldSlot>> {
        self.nodes
            .get_mut(id.index())
            .ok_or(TransformError::UnknownNode(id))
    }

    pub fn owner(&self, id: NodeId) -> Result<&O> {
        Ok(&self.node(id)?.owner)
    }

    pub fn owner_mut(&mut self, id: NodeId) -> Result<&mut O> {
        Ok(&mut self.node_mut(id)?.owner)
    }

    pub fn stats(&self) -> RecomputeStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = RecomputeStats::default();
    }

    pub fn dirty_flags(&self, id: NodeId) -> Result<DirtyFlags> {
        Ok(self.node(id)?.dirty)
    }

    pub fn is_local_dirty(&self, id: NodeId) -> Result<bool> {
        Ok(self.dirty_flags(id)?.contains(DirtyFlags::LOCAL))
    }

    pub fn is_world_dirty(&self, id: NodeId) -> Result<bool> {
        Ok(self.dirty_flags(id)?.contains(DirtyFlags::WORLD))
    }

    // Local transform components

    pub fn position(&self, id: NodeId) -> Result<Vec3> {
        Ok(self.node(id)?.position)
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> Result<()> {
        let node = self.node_mut(id)?;
        node.position = position;
        node.dirty.insert(DirtyFlags::LOCAL);
        self.invalidate_world(id)
    }

    pub fn scale(&self, id: NodeId) -> Result<Vec3> {
        Ok(self.node(id)?.scale)
    }

    pub fn set_scale(&mut self, id: NodeId, scale: Vec3) -> Result<()> {
        let node = self.node_mut(id)?;
        node.scale = scale;
        node.dirty.insert(DirtyFlags::LOCAL);
        self.invalidate_world(id)
    }

    /// Local rotation as a quaternion, converted from Euler angles if needed
    pub fn rotation(&mut self, id: NodeId) -> Result<Quat> {
        Ok(self.node_mut(id)?.rotation.quaternion())
    }

    /// Make `rotation` the authoritative local rotation
    pub fn set_rotation(&mut self, id: NodeId, rotation: Quat) -> Result<()> {
        let node = self.node_mut(id)?;
        node.rotation.set_quaternion(rotation);
        node.dirty.insert(DirtyFlags::LOCAL);
        self.invalidate_world(id)
    }

    /// Local rotation as Euler angles in degrees, converted if needed
    ///
    /// The returned triple holds yaw in `x` and pitch in `y`, while
    /// [`set_rotation_euler`](Self::set_rotation_euler) reads yaw from `y`
    /// and pitch from `x`.
    pub fn rotation_euler(&mut self, id: NodeId) -> Result<Vec3> {
        Ok(self.node_mut(id)?.rotation.euler())
    }

    /// Make `euler` (degrees; pitch in `x`, yaw in `y`, roll in `z`) the
    /// authoritative local rotation
    pub fn set_rotation_euler(&mut self, id: NodeId, euler: Vec3) -> Result<()> {
        let node = self.node_mut(id)?;
        node.rotation.set_euler(euler);
        node.dirty.insert(DirtyFlags::LOCAL);
        self.invalidate_world(id)
    }

    /// Which rotation representation was set last
    pub fn rotation_authority(&self, id: NodeId) -> Result<Authority> {
        Ok(self.node(id)?.rotation.authority())
    }

    // Cached matrices

    /// Local matrix `translate * rotate * scale`, recomposed if stale
    pub fn local_matrix(&mut self, id: NodeId) -> Result<Mat4> {
        let node = self.node_mut(id)?;
        if !node.dirty.contains(DirtyFlags::LOCAL) {
            return Ok(node.local_matrix);
        }

        let rotation = node.rotation.quaternion();
        node.local_matrix = compose_affine(node.position, rotation, node.scale);
        node.dirty.remove(DirtyFlags::LOCAL);
        let local = node.local_matrix;

        self.stats.local_compositions += 1;
        trace!("composed local matrix of {id}");
        Ok(local)
    }

    /// World matrix, refreshed through the storage mode if stale
    pub fn world_matrix(&mut self, id: NodeId) -> Result<Mat4> {
        if self.is_world_dirty(id)? {
            S::refresh_world(self, id)?;
        }
        Ok(S::read_world(&self.node(id)?.world))
    }

    pub(crate) fn mark_world_clean(&mut self, id: NodeId) -> Result<()> {
        self.node_mut(id)?.dirty.remove(DirtyFlags::WORLD);
        self.stats.world_refreshes += 1;
        trace!("refreshed world matrix of {id}");
        Ok(())
    }

    /// World matrix as a column-major flat array, ready for upload
    pub fn world_matrix_array(&mut self, id: NodeId) -> Result<[f32; 16]> {
        Ok(self.world_matrix(id)?.to_cols_array())
    }

    // Hierarchy

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// Attach `id` to `parent`, or detach it with `None`
    ///
    /// The node is removed from its old parent's children and appended to the
    /// new parent's children. Attaching invalidates the node's subtree;
    /// detaching does not, since the cached world matrices stay valid until
    /// the node is attached somewhere else.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<()> {
        let current = self.node(id)?.parent;
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        if current == parent {
            return Ok(());
        }
        debug_assert!(
            parent.is_none_or(|p| !self.is_self_or_descendant(id, p)),
            "set_parent({id}, {parent:?}) would create a cycle"
        );

        if let Some(old) = current {
            self.node_mut(old)?.remove_child(id);
        }
        if let Some(new) = parent {
            self.node_mut(new)?.children.push(id);
            self.invalidate_world(id)?;
        }
        self.node_mut(id)?.parent = parent;

        debug!("reparented {id}: {current:?} -> {parent:?}");
        Ok(())
    }

    /// Walk up from `candidate`; true if `root` is reached
    fn is_self_or_descendant(&self, root: NodeId, candidate: NodeId) -> bool {
        let mut cursor = Some(candidate);
        while let Some(current) = cursor {
            if current == root {
                return true;
            }
            cursor = self.nodes.get(current.index()).and_then(|n| n.parent);
        }
        false
    }

    /// Mark the world matrix of `id` and its subtree stale
    ///
    /// Each node that goes from clean to dirty notifies its listeners once,
    /// in depth-first pre-order. An already dirty node is skipped together
    /// with its subtree.
    pub fn invalidate_world(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            self.stats.invalidation_visits += 1;
            let node = &mut self.nodes[current.index()];
            if node.dirty.contains(DirtyFlags::WORLD) {
                continue;
            }

            node.dirty.insert(DirtyFlags::WORLD);
            node.listeners.emit(&TransformChanged { node: current });
            pending.extend(node.children.iter().rev().copied());

            self.stats.notifications += 1;
            trace!("invalidated world matrix of {current}");
        }
        Ok(())
    }

    // Notification

    /// Register a listener for "transform changed" on `id`
    pub fn on_transform_changed<F>(&mut self, id: NodeId, listener: F) -> Result<ListenerId>
    where
        F: FnMut(&TransformChanged) + 'static,
    {
        self.add_listener(id, false, Box::new(listener))
    }

    /// Register a listener that is removed after its first notification
    pub fn once_transform_changed<F>(&mut self, id: NodeId, listener: F) -> Result<ListenerId>
    where
        F: FnMut(&TransformChanged) + 'static,
    {
        self.add_listener(id, true, Box::new(listener))
    }

    fn add_listener(&mut self, id: NodeId, once: bool, callback: Callback) -> Result<ListenerId> {
        let listener = ListenerId(self.next_listener);
        self.node_mut(id)?.listeners.add(listener, once, callback);
        self.next_listener += 1;
        Ok(listener)
    }

    /// Remove a listener registered on `id`
    ///
    /// Fails if `listener` was never registered on this node or is gone.
    pub fn off_transform_changed(&mut self, id: NodeId, listener: ListenerId) -> Result<()> {
        if self.node_mut(id)?.listeners.remove(listener) {
            Ok(())
        } else {
            Err(TransformError::UnknownListener { node: id, listener })
        }
    }
}
