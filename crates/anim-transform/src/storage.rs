//! World-matrix storage modes
//!
//! The storage mode is a type parameter of [`TransformTree`], fixed when the
//! tree is built:
//!
//! - [`OwnedMatrices`]: each node owns its world matrix and recomputes it
//!   from the parent chain. Root nodes are pinned to identity.
//! - [`ExternalMatrices`]: an external owner writes the world matrix into a
//!   [`SharedMatrix`] buffer. The tree only tracks dirtiness and emits
//!   notifications; it never performs world-matrix arithmetic.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Mat4;

use crate::error::Result;
use crate::math::multiply_matrix;
use crate::node::NodeId;
use crate::tree::TransformTree;

mod sealed {
    pub trait Sealed {}
}

/// World matrix buffer shared with an external owner
pub type SharedMatrix = Rc<RefCell<Mat4>>;

/// Strategy that commits a node's world matrix
pub trait MatrixStorage: sealed::Sealed + Sized {
    /// Per-node world matrix slot
    type WorldSlot;

    /// Bring the world slot of `id` up to date and clear its `WORLD` flag
    ///
    /// Only called while the node's world matrix is dirty.
    fn refresh_world<O>(tree: &mut TransformTree<O, Self>, id: NodeId) -> Result<()>;

    /// Current contents of a slot
    fn read_world(slot: &Self::WorldSlot) -> Mat4;
}

/// Self-owned world matrices, computed from the parent chain
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnedMatrices;

impl sealed::Sealed for OwnedMatrices {}

impl MatrixStorage for OwnedMatrices {
    type WorldSlot = Mat4;

    fn refresh_world<O>(tree: &mut TransformTree<O, Self>, id: NodeId) -> Result<()> {
        // Stale part of the parent chain, nearest first
        let mut stale = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if !tree.is_world_dirty(current)? {
                break;
            }
            stale.push(current);
            cursor = tree.parent(current)?;
        }

        for &current in stale.iter().rev() {
            let world = match tree.parent(current)? {
                Some(parent) => {
                    let parent_world = tree.node(parent)?.world;
                    let local = tree.local_matrix(current)?;
                    tree.stats.matrix_multiplications += 1;
                    multiply_matrix(&parent_world, &local)
                }
                // Roots never inherit their own local transform
                None => Mat4::IDENTITY,
            };
            tree.node_mut(current)?.world = world;
            tree.mark_world_clean(current)?;
        }
        Ok(())
    }

    fn read_world(slot: &Mat4) -> Mat4 {
        *slot
    }
}

/// World matrices written by an external owner
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalMatrices;

impl sealed::Sealed for ExternalMatrices {}

impl MatrixStorage for ExternalMatrices {
    type WorldSlot = SharedMatrix;

    fn refresh_world<O>(tree: &mut TransformTree<O, Self>, id: NodeId) -> Result<()> {
        tree.mark_world_clean(id)
    }

    fn read_world(slot: &SharedMatrix) -> Mat4 {
        *slot.borrow()
    }
}
