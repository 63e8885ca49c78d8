//! Hierarchical animation transforms with lazily cached matrices
//!
//! A [`TransformTree`] holds animation nodes with a local position, rotation
//! and scale. Local and world matrices are recomputed only when read after a
//! change, and a change invalidates the whole subtree in one synchronous pass.
//!
//! # Example
//!
//! ```rust
//! use anim_transform::{TransformTree, TransformChanged};
//! use glam::{Mat4, Vec3};
//!
//! let mut tree = TransformTree::new();
//! let root = tree.insert("root");
//! let arm = tree.insert("arm");
//! tree.set_parent(arm, Some(root))?;
//!
//! tree.on_transform_changed(arm, |event: &TransformChanged| {
//!     println!("{} moved", event.node);
//! })?;
//!
//! tree.set_position(arm, Vec3::new(1.0, 0.0, 0.0))?;
//! assert_eq!(tree.world_matrix(root)?, Mat4::IDENTITY);
//! assert_eq!(
//!     tree.world_matrix(arm)?,
//!     Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0))
//! );
//! # Ok::<(), anim_transform::TransformError>(())
//! ```

pub mod error;
pub mod events;
pub mod math;
pub mod node;
pub mod rotation;
pub mod storage;
pub mod tree;

// Re-export common types
pub use error::{Result, TransformError};
pub use events::{ListenerId, TransformChanged};
pub use node::{DirtyFlags, NodeId};
pub use rotation::{Authority, RotationCache};
pub use storage::{ExternalMatrices, MatrixStorage, OwnedMatrices, SharedMatrix};
pub use tree::{RecomputeStats, TransformTree};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
