//! Property tests for the cached matrix invariants

use anim_transform::TransformTree;
use glam::{Mat4, Vec3};
use proptest::prelude::*;

fn vec3(range: std::ops::Range<f32>) -> impl Strategy<Value = Vec3> {
    (range.clone(), range.clone(), range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn root_world_is_identity(
        position in vec3(-100.0..100.0),
        euler in vec3(-180.0..180.0),
        scale in vec3(0.1..10.0),
    ) {
        let mut tree = TransformTree::new();
        let root = tree.insert(());
        tree.set_position(root, position).unwrap();
        tree.set_rotation_euler(root, euler).unwrap();
        tree.set_scale(root, scale).unwrap();

        prop_assert_eq!(tree.world_matrix(root).unwrap(), Mat4::IDENTITY);
    }

    #[test]
    fn child_world_is_parent_world_times_local(
        positions in prop::collection::vec(vec3(-50.0..50.0), 2..6),
        eulers in prop::collection::vec(vec3(-180.0..180.0), 6),
    ) {
        let mut tree = TransformTree::new();
        let ids: Vec<_> = positions.iter().map(|_| tree.insert(())).collect();
        for (i, &id) in ids.iter().enumerate() {
            tree.set_position(id, positions[i]).unwrap();
            tree.set_rotation_euler(id, eulers[i]).unwrap();
            if i > 0 {
                tree.set_parent(id, Some(ids[i - 1])).unwrap();
            }
        }

        for pair in ids.windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            let expected = tree.world_matrix(parent).unwrap() * tree.local_matrix(child).unwrap();
            prop_assert_eq!(tree.world_matrix(child).unwrap(), expected);
        }
    }

    #[test]
    fn settled_tree_has_no_dirty_world(
        parents in prop::collection::vec(any::<prop::sample::Index>(), 1..12),
    ) {
        let mut tree = TransformTree::new();
        let root = tree.insert(0usize);
        let mut ids = vec![root];
        for (i, parent) in parents.iter().enumerate() {
            let id = tree.insert(i + 1);
            // Only attach to existing nodes so no cycle can form
            tree.set_parent(id, Some(ids[parent.index(ids.len())])).unwrap();
            ids.push(id);
        }

        for &id in &ids {
            tree.world_matrix(id).unwrap();
        }
        for &id in &ids {
            prop_assert!(!tree.is_world_dirty(id).unwrap());
        }

        tree.set_position(root, Vec3::X).unwrap();
        for &id in &ids {
            prop_assert!(tree.is_world_dirty(id).unwrap());
        }
        prop_assert_eq!(tree.stats().notifications as usize, ids.len());
    }
}
