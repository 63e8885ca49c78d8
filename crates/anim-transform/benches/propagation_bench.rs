use anim_transform::{NodeId, TransformTree};
use criterion::{Criterion, criterion_group, criterion_main};
use glam::Vec3;
use std::hint::black_box;

/// One root with `width` children, each carrying a chain of `depth` nodes
fn create_wide_tree(width: usize, depth: usize) -> (TransformTree<()>, NodeId, Vec<NodeId>) {
    let mut tree = TransformTree::with_capacity(1 + width * depth);
    let root = tree.insert(());
    let mut leaves = Vec::with_capacity(width);

    for _ in 0..width {
        let mut parent = root;
        for _ in 0..depth {
            let node = tree.insert(());
            tree.set_parent(node, Some(parent)).unwrap();
            tree.set_position(node, Vec3::new(0.0, 1.0, 0.0)).unwrap();
            parent = node;
        }
        leaves.push(parent);
    }

    (tree, root, leaves)
}

fn bench_invalidate_wide_tree(c: &mut Criterion) {
    let (mut tree, root, leaves) = create_wide_tree(64, 8);

    c.bench_function("invalidate_and_resolve_wide_tree", |b| {
        b.iter(|| {
            tree.set_rotation_euler(root, Vec3::new(0.0, 15.0, 0.0)).unwrap();
            for &leaf in &leaves {
                black_box(tree.world_matrix(leaf).unwrap());
            }
        })
    });
}

fn bench_repeated_invalidation(c: &mut Criterion) {
    let (mut tree, root, leaves) = create_wide_tree(64, 8);
    for &leaf in &leaves {
        tree.world_matrix(leaf).unwrap();
    }

    // The root stays dirty after the first call, so later calls stop at it
    c.bench_function("invalidate_already_dirty", |b| {
        b.iter(|| {
            for _ in 0..16 {
                tree.set_position(black_box(root), Vec3::X).unwrap();
            }
        })
    });
}

fn bench_deep_chain(c: &mut Criterion) {
    let (mut tree, root, leaves) = create_wide_tree(1, 256);
    let leaf = leaves[0];
    let first = tree.children(root).unwrap()[0];

    c.bench_function("resolve_deep_chain", |b| {
        b.iter(|| {
            tree.set_position(first, Vec3::new(0.0, 0.0, 1.0)).unwrap();
            black_box(tree.world_matrix(leaf).unwrap());
        })
    });
}

criterion_group!(
    benches,
    bench_invalidate_wide_tree,
    bench_repeated_invalidation,
    bench_deep_chain
);
criterion_main!(benches);
