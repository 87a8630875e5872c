//! Fuzzing Facilities for the Forest.

use alloc::vec::Vec;

use libfuzzer_sys::arbitrary::{self, Unstructured};

use crate::core::error::Error;
use crate::core::forest::DisjointForest;
use crate::core::storage::NodeRef;
use crate::HashMap;

/// An operation on the `i`-th created node of a forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `make_set` on a node.
    MakeSet(usize),
    /// `find` on a node.
    Find(usize),
    /// `union` of two nodes.
    Union(usize, usize),
}

/// Generate an arbitrary node count and operation sequence for fuzzing.
pub fn arbitrary_ops(u: &mut Unstructured) -> arbitrary::Result<(usize, Vec<Op>)> {
    let num_nodes = u.int_in_range(1..=1024)?;
    let num_ops = u.int_in_range(0..=4095)?;

    let mut ops = Vec::with_capacity(num_ops);

    for _ in 0..num_ops {
        let node = u.int_in_range(0..=(num_nodes - 1))?;
        let op = match u.int_in_range(0..=2)? {
            0 => Op::MakeSet(node),
            1 => Op::Find(node),
            _ => Op::Union(node, u.int_in_range(0..=(num_nodes - 1))?),
        };
        ops.push(op);
    }

    Ok((num_nodes, ops))
}

/// Run the operations on a fresh forest and check it against a naive
/// labelling of the nodes.
///
/// `make_set` is skipped for nodes that are already initialized, so the rank
/// invariants stay checkable.
///
/// # Panics
///
/// Panics if the forest disagrees with the labelling or breaks one of its
/// invariants.
pub fn check_forest(num_nodes: usize, ops: &[Op]) {
    let mut forest = DisjointForest::with_capacity(num_nodes);
    let nodes: Vec<NodeRef<usize>> = (0..num_nodes).map(|i| forest.create(i)).collect();

    // `None` for uninitialized nodes
    let mut labels: Vec<Option<usize>> = vec![None; num_nodes];

    for &op in ops {
        match op {
            Op::MakeSet(i) => {
                if labels[i].is_some() {
                    continue;
                }
                forest.make_set(nodes[i]).unwrap();
                labels[i] = Some(i);
                assert_eq!(forest.find(nodes[i]), Ok(nodes[i]));
            }
            Op::Find(i) => match labels[i] {
                None => assert_eq!(forest.find(nodes[i]), Err(Error::Uninitialized { index: i })),
                Some(_) => {
                    let root = forest.find(nodes[i]).unwrap();
                    assert_eq!(forest.is_root(root), Ok(true));
                    assert_eq!(forest.parent(nodes[i]), Ok(Some(root)));
                }
            },
            Op::Union(a, b) => match (labels[a], labels[b]) {
                (Some(label_a), Some(label_b)) => {
                    let root = forest.union(nodes[a], nodes[b]).unwrap();
                    assert_eq!(forest.find(nodes[a]), Ok(root));
                    assert_eq!(forest.find(nodes[b]), Ok(root));
                    for label in labels.iter_mut() {
                        if *label == Some(label_b) {
                            *label = Some(label_a);
                        }
                    }
                }
                (label_a, _) => {
                    let index = if label_a.is_none() { a } else { b };
                    assert_eq!(
                        forest.union(nodes[a], nodes[b]),
                        Err(Error::Uninitialized { index })
                    );
                }
            },
        }
    }

    forest.check_invariants();

    let mut label_to_root = HashMap::new();
    let mut root_to_label = HashMap::new();

    for (i, label) in labels.into_iter().enumerate() {
        let Some(label) = label else {
            continue;
        };
        let root = forest.find(nodes[i]).unwrap();
        assert_eq!(*label_to_root.entry(label).or_insert(root), root);
        assert_eq!(*root_to_label.entry(root).or_insert(label), label);
    }
}
