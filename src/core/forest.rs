//! # Disjoint-Set Forest
//!
//! Each set is a tree of [`Node`]s whose root is the representative of the
//! set. [`find`](DisjointForest::find) compresses every path it walks, and
//! [`union`](DisjointForest::union) links the tree of lower rank under the
//! tree of higher rank, so both operations run in near-constant amortized
//! time.
//!
//! Nodes are created uninitialized and only join the forest as singleton
//! sets through [`make_set`](DisjointForest::make_set):
//!
//! ```
//! use dsforest::core::error::Error;
//! use dsforest::core::forest::DisjointForest;
//!
//! let mut forest = DisjointForest::new();
//! let node = forest.create(10);
//!
//! assert!(matches!(forest.find(node), Err(Error::Uninitialized { .. })));
//!
//! forest.make_set(node).unwrap();
//! assert_eq!(forest.find(node), Ok(node));
//! ```

use core::cmp::Ordering;
use core::fmt;

use log::{debug, trace};

use crate::core::error::{Error, Result};
use crate::core::storage::{Arena, NodeArena, NodeRef};
use crate::core::utils::{Idx, PackedOption};

/// The membership record of one element.
pub struct Node<T> {
    /// The element, fixed at construction.
    element: T,
    /// The parent of the node, unset until `make_set`.
    ///
    /// A node is a root iff its parent is the node itself.
    parent: PackedOption<NodeRef<T>>,
    /// The rank of the node.
    ///
    /// Only meaningful while the node is a root. With union-by-rank a root of
    /// rank r has at least 2^r nodes, so [`u8`] is far more than enough.
    rank: u8,
}

impl<T> Node<T> {
    /// Creates an uninitialized node holding `element`.
    pub fn new(element: T) -> Self {
        Self {
            element,
            parent: None.into(),
            rank: 0,
        }
    }

    /// Returns the element of the node.
    pub fn element(&self) -> &T { &self.element }

    /// Returns the parent of the node, [`None`] if it is uninitialized.
    ///
    /// This is the raw link. It is not necessarily the representative until
    /// [`find`](DisjointForest::find) has compressed the path.
    pub fn parent(&self) -> Option<NodeRef<T>> { self.parent.unpack() }

    /// Returns the rank of the node.
    pub fn rank(&self) -> u8 { self.rank }

    /// Returns `true` if `make_set` has been called on the node.
    pub fn is_initialized(&self) -> bool { self.parent.is_some() }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Node")
            .field("element", &self.element)
            .field("parent", &self.parent)
            .field("rank", &self.rank)
            .finish()
    }
}

/// A disjoint-set forest.
///
/// The forest owns its nodes. Callers hold [`NodeRef`] handles returned by
/// [`create`](Self::create) and pass them to the operations.
///
/// [`find`](Self::find) takes `&mut self` because path compression rewrites
/// parent links. Sharing a forest between threads therefore needs a single
/// lock around the whole forest.
///
/// # Type Parameters
///
/// - `T`: The elements. They are only stored and handed back, never compared
///   or hashed.
pub struct DisjointForest<T> {
    nodes: NodeArena<T>,
}

impl<T> Default for DisjointForest<T> {
    fn default() -> Self {
        Self {
            nodes: NodeArena::default(),
        }
    }
}

impl<T> DisjointForest<T> {
    /// Creates an empty forest.
    pub fn new() -> Self { Self::default() }

    /// Creates an empty forest with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: NodeArena::with_capacity(capacity),
        }
    }

    /// The number of nodes created in this forest.
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Returns `true` if no node was created.
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Creates an uninitialized node holding `element`.
    ///
    /// The node is not a set yet: call [`make_set`](Self::make_set) before
    /// passing it to [`find`](Self::find) or [`union`](Self::union).
    pub fn create(&mut self, element: T) -> NodeRef<T> { self.nodes.alloc(Node::new(element)) }

    /// Returns the node for low-level inspection.
    ///
    /// [`None`] if the handle's index is outside this forest.
    pub fn node(&self, node: NodeRef<T>) -> Option<&Node<T>> { self.nodes.try_deref(node) }

    /// Returns the element of the node.
    pub fn element(&self, node: NodeRef<T>) -> Result<&T> { Ok(self.get(node)?.element()) }

    /// Returns the raw parent link of the node, [`None`] if uninitialized.
    pub fn parent(&self, node: NodeRef<T>) -> Result<Option<NodeRef<T>>> {
        Ok(self.get(node)?.parent())
    }

    /// Returns the rank of the node.
    pub fn rank(&self, node: NodeRef<T>) -> Result<u8> { Ok(self.get(node)?.rank()) }

    /// Returns `true` if the node is currently the root of its tree.
    pub fn is_root(&self, node: NodeRef<T>) -> Result<bool> {
        Ok(self.get(node)?.parent() == Some(node))
    }

    /// Makes the node a singleton set.
    ///
    /// Calling this on an initialized node resets it to a fresh singleton.
    /// Nodes below it stay attached to it, but it leaves its former set.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownNode`] if the handle's index is outside this forest.
    pub fn make_set(&mut self, node: NodeRef<T>) -> Result<()> {
        let entry = self.get_mut(node)?;

        if let Some(parent) = entry.parent.unpack() {
            if parent != node || entry.rank != 0 {
                debug!("make_set resets {node} (parent {parent}, rank {})", entry.rank);
            }
        }

        entry.parent = Some(node).into();
        entry.rank = 0;
        Ok(())
    }

    /// Finds the representative of the node's set and compresses the path.
    ///
    /// The walk is done in two passes: the first locates the root, the second
    /// points every visited node directly at it. The length of the walk is
    /// not limited by the call stack.
    ///
    /// # Errors
    ///
    /// - [`Error::Uninitialized`] if the node, or any node on its path, never
    ///   went through [`make_set`](Self::make_set).
    /// - [`Error::UnknownNode`] if the handle's index is outside this forest.
    pub fn find(&mut self, node: NodeRef<T>) -> Result<NodeRef<T>> {
        let mut root = node;
        loop {
            let parent = self.link(root)?;
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut current = node;
        let mut compressed = 0usize;
        while current != root {
            let entry = self.nodes.try_deref_mut(current).unwrap_or_else(|| unreachable!());
            let next = entry.parent.unpack().unwrap_or_else(|| unreachable!());
            if next != root {
                entry.parent = PackedOption::some(root);
                compressed += 1;
            }
            current = next;
        }

        if compressed > 0 {
            trace!("find({node}) compressed {compressed} links onto {root}");
        }

        Ok(root)
    }

    /// Unions the sets that the two nodes belong to.
    ///
    /// The root of lower rank is linked under the root of higher rank. On a
    /// tie, the root of `a` goes under the root of `b` and the rank of the
    /// latter grows by one. Nothing changes if both are in the same set.
    ///
    /// `a` and `b` are not required to be roots or distinct.
    ///
    /// # Returns
    ///
    /// The root of the merged set.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`find`](Self::find) on either node.
    pub fn union(&mut self, a: NodeRef<T>, b: NodeRef<T>) -> Result<NodeRef<T>> {
        let a = self.find(a)?;
        let b = self.find(b)?;

        if a == b {
            return Ok(a);
        }

        let a_rank = self.root_mut(a).rank;
        let b_rank = self.root_mut(b).rank;

        let (parent, child) = match a_rank.cmp(&b_rank) {
            Ordering::Greater => (a, b),
            Ordering::Less => (b, a),
            Ordering::Equal => {
                let root = self.root_mut(b);
                // only saturates if `make_set` reset members of large sets
                root.rank = root.rank.saturating_add(1);
                (b, a)
            }
        };

        self.root_mut(child).parent = PackedOption::some(parent);
        trace!("union linked {child} (rank {}) under {parent}", a_rank.min(b_rank));

        Ok(parent)
    }

    fn get(&self, node: NodeRef<T>) -> Result<&Node<T>> {
        self.nodes
            .try_deref(node)
            .ok_or(Error::UnknownNode { index: node.index() })
    }

    fn get_mut(&mut self, node: NodeRef<T>) -> Result<&mut Node<T>> {
        self.nodes
            .try_deref_mut(node)
            .ok_or(Error::UnknownNode { index: node.index() })
    }

    /// Returns the parent link of an initialized node.
    fn link(&self, node: NodeRef<T>) -> Result<NodeRef<T>> {
        self.get(node)?
            .parent
            .unpack()
            .ok_or(Error::Uninitialized { index: node.index() })
    }

    /// Only for roots returned by `find`, which are always valid.
    fn root_mut(&mut self, root: NodeRef<T>) -> &mut Node<T> {
        self.nodes.try_deref_mut(root).unwrap_or_else(|| unreachable!())
    }
}

#[cfg(any(test, feature = "fuzzing"))]
impl<T> DisjointForest<T> {
    /// Returns the root of the node and its depth, without compressing.
    ///
    /// [`None`] for uninitialized nodes.
    ///
    /// # Panics
    ///
    /// Panics if the parent links form a cycle.
    pub fn root_and_depth(&self, node: NodeRef<T>) -> Option<(NodeRef<T>, usize)> {
        let mut current = node;
        let mut depth = 0;
        loop {
            let parent = self.nodes.try_deref(current)?.parent()?;
            if parent == current {
                return Some((current, depth));
            }
            depth += 1;
            assert!(depth < self.len(), "parent links of {node} form a cycle");
            current = parent;
        }
    }

    /// Checks the structural invariants of the forest.
    ///
    /// - Parent links of initialized nodes lead to a root without cycles.
    /// - The height of every tree is at most the rank of its root.
    /// - A root of rank r has at least 2^r nodes in its tree.
    ///
    /// The rank bounds assume `make_set` was never used to reset a node that
    /// had already been merged.
    ///
    /// # Panics
    ///
    /// Panics on the first violated invariant.
    pub fn check_invariants(&self) {
        use alloc::vec::Vec;

        // (size, height) per root index
        let mut trees: Vec<(usize, usize)> = vec![(0, 0); self.len()];

        for (node, entry) in self.nodes.iter() {
            if let Some(parent) = entry.parent() {
                assert!(
                    self.nodes.try_deref(parent).is_some(),
                    "parent {parent} of {node} is outside the forest"
                );
                let (root, depth) = self.root_and_depth(node).unwrap_or_else(|| {
                    panic!("{node} hangs below an uninitialized node")
                });
                let tree = &mut trees[root.index()];
                tree.0 += 1;
                tree.1 = tree.1.max(depth);
            }
        }

        for (root, entry) in self.nodes.iter() {
            let (size, height) = trees[root.index()];
            if size == 0 {
                continue;
            }
            let rank = entry.rank();
            assert!(
                height <= usize::from(rank),
                "tree of {root} has height {height} above rank {rank}"
            );
            assert!(
                u32::from(rank) < usize::BITS && size >= 1 << rank,
                "tree of {root} has {size} nodes, too few for rank {rank}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn singletons(forest: &mut DisjointForest<u32>, count: u32) -> Vec<NodeRef<u32>> {
        (0..count)
            .map(|element| {
                let node = forest.create(element);
                forest.make_set(node).unwrap();
                node
            })
            .collect()
    }

    #[test]
    fn test_make_set_is_self_representative() {
        let mut forest = DisjointForest::new();
        let node = forest.create(10);

        assert_eq!(forest.parent(node), Ok(None));
        assert!(!forest.node(node).unwrap().is_initialized());

        forest.make_set(node).unwrap();

        assert_eq!(forest.parent(node), Ok(Some(node)));
        assert_eq!(forest.rank(node), Ok(0));
        assert_eq!(forest.element(node), Ok(&10));
        assert_eq!(forest.is_root(node), Ok(true));
        assert_eq!(forest.find(node), Ok(node));
    }

    #[test]
    fn test_make_set_twice_on_singleton() {
        let mut forest = DisjointForest::new();
        let node = forest.create(5);

        forest.make_set(node).unwrap();
        forest.make_set(node).unwrap();

        assert_eq!(forest.parent(node), Ok(Some(node)));
        assert_eq!(forest.rank(node), Ok(0));
        assert_eq!(forest.find(node), Ok(node));
        forest.check_invariants();
    }

    #[test]
    fn test_find_uninitialized() {
        let mut forest = DisjointForest::new();
        let fresh = forest.create('x');

        assert_eq!(
            forest.find(fresh),
            Err(Error::Uninitialized {
                index: fresh.index()
            })
        );
        assert_eq!(forest.is_root(fresh), Ok(false));
    }

    #[test]
    fn test_union_uninitialized() {
        let mut forest = DisjointForest::new();
        let ready = forest.create('a');
        let fresh = forest.create('b');
        forest.make_set(ready).unwrap();

        assert_eq!(
            forest.union(ready, fresh),
            Err(Error::Uninitialized {
                index: fresh.index()
            })
        );
        assert_eq!(
            forest.union(fresh, ready),
            Err(Error::Uninitialized {
                index: fresh.index()
            })
        );
        // nothing was linked
        assert_eq!(forest.find(ready), Ok(ready));
        assert_eq!(forest.rank(ready), Ok(0));
    }

    #[test]
    fn test_unknown_node() {
        let mut big = DisjointForest::new();
        big.create(1);
        let foreign = big.create(2);

        let mut small = DisjointForest::new();
        let local = small.create(3);
        small.make_set(local).unwrap();

        let unknown = Error::UnknownNode {
            index: foreign.index(),
        };
        assert_eq!(small.make_set(foreign), Err(unknown));
        assert_eq!(small.find(foreign), Err(unknown));
        assert_eq!(small.union(local, foreign), Err(unknown));
        assert_eq!(small.rank(foreign), Err(unknown));
        assert!(small.node(foreign).is_none());
    }

    #[test]
    fn test_foreign_handle_in_range_is_local() {
        let mut other = DisjointForest::new();
        let foreign = other.create(1);

        let mut forest = DisjointForest::new();
        let local = forest.create(2);
        forest.make_set(local).unwrap();

        // handles are bare indices, so this one lands on `local`
        assert_eq!(foreign, local);
        assert_eq!(forest.find(foreign), Ok(local));
        assert_eq!(forest.element(foreign), Ok(&2));
    }

    #[test]
    fn test_union_of_singletons_bumps_rank() {
        let mut forest = DisjointForest::new();
        let nodes = singletons(&mut forest, 2);

        let root = forest.union(nodes[0], nodes[1]).unwrap();

        assert_eq!(forest.rank(root), Ok(1));
        assert_eq!(forest.find(nodes[0]), Ok(root));
        assert_eq!(forest.find(nodes[1]), Ok(root));
        forest.check_invariants();
    }

    #[test]
    fn test_union_tie_links_first_under_second() {
        let mut forest = DisjointForest::new();
        let nodes = singletons(&mut forest, 2);

        assert_eq!(forest.union(nodes[0], nodes[1]), Ok(nodes[1]));
        assert_eq!(forest.parent(nodes[0]), Ok(Some(nodes[1])));
        assert_eq!(forest.rank(nodes[1]), Ok(1));
        // the loser keeps its stale rank
        assert_eq!(forest.rank(nodes[0]), Ok(0));
    }

    #[test]
    fn test_union_lower_rank_goes_under() {
        let mut forest = DisjointForest::new();
        let nodes = singletons(&mut forest, 3);

        let pair = forest.union(nodes[0], nodes[1]).unwrap();
        // rank 0 against rank 1, in both argument orders
        assert_eq!(forest.union(nodes[2], pair), Ok(pair));
        assert_eq!(forest.rank(pair), Ok(1));

        let mut forest = DisjointForest::new();
        let nodes = singletons(&mut forest, 3);
        let pair = forest.union(nodes[0], nodes[1]).unwrap();
        assert_eq!(forest.union(pair, nodes[2]), Ok(pair));
        assert_eq!(forest.rank(pair), Ok(1));
        forest.check_invariants();
    }

    #[test]
    fn test_union_same_set_is_noop() {
        let mut forest = DisjointForest::new();
        let nodes = singletons(&mut forest, 2);

        let root = forest.union(nodes[0], nodes[1]).unwrap();
        assert_eq!(forest.union(nodes[1], nodes[0]), Ok(root));
        assert_eq!(forest.union(nodes[0], nodes[0]), Ok(root));
        assert_eq!(forest.rank(root), Ok(1));
    }

    #[test]
    fn test_find_compresses_path() {
        let mut forest = DisjointForest::new();
        let nodes = singletons(&mut forest, 8);

        // link roots only, so no find compresses before the check
        for step in [1, 2, 4] {
            for start in (0..8).step_by(step * 2) {
                forest
                    .union(nodes[start + step - 1], nodes[start + 2 * step - 1])
                    .unwrap();
            }
        }
        forest.check_invariants();

        let root = forest.find(nodes[7]).unwrap();
        assert_eq!(root, nodes[7]);
        assert_eq!(forest.rank(root), Ok(3));
        assert_eq!(forest.root_and_depth(nodes[0]), Some((root, 3)));

        assert_eq!(forest.find(nodes[0]), Ok(root));
        assert_eq!(forest.parent(nodes[0]), Ok(Some(root)));
        assert_eq!(forest.root_and_depth(nodes[0]), Some((root, 1)));

        // the second call has nothing left to compress
        assert_eq!(forest.find(nodes[0]), Ok(root));
        assert_eq!(forest.parent(nodes[0]), Ok(Some(root)));
    }

    #[test]
    fn test_find_long_chain() {
        const LEN: u32 = 1_000_000;

        let mut forest = DisjointForest::with_capacity(LEN as usize);
        let nodes = singletons(&mut forest, LEN);

        // a chain that union-by-rank would never build, deep enough to
        // overflow the stack of a recursive walk
        for pair in nodes.windows(2) {
            forest.root_mut(pair[0]).parent = PackedOption::some(pair[1]);
        }

        let root = nodes[LEN as usize - 1];
        assert_eq!(forest.find(nodes[0]), Ok(root));
        assert!(nodes
            .iter()
            .all(|&node| forest.parent(node) == Ok(Some(root))));
    }

    #[test]
    fn test_unrelated_union_keeps_groups() {
        let mut forest = DisjointForest::new();
        let nodes = singletons(&mut forest, 6);

        forest.union(nodes[0], nodes[1]).unwrap();
        forest.union(nodes[2], nodes[3]).unwrap();
        let left = forest.find(nodes[0]).unwrap();

        forest.union(nodes[3], nodes[4]).unwrap();

        assert_eq!(forest.find(nodes[0]), Ok(left));
        assert_eq!(forest.find(nodes[1]), Ok(left));
        assert_ne!(forest.find(nodes[2]), Ok(left));
        assert_eq!(forest.find(nodes[2]), forest.find(nodes[4]));
        assert_eq!(forest.find(nodes[5]), Ok(nodes[5]));
    }

    #[test]
    fn test_make_set_resets_member() {
        let mut forest = DisjointForest::new();
        let nodes = singletons(&mut forest, 3);

        forest.union(nodes[0], nodes[1]).unwrap();
        let root = forest.union(nodes[1], nodes[2]).unwrap();
        let member = nodes.iter().copied().find(|&node| node != root).unwrap();

        forest.make_set(member).unwrap();

        assert_eq!(forest.find(member), Ok(member));
        assert_ne!(forest.find(root), Ok(member));
        forest.check_invariants();
    }

    #[test]
    fn test_node_debug() {
        let mut forest = DisjointForest::new();
        let a = forest.create(3);
        let b = forest.create(4);

        assert_eq!(
            format!("{:?}", forest.node(a).unwrap()),
            "Node { element: 3, parent: None, rank: 0 }"
        );

        forest.make_set(a).unwrap();
        forest.make_set(b).unwrap();
        forest.union(a, b).unwrap();

        assert_eq!(
            format!("{:?}", forest.node(a).unwrap()),
            "Node { element: 3, parent: Some(*1), rank: 0 }"
        );
        assert_eq!(
            format!("{:?}", forest.node(b).unwrap()),
            "Node { element: 4, parent: Some(*1), rank: 1 }"
        );
    }
}
