//! Storage Infrastructure
//!
//! Nodes of a [`DisjointForest`](crate::core::forest::DisjointForest) are
//! stored in a [`NodeArena`] and addressed by [`NodeRef`] handles. A root's
//! self-link is then just a handle equal to its own position, and parent
//! links never borrow from the arena.
//!
//! The arena is append-only: the forest never removes nodes, so handles stay
//! valid for the lifetime of the arena that produced them.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::core::forest::Node;
use crate::core::utils::{Idx, Reserved};

/// A trait for indexing into an arena.
pub trait ArenaPtr: Copy + Eq + Hash {
    /// The arena type, which should support the pointer type.
    type Arena: Arena<Self>;

    /// The internal data.
    type Data;

    /// Try to dereference the pointer with an arena.
    ///
    /// # Returns
    ///
    /// - `Some(&Self::Data)`: A reference to the data in the arena.
    /// - `None`: The index of the pointer is outside the arena.
    fn try_deref(self, arena: &Self::Arena) -> Option<&Self::Data> { arena.try_deref(self) }

    /// Try to mutably dereference the pointer with an arena.
    fn try_deref_mut(self, arena: &mut Self::Arena) -> Option<&mut Self::Data> {
        arena.try_deref_mut(self)
    }
}

/// A trait for an arena that can store data and allocate pointers.
///
/// # Type Parameters
///
/// - `Ptr`: The pointer type that is supported by the arena. The data type is
///   inferred from the pointer type by using [`ArenaPtr::Data`].
pub trait Arena<Ptr>
where
    Ptr: ArenaPtr<Arena = Self>,
{
    /// Construct data with the allocated pointer and store it into the arena.
    ///
    /// This allows the stored data to know its own pointer.
    fn alloc_with<F>(&mut self, f: F) -> Ptr
    where
        F: FnOnce(Ptr) -> Ptr::Data;

    /// Store data into the arena and return the allocated pointer.
    fn alloc(&mut self, data: Ptr::Data) -> Ptr { self.alloc_with(|_| data) }

    /// Try to dereference a pointer.
    fn try_deref(&self, ptr: Ptr) -> Option<&Ptr::Data>;

    /// Try to mutably dereference a pointer.
    fn try_deref_mut(&mut self, ptr: Ptr) -> Option<&mut Ptr::Data>;
}

/// A handle to a node in a disjoint-set forest.
///
/// Handles are only produced by [`NodeArena`] (through
/// [`DisjointForest::create`](crate::core::forest::DisjointForest::create)).
/// Two handles are equal iff they address the same node, so comparing the
/// results of `find` answers "same set?".
///
/// A handle is a bare index. It does not remember which forest created it,
/// and only indices past the end of a forest are rejected.
///
/// The order is based on the raw index, i.e. the creation order of the nodes.
pub struct NodeRef<T> {
    /// The raw index of the node.
    index: usize,
    _phantom: PhantomData<T>,
}

impl<T> NodeRef<T> {
    fn from_index(index: usize) -> Self {
        Self {
            index,
            _phantom: PhantomData,
        }
    }
}

impl<T> Idx for NodeRef<T> {
    fn index(self) -> usize { self.index }
}

impl<T> Reserved for NodeRef<T> {
    fn reserved() -> Self { Self::from_index(usize::MAX) }

    fn is_reserved(&self) -> bool { self.index == usize::MAX }
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for NodeRef<T> {}

impl<T> Hash for NodeRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) { self.index.hash(state) }
}

impl<T> PartialEq for NodeRef<T> {
    fn eq(&self, other: &Self) -> bool { self.index == other.index }
}

impl<T> Eq for NodeRef<T> {}

impl<T> PartialOrd for NodeRef<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl<T> Ord for NodeRef<T> {
    fn cmp(&self, other: &Self) -> Ordering { self.index.cmp(&other.index) }
}

impl<T> fmt::Debug for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "*{}", self.index) }
}

impl<T> fmt::Display for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "*{}", self.index) }
}

/// An append-only arena of forest nodes.
///
/// # Examples
///
/// ```
/// use dsforest::core::forest::Node;
/// use dsforest::core::storage::{Arena, ArenaPtr, NodeArena};
///
/// let mut arena = NodeArena::default();
///
/// let one = arena.alloc(Node::new(1));
/// let two = arena.alloc(Node::new(2));
///
/// assert_ne!(one, two);
/// assert_eq!(one.try_deref(&arena).map(Node::element), Some(&1));
/// assert_eq!(two.try_deref(&arena).map(Node::element), Some(&2));
/// ```
pub struct NodeArena<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self { Self { nodes: Vec::new() } }
}

impl<T> NodeArena<T> {
    /// Create a new arena with a specific capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// The number of allocated nodes.
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Returns `true` if no node was allocated.
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Iterate over the handles and nodes, in creation order.
    #[cfg(any(test, feature = "fuzzing"))]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeRef<T>, &Node<T>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeRef::from_index(index), node))
    }
}

impl<T> ArenaPtr for NodeRef<T> {
    type Arena = NodeArena<T>;
    type Data = Node<T>;
}

impl<T> Arena<NodeRef<T>> for NodeArena<T> {
    fn alloc_with<F>(&mut self, f: F) -> NodeRef<T>
    where
        F: FnOnce(NodeRef<T>) -> Node<T>,
    {
        let ptr = NodeRef::from_index(self.nodes.len());
        self.nodes.push(f(ptr));
        ptr
    }

    fn try_deref(&self, ptr: NodeRef<T>) -> Option<&Node<T>> { self.nodes.get(ptr.index) }

    fn try_deref_mut(&mut self, ptr: NodeRef<T>) -> Option<&mut Node<T>> {
        self.nodes.get_mut(ptr.index)
    }
}
