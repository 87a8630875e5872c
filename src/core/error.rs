//! Errors reported by the forest operations.

/// An error from a forest operation.
///
/// Both variants are contract violations by the caller. They are reported
/// instead of being papered over, e.g. an unset parent is never taken to mean
/// "self".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `find` or `union` reached a node that never went through `make_set`.
    #[error("node *{index} is uninitialized, call `make_set` on it first")]
    Uninitialized {
        /// The raw index of the node.
        index: usize,
    },
    /// The handle's index is outside this forest.
    ///
    /// Handles carry no forest identity, so a handle from another forest
    /// whose index is in range addresses a node of this one instead.
    #[error("node *{index} is outside this forest")]
    UnknownNode {
        /// The raw index carried by the handle.
        index: usize,
    },
}

/// Result type of the forest operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;
