//! # Disjoint-Set Forest
//!
//! A union-find forest with path compression and union-by-rank. Nodes live in
//! an arena owned by the forest and are addressed by typed handles.
//!
//! ```
//! use dsforest::core::forest::DisjointForest;
//!
//! let mut forest = DisjointForest::new();
//!
//! let a = forest.create("a");
//! let b = forest.create("b");
//!
//! forest.make_set(a).unwrap();
//! forest.make_set(b).unwrap();
//! assert_ne!(forest.find(a).unwrap(), forest.find(b).unwrap());
//!
//! forest.union(a, b).unwrap();
//! assert_eq!(forest.find(a).unwrap(), forest.find(b).unwrap());
//! ```

#![deny(missing_docs)]
#![no_std]
#![forbid(unsafe_code)]

#[allow(unused_imports)]
#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
#[allow(unused_imports)]
#[macro_use]
extern crate std;

#[cfg(feature = "std")]
#[allow(unused_imports)]
use std::collections::HashMap;

#[cfg(not(feature = "std"))]
#[allow(unused_imports)]
use hashbrown::HashMap;

pub mod core;

pub use crate::core::error::{Error, Result};
pub use crate::core::forest::{DisjointForest, Node};
pub use crate::core::storage::NodeRef;
