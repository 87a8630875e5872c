//! Core Components of the Disjoint-Set Forest
//!
//! The forest itself lives in [`forest`]; [`storage`] and [`utils`] provide
//! the arena and the compact handle types it is built on.

pub mod error;
pub mod forest;
#[cfg(feature = "fuzzing")]
pub mod fuzzing;
pub mod storage;
pub mod utils;
