//! Domain-specific collections used by the unification engine.
#![warn(clippy::dbg_macro)]

pub mod all;
mod vec_set;

pub use all::{MutMap, MutSet, VisitedSet};
pub use vec_set::VecSet;
