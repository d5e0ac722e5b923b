//! Keyed list reconciliation for UI runtimes.
//!
//! [`compare`] diffs two generations of a keyed list into an ordered stream
//! of add/remove/move [`Instruction`]s. A [`Kindergarten`] lets several
//! reconciled regions share one parent container, each replaying its stream
//! through a [`Group`]. With the `python` feature the crate also builds the
//! `keyed_reconciler` extension module.
pub mod diff_engine;
pub mod errors;
pub mod keyed_sequence;
pub mod kindergarten;
pub mod move_optimizer;
pub mod region;
pub mod types;

#[cfg(feature = "python")]
mod bindings;
#[cfg(feature = "python")]
mod converters;

pub use diff_engine::{compare, compare_with, DiffEngine};
pub use errors::ReconcilerError;
pub use keyed_sequence::{KeyFn, KeyedSequence, Link, NodeId, NodeRef};
pub use kindergarten::{ChildContainer, Group, GroupId, Kindergarten};
pub use move_optimizer::optimize_moves;
pub use region::ListRegion;
pub use types::{instructions_to_json, CompareOptions, Instruction};
