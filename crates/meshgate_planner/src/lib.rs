//! Physical conversion for the meshgate execution convention.
//!
//! A logical relational tree (supplied by the external planner) is rewritten
//! into physically executable operators by pluggable converter rules. The
//! centerpiece is the sort-based aggregate conversion: shards return locally
//! grouped partial aggregates, and requiring a common sort order on the
//! group-by columns lets a streaming merge combine them without a
//! redistribute/hash step.

pub mod derive;
pub mod rel;
pub mod rules;
pub mod traits;


pub use derive::{produced_traits, required_input_traits};
pub use rel::{AggCall, AggFunc, LogicalRel, PhysicalRel};
pub use rules::{ConverterRule, MeshScanRule, MeshSortRule, RulePlanner, SortAggRule};
pub use traits::{Collation, Convention, TraitSet};
