//! Relational expression nodes as seen by the converter rules.
//!
//! The external planner supplies the logical tree; the nodes here expose
//! only the shape the conversion rules need — notably the aggregate's
//! group-set/grouping-set structure.

use crate::traits::{Collation, TraitSet};

/// Aggregate function subset carried through conversion unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFunc {
    Count,
    Sum,
    Min,
    Max,
    Avg,
}

/// One aggregate call: function, argument column positions, DISTINCT flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggCall {
    pub func: AggFunc,
    pub args: Vec<usize>,
    pub distinct: bool,
}

impl AggCall {
    pub fn new(func: AggFunc, args: impl Into<Vec<usize>>) -> Self {
        AggCall {
            func,
            args: args.into(),
            distinct: false,
        }
    }
}

/// A logical relational tree under the source convention.
#[derive(Debug, Clone)]
pub enum LogicalRel {
    /// Base table scan. `collation` is the order the scan can guarantee
    /// (empty when the table delivers rows unordered).
    Scan {
        table: String,
        collation: Collation,
    },

    /// Explicit sort.
    Sort {
        input: Box<LogicalRel>,
        collation: Collation,
    },

    /// Group-by/aggregate. `group_set` is the ascending, duplicate-free
    /// sequence of group-column positions. `group_sets` lists the grouping
    /// sets; anything beyond a single flat group-by disqualifies the
    /// sort-based conversion.
    Aggregate {
        input: Box<LogicalRel>,
        group_set: Vec<usize>,
        group_sets: Vec<Vec<usize>>,
        agg_calls: Vec<AggCall>,
    },
}

impl LogicalRel {
    /// A "simple" aggregate has exactly one grouping set, equal to the flat
    /// group-by. An empty grouping-set list is treated as the single flat
    /// group-by (the common case when no GROUPING SETS clause was written).
    pub fn is_simple_aggregate(group_set: &[usize], group_sets: &[Vec<usize>]) -> bool {
        match group_sets {
            [] => true,
            [only] => only.as_slice() == group_set,
            _ => false,
        }
    }
}

/// A physical relational tree under the target convention.
#[derive(Debug, Clone)]
pub enum PhysicalRel {
    /// Physical scan under the Mesh convention.
    Scan { traits: TraitSet, table: String },

    /// Delivers its input re-sorted to the collation in `traits`.
    SortExchange {
        traits: TraitSet,
        input: Box<PhysicalRel>,
    },

    /// Sort-based streaming aggregate. Emits its group columns first and in
    /// sorted order, so its produced collation is always the identity over
    /// the group-column count.
    SortAgg {
        traits: TraitSet,
        input: Box<PhysicalRel>,
        group_set: Vec<usize>,
        group_sets: Vec<Vec<usize>>,
        agg_calls: Vec<AggCall>,
    },
}

impl PhysicalRel {
    pub fn traits(&self) -> &TraitSet {
        match self {
            PhysicalRel::Scan { traits, .. } => traits,
            PhysicalRel::SortExchange { traits, .. } => traits,
            PhysicalRel::SortAgg { traits, .. } => traits,
        }
    }
}
