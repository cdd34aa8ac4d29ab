//! Converter rules and the rule-based planner that applies them.
//!
//! Each rule is registered under a `(source convention, target convention,
//! applicability predicate)` key and rewrites one logical operator into a
//! physical one. A rule that matches may still yield no result; the planner
//! treats `None` as "inapplicable, try other strategies", never as an error.

use crate::derive;
use crate::rel::{LogicalRel, PhysicalRel};
use crate::traits::{Convention, TraitSet};

/// A pluggable unit in the rule-based planner.
pub trait ConverterRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn source_convention(&self) -> Convention {
        Convention::Logical
    }

    fn target_convention(&self) -> Convention {
        Convention::Mesh
    }

    /// Applicability predicate. Broad matching with internal filtering in
    /// `convert` is intentional — see `SortAggRule`.
    fn matches(&self, rel: &LogicalRel) -> bool;

    /// Attempt the conversion. `None` means this rule does not apply to
    /// this particular node; the planner falls through to the next rule.
    fn convert(&self, rel: &LogicalRel, planner: &RulePlanner) -> Option<PhysicalRel>;
}

/// Ordered rule registry. Rules are tried in registration order; the first
/// one whose predicate matches and whose conversion yields a node wins.
#[derive(Default)]
pub struct RulePlanner {
    rules: Vec<Box<dyn ConverterRule>>,
}

impl RulePlanner {
    pub fn new() -> Self {
        RulePlanner { rules: Vec::new() }
    }

    /// A planner with the standard Mesh conversion rules registered.
    pub fn with_default_rules() -> Self {
        let mut planner = RulePlanner::new();
        planner.register(Box::new(SortAggRule));
        planner.register(Box::new(MeshSortRule));
        planner.register(Box::new(MeshScanRule));
        planner
    }

    pub fn register(&mut self, rule: Box<dyn ConverterRule>) {
        self.rules.push(rule);
    }

    /// Convert a logical node into the Mesh convention, trying each
    /// registered rule in order.
    pub fn convert(&self, rel: &LogicalRel) -> Option<PhysicalRel> {
        for rule in &self.rules {
            if !rule.matches(rel) {
                continue;
            }
            if let Some(converted) = rule.convert(rel, self) {
                tracing::debug!(rule = rule.name(), "converted logical node");
                return Some(converted);
            }
        }
        None
    }

    /// Convert a subtree under a required trait set. When the converted
    /// subtree cannot itself guarantee the required collation, it is wrapped
    /// in a `SortExchange` that delivers it.
    pub fn convert_with_traits(
        &self,
        rel: &LogicalRel,
        required: &TraitSet,
    ) -> Option<PhysicalRel> {
        let converted = self.convert(rel)?;
        if converted.traits().collation.satisfies(&required.collation) {
            return Some(converted);
        }
        Some(PhysicalRel::SortExchange {
            traits: required.clone(),
            input: Box::new(converted),
        })
    }
}

/// Converts a simple logical aggregate into a sort-based physical aggregate.
///
/// The input subtree is required to deliver rows pre-sorted by the group-by
/// columns; the aggregate emits its group columns first and in sorted order,
/// so downstream operators see the identity collation over those columns.
/// Non-simple aggregates (grouping sets beyond one flat group-by) yield no
/// result and are left for other strategies.
pub struct SortAggRule;

impl ConverterRule for SortAggRule {
    fn name(&self) -> &'static str {
        "SortAggRule"
    }

    fn matches(&self, rel: &LogicalRel) -> bool {
        // Registered for every aggregate; simplicity is checked in convert.
        matches!(rel, LogicalRel::Aggregate { .. })
    }

    fn convert(&self, rel: &LogicalRel, planner: &RulePlanner) -> Option<PhysicalRel> {
        let LogicalRel::Aggregate {
            input,
            group_set,
            group_sets,
            agg_calls,
        } = rel
        else {
            return None;
        };
        if !LogicalRel::is_simple_aggregate(group_set, group_sets) {
            return None;
        }

        let input_traits = derive::required_input_traits(group_set);
        let self_traits = derive::produced_traits(group_set);
        let input = planner.convert_with_traits(input, &input_traits)?;

        Some(PhysicalRel::SortAgg {
            traits: self_traits,
            input: Box::new(input),
            group_set: group_set.clone(),
            group_sets: group_sets.clone(),
            agg_calls: agg_calls.clone(),
        })
    }
}

/// Converts a logical scan into a Mesh scan, carrying over whatever
/// collation the scan can guarantee.
pub struct MeshScanRule;

impl ConverterRule for MeshScanRule {
    fn name(&self) -> &'static str {
        "MeshScanRule"
    }

    fn matches(&self, rel: &LogicalRel) -> bool {
        matches!(rel, LogicalRel::Scan { .. })
    }

    fn convert(&self, rel: &LogicalRel, _planner: &RulePlanner) -> Option<PhysicalRel> {
        let LogicalRel::Scan { table, collation } = rel else {
            return None;
        };
        Some(PhysicalRel::Scan {
            traits: TraitSet::mesh().replace_collation(collation.clone()),
            table: table.clone(),
        })
    }
}

/// Converts a logical sort into a `SortExchange` over its converted input.
pub struct MeshSortRule;

impl ConverterRule for MeshSortRule {
    fn name(&self) -> &'static str {
        "MeshSortRule"
    }

    fn matches(&self, rel: &LogicalRel) -> bool {
        matches!(rel, LogicalRel::Sort { .. })
    }

    fn convert(&self, rel: &LogicalRel, planner: &RulePlanner) -> Option<PhysicalRel> {
        let LogicalRel::Sort { input, collation } = rel else {
            return None;
        };
        let converted = planner.convert(input)?;
        if converted.traits().collation.satisfies(collation) {
            return Some(converted);
        }
        Some(PhysicalRel::SortExchange {
            traits: TraitSet::mesh().replace_collation(collation.clone()),
            input: Box::new(converted),
        })
    }
}
