//! Trait requirement derivation for the sort-based aggregate conversion.
//!
//! The derived pair encodes the cross-shard merge contract: every shard
//! delivers its partial aggregate pre-sorted by the group-by columns, and
//! the aggregate itself re-emits those columns first and in sorted order.

use crate::traits::{Collation, TraitSet};

/// Ordering the aggregate's input subtree must deliver: the ascending
/// sequence of group-column positions, under the Mesh convention.
pub fn required_input_traits(group_set: &[usize]) -> TraitSet {
    TraitSet::mesh().replace_collation(Collation::of(group_set.to_vec()))
}

/// Ordering the sort-based aggregate itself guarantees: the identity
/// sequence over its group-column count, since it emits the group columns
/// first and in sorted order.
pub fn produced_traits(group_set: &[usize]) -> TraitSet {
    TraitSet::mesh().replace_collation(Collation::identity(group_set.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Convention;

    #[test]
    fn test_required_input_trait_is_group_set() {
        let t = required_input_traits(&[0, 2]);
        assert_eq!(t.convention, Convention::Mesh);
        assert_eq!(t.collation, Collation::of(vec![0, 2]));
    }

    #[test]
    fn test_produced_trait_is_identity_over_group_count() {
        let t = produced_traits(&[0, 2]);
        assert_eq!(t.collation, Collation::of(vec![0, 1]));

        let t = produced_traits(&[3, 5, 7]);
        assert_eq!(t.collation, Collation::of(vec![0, 1, 2]));
    }

    #[test]
    fn test_global_aggregate_has_empty_traits() {
        // GROUP BY () — no group columns, no ordering requirement.
        let req = required_input_traits(&[]);
        let prod = produced_traits(&[]);
        assert!(req.collation.is_empty());
        assert!(prod.collation.is_empty());
    }

    #[test]
    fn test_derivation_holds_for_arbitrary_simple_group_sets() {
        // For ascending unique positions G: required == G, produced == [0..|G|).
        let cases: &[&[usize]] = &[&[0], &[1, 3], &[0, 2, 4, 6], &[5, 9, 11]];
        for g in cases {
            assert_eq!(required_input_traits(g).collation.columns(), *g);
            assert_eq!(
                produced_traits(g).collation,
                Collation::identity(g.len()),
                "group set {g:?}"
            );
        }
    }
}
