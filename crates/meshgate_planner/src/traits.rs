//! Physical plan traits: execution conventions and ordering collations.

/// An ordered sequence of column positions describing a guaranteed or
/// required sort order. Two collations are equal iff their sequences are
/// equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Collation(pub Vec<usize>);

impl Collation {
    /// Collation over the given column positions, in the given order.
    pub fn of(columns: impl Into<Vec<usize>>) -> Self {
        Collation(columns.into())
    }

    /// The identity collation `[0, 1, ..., k-1]`.
    pub fn identity(k: usize) -> Self {
        Collation((0..k).collect())
    }

    /// No ordering guarantee.
    pub fn none() -> Self {
        Collation(Vec::new())
    }

    pub fn columns(&self) -> &[usize] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A guaranteed collation satisfies a required one when the required
    /// sequence is a prefix of the guaranteed sequence.
    pub fn satisfies(&self, required: &Collation) -> bool {
        self.0.len() >= required.0.len() && self.0[..required.0.len()] == required.0[..]
    }
}

impl std::fmt::Display for Collation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "]")
    }
}

/// An execution engine/target under which a physical operator is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// The convention of the incoming logical tree.
    Logical,
    /// The meshgate distributed execution convention.
    Mesh,
}

/// The trait set carried by a physical node: where it runs and in what
/// order it delivers rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitSet {
    pub convention: Convention,
    pub collation: Collation,
}

impl TraitSet {
    pub fn logical() -> Self {
        TraitSet {
            convention: Convention::Logical,
            collation: Collation::none(),
        }
    }

    pub fn mesh() -> Self {
        TraitSet {
            convention: Convention::Mesh,
            collation: Collation::none(),
        }
    }

    pub fn replace_convention(mut self, convention: Convention) -> Self {
        self.convention = convention;
        self
    }

    pub fn replace_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }
}
