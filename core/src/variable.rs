use std::fmt;

/// Identifier of one T-gadget instance within a compiled circuit.
pub type GadgetId = usize;

/// Atomic GF(2) variable.
///
/// The derived ordering (keys, then corrections, then k-variables) is the
/// canonical order inside a [`crate::Term`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    /// Initial X-key bit `a_q`.
    KeyA(usize),
    /// Initial Z-key bit `b_q`.
    KeyB(usize),
    /// Correction bit measured by gadget `c_j`.
    Correction(GadgetId),
    /// Fresh auxiliary k-variable introduced at `layer` for `qubit`, keyed
    /// to the `source`-th term of the previous layer.
    K { layer: usize, qubit: usize, source: usize },
}

impl Variable {
    pub fn is_key(&self) -> bool {
        matches!(self, Variable::KeyA(_) | Variable::KeyB(_))
    }

    pub fn is_correction(&self) -> bool {
        matches!(self, Variable::Correction(_))
    }

    pub fn is_k(&self) -> bool {
        matches!(self, Variable::K { .. })
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::KeyA(q) => write!(f, "a{}", q),
            Variable::KeyB(q) => write!(f, "b{}", q),
            Variable::Correction(j) => write!(f, "c{}", j),
            Variable::K { layer, qubit, source } => write!(f, "k{}_{}_{}", layer, qubit, source),
        }
    }
}
