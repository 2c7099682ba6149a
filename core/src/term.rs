use std::fmt;

use auxqhe_backend::Bit;
use itertools::Itertools;

use crate::Variable;

/// GF(2) monomial: the product of a non-empty set of atomic variables.
///
/// Variables are stored sorted and without repetition, so `a0*b0` and
/// `b0*a0` are the same value and `a0*a0 == a0`. Equality and hashing are
/// structural on that canonical form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Term {
    vars: Box<[Variable]>,
}

impl Term {
    pub fn atom(var: Variable) -> Self {
        Self {
            vars: Box::new([var]),
        }
    }

    /// Product of `vars`. Returns `None` for an empty iterator (the
    /// constant one is not a term).
    pub fn from_vars<I: IntoIterator<Item = Variable>>(vars: I) -> Option<Self> {
        let mut vars: Vec<Variable> = vars.into_iter().collect();
        if vars.is_empty() {
            return None;
        }
        vars.sort_unstable();
        vars.dedup();
        Some(Self {
            vars: vars.into_boxed_slice(),
        })
    }

    /// GF(2) product, i.e. the union of both variable sets.
    pub fn product(&self, other: &Term) -> Term {
        let vars: Vec<Variable> = self.vars.iter().merge(other.vars.iter()).dedup().copied().collect();
        debug_assert!(vars.is_sorted());
        Term {
            vars: vars.into_boxed_slice(),
        }
    }

    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }

    /// Number of distinct variables.
    pub fn degree(&self) -> usize {
        self.vars.len()
    }

    pub fn is_atom(&self) -> bool {
        self.vars.len() == 1
    }

    pub fn as_atom(&self) -> Option<Variable> {
        match &*self.vars {
            [v] => Some(*v),
            _ => None,
        }
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.vars.binary_search(var).is_ok()
    }

    /// `true` if every variable of `self` occurs in `other`.
    pub fn divides(&self, other: &Term) -> bool {
        self.vars.iter().all(|v| other.contains(v))
    }

    /// Evaluates the product under `lookup`. Returns the first unassigned
    /// variable as the error.
    pub fn eval<F>(&self, lookup: F) -> Result<Bit, Variable>
    where
        F: Fn(&Variable) -> Option<Bit>,
    {
        self.vars.iter().try_fold(Bit::ONE, |acc, v| lookup(v).map(|b| acc & b).ok_or(*v))
    }
}

impl From<Variable> for Term {
    fn from(var: Variable) -> Self {
        Term::atom(var)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vars.iter().join("*"))
    }
}

#[cfg(test)]
mod tests {
    use super::Term;
    use crate::Variable::{Correction, KeyA, KeyB};

    #[test]
    fn product_is_commutative_and_idempotent() {
        let a0: Term = KeyA(0).into();
        let b0: Term = KeyB(0).into();
        assert_eq!(a0.product(&b0), b0.product(&a0));
        assert_eq!(a0.product(&a0), a0);
        assert_eq!(a0.product(&b0).product(&a0).degree(), 2);
        assert_eq!(Term::from_vars([KeyB(0), KeyA(0), KeyB(0)]), Some(a0.product(&b0)));
        assert_eq!(Term::from_vars([]), None);
    }

    #[test]
    fn display_uses_canonical_order() {
        let t: Term = Term::from_vars([Correction(2), KeyB(1), KeyA(3)]).unwrap();
        assert_eq!(t.to_string(), "a3*b1*c2");
    }

    #[test]
    fn divides_and_contains() {
        let a0b0: Term = Term::from_vars([KeyA(0), KeyB(0)]).unwrap();
        assert!(Term::atom(KeyA(0)).divides(&a0b0));
        assert!(!Term::atom(KeyA(1)).divides(&a0b0));
        assert!(a0b0.contains(&KeyB(0)));
        assert_eq!(a0b0.as_atom(), None);
    }
}
