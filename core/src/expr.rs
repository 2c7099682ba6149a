use std::fmt;

use auxqhe_backend::Bit;
use auxqhe_utils::OrderedSet;
use itertools::Itertools;

use crate::{Term, Variable};

/// GF(2) polynomial in the key algebra: the XOR of a set of [`Term`]s.
///
/// XOR-ing a term that is already present removes it (`t + t = 0`), so
/// the term set is always the reduced form of the polynomial. The
/// constant one never appears, so the empty set is zero.
#[derive(Clone, Debug, Default)]
pub struct KeyExpr {
    terms: OrderedSet<Term>,
}

impl KeyExpr {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn atom(var: Variable) -> Self {
        Self::from(Term::atom(var))
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.terms.contains(term)
    }

    /// `self ^= term`.
    pub fn xor_term(&mut self, term: Term) {
        self.terms.toggle(term);
    }

    /// `self ^= other`.
    pub fn xor_assign(&mut self, other: &KeyExpr) {
        other.terms.iter().for_each(|t| self.xor_term(t.clone()));
    }

    /// `term * self`, distributed over the sum. Products that coincide
    /// cancel in pairs.
    pub fn mul_term(&self, term: &Term) -> KeyExpr {
        let mut out: KeyExpr = KeyExpr::zero();
        self.terms.iter().for_each(|t| out.xor_term(t.product(term)));
        out
    }

    /// Distinct variables referenced by the expression, in first-use order.
    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.terms.iter().flat_map(|t| t.vars().iter().copied()).unique()
    }

    /// Largest term degree, zero for the zero polynomial.
    pub fn degree(&self) -> usize {
        self.terms.iter().map(Term::degree).max().unwrap_or(0)
    }

    /// Plaintext evaluation. Returns the first unassigned variable as the
    /// error.
    pub fn eval<F>(&self, lookup: F) -> Result<Bit, Variable>
    where
        F: Fn(&Variable) -> Option<Bit>,
    {
        self.terms
            .iter()
            .try_fold(Bit::ZERO, |acc, t| t.eval(&lookup).map(|b| acc ^ b))
    }
}

impl From<Term> for KeyExpr {
    fn from(term: Term) -> Self {
        let mut expr: KeyExpr = KeyExpr::zero();
        expr.xor_term(term);
        expr
    }
}

impl FromIterator<Term> for KeyExpr {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut expr: KeyExpr = KeyExpr::zero();
        iter.into_iter().for_each(|t| expr.xor_term(t));
        expr
    }
}

/// Polynomial equality: same term set, in any order.
impl PartialEq for KeyExpr {
    fn eq(&self, other: &Self) -> bool {
        self.terms.len() == other.terms.len() && self.terms.iter().all(|t| other.terms.contains(t))
    }
}

impl Eq for KeyExpr {}

impl fmt::Display for KeyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        write!(f, "{}", self.terms.iter().join(" + "))
    }
}
