//! Layered term sets `T[1..L]` and the auxiliary-state counts they imply.
//!
//! `T[1]` holds one atom per initial key bit. Layer `l >= 2` is `T[l-1]`
//! closed under
//!
//! - the product of every pair of distinct members of `T[l-1]`, and
//! - `n` fresh k-variables per member of `T[l-1]`, one per qubit,
//!
//! with duplicates dropped. Terms are built from variable names only, so
//! the result depends on `(n, L)` and never on key values.
//!
//! All layers share one insertion-ordered store: `T[l]` is the prefix of
//! length `|T[l]|`, which makes `T[l] ⊇ T[l-1]` structural and gives every
//! term a stable index.

use auxqhe_utils::OrderedSet;
use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    Term, Variable,
    config::GeneratorConfig,
    error::{Error, Result},
    qotp::KeyPair,
};

/// Saturating upper bound on `|T[l]|` for `l = 1..=depth`.
///
/// Exact at `l <= 2`. Deeper layers dedupe products that coincide (e.g.
/// `a0 * (a0*b0)`), so the true sizes are smaller.
pub fn layer_size_bounds(qubits: usize, depth: usize) -> Vec<u128> {
    let n: u128 = qubits as u128;
    let mut sizes: Vec<u128> = Vec::with_capacity(depth);
    let mut s: u128 = 2 * n;
    (0..depth).for_each(|l| {
        if l > 0 {
            s = next_layer_bound(s, n);
        }
        sizes.push(s);
    });
    sizes
}

fn next_layer_bound(prev: u128, n: u128) -> u128 {
    let pairs: u128 = prev.saturating_mul(prev.saturating_sub(1)) / 2;
    prev.saturating_add(pairs).saturating_add(n.saturating_mul(prev))
}

/// Sizes of a generated term set. This is all that needs caching per `(n, L)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TermSetSummary {
    pub qubits: usize,
    pub depth: usize,
    pub layer_sizes: Vec<u64>,
    pub total_auxiliary_states: u64,
}

#[derive(Clone, Debug)]
pub struct TermSet {
    qubits: usize,
    terms: OrderedSet<Term>,
    boundaries: Vec<usize>,
}

impl TermSet {
    pub fn generate(qubits: usize, depth: usize) -> Result<Self> {
        Self::generate_with(&GeneratorConfig::default(), qubits, depth)
    }

    /// Term set for the register described by `keys`. Only the key length
    /// matters: terms name key bits, they do not read them.
    pub fn for_keys(keys: &KeyPair, depth: usize) -> Result<Self> {
        Self::generate(keys.qubits(), depth)
    }

    pub fn generate_with(config: &GeneratorConfig, qubits: usize, depth: usize) -> Result<Self> {
        if qubits < 1 {
            return Err(Error::InvalidConfiguration(format!(
                "qubit count must be at least 1, got {}",
                qubits
            )));
        }
        if depth < 1 {
            return Err(Error::InvalidConfiguration(format!(
                "T-depth must be at least 1, got {}",
                depth
            )));
        }

        let n: usize = qubits;
        let budget: u128 = config.max_auxiliary_states as u128;
        let exceeded = |required: u128| Error::BudgetExceeded {
            qubits,
            depth,
            required,
            budget: config.max_auxiliary_states,
        };

        let mut terms: OrderedSet<Term> = OrderedSet::with_capacity(2 * n);
        (0..n).for_each(|q| {
            terms.insert(Term::atom(Variable::KeyA(q)));
            terms.insert(Term::atom(Variable::KeyB(q)));
        });
        let mut boundaries: Vec<usize> = vec![terms.len()];
        let mut total: u128 = (n * terms.len()) as u128;
        if total > budget {
            return Err(exceeded(total));
        }
        debug!(layer = 1, size = terms.len(), auxiliary_states = total as u64, "term-set layer");

        for layer in 2..=depth {
            let prev: usize = terms.len();
            let required: u128 = total.saturating_add((n as u128).saturating_mul(next_layer_bound(prev as u128, n as u128)));
            if required > budget {
                return Err(exceeded(required));
            }

            for (i, j) in (0..prev).tuple_combinations() {
                let product: Term = {
                    let slice: &[Term] = terms.as_slice();
                    slice[i].product(&slice[j])
                };
                terms.insert(product);
            }

            for source in 0..prev {
                for qubit in 0..n {
                    terms.insert(Term::atom(Variable::K { layer, qubit, source }));
                }
            }

            debug_assert!(terms.len() > prev, "layer {} did not grow", layer);
            boundaries.push(terms.len());
            total += (n * terms.len()) as u128;
            debug!(layer, size = terms.len(), auxiliary_states = total as u64, "term-set layer");
        }

        info!(qubits, depth, total_auxiliary_states = total as u64, "term set generated");

        Ok(Self {
            qubits,
            terms,
            boundaries,
        })
    }

    /// Rebuilds a term set from explicit layers. Each layer is deduplicated
    /// and must contain its predecessor. No closure rule is checked here:
    /// see [`TermSet::check_conformance`].
    pub fn from_layers(qubits: usize, layers: Vec<Vec<Term>>) -> Result<Self> {
        if qubits < 1 || layers.is_empty() {
            return Err(Error::InvalidConfiguration(format!(
                "need at least one qubit and one layer, got {} qubits and {} layers",
                qubits,
                layers.len()
            )));
        }

        let mut terms: OrderedSet<Term> = OrderedSet::new();
        let mut boundaries: Vec<usize> = Vec::with_capacity(layers.len());

        for (i, layer) in layers.into_iter().enumerate() {
            let layer_set: OrderedSet<Term> = layer.into_iter().collect();
            if let Some(missing) = terms.iter().find(|t| !layer_set.contains(t)) {
                return Err(Error::MalformedTermSet {
                    layer: i + 1,
                    reason: format!("drops {} from layer {}", missing, i),
                });
            }
            layer_set.into_vec().into_iter().for_each(|t| {
                terms.insert(t);
            });
            boundaries.push(terms.len());
        }

        Ok(Self {
            qubits,
            terms,
            boundaries,
        })
    }

    pub fn qubits(&self) -> usize {
        self.qubits
    }

    /// Maximum T-depth `L` this set provisions for.
    pub fn depth(&self) -> usize {
        self.boundaries.len()
    }

    /// `T[layer]`, 1-based.
    pub fn layer(&self, layer: usize) -> Option<&[Term]> {
        let end: usize = *self.boundaries.get(layer.checked_sub(1)?)?;
        Some(&self.terms.as_slice()[..end])
    }

    /// `T[layer] \ T[layer-1]`.
    pub fn new_terms(&self, layer: usize) -> Option<&[Term]> {
        let end: usize = *self.boundaries.get(layer.checked_sub(1)?)?;
        let start: usize = if layer > 1 { self.boundaries[layer - 2] } else { 0 };
        Some(&self.terms.as_slice()[start..end])
    }

    pub fn layer_size(&self, layer: usize) -> Option<usize> {
        self.boundaries.get(layer.checked_sub(1)?).copied()
    }

    /// `|T[1]|, ..., |T[L]|`.
    pub fn layer_sizes(&self) -> &[usize] {
        &self.boundaries
    }

    /// Position of `term` inside `T[layer]`, if it is a member.
    pub fn index_in_layer(&self, layer: usize, term: &Term) -> Option<usize> {
        let size: usize = self.layer_size(layer)?;
        self.terms.index_of(term).filter(|&i| i < size)
    }

    pub fn contains(&self, layer: usize, term: &Term) -> bool {
        self.index_in_layer(layer, term).is_some()
    }

    /// First layer in which `term` appears.
    pub fn layer_of(&self, term: &Term) -> Option<usize> {
        let i: usize = self.terms.index_of(term)?;
        Some(self.boundaries.partition_point(|&b| b <= i) + 1)
    }

    /// `n * |T[layer]|`.
    pub fn auxiliary_states(&self, layer: usize) -> Option<usize> {
        self.layer_size(layer).map(|s| self.qubits * s)
    }

    /// `n * sum |T[l]|`.
    pub fn total_auxiliary_states(&self) -> usize {
        self.qubits * self.boundaries.iter().sum::<usize>()
    }

    pub fn summary(&self) -> TermSetSummary {
        TermSetSummary {
            qubits: self.qubits,
            depth: self.depth(),
            layer_sizes: self.boundaries.iter().map(|&s| s as u64).collect(),
            total_auxiliary_states: self.total_auxiliary_states() as u64,
        }
    }

    /// Checks the closure rules:
    ///
    /// - `T[1]` is exactly `{a_q, b_q : q < n}`;
    /// - every term new at layer `l >= 2` is a layer-`l` k-variable or the
    ///   product of two distinct members of `T[l-1]`;
    /// - every layer is strictly larger than its predecessor;
    /// - every product of two distinct members of `T[l-1]` and every
    ///   layer-`l` k-variable is present in `T[l]`.
    ///
    /// Anything else, e.g. a triple product injected into `T[2]` or a
    /// dropped pairwise product, is reported as [`Error::MalformedTermSet`].
    pub fn check_conformance(&self) -> Result<()> {
        let first: &[Term] = self.layer(1).unwrap_or(&[]);
        let expected: OrderedSet<Term> = (0..self.qubits)
            .flat_map(|q| [Term::atom(Variable::KeyA(q)), Term::atom(Variable::KeyB(q))])
            .collect();
        if first.len() != expected.len() {
            return Err(Error::MalformedTermSet {
                layer: 1,
                reason: format!("expected {} key terms, found {}", expected.len(), first.len()),
            });
        }
        if let Some(t) = first.iter().find(|t| !expected.contains(t)) {
            return Err(Error::MalformedTermSet {
                layer: 1,
                reason: format!("{} is not an initial key bit", t),
            });
        }

        for layer in 2..=self.depth() {
            let prev: usize = self.boundaries[layer - 2];
            if self.boundaries[layer - 1] <= prev {
                return Err(Error::MalformedTermSet {
                    layer,
                    reason: "layer does not grow".to_string(),
                });
            }
            let fresh: &[Term] = &self.terms.as_slice()[prev..self.boundaries[layer - 1]];
            if let Some(t) = fresh
                .iter()
                .find(|t| !self.is_k_variable(t, layer, prev) && !self.is_pairwise_product(t, prev))
            {
                return Err(Error::MalformedTermSet {
                    layer,
                    reason: format!(
                        "{} is neither a layer-{} k-variable nor a product of two layer-{} terms",
                        t,
                        layer,
                        layer - 1
                    ),
                });
            }

            let previous: &[Term] = &self.terms.as_slice()[..prev];
            if let Some((x, y)) = previous
                .iter()
                .tuple_combinations()
                .find(|(x, y)| !self.contains(layer, &x.product(y)))
            {
                return Err(Error::MalformedTermSet {
                    layer,
                    reason: format!("missing product {} * {}", x, y),
                });
            }
            if let Some(k) = (0..prev)
                .flat_map(|source| (0..self.qubits).map(move |qubit| Variable::K { layer, qubit, source }))
                .find(|&k| !self.contains(layer, &Term::atom(k)))
            {
                return Err(Error::MalformedTermSet {
                    layer,
                    reason: format!("missing k-variable {}", k),
                });
            }
        }
        Ok(())
    }

    fn is_k_variable(&self, term: &Term, layer: usize, prev: usize) -> bool {
        matches!(
            term.as_atom(),
            Some(Variable::K { layer: l, qubit, source }) if l == layer && qubit < self.qubits && source < prev
        )
    }

    /// `true` if `term = x * y` for distinct `x, y` among the first `prev` terms.
    fn is_pairwise_product(&self, term: &Term, prev: usize) -> bool {
        let in_prev = |t: &Term| self.terms.index_of(t).is_some_and(|i| i < prev);

        // Factors must divide `term`. Enumerate divisors when that is cheaper
        // than scanning the previous layer.
        const MAX_ENUMERATED_DEGREE: usize = 16;
        let divisors: Vec<Term> = if term.degree() <= MAX_ENUMERATED_DEGREE {
            let vars: &[Variable] = term.vars();
            (1u32..(1 << vars.len()))
                .filter_map(|mask| {
                    Term::from_vars(
                        vars.iter()
                            .enumerate()
                            .filter(|(i, _)| mask >> i & 1 == 1)
                            .map(|(_, v)| *v),
                    )
                })
                .filter(|t| in_prev(t))
                .collect()
        } else {
            self.terms.as_slice()[..prev]
                .iter()
                .filter(|t| t.divides(term))
                .cloned()
                .collect()
        };

        divisors
            .iter()
            .tuple_combinations()
            .any(|(x, y)| &x.product(y) == term)
    }
}
