use std::sync::Arc;

use crate::{
    Term,
    error::{Error, Result},
    term_set::TermSet,
};

/// One single-use auxiliary resource state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AuxiliaryState {
    /// Flat index, `offset(layer) + qubit * |T[layer]| + term_index`.
    pub id: usize,
    pub qubit: usize,
    pub layer: usize,
    pub term: Term,
}

/// Bookkeeping for the `n * sum |T[l]|` auxiliary states of a term set.
/// Each state can be claimed once.
#[derive(Clone, Debug)]
pub struct AuxiliaryPool {
    terms: Arc<TermSet>,
    offsets: Vec<usize>,
    claimed: Vec<bool>,
    remaining: usize,
}

impl AuxiliaryPool {
    pub fn new(terms: Arc<TermSet>) -> Self {
        let n: usize = terms.qubits();
        let mut offsets: Vec<usize> = Vec::with_capacity(terms.depth());
        let mut acc: usize = 0;
        terms.layer_sizes().iter().for_each(|&s| {
            offsets.push(acc);
            acc += n * s;
        });
        Self {
            terms,
            offsets,
            claimed: vec![false; acc],
            remaining: acc,
        }
    }

    pub fn term_set(&self) -> &TermSet {
        &self.terms
    }

    pub fn total(&self) -> usize {
        self.claimed.len()
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn claimed(&self) -> usize {
        self.total() - self.remaining
    }

    pub fn is_claimed(&self, id: usize) -> bool {
        self.claimed.get(id).copied().unwrap_or(false)
    }

    /// Flat id of the state for `(qubit, layer, term)`, if provisioned.
    pub fn id_of(&self, qubit: usize, layer: usize, term: &Term) -> Option<usize> {
        if qubit >= self.terms.qubits() {
            return None;
        }
        let index: usize = self.terms.index_in_layer(layer, term)?;
        let size: usize = self.terms.layer_size(layer)?;
        Some(self.offsets[layer - 1] + qubit * size + index)
    }

    /// Takes the state for `(qubit, layer, term)`. Fails with
    /// [`Error::AuxiliaryExhausted`] if it was never provisioned or is
    /// already taken.
    pub fn claim(&mut self, qubit: usize, layer: usize, term: &Term) -> Result<AuxiliaryState> {
        let exhausted = || Error::AuxiliaryExhausted {
            qubit,
            layer,
            term: term.to_string(),
        };
        let id: usize = self.id_of(qubit, layer, term).ok_or_else(exhausted)?;
        if std::mem::replace(&mut self.claimed[id], true) {
            return Err(exhausted());
        }
        debug_assert!(self.remaining > 0);
        self.remaining -= 1;
        Ok(AuxiliaryState {
            id,
            qubit,
            layer,
            term: term.clone(),
        })
    }

    /// Decodes a flat id.
    pub fn state(&self, id: usize) -> Option<AuxiliaryState> {
        if id >= self.total() {
            return None;
        }
        let layer: usize = self.offsets.partition_point(|&o| o <= id);
        let size: usize = self.terms.layer_size(layer)?;
        let within: usize = id - self.offsets[layer - 1];
        let term: Term = self.terms.layer(layer)?.get(within % size)?.clone();
        Some(AuxiliaryState {
            id,
            qubit: within / size,
            layer,
            term,
        })
    }
}
