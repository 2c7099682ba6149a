//! T-gadget protocol as a typestate machine.
//!
//! ```text
//! Idle -> AuxiliaryPrepared -> Entangled -> Measured -> KeyUpdated
//! ```
//!
//! Every transition consumes the gadget, so a step cannot be repeated or
//! skipped. The measured bit is never read here. `measure` introduces the
//! placeholder variable `c_j`, and `update_keys` folds `c_j` into the
//! qubit's symbolic keys. The value behind `c_j` only enters at evaluation
//! time, once the executor has returned it.

use tracing::debug;

use crate::{
    GadgetId, Term, Variable,
    auxiliary::{AuxiliaryPool, AuxiliaryState},
    circuit::Operation,
    error::Result,
    keys::QubitKeys,
};

pub struct Idle;

pub struct AuxiliaryPrepared {
    auxiliary: AuxiliaryState,
}

pub struct Entangled {
    auxiliary: AuxiliaryState,
}

pub struct Measured {
    auxiliary: AuxiliaryState,
    correction: Variable,
}

pub struct KeyUpdated {
    record: GadgetRecord,
}

/// What is left of a gadget once it has run: enough to match the
/// executor's outcome to the placeholder it stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GadgetRecord {
    pub id: GadgetId,
    pub qubit: usize,
    pub layer: usize,
    pub auxiliary: usize,
    /// Symbolic term the consumed auxiliary state is keyed to.
    pub term: Term,
    pub correction: Variable,
}

/// One T-gate application on one qubit.
pub struct TGadget<S> {
    id: GadgetId,
    qubit: usize,
    layer: usize,
    state: S,
}

impl<S> TGadget<S> {
    pub fn id(&self) -> GadgetId {
        self.id
    }

    pub fn qubit(&self) -> usize {
        self.qubit
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    fn advance<N>(self, state: N) -> TGadget<N> {
        TGadget {
            id: self.id,
            qubit: self.qubit,
            layer: self.layer,
            state,
        }
    }
}

impl TGadget<Idle> {
    pub fn new(id: GadgetId, qubit: usize, layer: usize) -> Self {
        Self {
            id,
            qubit,
            layer,
            state: Idle,
        }
    }

    /// Claims the auxiliary state for `(qubit, layer, term)` and emits its
    /// preparation.
    pub fn prepare(
        self,
        pool: &mut AuxiliaryPool,
        term: &Term,
        ops: &mut Vec<Operation>,
    ) -> Result<TGadget<AuxiliaryPrepared>> {
        let auxiliary: AuxiliaryState = pool.claim(self.qubit, self.layer, term)?;
        ops.push(Operation::PrepareAuxiliary {
            auxiliary: auxiliary.id,
            qubit: self.qubit,
            layer: self.layer,
        });
        Ok(self.advance(AuxiliaryPrepared { auxiliary }))
    }
}

impl TGadget<AuxiliaryPrepared> {
    pub fn auxiliary(&self) -> &AuxiliaryState {
        &self.state.auxiliary
    }

    pub fn entangle(self, ops: &mut Vec<Operation>) -> TGadget<Entangled> {
        ops.push(Operation::Entangle {
            qubit: self.qubit,
            auxiliary: self.state.auxiliary.id,
        });
        let auxiliary: AuxiliaryState = self.state.auxiliary.clone();
        self.advance(Entangled { auxiliary })
    }
}

impl TGadget<Entangled> {
    /// Requests the auxiliary measurement and binds its outcome to the
    /// placeholder `c_id`.
    pub fn measure(self, ops: &mut Vec<Operation>) -> TGadget<Measured> {
        ops.push(Operation::MeasureAuxiliary {
            auxiliary: self.state.auxiliary.id,
            gadget: self.id,
            qubit: self.qubit,
        });
        let auxiliary: AuxiliaryState = self.state.auxiliary.clone();
        let correction: Variable = Variable::Correction(self.id);
        self.advance(Measured { auxiliary, correction })
    }
}

impl TGadget<Measured> {
    pub fn correction(&self) -> Variable {
        self.state.correction
    }

    /// With `c` the correction placeholder and `f_a'` the X-key before the
    /// gate:
    ///
    /// ```text
    /// f_a <- f_a + c
    /// f_b <- f_b + f_a' + c + c * f_a'
    /// ```
    pub fn update_keys(self, keys: &mut QubitKeys) -> TGadget<KeyUpdated> {
        let c: Term = Term::atom(self.state.correction);
        let f_a_old = keys.f_a.clone();

        keys.f_a.xor_term(c.clone());
        keys.f_b.xor_assign(&f_a_old);
        keys.f_b.xor_assign(&f_a_old.mul_term(&c));
        keys.f_b.xor_term(c);

        debug!(
            gadget = self.id,
            qubit = self.qubit,
            layer = self.layer,
            auxiliary = self.state.auxiliary.id,
            f_a_terms = keys.f_a.len(),
            f_b_terms = keys.f_b.len(),
            "T-gadget keys updated"
        );

        let record: GadgetRecord = GadgetRecord {
            id: self.id,
            qubit: self.qubit,
            layer: self.layer,
            auxiliary: self.state.auxiliary.id,
            term: self.state.auxiliary.term.clone(),
            correction: self.state.correction,
        };
        self.advance(KeyUpdated { record })
    }
}

impl TGadget<KeyUpdated> {
    pub fn record(&self) -> &GadgetRecord {
        &self.state.record
    }

    pub fn into_record(self) -> GadgetRecord {
        self.state.record
    }
}
