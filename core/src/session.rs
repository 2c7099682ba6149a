//! Client-side driver tying the components together.
//!
//! ```text
//! Session::compile ──► ExecutionPlan ─┬─► EncryptedCircuit ──► executor
//!                                     └─► PendingEvaluation (kept by client)
//!
//! executor ──► ExecutionResult ──► PendingEvaluation::resolve ──► Decoder
//! ```
//!
//! `resolve` is the only way from a compiled circuit to final keys, and it
//! needs every gadget's correction bit. The client waits for the whole
//! result batch. A failed execution is recovered by resubmitting the
//! whole circuit, never by patching individual gadgets.

use std::sync::Arc;

use auxqhe_backend::{Bit, BitDecryptor, HomomorphicOps};
use auxqhe_utils::Map;
use tracing::info;

use crate::{
    GadgetId, Term, Variable,
    auxiliary::AuxiliaryPool,
    circuit::{Circuit, EncryptedCircuit, LayerTracker, Operation, QubitLayout},
    error::{Error, Result},
    eval::{EncryptedInputs, aux_eval},
    gadget::{GadgetRecord, TGadget},
    keys::{KeyState, QubitKeys},
    qotp::{self, KeyPair},
    term_set::TermSet,
};

/// Client holding the secret QOTP keys and the term set provisioned for them.
#[derive(Clone, Debug)]
pub struct Session {
    keys: KeyPair,
    terms: Arc<TermSet>,
}

impl Session {
    pub fn new(keys: KeyPair, terms: Arc<TermSet>) -> Result<Self> {
        if keys.qubits() != terms.qubits() {
            return Err(Error::InvalidConfiguration(format!(
                "keys cover {} qubits but the term set was generated for {}",
                keys.qubits(),
                terms.qubits()
            )));
        }
        Ok(Self { keys, terms })
    }

    pub fn keys(&self) -> &KeyPair {
        &self.keys
    }

    pub fn term_set(&self) -> &TermSet {
        &self.terms
    }

    /// Masks `circuit` with the session keys and expands every T gate into
    /// a gadget. Gates are processed in program order, so the gadget for
    /// the k-th T on a qubit sees the corrections of the first k-1.
    ///
    /// The gadget at layer `l` on qubit `q` consumes the auxiliary state
    /// `(q, l, t)`, where `t` is the first term of the current `f_a[q]`
    /// provisioned in `T[l]`, or `a_q` when none is. Compiling a circuit
    /// deeper than the term set fails with [`Error::AuxiliaryExhausted`].
    pub fn compile(&self, circuit: &Circuit, layout: QubitLayout) -> Result<ExecutionPlan> {
        let n: usize = self.keys.qubits();
        if circuit.qubits() != n {
            return Err(Error::LengthMismatch {
                expected: n,
                actual: circuit.qubits(),
            });
        }
        if layout.qubits() != n {
            return Err(Error::LengthMismatch {
                expected: n,
                actual: layout.qubits(),
            });
        }

        let mut pool: AuxiliaryPool = AuxiliaryPool::new(self.terms.clone());
        let mut state: KeyState = KeyState::initial(n);
        let mut tracker: LayerTracker = LayerTracker::new(n);
        let mut ops: Vec<Operation> = self.keys.mask().collect();
        let mut gadgets: Vec<GadgetRecord> = Vec::with_capacity(circuit.t_count());

        for gate in circuit.gates() {
            ops.push(Operation::Gate(*gate));
            let Some(layer) = tracker.observe(gate) else {
                state.apply_clifford(gate)?;
                continue;
            };
            let (qubit, _) = gate.qubits();
            let term: Term = claim_term(&self.terms, layer, qubit, &state)?;
            let measured = TGadget::new(gadgets.len(), qubit, layer)
                .prepare(&mut pool, &term, &mut ops)?
                .entangle(&mut ops)
                .measure(&mut ops);
            gadgets.push(measured.update_keys(state.qubit_mut(qubit)?).into_record());
        }

        (0..n).for_each(|qubit| ops.push(Operation::Measure { qubit }));

        info!(
            qubits = n,
            gates = circuit.gates().len(),
            gadgets = gadgets.len(),
            t_depth = tracker.max(),
            auxiliary_claimed = pool.claimed(),
            auxiliary_total = pool.total(),
            "circuit compiled"
        );

        Ok(ExecutionPlan {
            circuit: EncryptedCircuit {
                qubits: n,
                operations: ops,
            },
            pending: PendingEvaluation {
                expressions: state,
                gadgets,
                layout,
            },
        })
    }
}

/// Term of `f_a[qubit]` the next gadget on `qubit` is keyed to.
fn claim_term(terms: &TermSet, layer: usize, qubit: usize, state: &KeyState) -> Result<Term> {
    let keys: &QubitKeys = state.qubit(qubit).ok_or(Error::QubitOutOfRange {
        qubit,
        qubits: state.qubits(),
    })?;
    Ok(keys
        .f_a()
        .terms()
        .find(|t| terms.contains(layer, t))
        .cloned()
        .unwrap_or_else(|| Term::atom(Variable::KeyA(qubit))))
}

/// Output of [`Session::compile`].
#[derive(Clone, Debug)]
pub struct ExecutionPlan {
    pub circuit: EncryptedCircuit,
    pub pending: PendingEvaluation,
}

impl ExecutionPlan {
    pub fn into_parts(self) -> (EncryptedCircuit, PendingEvaluation) {
        (self.circuit, self.pending)
    }
}

/// What the executor sends back for one submitted circuit.
#[derive(Clone, Debug)]
pub struct ExecutionResult<C> {
    /// Encrypted correction bit of every gadget.
    pub corrections: Vec<(GadgetId, C)>,
    /// Raw final outcomes indexed by physical qubit, with shot counts.
    pub counts: Vec<(Vec<Bit>, u64)>,
}

/// Frozen symbolic keys of a compiled circuit, waiting for its results.
#[derive(Clone, Debug)]
pub struct PendingEvaluation {
    expressions: KeyState,
    gadgets: Vec<GadgetRecord>,
    layout: QubitLayout,
}

impl PendingEvaluation {
    pub fn expressions(&self) -> &KeyState {
        &self.expressions
    }

    pub fn gadgets(&self) -> &[GadgetRecord] {
        &self.gadgets
    }

    pub fn layout(&self) -> &QubitLayout {
        &self.layout
    }

    /// Evaluates the final keys once all results are in.
    ///
    /// Rejects the batch if any gadget's correction is missing
    /// ([`Error::IncompleteEvaluation`]) or if it carries a correction for a
    /// gadget this circuit does not have, which means a mismatched
    /// circuit/result pair.
    pub fn resolve<O, D>(self, ops: &O, decryptor: &D, inputs: &EncryptedInputs<O::Ciphertext>) -> Result<Decoder>
    where
        O: HomomorphicOps,
        D: BitDecryptor<Ciphertext = O::Ciphertext>,
    {
        if let Some(g) = self.gadgets.iter().find(|g| !inputs.contains(&g.correction)) {
            return Err(Error::IncompleteEvaluation(g.correction));
        }
        if let Some(var) = inputs
            .variables()
            .find(|v| matches!(v, Variable::Correction(j) if *j >= self.gadgets.len()))
        {
            return Err(Error::InvalidConfiguration(format!(
                "result carries {} but the circuit has {} gadgets",
                var,
                self.gadgets.len()
            )));
        }

        let keys: KeyPair = aux_eval(ops, decryptor, &self.expressions, inputs)?;
        Ok(Decoder {
            keys,
            layout: self.layout,
        })
    }
}

/// Final keys plus the layout needed to read raw outcomes.
#[derive(Clone, Debug)]
pub struct Decoder {
    keys: KeyPair,
    layout: QubitLayout,
}

impl Decoder {
    pub fn final_keys(&self) -> &KeyPair {
        &self.keys
    }

    pub fn decode(&self, raw: &[Bit]) -> Result<Vec<Bit>> {
        qotp::decrypt(raw, &self.keys, &self.layout)
    }

    pub fn decode_counts<'a, I>(&self, counts: I) -> Result<Map<Vec<Bit>, u64>>
    where
        I: IntoIterator<Item = (&'a [Bit], u64)>,
    {
        qotp::decrypt_counts(counts, &self.keys, &self.layout)
    }
}
