use crate::{
    GadgetId,
    error::{Error, Result},
};

/// Plaintext gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    X(usize),
    Z(usize),
    H(usize),
    S(usize),
    Cnot { control: usize, target: usize },
    T(usize),
}

impl Gate {
    pub fn is_clifford(&self) -> bool {
        !matches!(self, Gate::T(_))
    }

    /// Qubits the gate acts on. The second entry is only set for CNOT.
    pub fn qubits(&self) -> (usize, Option<usize>) {
        match *self {
            Gate::X(q) | Gate::Z(q) | Gate::H(q) | Gate::S(q) | Gate::T(q) => (q, None),
            Gate::Cnot { control, target } => (control, Some(target)),
        }
    }
}

/// Assigns T-layers in program order.
///
/// A T on `q` lands one layer above everything that has flowed into `q`.
/// A CNOT merges the histories of its two qubits.
#[derive(Clone, Debug)]
pub(crate) struct LayerTracker {
    depth: Vec<usize>,
}

impl LayerTracker {
    pub(crate) fn new(qubits: usize) -> Self {
        Self {
            depth: vec![0; qubits],
        }
    }

    /// Returns the T-layer of `gate` if it is a T gate.
    pub(crate) fn observe(&mut self, gate: &Gate) -> Option<usize> {
        match *gate {
            Gate::T(q) => {
                self.depth[q] += 1;
                Some(self.depth[q])
            }
            Gate::Cnot { control, target } => {
                let d: usize = self.depth[control].max(self.depth[target]);
                self.depth[control] = d;
                self.depth[target] = d;
                None
            }
            _ => None,
        }
    }

    pub(crate) fn max(&self) -> usize {
        self.depth.iter().copied().max().unwrap_or(0)
    }
}

/// Plaintext circuit over a fixed register.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Circuit {
    qubits: usize,
    gates: Vec<Gate>,
}

impl Circuit {
    pub fn new(qubits: usize) -> Self {
        Self {
            qubits,
            gates: Vec::new(),
        }
    }

    pub fn push(&mut self, gate: Gate) -> Result<&mut Self> {
        let (q0, q1) = gate.qubits();
        for q in std::iter::once(q0).chain(q1) {
            if q >= self.qubits {
                return Err(Error::QubitOutOfRange {
                    qubit: q,
                    qubits: self.qubits,
                });
            }
        }
        if q1 == Some(q0) {
            return Err(Error::InvalidConfiguration(format!(
                "CNOT control and target are both qubit {}",
                q0
            )));
        }
        self.gates.push(gate);
        Ok(self)
    }

    pub fn x(&mut self, q: usize) -> Result<&mut Self> {
        self.push(Gate::X(q))
    }

    pub fn z(&mut self, q: usize) -> Result<&mut Self> {
        self.push(Gate::Z(q))
    }

    pub fn h(&mut self, q: usize) -> Result<&mut Self> {
        self.push(Gate::H(q))
    }

    pub fn s(&mut self, q: usize) -> Result<&mut Self> {
        self.push(Gate::S(q))
    }

    pub fn t(&mut self, q: usize) -> Result<&mut Self> {
        self.push(Gate::T(q))
    }

    pub fn cnot(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.push(Gate::Cnot { control, target })
    }

    pub fn qubits(&self) -> usize {
        self.qubits
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn t_count(&self) -> usize {
        self.gates.iter().filter(|g| !g.is_clifford()).count()
    }

    /// Number of sequential T layers. This is the `L` the term set must be
    /// generated for.
    pub fn t_depth(&self) -> usize {
        let mut tracker: LayerTracker = LayerTracker::new(self.qubits);
        self.gates.iter().for_each(|g| {
            tracker.observe(g);
        });
        tracker.max()
    }

    pub fn is_clifford(&self) -> bool {
        self.gates.iter().all(Gate::is_clifford)
    }
}

/// Abstract instruction handed to the executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// One-time-pad mask `X^x Z^z` on a data qubit.
    Pauli { qubit: usize, x: bool, z: bool },
    /// Public gate on data qubits.
    Gate(Gate),
    /// Prepare auxiliary state `auxiliary` for the gadget on `qubit` at `layer`.
    PrepareAuxiliary {
        auxiliary: usize,
        qubit: usize,
        layer: usize,
    },
    /// Two-qubit entangling operation between a data qubit and an auxiliary.
    Entangle { qubit: usize, auxiliary: usize },
    /// Measure an auxiliary. The outcome is the correction bit of `gadget`
    /// and must come back encrypted.
    MeasureAuxiliary {
        auxiliary: usize,
        gadget: GadgetId,
        qubit: usize,
    },
    /// Final computational-basis measurement of a data qubit.
    Measure { qubit: usize },
}

/// Operation sequence as handed to the executor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncryptedCircuit {
    pub(crate) qubits: usize,
    pub(crate) operations: Vec<Operation>,
}

impl EncryptedCircuit {
    pub fn qubits(&self) -> usize {
        self.qubits
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn gadget_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::MeasureAuxiliary { .. }))
            .count()
    }
}

/// Logical-to-physical qubit mapping reported by the executor.
///
/// Raw outcome bit `i` belongs to physical qubit `i`. Decoding must read
/// logical qubit `q` from position `physical(q)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QubitLayout {
    physical: Vec<usize>,
}

impl QubitLayout {
    pub fn identity(qubits: usize) -> Self {
        Self {
            physical: (0..qubits).collect(),
        }
    }

    /// `physical[q]` is the physical position of logical qubit `q`. Must
    /// be a permutation of `0..len`.
    pub fn new(physical: Vec<usize>) -> Result<Self> {
        let mut seen: Vec<bool> = vec![false; physical.len()];
        for &p in &physical {
            match seen.get_mut(p) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(Error::InvalidLayout(format!("physical qubit {} used twice", p))),
                None => {
                    return Err(Error::InvalidLayout(format!(
                        "physical qubit {} out of range for {} qubits",
                        p,
                        physical.len()
                    )));
                }
            }
        }
        Ok(Self { physical })
    }

    pub fn qubits(&self) -> usize {
        self.physical.len()
    }

    pub fn physical(&self, logical: usize) -> usize {
        self.physical[logical]
    }
}
