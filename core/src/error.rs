use crate::{Variable, circuit::Gate};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no auxiliary state left for qubit {qubit}, layer {layer}, term {term}")]
    AuxiliaryExhausted { qubit: usize, layer: usize, term: String },

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("incomplete evaluation: no value supplied for {0}")]
    IncompleteEvaluation(Variable),

    #[error("{qubits} qubits at T-depth {depth} need up to {required} auxiliary states, budget is {budget}")]
    BudgetExceeded {
        qubits: usize,
        depth: usize,
        required: u128,
        budget: u64,
    },

    #[error("malformed term set at layer {layer}: {reason}")]
    MalformedTermSet { layer: usize, reason: String },

    #[error("qubit {qubit} out of range for a {qubits}-qubit register")]
    QubitOutOfRange { qubit: usize, qubits: usize },

    #[error("{0:?} is not a Clifford gate")]
    NonClifford(Gate),

    #[error("key polynomial of qubit {qubit} has degree {degree}, the backend supports at most {max}")]
    DegreeExceeded { qubit: usize, degree: usize, max: usize },

    #[error("invalid qubit layout: {0}")]
    InvalidLayout(String),
}

pub type Result<T> = std::result::Result<T, Error>;
