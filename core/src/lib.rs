//! Symbolic key algebra and homomorphic key evaluation for
//! quantum-one-time-pad computation with auxiliary-state T-gadgets.
//!
//! A client masks its circuit with secret Pauli keys `(a, b)` and hands it
//! to an untrusted executor. Clifford gates move the keys around
//! linearly. Each T gate becomes a gadget whose measured correction bit
//! `c_j` folds nonlinearly into the keys. This crate tracks the keys as
//! GF(2) polynomials over `{a_q, b_q, c_j}`, generates the term sets that
//! size the auxiliary pool, and evaluates the final keys under a classical
//! homomorphic scheme so the corrections never appear in the clear.
//!
//! ```text
//! TermSet::generate(n, L) ──► Session::new
//!                                 │
//!   Circuit ──► Session::compile ─┴─► EncryptedCircuit ──► executor
//!                                 │                           │
//!                      PendingEvaluation ◄── ExecutionResult ─┘
//!                                 │
//!                       resolve (aux_eval) ──► Decoder ──► plaintext outcomes
//! ```

pub mod auxiliary;
pub mod circuit;
pub mod config;
pub mod error;
pub mod eval;
pub mod expr;
pub mod gadget;
pub mod keys;
pub mod qotp;
pub mod session;
pub mod table;
pub mod term;
pub mod term_set;
pub mod variable;

#[cfg(test)]
mod tests;

pub use auxqhe_backend::Bit;
pub use circuit::{Circuit, EncryptedCircuit, Gate, Operation, QubitLayout};
pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use eval::{EncryptedInputs, EncryptedKeys, aux_eval, evaluate};
pub use expr::KeyExpr;
pub use keys::{KeyState, QubitKeys};
pub use qotp::KeyPair;
pub use session::{Decoder, ExecutionPlan, ExecutionResult, PendingEvaluation, Session};
pub use table::TermSetTable;
pub use term::Term;
pub use term_set::{TermSet, TermSetSummary};
pub use variable::{GadgetId, Variable};
