//! Quantum one-time pad: the Pauli mask `X^a Z^b` over a register.

use auxqhe_backend::Bit;
use auxqhe_sampling::Source;
use auxqhe_utils::Map;

use crate::{
    Variable,
    circuit::{Circuit, EncryptedCircuit, Operation, QubitLayout},
    error::{Error, Result},
};

/// Per-qubit key bits `(a, b)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    a: Vec<Bit>,
    b: Vec<Bit>,
}

impl KeyPair {
    pub fn new(a: Vec<Bit>, b: Vec<Bit>) -> Result<Self> {
        if a.len() != b.len() {
            return Err(Error::LengthMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        Ok(Self { a, b })
    }

    pub fn from_u8(a: &[u8], b: &[u8]) -> Result<Self> {
        Self::new(auxqhe_backend::bits_from_u8(a), auxqhe_backend::bits_from_u8(b))
    }

    pub fn zero(qubits: usize) -> Self {
        Self {
            a: vec![Bit::ZERO; qubits],
            b: vec![Bit::ZERO; qubits],
        }
    }

    pub fn random(qubits: usize, source: &mut Source) -> Self {
        let mut draw = || -> Vec<Bit> { source.next_bools(qubits).into_iter().map(Bit::from).collect() };
        let a: Vec<Bit> = draw();
        let b: Vec<Bit> = draw();
        Self { a, b }
    }

    pub fn qubits(&self) -> usize {
        self.a.len()
    }

    pub fn a(&self) -> &[Bit] {
        &self.a
    }

    pub fn b(&self) -> &[Bit] {
        &self.b
    }

    /// Value of a key variable (`a_q`/`b_q`). `None` for any other variable
    /// or an out-of-range qubit.
    pub fn lookup(&self, var: &Variable) -> Option<Bit> {
        match *var {
            Variable::KeyA(q) => self.a.get(q).copied(),
            Variable::KeyB(q) => self.b.get(q).copied(),
            _ => None,
        }
    }

    /// The mask `X^{a_q} Z^{b_q}` for every qubit, in qubit order.
    pub fn mask(&self) -> impl Iterator<Item = Operation> + '_ {
        self.a
            .iter()
            .zip(self.b.iter())
            .enumerate()
            .map(|(qubit, (a, b))| Operation::Pauli {
                qubit,
                x: a.is_one(),
                z: b.is_one(),
            })
    }
}

/// Prepends the key mask to `circuit`. Gates are copied verbatim. T gates
/// need the gadget protocol, see [`crate::session::Session`].
pub fn encrypt(circuit: &Circuit, keys: &KeyPair) -> Result<EncryptedCircuit> {
    if keys.qubits() != circuit.qubits() {
        return Err(Error::LengthMismatch {
            expected: circuit.qubits(),
            actual: keys.qubits(),
        });
    }
    let operations: Vec<Operation> = keys
        .mask()
        .chain(circuit.gates().iter().copied().map(Operation::Gate))
        .collect();
    Ok(EncryptedCircuit {
        qubits: circuit.qubits(),
        operations,
    })
}

/// Removes the X part of the final mask from a raw outcome.
///
/// `raw` is indexed by physical qubit. The result is indexed by logical
/// qubit: `out[q] = raw[layout.physical(q)] ^ a_final[q]`. The Z part has
/// no effect on a computational-basis outcome.
pub fn decrypt(raw: &[Bit], keys: &KeyPair, layout: &QubitLayout) -> Result<Vec<Bit>> {
    let n: usize = keys.qubits();
    if layout.qubits() != n {
        return Err(Error::LengthMismatch {
            expected: n,
            actual: layout.qubits(),
        });
    }
    if raw.len() != n {
        return Err(Error::LengthMismatch {
            expected: n,
            actual: raw.len(),
        });
    }
    Ok((0..n).map(|q| raw[layout.physical(q)] ^ keys.a[q]).collect())
}

/// Decrypts a histogram of raw outcomes. Raw strings that decode to the
/// same plaintext have their counts summed, so no shots are lost.
pub fn decrypt_counts<'a, I>(counts: I, keys: &KeyPair, layout: &QubitLayout) -> Result<Map<Vec<Bit>, u64>>
where
    I: IntoIterator<Item = (&'a [Bit], u64)>,
{
    let mut out: Map<Vec<Bit>, u64> = Map::new();
    for (raw, shots) in counts {
        *out.entry_or_default(decrypt(raw, keys, layout)?) += shots;
    }
    Ok(out)
}

/// Character order of a textual outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitOrder {
    /// Character `i` is classical bit `i`.
    LeftToRight,
    /// The last character is classical bit 0, as most SDKs print registers.
    RightToLeft,
}

pub fn parse_bits(s: &str, order: BitOrder) -> Result<Vec<Bit>> {
    let mut bits: Vec<Bit> = s
        .chars()
        .map(|c| Bit::from_char(c).ok_or_else(|| Error::InvalidConfiguration(format!("invalid bit character {:?}", c))))
        .collect::<Result<_>>()?;
    if order == BitOrder::RightToLeft {
        bits.reverse();
    }
    Ok(bits)
}

pub fn format_bits(bits: &[Bit], order: BitOrder) -> String {
    let s = bits.iter().map(|b| if b.is_one() { '1' } else { '0' });
    match order {
        BitOrder::LeftToRight => s.collect(),
        BitOrder::RightToLeft => s.rev().collect(),
    }
}
