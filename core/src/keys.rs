use crate::{
    KeyExpr, Variable,
    circuit::Gate,
    error::{Error, Result},
};

/// Running symbolic keys `(f_a, f_b)` of one qubit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QubitKeys {
    pub(crate) f_a: KeyExpr,
    pub(crate) f_b: KeyExpr,
}

impl QubitKeys {
    /// `(a_q, b_q)`.
    pub fn initial(qubit: usize) -> Self {
        Self {
            f_a: KeyExpr::atom(Variable::KeyA(qubit)),
            f_b: KeyExpr::atom(Variable::KeyB(qubit)),
        }
    }

    pub fn f_a(&self) -> &KeyExpr {
        &self.f_a
    }

    pub fn f_b(&self) -> &KeyExpr {
        &self.f_b
    }
}

/// Symbolic keys of a whole register, threaded through compilation in
/// program order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyState {
    qubits: Vec<QubitKeys>,
}

impl KeyState {
    pub fn initial(qubits: usize) -> Self {
        Self {
            qubits: (0..qubits).map(QubitKeys::initial).collect(),
        }
    }

    pub fn qubits(&self) -> usize {
        self.qubits.len()
    }

    pub fn qubit(&self, q: usize) -> Option<&QubitKeys> {
        self.qubits.get(q)
    }

    pub(crate) fn qubit_mut(&mut self, q: usize) -> Result<&mut QubitKeys> {
        let qubits: usize = self.qubits.len();
        self.qubits
            .get_mut(q)
            .ok_or(Error::QubitOutOfRange { qubit: q, qubits })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QubitKeys> {
        self.qubits.iter()
    }

    /// Pushes the mask through a Clifford gate:
    ///
    /// - `X`, `Z`: unchanged;
    /// - `H`: `(f_a, f_b) <- (f_b, f_a)`;
    /// - `S`: `f_b <- f_b + f_a`;
    /// - `CNOT(c, t)`: `f_a[t] <- f_a[t] + f_a[c]`, `f_b[c] <- f_b[c] + f_b[t]`.
    pub fn apply_clifford(&mut self, gate: &Gate) -> Result<()> {
        match *gate {
            Gate::X(q) | Gate::Z(q) => {
                self.qubit_mut(q)?;
            }
            Gate::H(q) => {
                let k: &mut QubitKeys = self.qubit_mut(q)?;
                std::mem::swap(&mut k.f_a, &mut k.f_b);
            }
            Gate::S(q) => {
                let k: &mut QubitKeys = self.qubit_mut(q)?;
                let f_a: KeyExpr = k.f_a.clone();
                k.f_b.xor_assign(&f_a);
            }
            Gate::Cnot { control, target } => {
                let f_a_c: KeyExpr = self.qubit_mut(control)?.f_a.clone();
                let f_b_t: KeyExpr = self.qubit_mut(target)?.f_b.clone();
                self.qubit_mut(target)?.f_a.xor_assign(&f_a_c);
                self.qubit_mut(control)?.f_b.xor_assign(&f_b_t);
            }
            Gate::T(_) => return Err(Error::NonClifford(*gate)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::KeyState;
    use crate::{
        KeyExpr, Term,
        Variable::{KeyA, KeyB},
        circuit::Gate,
        error::Error,
    };

    #[test]
    fn hadamard_swaps_and_phase_folds() {
        let mut k: KeyState = KeyState::initial(1);
        k.apply_clifford(&Gate::H(0)).unwrap();
        assert_eq!(k.qubit(0).unwrap().f_a(), &KeyExpr::atom(KeyB(0)));
        assert_eq!(k.qubit(0).unwrap().f_b(), &KeyExpr::atom(KeyA(0)));

        k.apply_clifford(&Gate::S(0)).unwrap();
        let expected: KeyExpr = [Term::atom(KeyA(0)), Term::atom(KeyB(0))].into_iter().collect();
        assert_eq!(k.qubit(0).unwrap().f_b(), &expected);
    }

    #[test]
    fn cnot_spreads_x_forward_and_z_backward() {
        let mut k: KeyState = KeyState::initial(2);
        k.apply_clifford(&Gate::Cnot { control: 0, target: 1 }).unwrap();
        let fa1: KeyExpr = [Term::atom(KeyA(1)), Term::atom(KeyA(0))].into_iter().collect();
        let fb0: KeyExpr = [Term::atom(KeyB(0)), Term::atom(KeyB(1))].into_iter().collect();
        assert_eq!(k.qubit(1).unwrap().f_a(), &fa1);
        assert_eq!(k.qubit(0).unwrap().f_b(), &fb0);
        assert_eq!(k.qubit(0).unwrap().f_a(), &KeyExpr::atom(KeyA(0)));
        assert_eq!(k.qubit(1).unwrap().f_b(), &KeyExpr::atom(KeyB(1)));

        // CNOT is an involution on the keys.
        k.apply_clifford(&Gate::Cnot { control: 0, target: 1 }).unwrap();
        assert_eq!(k, KeyState::initial(2));
    }

    #[test]
    fn t_and_out_of_range_are_rejected() {
        let mut k: KeyState = KeyState::initial(1);
        assert_eq!(k.apply_clifford(&Gate::T(0)), Err(Error::NonClifford(Gate::T(0))));
        assert_eq!(
            k.apply_clifford(&Gate::X(3)),
            Err(Error::QubitOutOfRange { qubit: 3, qubits: 1 })
        );
    }
}
