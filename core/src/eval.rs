//! Homomorphic key evaluation.
//!
//! [`evaluate`] turns the frozen symbolic keys into encrypted final key
//! bits. It only sees [`HomomorphicOps`], so nothing it computes can be
//! opened along the way. [`aux_eval`] adds the client's last step and
//! decrypts exactly the `2n` final bits.

use auxqhe_backend::{BitDecryptor, BitEncryptor, HomomorphicOps};
use auxqhe_sampling::Source;
use auxqhe_utils::Map;
use tracing::debug;

use crate::{
    GadgetId, KeyExpr, Term, Variable,
    error::{Error, Result},
    keys::KeyState,
    qotp::KeyPair,
};

/// Encrypted values of the atomic variables, collected as one read-only
/// batch before evaluation starts.
#[derive(Clone, Debug)]
pub struct EncryptedInputs<C> {
    values: Map<Variable, C>,
}

impl<C> Default for EncryptedInputs<C> {
    fn default() -> Self {
        Self { values: Map::new() }
    }
}

impl<C> EncryptedInputs<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encrypts every initial key bit `a_q`, `b_q`.
    pub fn with_keys<E>(encryptor: &E, keys: &KeyPair, source: &mut Source) -> Self
    where
        E: BitEncryptor<Ciphertext = C>,
    {
        let mut inputs: Self = Self::new();
        (0..keys.qubits()).for_each(|q| {
            inputs.insert(Variable::KeyA(q), encryptor.encrypt(keys.a()[q], source));
            inputs.insert(Variable::KeyB(q), encryptor.encrypt(keys.b()[q], source));
        });
        inputs
    }

    pub fn insert(&mut self, var: Variable, ct: C) -> Option<C> {
        self.values.insert(var, ct)
    }

    pub fn insert_correction(&mut self, gadget: GadgetId, ct: C) -> Option<C> {
        self.insert(Variable::Correction(gadget), ct)
    }

    pub fn extend_corrections<I: IntoIterator<Item = (GadgetId, C)>>(&mut self, corrections: I) {
        corrections.into_iter().for_each(|(g, ct)| {
            self.insert_correction(g, ct);
        });
    }

    pub fn get(&self, var: &Variable) -> Option<&C> {
        self.values.get(var)
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.values.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.values.keys()
    }
}

/// Encrypted final keys `(a_final, b_final)`.
#[derive(Clone, Debug)]
pub struct EncryptedKeys<C> {
    a: Vec<C>,
    b: Vec<C>,
}

impl<C> EncryptedKeys<C> {
    pub fn qubits(&self) -> usize {
        self.a.len()
    }

    pub fn a(&self) -> &[C] {
        &self.a
    }

    pub fn b(&self) -> &[C] {
        &self.b
    }

    /// Opens the final keys. This is the only place evaluation output is
    /// decrypted.
    pub fn decrypt<D: BitDecryptor<Ciphertext = C>>(&self, decryptor: &D) -> Result<KeyPair> {
        KeyPair::new(
            self.a.iter().map(|c| decryptor.decrypt(c)).collect(),
            self.b.iter().map(|c| decryptor.decrypt(c)).collect(),
        )
    }
}

/// First variable used by `keys` that `inputs` has no value for.
pub fn missing_variable<C>(keys: &KeyState, inputs: &EncryptedInputs<C>) -> Option<Variable> {
    keys.iter()
        .flat_map(|k| k.f_a().variables().chain(k.f_b().variables()))
        .find(|v| !inputs.contains(v))
}

struct TermEvaluator<'a, O: HomomorphicOps> {
    ops: &'a O,
    inputs: &'a EncryptedInputs<O::Ciphertext>,
    cache: Map<Term, O::Ciphertext>,
}

impl<O: HomomorphicOps> TermEvaluator<'_, O> {
    fn atom(&self, var: &Variable) -> Result<&O::Ciphertext> {
        self.inputs.get(var).ok_or(Error::IncompleteEvaluation(*var))
    }

    fn term(&mut self, term: &Term) -> Result<O::Ciphertext> {
        if let Some(ct) = self.cache.get(term) {
            return Ok(ct.clone());
        }
        let (first, rest) = term
            .vars()
            .split_first()
            .ok_or_else(|| Error::InvalidConfiguration("empty term".to_string()))?;
        let mut acc: O::Ciphertext = self.atom(first)?.clone();
        for v in rest {
            acc = self.ops.and(&acc, self.atom(v)?);
        }
        self.cache.insert(term.clone(), acc.clone());
        Ok(acc)
    }

    fn expr(&mut self, expr: &KeyExpr) -> Result<O::Ciphertext> {
        let mut acc: O::Ciphertext = self.ops.trivial(auxqhe_backend::Bit::ZERO);
        for t in expr.terms() {
            let ct: O::Ciphertext = self.term(t)?;
            self.ops.xor_inplace(&mut acc, &ct);
        }
        Ok(acc)
    }
}

fn check_degree<O: HomomorphicOps>(ops: &O, keys: &KeyState) -> Result<()> {
    for (qubit, k) in keys.iter().enumerate() {
        for expr in [k.f_a(), k.f_b()] {
            let Some(max) = ops.max_degree(expr.len()) else {
                continue;
            };
            if expr.degree() > max {
                return Err(Error::DegreeExceeded {
                    qubit,
                    degree: expr.degree(),
                    max,
                });
            }
        }
    }
    Ok(())
}

/// Evaluates every `f_a`, `f_b` under the encrypted inputs.
///
/// Fails before any homomorphic work with [`Error::IncompleteEvaluation`]
/// if a referenced variable has no value, and with [`Error::DegreeExceeded`]
/// if a polynomial is deeper than the backend can decrypt. Nothing is
/// defaulted.
pub fn evaluate<O: HomomorphicOps>(
    ops: &O,
    keys: &KeyState,
    inputs: &EncryptedInputs<O::Ciphertext>,
) -> Result<EncryptedKeys<O::Ciphertext>> {
    if let Some(var) = missing_variable(keys, inputs) {
        return Err(Error::IncompleteEvaluation(var));
    }
    check_degree(ops, keys)?;

    let mut evaluator: TermEvaluator<'_, O> = TermEvaluator {
        ops,
        inputs,
        cache: Map::new(),
    };

    let mut a: Vec<O::Ciphertext> = Vec::with_capacity(keys.qubits());
    let mut b: Vec<O::Ciphertext> = Vec::with_capacity(keys.qubits());
    for k in keys.iter() {
        a.push(evaluator.expr(k.f_a())?);
        b.push(evaluator.expr(k.f_b())?);
    }

    debug!(
        qubits = keys.qubits(),
        inputs = inputs.len(),
        distinct_terms = evaluator.cache.len(),
        "keys evaluated"
    );

    Ok(EncryptedKeys { a, b })
}

/// [`evaluate`], then decryption of the final key bits only.
pub fn aux_eval<O, D>(
    ops: &O,
    decryptor: &D,
    keys: &KeyState,
    inputs: &EncryptedInputs<O::Ciphertext>,
) -> Result<KeyPair>
where
    O: HomomorphicOps,
    D: BitDecryptor<Ciphertext = O::Ciphertext>,
{
    evaluate(ops, keys, inputs)?.decrypt(decryptor)
}
