use std::fmt::Debug;

use auxqhe_sampling::Source;

use crate::Bit;

/// Public homomorphic evaluation over encrypted bits.
pub trait HomomorphicOps {
    type Ciphertext: Clone + Debug;

    /// Noise-free encryption of a public constant.
    fn trivial(&self, bit: Bit) -> Self::Ciphertext;

    /// Encrypted `lhs XOR rhs`.
    fn xor(&self, lhs: &Self::Ciphertext, rhs: &Self::Ciphertext) -> Self::Ciphertext;

    /// Encrypted `lhs AND rhs`.
    fn and(&self, lhs: &Self::Ciphertext, rhs: &Self::Ciphertext) -> Self::Ciphertext;

    /// Largest product degree whose XOR over `terms` products of fresh
    /// ciphertexts still decrypts correctly. `None` when unbounded.
    fn max_degree(&self, terms: usize) -> Option<usize> {
        let _ = terms;
        None
    }

    fn xor_inplace(&self, lhs: &mut Self::Ciphertext, rhs: &Self::Ciphertext) {
        *lhs = self.xor(lhs, rhs);
    }
}

pub trait BitEncryptor {
    type Ciphertext;

    fn encrypt(&self, bit: Bit, source: &mut Source) -> Self::Ciphertext;
}

pub trait BitDecryptor {
    type Ciphertext;

    fn decrypt(&self, ct: &Self::Ciphertext) -> Bit;
}
