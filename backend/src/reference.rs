use auxqhe_sampling::Source;

use crate::{Bit, BitDecryptor, BitEncryptor, HomomorphicOps};

/// Identity "encryption": ciphertexts are plaintext bits.
///
/// Provides no confidentiality. It is the oracle the integer backend and
/// the key evaluator are checked against.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClearScheme;

impl HomomorphicOps for ClearScheme {
    type Ciphertext = Bit;

    fn trivial(&self, bit: Bit) -> Bit {
        bit
    }

    fn xor(&self, lhs: &Bit, rhs: &Bit) -> Bit {
        *lhs ^ *rhs
    }

    fn and(&self, lhs: &Bit, rhs: &Bit) -> Bit {
        *lhs & *rhs
    }
}

impl BitEncryptor for ClearScheme {
    type Ciphertext = Bit;

    fn encrypt(&self, bit: Bit, _source: &mut Source) -> Bit {
        bit
    }
}

impl BitDecryptor for ClearScheme {
    type Ciphertext = Bit;

    fn decrypt(&self, ct: &Bit) -> Bit {
        *ct
    }
}
