//! Somewhat-homomorphic bit encryption over the integers.
//!
//! A secret odd integer `p` of `eta` bits encrypts `m` as
//! `c = p*q + 2r + m`, with `q` a random `gamma - eta` bit integer and
//! `|r| <= 2^rho`. Decryption reduces `c` into `(-p/2, p/2]` and keeps the
//! parity. Addition of ciphertexts adds noise terms and multiplication
//! multiplies them, so XOR and AND stay correct while the accumulated
//! noise stays below `p/2`.
//!
//! The public key is a noise-free multiple `x0 = p*q0`, used to keep
//! ciphertexts reduced, plus `tau` encryptions of zero. Encrypting under it
//! adds a random subset of those encryptions of zero to `m + 2r`.
//!
//! [`IntegerParams::toy`] is sized for tests and benchmarks, not for security.

mod ciphertext;
mod keys;

pub use ciphertext::{IntegerCiphertext, MAX_CIPHERTEXT_BYTES};
pub use keys::{IntegerPublicKey, IntegerSecretKey};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    #[error("noise bits rho={0} must lie in 1..=62")]
    Noise(u32),

    #[error("secret bits eta={eta} leave no room above noise bits rho={rho}")]
    Secret { eta: u32, rho: u32 },

    #[error("ciphertext bits gamma={gamma} must exceed secret bits eta={eta}")]
    Ciphertext { gamma: u32, eta: u32 },

    #[error("public key needs at least one encryption of zero (tau=0)")]
    EmptyPublicKey,

    #[error("ciphertext bits gamma={gamma} exceed the {max}-byte serialization limit")]
    Oversized { gamma: u32, max: u64 },
}

/// Parameters of the integer scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegerParams {
    /// Bit-size of the fresh noise `r`.
    pub rho: u32,
    /// Bit-size of the secret `p`.
    pub eta: u32,
    /// Bit-size of public-key elements and of `x0`.
    pub gamma: u32,
    /// Number of encryptions of zero in the public key.
    pub tau: usize,
}

impl IntegerParams {
    /// Fast parameters with a large noise margin: a degree-2 product
    /// summed over thousands of terms still decrypts correctly.
    pub const fn toy() -> Self {
        Self {
            rho: 16,
            eta: 384,
            gamma: 1024,
            tau: 24,
        }
    }

    /// Bit-size bound on the noise of a fresh public-key encryption:
    /// `2r + m` plus a subset sum of `tau` encryptions of zero.
    pub fn fresh_noise_bits(&self) -> u32 {
        self.rho + 2 + usize::BITS - self.tau.leading_zeros()
    }

    /// Largest degree `d` such that the XOR of `terms` products of `d` fresh
    /// ciphertexts each still decrypts correctly.
    ///
    /// A product of `d` fresh ciphertexts carries noise below
    /// `2^(d * fresh)`, and a sum of `terms` of them below
    /// `2^(d * fresh + bits(terms))`, which must stay under `p/2 >= 2^(eta - 2)`.
    pub fn max_degree(&self, terms: usize) -> usize {
        let sum_bits: u32 = usize::BITS - terms.leading_zeros();
        let room: u32 = self.eta.saturating_sub(2 + sum_bits);
        (room / self.fresh_noise_bits()) as usize
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.rho == 0 || self.rho > 62 {
            return Err(ParamsError::Noise(self.rho));
        }
        // One multiplication of two fresh public-key ciphertexts must fit.
        if self.eta <= 2 * self.fresh_noise_bits() + 1 {
            return Err(ParamsError::Secret {
                eta: self.eta,
                rho: self.rho,
            });
        }
        if self.gamma <= self.eta {
            return Err(ParamsError::Ciphertext {
                gamma: self.gamma,
                eta: self.eta,
            });
        }
        if self.gamma.div_ceil(8) as u64 > MAX_CIPHERTEXT_BYTES {
            return Err(ParamsError::Oversized {
                gamma: self.gamma,
                max: MAX_CIPHERTEXT_BYTES,
            });
        }
        if self.tau == 0 {
            return Err(ParamsError::EmptyPublicKey);
        }
        Ok(())
    }
}

impl Default for IntegerParams {
    fn default() -> Self {
        Self::toy()
    }
}

#[cfg(test)]
mod tests;
