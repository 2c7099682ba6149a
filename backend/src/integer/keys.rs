use auxqhe_sampling::Source;
use rand::distr::{Distribution, Uniform};
use rug::{Integer, integer::Order};

use crate::{
    Bit, BitDecryptor, BitEncryptor, HomomorphicOps,
    integer::{IntegerCiphertext, IntegerParams, ParamsError},
};

/// Uniform integer with exactly `bits` significant bits.
fn sample_top_bit(bits: u32, source: &mut Source) -> Integer {
    let mut x: Integer = Integer::from_digits(&source.next_bytes_bits(bits), Order::Lsf);
    x.set_bit(bits - 1, true);
    x
}

fn noise_distribution(rho: u32) -> Result<Uniform<i64>, ParamsError> {
    let bound: i64 = 1i64 << rho;
    Uniform::new_inclusive(-bound, bound).map_err(|_| ParamsError::Noise(rho))
}

/// Reduces `x` into `[0, m)`.
fn reduce(mut x: Integer, m: &Integer) -> Integer {
    x %= m;
    if x < 0 {
        x += m;
    }
    x
}

/// Client-side key: the secret odd integer `p` and the matching public key.
#[derive(Clone, Debug)]
pub struct IntegerSecretKey {
    params: IntegerParams,
    p: Integer,
    noise: Uniform<i64>,
    public: IntegerPublicKey,
}

/// Evaluation and encryption key: can compute on and produce ciphertexts,
/// cannot open them.
#[derive(Clone, Debug)]
pub struct IntegerPublicKey {
    params: IntegerParams,
    x0: Integer,
    zeros: Vec<Integer>,
    noise: Uniform<i64>,
}

impl IntegerSecretKey {
    pub fn generate(params: IntegerParams, source: &mut Source) -> Result<Self, ParamsError> {
        params.validate()?;
        let noise: Uniform<i64> = noise_distribution(params.rho)?;

        let mut p: Integer = sample_top_bit(params.eta, source);
        p.set_bit(0, true);

        let q_bits: u32 = params.gamma - params.eta;
        let x0: Integer = Integer::from(&p * &sample_top_bit(q_bits, source));

        let mut zeros: Vec<Integer> = Vec::with_capacity(params.tau);
        (0..params.tau).for_each(|_| {
            let q: Integer = Integer::from_digits(&source.next_bytes_bits(q_bits), Order::Lsf);
            let r: i64 = noise.sample(source);
            let x: Integer = Integer::from(&p * &q) + Integer::from(r) * 2u32;
            zeros.push(reduce(x, &x0));
        });

        Ok(Self {
            params,
            p,
            noise,
            public: IntegerPublicKey {
                params,
                x0,
                zeros,
                noise,
            },
        })
    }

    pub fn params(&self) -> &IntegerParams {
        &self.params
    }

    pub fn public_key(&self) -> &IntegerPublicKey {
        &self.public
    }

    /// Signed noise `c mod± p`. Its parity is the plaintext.
    pub fn noise_of(&self, ct: &IntegerCiphertext) -> Integer {
        let mut r: Integer = reduce(ct.0.clone(), &self.p);
        let half: Integer = self.p.clone() >> 1u32;
        if r > half {
            r -= &self.p;
        }
        r
    }

    /// Bits of noise left before decryption fails.
    pub fn noise_budget(&self, ct: &IntegerCiphertext) -> i64 {
        (self.params.eta as i64 - 1) - self.noise_of(ct).significant_bits() as i64
    }
}

impl BitEncryptor for IntegerSecretKey {
    type Ciphertext = IntegerCiphertext;

    fn encrypt(&self, bit: Bit, source: &mut Source) -> IntegerCiphertext {
        let q: Integer = Integer::from_digits(
            &source.next_bytes_bits(self.params.gamma - self.params.eta),
            Order::Lsf,
        );
        let r: i64 = self.noise.sample(source);
        let c: Integer = Integer::from(&self.p * &q) + Integer::from(r) * 2u32 + bit.as_u8();
        IntegerCiphertext(reduce(c, &self.public.x0))
    }
}

impl BitDecryptor for IntegerSecretKey {
    type Ciphertext = IntegerCiphertext;

    fn decrypt(&self, ct: &IntegerCiphertext) -> Bit {
        Bit::new(self.noise_of(ct).is_odd())
    }
}

impl IntegerPublicKey {
    pub fn params(&self) -> &IntegerParams {
        &self.params
    }

    pub fn x0_bits(&self) -> u32 {
        self.x0.significant_bits()
    }
}

impl BitEncryptor for IntegerPublicKey {
    type Ciphertext = IntegerCiphertext;

    fn encrypt(&self, bit: Bit, source: &mut Source) -> IntegerCiphertext {
        let r: i64 = self.noise.sample(source);
        let mut c: Integer = Integer::from(r) * 2u32 + bit.as_u8();
        self.zeros.iter().for_each(|x| {
            if source.next_bool() {
                c += x;
            }
        });
        IntegerCiphertext(reduce(c, &self.x0))
    }
}

impl HomomorphicOps for IntegerPublicKey {
    type Ciphertext = IntegerCiphertext;

    fn trivial(&self, bit: Bit) -> IntegerCiphertext {
        IntegerCiphertext(Integer::from(bit.as_u8()))
    }

    fn xor(&self, lhs: &IntegerCiphertext, rhs: &IntegerCiphertext) -> IntegerCiphertext {
        IntegerCiphertext(reduce(Integer::from(&lhs.0 + &rhs.0), &self.x0))
    }

    fn and(&self, lhs: &IntegerCiphertext, rhs: &IntegerCiphertext) -> IntegerCiphertext {
        IntegerCiphertext(reduce(Integer::from(&lhs.0 * &rhs.0), &self.x0))
    }

    fn max_degree(&self, terms: usize) -> Option<usize> {
        Some(self.params.max_degree(terms))
    }
}
