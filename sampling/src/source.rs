use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use rand_core::RngCore;

/// Deterministic randomness source.
///
/// Every random choice in the workspace (QOTP keys, secret and noise
/// sampling, mock measurement outcomes) is drawn from a `Source` so that a
/// fixed seed reproduces a run bit for bit.
pub struct Source {
    source: ChaCha8Rng,
}

/// Fresh 32-byte seed from the thread-local OS-seeded generator.
pub fn new_seed() -> [u8; 32] {
    let mut seed: [u8; 32] = [0u8; 32];
    rand::rng().fill_bytes(&mut seed);
    seed
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    pub fn branch(&mut self) -> ([u8; 32], Self) {
        let seed: [u8; 32] = self.new_seed();
        (seed, Source::new(seed))
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.fill_bytes(&mut seed);
        seed
    }

    #[inline(always)]
    pub fn next_bool(&mut self) -> bool {
        self.next_u32() & 1 == 1
    }

    /// `len` independent uniform bits.
    pub fn next_bools(&mut self, len: usize) -> Vec<bool> {
        (0..len).map(|_| self.next_bool()).collect()
    }

    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }

    /// Uniform `bits`-bit little-endian byte string. Bits above `bits` in the
    /// last byte are cleared.
    pub fn next_bytes_bits(&mut self, bits: u32) -> Vec<u8> {
        let len: usize = bits.div_ceil(8) as usize;
        let mut bytes: Vec<u8> = vec![0u8; len];
        self.fill_bytes(&mut bytes);
        let rem: u32 = bits % 8;
        if rem != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= (1u8 << rem) - 1;
            }
        }
        bytes
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::Source;

    #[test]
    fn same_seed_same_stream() {
        let mut s0 = Source::new([7u8; 32]);
        let mut s1 = Source::new([7u8; 32]);
        assert_eq!(s0.next_bools(64), s1.next_bools(64));
    }

    #[test]
    fn branch_diverges_from_parent() {
        let mut parent = Source::new([1u8; 32]);
        let (_, mut child) = parent.branch();
        assert_ne!(parent.new_seed(), child.new_seed());
    }

    #[test]
    fn next_bytes_bits_masks_top_byte() {
        let mut source = Source::new([3u8; 32]);
        (1..40).for_each(|bits| {
            let bytes = source.next_bytes_bits(bits);
            assert_eq!(bytes.len(), (bits as usize + 7) / 8);
            if bits % 8 != 0 {
                assert_eq!(bytes.last().unwrap() >> (bits % 8), 0);
            }
        });
    }
}
