use auxqhe_sampling::Source;
use auxqhe_utils::{ReaderFrom, WriterTo};

use crate::{
    Bit, BitDecryptor, BitEncryptor, ClearScheme, HomomorphicOps,
    integer::{IntegerCiphertext, IntegerParams, IntegerSecretKey, MAX_CIPHERTEXT_BYTES, ParamsError},
};

fn keys(seed: u8) -> IntegerSecretKey {
    let mut source: Source = Source::new([seed; 32]);
    IntegerSecretKey::generate(IntegerParams::toy(), &mut source).unwrap()
}

const BITS: [Bit; 2] = [Bit::ZERO, Bit::ONE];

#[test]
fn encrypt_decrypt_secret_and_public() {
    let sk: IntegerSecretKey = keys(1);
    let pk = sk.public_key();
    let mut source: Source = Source::new([2u8; 32]);
    (0..32).for_each(|_| {
        BITS.iter().for_each(|&m| {
            assert_eq!(sk.decrypt(&sk.encrypt(m, &mut source)), m);
            assert_eq!(sk.decrypt(&pk.encrypt(m, &mut source)), m);
        });
    });
}

#[test]
fn xor_and_match_plaintext() {
    let sk: IntegerSecretKey = keys(3);
    let pk = sk.public_key();
    let mut source: Source = Source::new([4u8; 32]);
    BITS.iter().for_each(|&x| {
        BITS.iter().for_each(|&y| {
            let cx: IntegerCiphertext = pk.encrypt(x, &mut source);
            let cy: IntegerCiphertext = sk.encrypt(y, &mut source);
            assert_eq!(sk.decrypt(&pk.xor(&cx, &cy)), ClearScheme.xor(&x, &y), "{} ^ {}", x, y);
            assert_eq!(sk.decrypt(&pk.and(&cx, &cy)), ClearScheme.and(&x, &y), "{} & {}", x, y);
        });
    });
}

#[test]
fn trivial_constants_compose() {
    let sk: IntegerSecretKey = keys(5);
    let pk = sk.public_key();
    let mut source: Source = Source::new([6u8; 32]);
    let c: IntegerCiphertext = pk.encrypt(Bit::ONE, &mut source);
    let one: IntegerCiphertext = pk.trivial(Bit::ONE);
    assert_eq!(sk.decrypt(&pk.xor(&c, &one)), Bit::ZERO);
    assert_eq!(sk.decrypt(&pk.and(&c, &one)), Bit::ONE);
    assert_eq!(sk.decrypt(&pk.trivial(Bit::ZERO)), Bit::ZERO);
}

#[test]
fn degree_two_sums_stay_within_budget() {
    let sk: IntegerSecretKey = keys(7);
    let pk = sk.public_key();
    let mut source: Source = Source::new([8u8; 32]);

    let mut expected: Bit = Bit::ZERO;
    let mut acc: IntegerCiphertext = pk.trivial(Bit::ZERO);
    (0..512).for_each(|_| {
        let x: Bit = Bit::new(source.next_bool());
        let y: Bit = Bit::new(source.next_bool());
        let prod: IntegerCiphertext = pk.and(&pk.encrypt(x, &mut source), &pk.encrypt(y, &mut source));
        pk.xor_inplace(&mut acc, &prod);
        expected ^= x & y;
    });

    assert_eq!(sk.decrypt(&acc), expected);
    assert!(sk.noise_budget(&acc) > 256, "budget: {}", sk.noise_budget(&acc));
    assert!(acc.bits() <= pk.x0_bits());
}

#[test]
fn ciphertext_serialization() {
    let sk: IntegerSecretKey = keys(9);
    let mut source: Source = Source::new([10u8; 32]);
    let original: IntegerCiphertext = sk.encrypt(Bit::ONE, &mut source);

    let mut buffer: Vec<u8> = Vec::new();
    original.write_to(&mut buffer).expect("write_to failed");

    let mut receiver: IntegerCiphertext = IntegerCiphertext::default();
    let mut reader: &[u8] = &buffer;
    receiver.read_from(&mut reader).expect("read_from failed");

    assert_eq!(original, receiver);
    assert_eq!(sk.decrypt(&receiver), Bit::ONE);
}

#[test]
fn corrupted_sign_tag_is_rejected() {
    let mut receiver: IntegerCiphertext = IntegerCiphertext::default();
    let buffer: [u8; 9] = [7, 0, 0, 0, 0, 0, 0, 0, 0];
    let mut reader: &[u8] = &buffer;
    let err = receiver.read_from(&mut reader).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn oversized_length_is_rejected() {
    let mut buffer: Vec<u8> = vec![0u8];
    buffer.extend_from_slice(&(1u64 << 46).to_le_bytes());
    let mut receiver: IntegerCiphertext = IntegerCiphertext::default();
    let mut reader: &[u8] = &buffer;
    let err = receiver.read_from(&mut reader).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn truncated_digits_are_rejected() {
    let mut buffer: Vec<u8> = vec![0u8];
    buffer.extend_from_slice(&64u64.to_le_bytes());
    buffer.extend_from_slice(&[0xAB; 10]);
    let mut receiver: IntegerCiphertext = IntegerCiphertext::default();
    let mut reader: &[u8] = &buffer;
    let err = receiver.read_from(&mut reader).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

#[test]
fn supported_degree() {
    let toy: IntegerParams = IntegerParams::toy();
    assert_eq!(toy.fresh_noise_bits(), 23);
    assert_eq!(toy.max_degree(4), 16);
    assert_eq!(toy.max_degree(1 << 24), 15);

    let small: IntegerParams = IntegerParams {
        rho: 16,
        eta: 60,
        gamma: 400,
        tau: 24,
    };
    assert_eq!(small.validate(), Ok(()));
    assert_eq!(small.max_degree(8), 2);
    assert_eq!(small.max_degree(1 << 40), 0);

    let sk: IntegerSecretKey = IntegerSecretKey::generate(small, &mut Source::new([11u8; 32])).unwrap();
    let pk = sk.public_key();
    assert_eq!(pk.max_degree(8), Some(2));
    assert_eq!(ClearScheme.max_degree(8), None);

    // Eight degree-2 products sit right at the bound and still decrypt.
    let mut source: Source = Source::new([12u8; 32]);
    let mut expected: Bit = Bit::ZERO;
    let mut acc: IntegerCiphertext = pk.trivial(Bit::ZERO);
    (0..8).for_each(|_| {
        let x: Bit = Bit::new(source.next_bool());
        let y: Bit = Bit::new(source.next_bool());
        let prod: IntegerCiphertext = pk.and(&pk.encrypt(x, &mut source), &pk.encrypt(y, &mut source));
        pk.xor_inplace(&mut acc, &prod);
        expected ^= x & y;
    });
    assert_eq!(sk.decrypt(&acc), expected);
}

#[test]
fn params_validation() {
    assert_eq!(IntegerParams::toy().validate(), Ok(()));

    let mut p: IntegerParams = IntegerParams::toy();
    p.rho = 0;
    assert_eq!(p.validate(), Err(ParamsError::Noise(0)));

    let mut p: IntegerParams = IntegerParams::toy();
    p.eta = 32;
    assert!(matches!(p.validate(), Err(ParamsError::Secret { .. })));

    let mut p: IntegerParams = IntegerParams::toy();
    p.gamma = p.eta;
    assert!(matches!(p.validate(), Err(ParamsError::Ciphertext { .. })));

    let mut p: IntegerParams = IntegerParams::toy();
    p.gamma = (MAX_CIPHERTEXT_BYTES * 8 + 1) as u32;
    assert!(matches!(p.validate(), Err(ParamsError::Oversized { .. })));

    let mut p: IntegerParams = IntegerParams::toy();
    p.tau = 0;
    assert_eq!(p.validate(), Err(ParamsError::EmptyPublicKey));
}
