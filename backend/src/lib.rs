//! # auxqhe-backend
//!
//! Classical homomorphic encryption of single bits, as consumed by the
//! auxiliary-state QHE key evaluator.
//!
//! The evaluator only needs four operations on encrypted bits: `encrypt`,
//! `xor`, `and` and `decrypt`, with `decrypt(f(encrypt(x), encrypt(y))) ==
//! f(x, y)` for `f` in `{xor, and}`. They are split over three traits so
//! that code holding only the public half of a scheme cannot decrypt:
//!
//! - [`HomomorphicOps`]: public evaluation (`trivial`, `xor`, `and`).
//! - [`BitEncryptor`]: encryption of a plaintext bit.
//! - [`BitDecryptor`]: decryption, held by the client only.
//!
//! Two backends are provided:
//!
//! - [`reference::ClearScheme`]: ciphertexts are the plaintext bits. Used as
//!   a correctness oracle in tests.
//! - [`integer`]: a somewhat-homomorphic scheme over the integers
//!   (`c = p*q + 2r + m`) built on `rug::Integer`.

pub mod api;
pub mod bit;
pub mod integer;
pub mod reference;

pub use api::{BitDecryptor, BitEncryptor, HomomorphicOps};
pub use bit::{Bit, bits_from_u8};
pub use integer::{IntegerCiphertext, IntegerParams, IntegerPublicKey, IntegerSecretKey, ParamsError};
pub use reference::ClearScheme;
