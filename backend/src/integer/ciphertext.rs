use std::io::{Read, Result, Write};

use auxqhe_utils::{ReaderFrom, WriterTo};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rug::{Integer, integer::Order};

/// Ciphertext of the integer scheme.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntegerCiphertext(pub(crate) Integer);

impl IntegerCiphertext {
    /// Bit-length of the underlying integer.
    pub fn bits(&self) -> u32 {
        self.0.significant_bits()
    }
}

/// Upper bound on the serialized magnitude of a ciphertext, in bytes.
/// Parameters with `gamma` above `8 * MAX_CIPHERTEXT_BYTES` are rejected.
pub const MAX_CIPHERTEXT_BYTES: u64 = 1 << 20;

const SIGN_POSITIVE: u8 = 0;
const SIGN_NEGATIVE: u8 = 1;

impl WriterTo for IntegerCiphertext {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let sign: u8 = if self.0 < 0 { SIGN_NEGATIVE } else { SIGN_POSITIVE };
        let digits: Vec<u8> = self.0.to_digits::<u8>(Order::Lsf);
        writer.write_u8(sign)?;
        writer.write_u64::<LittleEndian>(digits.len() as u64)?;
        writer.write_all(&digits)?;
        Ok(())
    }
}

impl ReaderFrom for IntegerCiphertext {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let sign: u8 = reader.read_u8()?;
        if sign != SIGN_POSITIVE && sign != SIGN_NEGATIVE {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid sign tag {}", sign),
            ));
        }
        let len: u64 = reader.read_u64::<LittleEndian>()?;
        if len > MAX_CIPHERTEXT_BYTES {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("ciphertext length {} > max {}", len, MAX_CIPHERTEXT_BYTES),
            ));
        }
        let mut digits: Vec<u8> = Vec::with_capacity(len as usize);
        reader.by_ref().take(len).read_to_end(&mut digits)?;
        if digits.len() as u64 != len {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("read {} of {} ciphertext bytes", digits.len(), len),
            ));
        }
        let magnitude: Integer = Integer::from_digits(&digits, Order::Lsf);
        self.0 = if sign == SIGN_NEGATIVE { -magnitude } else { magnitude };
        Ok(())
    }
}
