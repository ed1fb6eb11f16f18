//! Wire primitives
//!
//! Format:
//! - small int: unsigned LEB128, at most 5 bytes for a u32
//! - byte: raw u8
//! - boolean: one byte, 0 or 1
//! - string: small int byte length, then UTF-8 bytes

use std::io::{Read, Write};

use super::errors::{CodecError, CodecResult};

/// Largest number of bytes a u32 varint can occupy
const MAX_VARINT_LEN: usize = 5;

/// Writes wire primitives to an underlying writer, counting bytes.
pub struct WireEncoder<'a, W: Write> {
    writer: &'a mut W,
    bytes_written: u64,
}

impl<'a, W: Write> WireEncoder<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn write_all(&mut self, bytes: &[u8]) -> CodecResult<()> {
        self.writer.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    pub fn write_byte(&mut self, value: u8) -> CodecResult<()> {
        self.write_all(&[value])
    }

    pub fn write_bool(&mut self, value: bool) -> CodecResult<()> {
        self.write_byte(u8::from(value))
    }

    pub fn write_small_int(&mut self, mut value: u32) -> CodecResult<()> {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let mut len = 0;
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                buf[len] = byte;
                len += 1;
                break;
            }
            buf[len] = byte | 0x80;
            len += 1;
        }
        self.write_all(&buf[..len])
    }

    /// Writes a length-prefixed string
    pub fn write_string(&mut self, value: &str) -> CodecResult<()> {
        let len = u32::try_from(value.len())
            .map_err(|_| CodecError::malformed(format!("string too long: {} bytes", value.len())))?;
        self.write_small_int(len)?;
        self.write_all(value.as_bytes())
    }

    /// Writes a collection length
    pub fn write_len(&mut self, len: usize) -> CodecResult<()> {
        let len = u32::try_from(len)
            .map_err(|_| CodecError::malformed(format!("collection too large: {}", len)))?;
        self.write_small_int(len)
    }
}

/// Reads wire primitives from an underlying reader, counting bytes.
pub struct WireDecoder<'a, R: Read> {
    reader: &'a mut R,
    bytes_read: u64,
}

impl<'a, R: Read> WireDecoder<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        Self {
            reader,
            bytes_read: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> CodecResult<()> {
        self.reader.read_exact(buf)?;
        self.bytes_read += buf.len() as u64;
        Ok(())
    }

    pub fn read_byte(&mut self) -> CodecResult<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_bool(&mut self) -> CodecResult<bool> {
        match self.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::malformed(format!("invalid boolean byte: {}", other))),
        }
    }

    pub fn read_small_int(&mut self) -> CodecResult<u32> {
        let mut value: u32 = 0;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_byte()?;
            let bits = u32::from(byte & 0x7f);
            // the fifth byte may only carry the top 4 bits
            if i == MAX_VARINT_LEN - 1 && bits > 0x0f {
                return Err(CodecError::malformed("varint overflows u32"));
            }
            value |= bits << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(CodecError::malformed("varint longer than 5 bytes"))
    }

    /// Reads a length-prefixed string, rejecting lengths above `max_len`
    pub fn read_string(&mut self, max_len: usize) -> CodecResult<String> {
        let len = self.read_small_int()? as usize;
        if len > max_len {
            return Err(CodecError::malformed(format!(
                "string length {} exceeds limit {}",
                len, max_len
            )));
        }
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| CodecError::malformed(format!("invalid UTF-8: {}", e)))
    }
}
