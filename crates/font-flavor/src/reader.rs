//! Big-endian cursor used by the WOFF and WOFF2 decoders.

use crate::error::{FlavorError, Result};

pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    format: &'static str,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8], format: &'static str) -> Self {
        Self { data, pos: 0, format }
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                FlavorError::malformed(
                    self.format,
                    format!("read of {len} bytes at offset {} overruns buffer", self.pos),
                )
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// `UIntBase128` as defined by WOFF2.
    pub(crate) fn uint_base128(&mut self) -> Result<u32> {
        let mut accum: u32 = 0;
        for i in 0..5 {
            let byte = self.u8()?;
            if i == 0 && byte == 0x80 {
                return Err(FlavorError::malformed(self.format, "UIntBase128 with leading zero"));
            }
            if accum & 0xFE00_0000 != 0 {
                return Err(FlavorError::malformed(self.format, "UIntBase128 overflow"));
            }
            accum = (accum << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(accum);
            }
        }
        Err(FlavorError::malformed(self.format, "UIntBase128 longer than 5 bytes"))
    }
}
