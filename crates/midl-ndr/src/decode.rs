//! NDR decoding: the two-phase [`NdrDecode`] trait and [`NdrReader`].
//!
//! Decoding mirrors encoding. `ndr_decode` reads the inline part and, for
//! every present pointer, leaves a default placeholder behind. The deferred
//! pass then fills those placeholders in field order.

use crate::error::NdrError;
use crate::{NdrContext, Result};
use bytes::{Buf, Bytes};

/// Types that can be decoded from NDR format
pub trait NdrDecode: Sized {
    /// Read the inline portion, including pointer tags.
    fn ndr_decode(r: &mut NdrReader) -> Result<Self>;

    /// Read the pointees announced by `ndr_decode`.
    fn ndr_decode_deferred(&mut self, _r: &mut NdrReader) -> Result<()> {
        Ok(())
    }
}

impl<T: NdrDecode> NdrDecode for Box<T> {
    fn ndr_decode(r: &mut NdrReader) -> Result<Self> {
        T::ndr_decode(r).map(Box::new)
    }

    fn ndr_decode_deferred(&mut self, r: &mut NdrReader) -> Result<()> {
        (**self).ndr_decode_deferred(r)
    }
}

/// Stub reader
#[derive(Debug, Clone)]
pub struct NdrReader {
    buf: Bytes,
    len: usize,
    ctx: NdrContext,
}

macro_rules! reader_scalar {
    ($($name:ident, $ty:ty, $size:expr;)*) => {
        $(
            pub fn $name(&mut self) -> Result<$ty> {
                self.align($size)?;
                self.need($size)?;
                Ok(self.ctx.$name(&mut self.buf))
            }
        )*
    };
}

impl NdrReader {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self::with_context(buf, NdrContext::new())
    }

    pub fn with_context(buf: impl Into<Bytes>, ctx: NdrContext) -> Self {
        let buf = buf.into();
        Self {
            len: buf.len(),
            buf,
            ctx,
        }
    }

    pub fn context(&self) -> NdrContext {
        self.ctx
    }

    pub fn position(&self) -> usize {
        self.len - self.buf.remaining()
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn need(&self, needed: usize) -> Result<()> {
        if self.buf.remaining() < needed {
            return Err(NdrError::BufferUnderflow {
                needed,
                have: self.buf.remaining(),
            });
        }
        Ok(())
    }

    /// Skip padding up to the next `alignment` boundary.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let padding = NdrContext::align_padding(self.position(), alignment);
        self.need(padding)?;
        self.buf.advance(padding);
        Ok(())
    }

    pub fn get_u8(&mut self) -> Result<u8> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn get_i8(&mut self) -> Result<i8> {
        self.need(1)?;
        Ok(self.buf.get_i8())
    }

    reader_scalar! {
        get_u16, u16, 2;
        get_i16, i16, 2;
        get_u32, u32, 4;
        get_i32, i32, 4;
        get_u64, u64, 8;
        get_i64, i64, 8;
        get_f32, f32, 4;
        get_f64, f64, 8;
    }

    /// Raw bytes, no alignment.
    pub fn get_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.need(len)?;
        Ok(self.buf.split_to(len))
    }

    /// Conformance (max_count), bounded by `limit`.
    pub fn read_conformance(&mut self, limit: usize) -> Result<usize> {
        let count = self.get_u32()? as usize;
        if count > limit {
            return Err(NdrError::AllocationLimitExceeded {
                requested: count,
                limit,
            });
        }
        Ok(count)
    }

    /// Read a pointer tag; `true` when a pointee follows in the deferred pass.
    pub fn read_pointer(&mut self) -> Result<bool> {
        Ok(self.get_u32()? != 0)
    }

    /// Inline pass only.
    pub fn read<T: NdrDecode>(&mut self) -> Result<T> {
        T::ndr_decode(self)
    }

    /// Deferred pass only.
    pub fn read_deferred<T: NdrDecode>(&mut self, value: &mut T) -> Result<()> {
        value.ndr_decode_deferred(self)
    }

    /// Inline pass followed by the deferred flush, as for a top-level parameter.
    pub fn read_full<T: NdrDecode>(&mut self) -> Result<T> {
        let mut value = T::ndr_decode(self)?;
        value.ndr_decode_deferred(self)?;
        Ok(value)
    }
}
