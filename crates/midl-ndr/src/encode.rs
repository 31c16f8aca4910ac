//! NDR encoding: the two-phase [`NdrEncode`] trait and [`NdrWriter`].
//!
//! A value is written in two passes. `ndr_encode` emits the inline part:
//! scalars, and a referent tag for every embedded pointer. Then
//! `ndr_encode_deferred` emits the pointees in the same field order, each
//! pointee followed by its own deferred part.
//!
//! ```text
//! struct { a: *A, b: *B }  ->  [tag a][tag b][A inline][A deferred][B inline][B deferred]
//! ```

use crate::{NdrContext, Result};
use bytes::{BufMut, Bytes, BytesMut};

/// First referent id handed out by a writer. Windows stubs use the same base.
pub const REFERENT_ID_BASE: u32 = 0x0002_0000;

/// Types that can be encoded to NDR format
pub trait NdrEncode {
    /// Write the inline portion, including pointer tags.
    fn ndr_encode(&self, w: &mut NdrWriter) -> Result<()>;

    /// Write the bodies of pointers emitted by `ndr_encode`.
    fn ndr_encode_deferred(&self, _w: &mut NdrWriter) -> Result<()> {
        Ok(())
    }
}

impl<T: NdrEncode + ?Sized> NdrEncode for &T {
    fn ndr_encode(&self, w: &mut NdrWriter) -> Result<()> {
        (**self).ndr_encode(w)
    }

    fn ndr_encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        (**self).ndr_encode_deferred(w)
    }
}

impl<T: NdrEncode + ?Sized> NdrEncode for Box<T> {
    fn ndr_encode(&self, w: &mut NdrWriter) -> Result<()> {
        (**self).ndr_encode(w)
    }

    fn ndr_encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        (**self).ndr_encode_deferred(w)
    }
}

/// Stub writer
#[derive(Debug)]
pub struct NdrWriter {
    buf: BytesMut,
    ctx: NdrContext,
    next_referent: u32,
}

impl NdrWriter {
    pub fn new() -> Self {
        Self::with_context(NdrContext::new())
    }

    pub fn with_context(ctx: NdrContext) -> Self {
        Self {
            buf: BytesMut::with_capacity(256),
            ctx,
            next_referent: REFERENT_ID_BASE,
        }
    }

    pub fn context(&self) -> NdrContext {
        self.ctx
    }

    /// Bytes written so far; alignment is relative to the stub start.
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// Pad with zeros up to the next `alignment` boundary.
    pub fn align(&mut self, alignment: usize) {
        let padding = NdrContext::align_padding(self.buf.len(), alignment);
        self.buf.put_bytes(0, padding);
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn put_i8(&mut self, value: i8) {
        self.buf.put_i8(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.align(2);
        self.ctx.put_u16(&mut self.buf, value);
    }

    pub fn put_i16(&mut self, value: i16) {
        self.align(2);
        self.ctx.put_i16(&mut self.buf, value);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.align(4);
        self.ctx.put_u32(&mut self.buf, value);
    }

    pub fn put_i32(&mut self, value: i32) {
        self.align(4);
        self.ctx.put_i32(&mut self.buf, value);
    }

    pub fn put_u64(&mut self, value: u64) {
        self.align(8);
        self.ctx.put_u64(&mut self.buf, value);
    }

    pub fn put_i64(&mut self, value: i64) {
        self.align(8);
        self.ctx.put_i64(&mut self.buf, value);
    }

    pub fn put_f32(&mut self, value: f32) {
        self.align(4);
        self.ctx.put_f32(&mut self.buf, value);
    }

    pub fn put_f64(&mut self, value: f64) {
        self.align(8);
        self.ctx.put_f64(&mut self.buf, value);
    }

    /// Raw bytes, no alignment.
    pub fn put_slice(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    /// Conformance (max_count) of a conformant array or struct.
    pub fn write_conformance(&mut self, max_count: usize) -> Result<()> {
        let count = u32::try_from(max_count).map_err(|_| crate::NdrError::IntegerOverflow)?;
        self.put_u32(count);
        Ok(())
    }

    /// Write a pointer tag: a fresh referent id, or 0 for null.
    pub fn write_pointer(&mut self, present: bool) -> u32 {
        let referent = if present {
            let id = self.next_referent;
            self.next_referent = self.next_referent.wrapping_add(4);
            id
        } else {
            0
        };
        self.put_u32(referent);
        referent
    }

    /// Inline pass only.
    pub fn write<T: NdrEncode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.ndr_encode(self)
    }

    /// Deferred pass only.
    pub fn write_deferred<T: NdrEncode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.ndr_encode_deferred(self)
    }

    /// Inline pass followed by the deferred flush, as for a top-level parameter.
    pub fn write_full<T: NdrEncode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.ndr_encode(self)?;
        value.ndr_encode_deferred(self)
    }
}

impl Default for NdrWriter {
    fn default() -> Self {
        Self::new()
    }
}
