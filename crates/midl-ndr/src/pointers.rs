//! NDR pointer encoding
//!
//! `Option<T>` is the `[unique]` pointer: nullable, no aliasing. Its inline
//! part is a 4-byte referent id (0 for `None`) and the pointee is written in
//! the deferred pass.
//!
//! Top-level `[ref]` parameters have no wire representation at all, so they
//! are modelled by the pointee type itself.

use crate::{NdrDecode, NdrEncode, NdrReader, NdrWriter, Result};

impl<T: NdrEncode> NdrEncode for Option<T> {
    fn ndr_encode(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_pointer(self.is_some());
        Ok(())
    }

    fn ndr_encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        if let Some(value) = self {
            value.ndr_encode(w)?;
            value.ndr_encode_deferred(w)?;
        }
        Ok(())
    }
}

impl<T: NdrDecode + Default> NdrDecode for Option<T> {
    fn ndr_decode(r: &mut NdrReader) -> Result<Self> {
        // placeholder until the deferred pass reaches the pointee
        Ok(r.read_pointer()?.then(T::default))
    }

    fn ndr_decode_deferred(&mut self, r: &mut NdrReader) -> Result<()> {
        if let Some(slot) = self {
            *slot = T::ndr_decode(r)?;
            slot.ndr_decode_deferred(r)?;
        }
        Ok(())
    }
}
