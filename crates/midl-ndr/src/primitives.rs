//! NDR primitive type implementations
//!
//! | MIDL Type      | Rust Type | Size | Alignment |
//! |----------------|-----------|------|-----------|
//! | boolean        | bool      | 1    | 1         |
//! | byte/char      | u8        | 1    | 1         |
//! | small          | i8        | 1    | 1         |
//! | short          | i16       | 2    | 2         |
//! | long/int       | i32       | 4    | 4         |
//! | hyper          | i64       | 8    | 8         |
//! | unsigned short | u16       | 2    | 2         |
//! | unsigned long  | u32       | 4    | 4         |
//! | unsigned hyper | u64       | 8    | 8         |
//! | float          | f32       | 4    | 4         |
//! | double         | f64       | 8    | 8         |
//!
//! Primitives have no deferred part.

use crate::{NdrDecode, NdrEncode, NdrReader, NdrWriter, Result};

macro_rules! impl_ndr_primitive {
    ($($ty:ty => $put:ident, $get:ident;)*) => {
        $(
            impl NdrEncode for $ty {
                fn ndr_encode(&self, w: &mut NdrWriter) -> Result<()> {
                    w.$put(*self);
                    Ok(())
                }
            }

            impl NdrDecode for $ty {
                fn ndr_decode(r: &mut NdrReader) -> Result<Self> {
                    r.$get()
                }
            }
        )*
    };
}

impl_ndr_primitive! {
    u8 => put_u8, get_u8;
    i8 => put_i8, get_i8;
    u16 => put_u16, get_u16;
    i16 => put_i16, get_i16;
    u32 => put_u32, get_u32;
    i32 => put_i32, get_i32;
    u64 => put_u64, get_u64;
    i64 => put_i64, get_i64;
    f32 => put_f32, get_f32;
    f64 => put_f64, get_f64;
}

// boolean is a single byte; any non-zero value is true
impl NdrEncode for bool {
    fn ndr_encode(&self, w: &mut NdrWriter) -> Result<()> {
        w.put_u8(u8::from(*self));
        Ok(())
    }
}

impl NdrDecode for bool {
    fn ndr_decode(r: &mut NdrReader) -> Result<Self> {
        Ok(r.get_u8()? != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NdrContext;

    #[test]
    fn test_mixed_primitives_align_relative_to_stub() {
        let mut w = NdrWriter::new();
        w.write(&1u8).unwrap();
        w.write(&-2i16).unwrap();
        w.write(&3.5f64).unwrap();
        assert_eq!(w.position(), 16);

        let mut r = NdrReader::new(w.into_bytes());
        assert_eq!(r.read::<u8>().unwrap(), 1);
        assert_eq!(r.read::<i16>().unwrap(), -2);
        assert_eq!(r.read::<f64>().unwrap(), 3.5);
    }

    #[test]
    fn test_bool_encoding() {
        let mut w = NdrWriter::new();
        w.write(&true).unwrap();
        w.write(&false).unwrap();
        assert_eq!(w.as_slice(), &[1, 0]);

        let mut r = NdrReader::new(vec![0x7f]);
        assert!(r.read::<bool>().unwrap());
    }

    #[test]
    fn test_big_endian_stub() {
        let mut w = NdrWriter::with_context(NdrContext::big_endian());
        w.write(&0x0102_0304u32).unwrap();
        assert_eq!(w.as_slice(), &[1, 2, 3, 4]);

        let mut r = NdrReader::with_context(w.into_bytes(), NdrContext::big_endian());
        assert_eq!(r.read::<u32>().unwrap(), 0x0102_0304);
    }
}
