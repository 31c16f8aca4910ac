//! NDR encoding/decoding context
//!
//! The context carries the negotiated data representation (byte order) and
//! the alignment arithmetic shared by [`NdrWriter`](crate::NdrWriter) and
//! [`NdrReader`](crate::NdrReader).

use bytes::{Buf, BufMut};

/// NDR data representation for one stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdrContext {
    /// Whether integers and floats are little-endian
    pub little_endian: bool,
}

macro_rules! endian_accessors {
    ($($put:ident, $get:ident, $ty:ty, $put_le:ident, $put_be:ident, $get_le:ident, $get_be:ident;)*) => {
        $(
            #[inline]
            pub fn $put<B: BufMut>(&self, buf: &mut B, value: $ty) {
                if self.little_endian {
                    buf.$put_le(value);
                } else {
                    buf.$put_be(value);
                }
            }

            #[inline]
            pub fn $get<B: Buf>(&self, buf: &mut B) -> $ty {
                if self.little_endian {
                    buf.$get_le()
                } else {
                    buf.$get_be()
                }
            }
        )*
    };
}

impl NdrContext {
    /// Little-endian NDR20, the representation every Windows peer uses
    pub fn new() -> Self {
        Self { little_endian: true }
    }

    pub fn big_endian() -> Self {
        Self { little_endian: false }
    }

    pub fn with_byte_order(little_endian: bool) -> Self {
        Self { little_endian }
    }

    /// Build a context from the 4-byte data representation label of a PDU.
    pub fn from_drep(drep: [u8; 4]) -> Self {
        Self {
            little_endian: drep[0] & 0x10 != 0,
        }
    }

    /// The 4-byte data representation label (ASCII, IEEE float).
    pub fn drep(&self) -> [u8; 4] {
        [if self.little_endian { 0x10 } else { 0x00 }, 0, 0, 0]
    }

    /// Padding needed to move `position` onto an `alignment` boundary
    #[inline]
    pub fn align_padding(position: usize, alignment: usize) -> usize {
        if alignment <= 1 {
            return 0;
        }
        match position % alignment {
            0 => 0,
            rem => alignment - rem,
        }
    }

    endian_accessors! {
        put_u16, get_u16, u16, put_u16_le, put_u16, get_u16_le, get_u16;
        put_i16, get_i16, i16, put_i16_le, put_i16, get_i16_le, get_i16;
        put_u32, get_u32, u32, put_u32_le, put_u32, get_u32_le, get_u32;
        put_i32, get_i32, i32, put_i32_le, put_i32, get_i32_le, get_i32;
        put_u64, get_u64, u64, put_u64_le, put_u64, get_u64_le, get_u64;
        put_i64, get_i64, i64, put_i64_le, put_i64, get_i64_le, get_i64;
        put_f32, get_f32, f32, put_f32_le, put_f32, get_f32_le, get_f32;
        put_f64, get_f64, f64, put_f64_le, put_f64, get_f64_le, get_f64;
    }
}

impl Default for NdrContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_alignment_padding() {
        assert_eq!(NdrContext::align_padding(0, 4), 0);
        assert_eq!(NdrContext::align_padding(1, 4), 3);
        assert_eq!(NdrContext::align_padding(3, 4), 1);
        assert_eq!(NdrContext::align_padding(5, 8), 3);
        assert_eq!(NdrContext::align_padding(5, 1), 0);
        assert_eq!(NdrContext::align_padding(7, 0), 0);
    }

    #[test]
    fn test_drep_label() {
        assert_eq!(NdrContext::new().drep(), [0x10, 0, 0, 0]);
        assert!(NdrContext::from_drep([0x10, 0, 0, 0]).little_endian);
        assert!(!NdrContext::from_drep([0x00, 0, 0, 0]).little_endian);
    }

    #[test]
    fn test_byte_order() {
        let mut le = BytesMut::new();
        NdrContext::new().put_u32(&mut le, 0x12345678);
        assert_eq!(&le[..], &[0x78, 0x56, 0x34, 0x12]);

        let mut be = BytesMut::new();
        NdrContext::big_endian().put_u32(&mut be, 0x12345678);
        assert_eq!(&be[..], &[0x12, 0x34, 0x56, 0x78]);

        let mut reader = be.freeze();
        assert_eq!(NdrContext::big_endian().get_u32(&mut reader), 0x12345678);
    }
}
