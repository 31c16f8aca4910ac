//! wireVARIANT (MS-OAUT 2.2.29.2)
//!
//! ```text
//! clSize(4) rpcReserved(4) vt(2) wReserved1..3(6)
//! union tag(4) pad(4) arm
//! ```
//!
//! The structure and its union are 8-byte aligned, so every arm starts at
//! offset 24. Pointer arms (BSTR, interface pointers, SAFEARRAY) write their
//! referent inline and their body in the deferred pass. The SAFEARRAY arm is
//! `wirePSAFEARRAY`, a pointer to a pointer: two referents precede the array.

use super::SafeArray;
use crate::types::MInterfacePointer;
use midl_ndr::{BString, NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

/// VARTYPE values carried by [`Variant`]
pub mod vt {
    pub const EMPTY: u16 = 0;
    pub const NULL: u16 = 1;
    pub const I2: u16 = 2;
    pub const I4: u16 = 3;
    pub const R4: u16 = 4;
    pub const R8: u16 = 5;
    pub const CY: u16 = 6;
    pub const DATE: u16 = 7;
    pub const BSTR: u16 = 8;
    pub const DISPATCH: u16 = 9;
    pub const ERROR: u16 = 10;
    pub const BOOL: u16 = 11;
    pub const VARIANT: u16 = 12;
    pub const UNKNOWN: u16 = 13;
    pub const I1: u16 = 16;
    pub const UI1: u16 = 17;
    pub const UI2: u16 = 18;
    pub const UI4: u16 = 19;
    pub const I8: u16 = 20;
    pub const UI8: u16 = 21;
    pub const INT: u16 = 22;
    pub const UINT: u16 = 23;
    pub const ARRAY: u16 = 0x2000;
    pub const BYREF: u16 = 0x4000;
}

/// VARIANT_BOOL: `-1` is true, `0` is false
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VariantBool(pub i16);

impl VariantBool {
    pub const TRUE: Self = Self(-1);
    pub const FALSE: Self = Self(0);

    pub fn is_true(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for VariantBool {
    fn from(value: bool) -> Self {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

impl From<VariantBool> for bool {
    fn from(value: VariantBool) -> Self {
        value.is_true()
    }
}

impl NdrEncode for VariantBool {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.put_i16(self.0);
        Ok(())
    }
}

impl NdrDecode for VariantBool {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        r.get_i16().map(Self)
    }
}

/// Automation VARIANT
///
/// Null pointer arms stay distinguishable from empty values: a `Bstr(None)`
/// is a NULL BSTR, not `""`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Variant {
    #[default]
    Empty,
    Null,
    I1(i8),
    I2(i16),
    I4(i32),
    I8(i64),
    Ui1(u8),
    Ui2(u16),
    Ui4(u32),
    Ui8(u64),
    Int(i32),
    Uint(u32),
    R4(f32),
    R8(f64),
    /// Currency, in units of 1/10000
    Cy(i64),
    Date(f64),
    Bool(VariantBool),
    Error(i32),
    Bstr(Option<BString>),
    Unknown(Option<MInterfacePointer>),
    Dispatch(Option<MInterfacePointer>),
    /// `VT_ARRAY | VT_UI1`
    ///
    /// The outer `wirePSAFEARRAY` referent is always sent; `None` is a null
    /// `wireSAFEARRAY` behind it.
    Bytes(Option<SafeArray>),
}

impl Variant {
    pub fn vt(&self) -> u16 {
        match self {
            Variant::Empty => vt::EMPTY,
            Variant::Null => vt::NULL,
            Variant::I1(_) => vt::I1,
            Variant::I2(_) => vt::I2,
            Variant::I4(_) => vt::I4,
            Variant::I8(_) => vt::I8,
            Variant::Ui1(_) => vt::UI1,
            Variant::Ui2(_) => vt::UI2,
            Variant::Ui4(_) => vt::UI4,
            Variant::Ui8(_) => vt::UI8,
            Variant::Int(_) => vt::INT,
            Variant::Uint(_) => vt::UINT,
            Variant::R4(_) => vt::R4,
            Variant::R8(_) => vt::R8,
            Variant::Cy(_) => vt::CY,
            Variant::Date(_) => vt::DATE,
            Variant::Bool(_) => vt::BOOL,
            Variant::Error(_) => vt::ERROR,
            Variant::Bstr(_) => vt::BSTR,
            Variant::Unknown(_) => vt::UNKNOWN,
            Variant::Dispatch(_) => vt::DISPATCH,
            Variant::Bytes(_) => vt::ARRAY | vt::UI1,
        }
    }

    /// Union discriminant for the arm selected by `vt`
    fn discriminant(var_type: u16) -> u32 {
        if var_type & vt::ARRAY != 0 {
            u32::from(vt::ARRAY)
        } else {
            u32::from(var_type)
        }
    }

    pub fn bstr(s: impl Into<String>) -> Self {
        Variant::Bstr(Some(BString::new(s)))
    }

    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Variant::Bytes(Some(SafeArray::from_bytes(data)))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::Bstr(Some(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Variant::I4(v) | Variant::Int(v) | Variant::Error(v) => Some(v),
            Variant::I2(v) => Some(v.into()),
            Variant::I1(v) => Some(v.into()),
            Variant::Ui1(v) => Some(v.into()),
            Variant::Ui2(v) => Some(v.into()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Variant::Bytes(Some(array)) => Some(array.as_bytes()),
            _ => None,
        }
    }

    fn encode_header(&self, w: &mut NdrWriter, cl_size: u32) -> midl_ndr::Result<()> {
        let var_type = self.vt();
        w.align(8);
        w.put_u32(cl_size);
        w.put_u32(0);
        w.put_u16(var_type);
        w.put_u16(0);
        w.put_u16(0);
        w.put_u16(0);
        w.put_u32(Self::discriminant(var_type));
        w.align(8);
        match self {
            Variant::Empty | Variant::Null => {}
            Variant::I1(v) => w.put_i8(*v),
            Variant::I2(v) => w.put_i16(*v),
            Variant::I4(v) | Variant::Int(v) | Variant::Error(v) => w.put_i32(*v),
            Variant::I8(v) | Variant::Cy(v) => w.put_i64(*v),
            Variant::Ui1(v) => w.put_u8(*v),
            Variant::Ui2(v) => w.put_u16(*v),
            Variant::Ui4(v) | Variant::Uint(v) => w.put_u32(*v),
            Variant::Ui8(v) => w.put_u64(*v),
            Variant::R4(v) => w.put_f32(*v),
            Variant::R8(v) | Variant::Date(v) => w.put_f64(*v),
            Variant::Bool(v) => w.write(v)?,
            Variant::Bstr(v) => w.write(v)?,
            Variant::Unknown(v) | Variant::Dispatch(v) => w.write(v)?,
            Variant::Bytes(_) => {
                w.write_pointer(true);
            }
        }
        Ok(())
    }

    /// Size in quadwords, deferred arm included
    fn quad_words(&self, w: &NdrWriter) -> midl_ndr::Result<u32> {
        let mut scratch = NdrWriter::with_context(w.context());
        self.encode_header(&mut scratch, 0)?;
        self.ndr_encode_deferred(&mut scratch)?;
        u32::try_from((scratch.position() + 7) / 8).map_err(|_| NdrError::IntegerOverflow)
    }
}

impl NdrEncode for Variant {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        let cl_size = self.quad_words(w)?;
        self.encode_header(w, cl_size)
    }

    fn ndr_encode_deferred(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        match self {
            Variant::Bstr(v) => w.write_deferred(v),
            Variant::Unknown(v) | Variant::Dispatch(v) => w.write_deferred(v),
            Variant::Bytes(v) => w.write_full(v),
            _ => Ok(()),
        }
    }
}

impl NdrDecode for Variant {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        r.align(8)?;
        let _cl_size = r.get_u32()?;
        let _rpc_reserved = r.get_u32()?;
        let var_type = r.get_u16()?;
        for _ in 0..3 {
            r.get_u16()?;
        }
        let tag = r.get_u32()?;
        if tag != Self::discriminant(var_type) {
            return Err(NdrError::InvalidDiscriminant(tag));
        }
        r.align(8)?;
        let value = match var_type {
            vt::EMPTY => Variant::Empty,
            vt::NULL => Variant::Null,
            vt::I1 => Variant::I1(r.get_i8()?),
            vt::I2 => Variant::I2(r.get_i16()?),
            vt::I4 => Variant::I4(r.get_i32()?),
            vt::I8 => Variant::I8(r.get_i64()?),
            vt::UI1 => Variant::Ui1(r.get_u8()?),
            vt::UI2 => Variant::Ui2(r.get_u16()?),
            vt::UI4 => Variant::Ui4(r.get_u32()?),
            vt::UI8 => Variant::Ui8(r.get_u64()?),
            vt::INT => Variant::Int(r.get_i32()?),
            vt::UINT => Variant::Uint(r.get_u32()?),
            vt::R4 => Variant::R4(r.get_f32()?),
            vt::R8 => Variant::R8(r.get_f64()?),
            vt::CY => Variant::Cy(r.get_i64()?),
            vt::DATE => Variant::Date(r.get_f64()?),
            vt::BOOL => Variant::Bool(r.read()?),
            vt::ERROR => Variant::Error(r.get_i32()?),
            vt::BSTR => Variant::Bstr(r.read()?),
            vt::UNKNOWN => Variant::Unknown(r.read()?),
            vt::DISPATCH => Variant::Dispatch(r.read()?),
            // placeholder marks a non-null wirePSAFEARRAY
            v if v == vt::ARRAY | vt::UI1 => {
                Variant::Bytes(r.read_pointer()?.then(SafeArray::default))
            }
            other => return Err(NdrError::InvalidDiscriminant(u32::from(other))),
        };
        Ok(value)
    }

    fn ndr_decode_deferred(&mut self, r: &mut NdrReader) -> midl_ndr::Result<()> {
        match self {
            Variant::Bstr(v) => r.read_deferred(v),
            Variant::Unknown(v) | Variant::Dispatch(v) => r.read_deferred(v),
            Variant::Bytes(v) => {
                if v.is_some() {
                    *v = r.read_full()?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: &Variant) -> Variant {
        let mut w = NdrWriter::new();
        w.write_full(value).unwrap();
        let mut r = NdrReader::new(w.into_bytes());
        let decoded = r.read_full().unwrap();
        assert_eq!(r.remaining(), 0);
        decoded
    }

    #[test]
    fn test_i4_layout() {
        let mut w = NdrWriter::new();
        w.write_full(&Variant::I4(42)).unwrap();
        assert_eq!(
            w.as_slice(),
            &[
                4, 0, 0, 0, // clSize
                0, 0, 0, 0, // rpcReserved
                3, 0, 0, 0, 0, 0, 0, 0, // vt, reserved
                3, 0, 0, 0, // union tag
                0, 0, 0, 0, // union alignment
                42, 0, 0, 0,
            ]
        );
    }

    #[test]
    fn test_bool_uses_variant_bool() {
        let mut w = NdrWriter::new();
        w.write_full(&Variant::Bool(true.into())).unwrap();
        assert_eq!(&w.as_slice()[20..24], &[0, 0, 0, 0]);
        assert_eq!(&w.as_slice()[24..26], &[0xff, 0xff]);
        assert_eq!(roundtrip(&Variant::Bool(VariantBool::TRUE)), Variant::Bool(VariantBool::TRUE));
    }

    #[test]
    fn test_i8_arm_is_aligned() {
        let mut w = NdrWriter::new();
        w.write_full(&Variant::I8(-2)).unwrap();
        assert_eq!(w.position(), 32);
        assert_eq!(&w.as_slice()[24..32], &(-2i64).to_le_bytes());
    }

    #[test]
    fn test_bstr_body_is_deferred() {
        let value = Variant::bstr("ab");
        let mut w = NdrWriter::new();
        w.write_full(&value).unwrap();
        let bytes = w.as_slice();
        assert_eq!(&bytes[8..10], &[8, 0]);
        // referent, after the union padding
        assert_eq!(&bytes[20..24], &[0, 0, 0, 0]);
        assert_ne!(&bytes[24..28], &[0, 0, 0, 0]);
        // FLAGGED_WORD_BLOB follows the inline part
        assert_eq!(&bytes[28..32], &[2, 0, 0, 0]);
        assert_eq!(roundtrip(&value).as_str(), Some("ab"));
    }

    #[test]
    fn test_null_bstr_is_not_empty_string() {
        let decoded = roundtrip(&Variant::Bstr(None));
        assert_eq!(decoded, Variant::Bstr(None));
        assert_ne!(decoded, Variant::bstr(""));
    }

    #[test]
    fn test_byte_array_variant() {
        let value = Variant::bytes(vec![1, 2, 3]);
        let mut w = NdrWriter::new();
        w.write_full(&value).unwrap();
        let bytes = w.as_slice();
        assert_eq!(&bytes[8..10], &[0x11, 0x20]);
        assert_eq!(&bytes[16..20], &[0, 0x20, 0, 0]);
        // wirePSAFEARRAY, then the wireSAFEARRAY it points to
        assert_ne!(&bytes[24..28], &[0, 0, 0, 0]);
        assert_ne!(&bytes[28..32], &[0, 0, 0, 0]);
        assert_ne!(&bytes[24..28], &bytes[28..32]);
        // cDims conformance, cDims, fFeatures
        assert_eq!(&bytes[32..36], &[1, 0, 0, 0]);
        assert_eq!(&bytes[36..40], &[1, 0, 0x80, 0]);
        assert_eq!(roundtrip(&value).as_bytes(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_null_byte_array_keeps_outer_referent() {
        let mut w = NdrWriter::new();
        w.write_full(&Variant::Bytes(None)).unwrap();
        let bytes = w.as_slice();
        assert_eq!(bytes.len(), 32);
        assert_ne!(&bytes[24..28], &[0, 0, 0, 0]);
        assert_eq!(&bytes[28..32], &[0, 0, 0, 0]);
        assert_eq!(roundtrip(&Variant::Bytes(None)), Variant::Bytes(None));
    }

    #[test]
    fn test_scalar_arms() {
        for value in [
            Variant::Empty,
            Variant::Null,
            Variant::I1(-1),
            Variant::Ui2(7),
            Variant::Ui8(u64::MAX),
            Variant::R8(1.5),
            Variant::Date(45000.25),
            Variant::Cy(123_400),
            Variant::Error(-2147352567),
        ] {
            assert_eq!(roundtrip(&value), value);
        }
    }

    #[test]
    fn test_mismatched_union_tag() {
        let mut w = NdrWriter::new();
        w.write_full(&Variant::I4(1)).unwrap();
        let mut bytes = w.into_bytes().to_vec();
        bytes[16] = 2;
        let mut r = NdrReader::new(bytes);
        assert!(matches!(
            r.read_full::<Variant>(),
            Err(NdrError::InvalidDiscriminant(2))
        ));
    }
}
