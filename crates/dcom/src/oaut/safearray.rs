//! Byte SAFEARRAY (MS-OAUT 2.2.30.10)
//!
//! Only the one-dimensional `VT_UI1` array is carried: MSMQ uses it for
//! message bodies, ids, certificates and keys.
//!
//! ```text
//! max_count=cDims(4)
//! cDims(2) fFeatures(2) cbElements(4) cLocks(4)
//! sfType(4) union tag(4) BYTE_SIZEDARR { clSize(4) *pData }
//! rgsabound[cDims] { cElements(4) lLbound(4) }
//! -- deferred --
//! pData: max_count(4) bytes[clSize]
//! ```

use midl_ndr::{ConformantArray, NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

/// SAFEARRAY union arm for 1-byte elements
pub const SF_I1: u32 = 0x10;
/// `fFeatures`: the array carries a VARTYPE
pub const FADF_HAVEVARTYPE: u16 = 0x0080;

/// SAFEARRAYBOUND
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SafeArrayBound {
    pub elements: u32,
    pub lower_bound: i32,
}

/// One-dimensional byte SAFEARRAY
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafeArray {
    pub features: u16,
    pub bound: SafeArrayBound,
    pub data: Option<ConformantArray<u8>>,
}

impl SafeArray {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            features: FADF_HAVEVARTYPE,
            bound: SafeArrayBound {
                elements: bytes.len() as u32,
                lower_bound: 0,
            },
            data: Some(ConformantArray::new(bytes)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref().map_or(&[], |array| array.elements.as_slice())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data.map(ConformantArray::into_inner).unwrap_or_default()
    }
}

impl NdrEncode for SafeArray {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        let count = u32::try_from(self.as_bytes().len()).map_err(|_| NdrError::IntegerOverflow)?;
        w.write_conformance(1)?;
        w.put_u16(1);
        w.put_u16(self.features);
        w.put_u32(1);
        w.put_u32(0);
        w.put_u32(SF_I1);
        w.put_u32(SF_I1);
        w.put_u32(count);
        w.write(&self.data)?;
        w.put_u32(count);
        w.put_i32(self.bound.lower_bound);
        Ok(())
    }

    fn ndr_encode_deferred(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.write_deferred(&self.data)
    }
}

impl NdrDecode for SafeArray {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        let max_count = r.read_conformance(1)?;
        let dims = r.get_u16()?;
        if dims != 1 || max_count != 1 {
            return Err(NdrError::OutOfRange(format!(
                "SAFEARRAY with {} dimensions",
                dims
            )));
        }
        let features = r.get_u16()?;
        let element_size = r.get_u32()?;
        if element_size != 1 {
            return Err(NdrError::OutOfRange(format!(
                "SAFEARRAY element size {}",
                element_size
            )));
        }
        let _locks = r.get_u32()?;
        let sf_type = r.get_u32()?;
        let tag = r.get_u32()?;
        if sf_type != SF_I1 || tag != sf_type {
            return Err(NdrError::InvalidDiscriminant(tag));
        }
        let size = r.get_u32()?;
        let data = r.read()?;
        let bound = SafeArrayBound {
            elements: r.get_u32()?,
            lower_bound: r.get_i32()?,
        };
        if bound.elements != size {
            return Err(NdrError::ConformanceMismatch {
                max_count: bound.elements,
                actual_count: size,
            });
        }
        Ok(Self {
            features,
            bound,
            data,
        })
    }

    fn ndr_decode_deferred(&mut self, r: &mut NdrReader) -> midl_ndr::Result<()> {
        r.read_deferred(&mut self.data)?;
        let got = self.as_bytes().len();
        if self.data.is_some() && got != self.bound.elements as usize {
            return Err(NdrError::ArraySizeMismatch {
                expected: self.bound.elements as usize,
                got,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_array_layout() {
        let array = SafeArray::from_bytes(vec![0xde, 0xad]);
        let mut w = NdrWriter::new();
        w.write_full(&array).unwrap();
        let bytes = w.as_slice();
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[1, 0, 0x80, 0]);
        assert_eq!(&bytes[8..12], &[1, 0, 0, 0]);
        assert_eq!(&bytes[16..20], &[0x10, 0, 0, 0]);
        assert_eq!(&bytes[20..24], &[0x10, 0, 0, 0]);
        assert_eq!(&bytes[24..28], &[2, 0, 0, 0]);
        // pData referent, then the bound
        assert_ne!(&bytes[28..32], &[0, 0, 0, 0]);
        assert_eq!(&bytes[32..40], &[2, 0, 0, 0, 0, 0, 0, 0]);
        // deferred body
        assert_eq!(&bytes[40..], &[2, 0, 0, 0, 0xde, 0xad]);

        let mut r = NdrReader::new(w.into_bytes());
        let decoded: SafeArray = r.read_full().unwrap();
        assert_eq!(decoded.as_bytes(), &[0xde, 0xad]);
    }

    #[test]
    fn test_rejects_other_element_types() {
        let array = SafeArray::from_bytes(vec![1]);
        let mut w = NdrWriter::new();
        w.write_full(&array).unwrap();
        let mut bytes = w.into_bytes().to_vec();
        // sfType = SF_I4
        bytes[16] = 0x13;
        let mut r = NdrReader::new(bytes);
        assert!(matches!(
            r.read_full::<SafeArray>(),
            Err(NdrError::InvalidDiscriminant(_))
        ));
    }
}
