//! NDR string types
//!
//! Two UTF-16 string encodings show up in DCOM stubs:
//!
//! `[string] wchar_t*` is a conformant varying array with a null terminator:
//! ```text
//! max_count: u32    # elements including null
//! offset: u32       # always 0
//! actual_count: u32 # elements including null
//! chars[actual_count]
//! ```
//!
//! BSTR travels as a FLAGGED_WORD_BLOB, a conformant struct without terminator:
//! ```text
//! max_count: u32    # clSize
//! cBytes: u32       # clSize * 2
//! clSize: u32
//! asData[clSize]
//! ```

use crate::error::MAX_NDR_ALLOCATION_SIZE;
use crate::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter, Result};

fn decode_utf16(units: Vec<u16>) -> Result<String> {
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(NdrError::from)
}

fn read_units(r: &mut NdrReader, count: usize) -> Result<Vec<u16>> {
    let mut units = Vec::with_capacity(count);
    for _ in 0..count {
        units.push(r.get_u16()?);
    }
    Ok(units)
}

/// Unicode string (null-terminated wchar_t*)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NdrWString(pub String);

impl NdrWString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NdrWString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl NdrEncode for NdrWString {
    fn ndr_encode(&self, w: &mut NdrWriter) -> Result<()> {
        let units: Vec<u16> = self.0.encode_utf16().chain(std::iter::once(0)).collect();
        w.write_conformance(units.len())?;
        w.put_u32(0);
        w.write_conformance(units.len())?;
        for unit in units {
            w.put_u16(unit);
        }
        Ok(())
    }
}

impl NdrDecode for NdrWString {
    fn ndr_decode(r: &mut NdrReader) -> Result<Self> {
        let max_count = r.read_conformance(MAX_NDR_ALLOCATION_SIZE / 2)?;
        let offset = r.get_u32()?;
        let actual_count = r.get_u32()? as usize;
        if offset != 0 {
            return Err(NdrError::InvalidString(format!("non-zero offset {offset}")));
        }
        if actual_count > max_count {
            return Err(NdrError::ConformanceMismatch {
                max_count: max_count as u32,
                actual_count: actual_count as u32,
            });
        }
        let mut units = read_units(r, actual_count)?;
        if units.last() == Some(&0) {
            units.pop();
        }
        decode_utf16(units).map(Self)
    }
}

/// BSTR contents as carried by FLAGGED_WORD_BLOB.
///
/// The BSTR itself is a unique pointer to this blob, so a field of type
/// `Option<BString>` distinguishes a null BSTR from an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BString(pub String);

impl BString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for BString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for BString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl NdrEncode for BString {
    fn ndr_encode(&self, w: &mut NdrWriter) -> Result<()> {
        let units: Vec<u16> = self.0.encode_utf16().collect();
        let cl_size = u32::try_from(units.len()).map_err(|_| NdrError::IntegerOverflow)?;
        let c_bytes = cl_size.checked_mul(2).ok_or(NdrError::IntegerOverflow)?;
        w.write_conformance(units.len())?;
        w.put_u32(c_bytes);
        w.put_u32(cl_size);
        for unit in units {
            w.put_u16(unit);
        }
        Ok(())
    }
}

impl NdrDecode for BString {
    fn ndr_decode(r: &mut NdrReader) -> Result<Self> {
        let max_count = r.read_conformance(MAX_NDR_ALLOCATION_SIZE / 2)?;
        let _c_bytes = r.get_u32()?;
        let cl_size = r.get_u32()? as usize;
        if cl_size != max_count {
            return Err(NdrError::ConformanceMismatch {
                max_count: max_count as u32,
                actual_count: cl_size as u32,
            });
        }
        decode_utf16(read_units(r, cl_size)?).map(Self)
    }
}
