//! MInterfacePointer (MS-DCOM 2.2.14)
//!
//! Interface-typed parameters cross the wire as an OBJREF wrapped in a
//! conformant struct:
//!
//! ```text
//! max_count(4) ulCntData(4) abData[ulCntData]
//! ```
//!
//! The OBJREF itself is carried opaque.

use midl_ndr::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter, MAX_NDR_ALLOCATION_SIZE};

/// Marshaled interface pointer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MInterfacePointer {
    /// OBJREF bytes
    pub data: Vec<u8>,
}

impl MInterfacePointer {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// OBJREF signature "MEOW", when the blob is long enough to carry one
    pub fn signature(&self) -> Option<u32> {
        let bytes = self.data.get(..4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl From<Vec<u8>> for MInterfacePointer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl NdrEncode for MInterfacePointer {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        let len = u32::try_from(self.data.len()).map_err(|_| NdrError::IntegerOverflow)?;
        w.write_conformance(self.data.len())?;
        w.put_u32(len);
        w.put_slice(&self.data);
        Ok(())
    }
}

impl NdrDecode for MInterfacePointer {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        let max_count = r.read_conformance(MAX_NDR_ALLOCATION_SIZE)?;
        let count = r.get_u32()? as usize;
        if count != max_count {
            return Err(NdrError::ConformanceMismatch {
                max_count: max_count as u32,
                actual_count: count as u32,
            });
        }
        Ok(Self {
            data: r.get_bytes(count)?.to_vec(),
        })
    }
}

/// OBJREF signature, little-endian "MEOW"
pub const OBJREF_SIGNATURE: u32 = 0x574f_454d;
