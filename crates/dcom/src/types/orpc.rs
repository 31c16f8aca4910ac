//! ORPC (Object RPC) header types (MS-DCOM 2.2.13, 2.2.14)
//!
//! ORPCTHIS is the implicit first parameter of every DCOM request and
//! ORPCTHAT the implicit first result of every response. Both may carry an
//! ORPC_EXTENT_ARRAY behind a unique pointer:
//!
//! ```text
//! ORPCTHIS  version(2+2) flags(4) reserved1(4) cid(16) *extensions
//! ORPCTHAT  flags(4) *extensions
//!
//! ORPC_EXTENT_ARRAY  size(4) reserved(4) *extent
//!   extent -> max_count=(size+1)&~1, then that many unique ORPC_EXTENT pointers
//! ORPC_EXTENT  max_count=(size+7)&~7 | id(16) size(4) data[max_count]
//! ```

use super::identifiers::{generate_uuid, Guid};
use midl_ndr::{
    read_elements, read_elements_deferred, write_elements, write_elements_deferred, NdrDecode,
    NdrEncode, NdrError, NdrReader, NdrWriter, MAX_NDR_ALLOCATION_SIZE, MAX_NDR_ARRAY_ELEMENTS,
};

/// COM version structure (MS-DCOM 2.2.11)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ComVersion {
    pub major: u16,
    pub minor: u16,
}

impl ComVersion {
    /// Size in bytes
    pub const SIZE: usize = 4;

    /// DCOM version 5.1 (Windows 2000)
    pub const DCOM_5_1: Self = Self { major: 5, minor: 1 };
    /// DCOM version 5.4 (Windows XP/2003)
    pub const DCOM_5_4: Self = Self { major: 5, minor: 4 };
    /// DCOM version 5.6 (Windows Vista)
    pub const DCOM_5_6: Self = Self { major: 5, minor: 6 };
    /// DCOM version 5.7 (Windows 7)
    pub const DCOM_5_7: Self = Self { major: 5, minor: 7 };

    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl NdrEncode for ComVersion {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.put_u16(self.major);
        w.put_u16(self.minor);
        Ok(())
    }
}

impl NdrDecode for ComVersion {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        Ok(Self {
            major: r.get_u16()?,
            minor: r.get_u16()?,
        })
    }
}

/// ORPC extension (MS-DCOM 2.2.21)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcExtent {
    /// Format of `data`
    pub id: Guid,
    /// Extension data, without the trailing padding
    pub data: Vec<u8>,
}

impl OrpcExtent {
    pub fn new(id: Guid, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    fn padded_len(size: usize) -> usize {
        (size + 7) & !7
    }
}

impl NdrEncode for OrpcExtent {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        let padded = Self::padded_len(self.data.len());
        w.write_conformance(padded)?;
        w.write(&self.id)?;
        w.put_u32(u32::try_from(self.data.len()).map_err(|_| NdrError::IntegerOverflow)?);
        w.put_slice(&self.data);
        w.put_slice(&[0u8; 8][..padded - self.data.len()]);
        Ok(())
    }
}

impl NdrDecode for OrpcExtent {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        let max_count = r.read_conformance(MAX_NDR_ALLOCATION_SIZE)?;
        let id = r.read()?;
        let size = r.get_u32()? as usize;
        if Self::padded_len(size) != max_count {
            return Err(NdrError::ConformanceMismatch {
                max_count: max_count as u32,
                actual_count: size as u32,
            });
        }
        let mut data = r.get_bytes(max_count)?;
        data.truncate(size);
        Ok(Self {
            id,
            data: data.to_vec(),
        })
    }
}

/// ORPC extent array (MS-DCOM 2.2.12)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcExtentArray {
    /// Non-null extents, in wire order
    pub extents: Vec<OrpcExtent>,
}

impl OrpcExtentArray {
    pub fn new(extents: Vec<OrpcExtent>) -> Self {
        Self { extents }
    }

    /// First extension with the given id
    pub fn find(&self, id: &Guid) -> Option<&OrpcExtent> {
        self.extents.iter().find(|extent| extent.id == *id)
    }

    /// Pointer slots on the wire: rounded up to an even count
    fn slot_count(&self) -> usize {
        (self.extents.len() + 1) & !1
    }
}

impl NdrEncode for OrpcExtentArray {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.put_u32(u32::try_from(self.extents.len()).map_err(|_| NdrError::IntegerOverflow)?);
        w.put_u32(0);
        w.write_pointer(!self.extents.is_empty());
        Ok(())
    }

    fn ndr_encode_deferred(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        if self.extents.is_empty() {
            return Ok(());
        }
        let slots: Vec<Option<&OrpcExtent>> = self
            .extents
            .iter()
            .map(Some)
            .chain(std::iter::repeat(None))
            .take(self.slot_count())
            .collect();
        w.write_conformance(slots.len())?;
        write_elements(w, &slots)?;
        write_elements_deferred(w, &slots)
    }
}

impl NdrDecode for OrpcExtentArray {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        let _size = r.get_u32()?;
        let _reserved = r.get_u32()?;
        // one placeholder extent stands for the pending array body
        let extents = if r.read_pointer()? {
            vec![OrpcExtent::default()]
        } else {
            Vec::new()
        };
        Ok(Self { extents })
    }

    fn ndr_decode_deferred(&mut self, r: &mut NdrReader) -> midl_ndr::Result<()> {
        if self.extents.is_empty() {
            return Ok(());
        }
        let count = r.read_conformance(MAX_NDR_ARRAY_ELEMENTS)?;
        let mut slots: Vec<Option<OrpcExtent>> = read_elements(r, count)?;
        read_elements_deferred(r, &mut slots)?;
        self.extents = slots.into_iter().flatten().collect();
        Ok(())
    }
}

/// ORPCTHIS structure (MS-DCOM 2.2.13)
///
/// Sent with every ORPC request from client to server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrpcThis {
    pub version: ComVersion,
    /// Flags (0 for ORPC invocations)
    pub flags: u32,
    /// Reserved (must be 0)
    pub reserved1: u32,
    /// Causality ID (UUID identifying the call chain)
    pub causality_id: Guid,
    pub extensions: Option<OrpcExtentArray>,
}

impl OrpcThis {
    /// Inline size without the extensions body
    pub const MIN_SIZE: usize = 4 + 4 + 4 + 16 + 4;

    /// COM 5.7, fresh causality id, no extensions
    pub fn new() -> Self {
        Self::with_causality(generate_uuid())
    }

    /// Create with a specific causality ID
    pub fn with_causality(causality_id: Guid) -> Self {
        Self {
            version: ComVersion::DCOM_5_7,
            flags: 0,
            reserved1: 0,
            causality_id,
            extensions: None,
        }
    }

    /// Append an extension, creating the extent array if needed
    pub fn add_extension(&mut self, extent: OrpcExtent) {
        self.extensions
            .get_or_insert_with(OrpcExtentArray::default)
            .extents
            .push(extent);
    }
}

impl Default for OrpcThis {
    fn default() -> Self {
        Self::new()
    }
}

impl NdrEncode for OrpcThis {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.write(&self.version)?;
        w.put_u32(self.flags);
        w.put_u32(self.reserved1);
        w.write(&self.causality_id)?;
        w.write(&self.extensions)
    }

    fn ndr_encode_deferred(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.write_deferred(&self.extensions)
    }
}

impl NdrDecode for OrpcThis {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        Ok(Self {
            version: r.read()?,
            flags: r.get_u32()?,
            reserved1: r.get_u32()?,
            causality_id: r.read()?,
            extensions: r.read()?,
        })
    }

    fn ndr_decode_deferred(&mut self, r: &mut NdrReader) -> midl_ndr::Result<()> {
        r.read_deferred(&mut self.extensions)
    }
}

/// ORPCTHAT structure (MS-DCOM 2.2.14)
///
/// Sent with every ORPC response from server to client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcThat {
    /// Flags (must be 0)
    pub flags: u32,
    pub extensions: Option<OrpcExtentArray>,
}

impl OrpcThat {
    /// Inline size without the extensions body
    pub const MIN_SIZE: usize = 4 + 4;

    pub fn new() -> Self {
        Self::default()
    }

    /// Extended error information, when the server attached any
    pub fn error_info(&self) -> Option<&OrpcExtent> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.find(&super::identifiers::extent_id::ERROR_INFO))
    }
}

impl NdrEncode for OrpcThat {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.put_u32(self.flags);
        w.write(&self.extensions)
    }

    fn ndr_encode_deferred(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.write_deferred(&self.extensions)
    }
}

impl NdrDecode for OrpcThat {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        Ok(Self {
            flags: r.get_u32()?,
            extensions: r.read()?,
        })
    }

    fn ndr_decode_deferred(&mut self, r: &mut NdrReader) -> midl_ndr::Result<()> {
        r.read_deferred(&mut self.extensions)
    }
}
