//! DCOM identifier types (MS-DCOM 2.2.18)
//!
//! GUID-shaped identifiers share the DCE field layout of [`dcerpc::Uuid`]:
//! - IID / CLSID: interface and class identifiers
//! - CID: causality identifier carried in ORPCTHIS
//! - IPID: interface pointer identifier, sent as the request object UUID

use midl_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter};
use std::fmt;

/// GUID, as laid out on the wire
pub type Guid = dcerpc::Uuid;

/// Generate a new random v4 UUID
pub fn generate_uuid() -> Guid {
    Guid::from_bytes_be(*uuid::Uuid::new_v4().as_bytes())
}

/// Interface Pointer Identifier (16 bytes / UUID)
///
/// Identifies one interface on one exported object. Every ORPC request
/// names its target through the IPID in the PDU object field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ipid(pub Guid);

impl Ipid {
    /// Size of IPID in bytes (16 bytes, same as UUID)
    pub const SIZE: usize = 16;

    pub fn new(uuid: Guid) -> Self {
        Self(uuid)
    }

    /// Generate a random IPID
    pub fn generate() -> Self {
        Self(generate_uuid())
    }

    /// The empty IPID
    pub fn nil() -> Self {
        Self(Guid::NIL)
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn uuid(&self) -> &Guid {
        &self.0
    }
}

impl From<Guid> for Ipid {
    fn from(uuid: Guid) -> Self {
        Self(uuid)
    }
}

impl std::str::FromStr for Ipid {
    type Err = dcerpc::RpcError;

    fn from_str(s: &str) -> dcerpc::Result<Self> {
        s.parse().map(Self)
    }
}

impl fmt::Debug for Ipid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IPID({})", self.0)
    }
}

impl fmt::Display for Ipid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl NdrEncode for Ipid {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.write(&self.0)
    }
}

impl NdrDecode for Ipid {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        r.read().map(Self)
    }
}

/// Well-known interface identifiers
pub mod iid {
    use super::Guid;

    /// IUnknown
    pub const IUNKNOWN: Guid = Guid::from_fields(
        0x0000_0000,
        0x0000,
        0x0000,
        [0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46],
    );

    /// IDispatch
    pub const IDISPATCH: Guid = Guid::from_fields(
        0x0002_0400,
        0x0000,
        0x0000,
        [0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46],
    );
}

/// Extension identifiers used in ORPC extent arrays
pub mod extent_id {
    use super::Guid;

    /// Error information extension (MS-DCOM 2.2.21.1)
    pub const ERROR_INFO: Guid = Guid::from_fields(
        0x0000_031c,
        0x0000,
        0x0000,
        [0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46],
    );

    /// Context extension (MS-DCOM 2.2.21.4)
    pub const CONTEXT: Guid = Guid::from_fields(
        0x0000_0334,
        0x0000,
        0x0000,
        [0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46],
    );
}
