//! Core DCOM types (MS-DCOM 2.2)
//!
//! - Identifiers: GUID, IPID, well-known IIDs
//! - ORPC headers: ORPCTHIS, ORPCTHAT and their extent arrays
//! - Interface pointers: MInterfacePointer

mod error;
mod identifiers;
mod interface_pointer;
mod orpc;

pub use error::*;
pub use identifiers::{extent_id, generate_uuid, iid, Guid, Ipid};
pub use interface_pointer::{MInterfacePointer, OBJREF_SIGNATURE};
pub use orpc::*;
