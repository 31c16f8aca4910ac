//! DCOM (Distributed Component Object Model) client runtime
//!
//! ORPC calls on top of the `dcerpc` transport, following MS-DCOM and
//! MS-OAUT.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Generated interface clients (dcom_operations!)             │
//! │  - Request / Response / Operation per method                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ObjectClient          │  PayloadHook     │  DispatchClient │
//! │  - IPID defaulting     │  - before/after  │  - IDispatch    │
//! │  - HRESULT check       │    marshal       │    base         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Conn (RpcConn)        │  ORPCTHIS / ORPCTHAT, VARIANT      │
//! ├─────────────────────────────────────────────────────────────┤
//! │         DCE RPC transport (dcerpc) / NDR codec (midl-ndr)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! - **IPID**: Interface Pointer ID, the object a call is aimed at; sent as
//!   the request object UUID
//! - **ORPCTHIS / ORPCTHAT**: envelopes that start every request and response
//! - **Operation**: one method call, able to marshal and unmarshal itself
//!
//! # Modules
//!
//! - [`types`]: identifiers, ORPC envelopes, interface pointers, errors
//! - [`oaut`]: VARIANT, SAFEARRAY, DISPPARAMS, EXCEPINFO
//! - [`dispatch`]: IDispatch client

pub mod dispatch;
pub mod oaut;
pub mod types;

mod conn;
#[macro_use]
mod macros;
mod operation;

pub use midl_ndr as ndr;

pub use conn::{Conn, RpcConn};
pub use dispatch::{DispatchClient, DISPATCH_SYNTAX_V0_0};
pub use operation::{CallOptions, CallResult, ClientOptions, ObjectClient, Operation, PayloadHook};
pub use types::{
    hresult, iid, ComVersion, DcomError, Guid, Ipid, MInterfacePointer, OrpcExtent,
    OrpcExtentArray, OrpcThat, OrpcThis, Result,
};

/// DCOM protocol version
pub const DCOM_VERSION: ComVersion = ComVersion::DCOM_5_7;
