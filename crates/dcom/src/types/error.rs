//! DCOM error types

use thiserror::Error;

/// Result type for DCOM operations
pub type Result<T> = std::result::Result<T, DcomError>;

/// DCOM-specific errors
#[derive(Error, Debug)]
pub enum DcomError {
    /// Underlying DCE RPC error, passed through unchanged
    #[error("DCE RPC error: {0}")]
    Rpc(#[from] dcerpc::RpcError),

    /// Stub could not be encoded or decoded
    #[error("NDR error: {0}")]
    Ndr(#[from] midl_ndr::NdrError),

    /// Neither the call options nor the client carry an IPID
    #[error("{op}: ipid is missing")]
    MissingIpid { op: &'static str },

    /// The call completed but the server returned a failure HRESULT
    #[error("{op}: hresult {hresult:#010x}")]
    Status { op: &'static str, hresult: i32 },

    /// Invalid data
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl DcomError {
    /// The server HRESULT, for status errors
    pub fn hresult(&self) -> Option<i32> {
        match self {
            DcomError::Status { hresult, .. } => Some(*hresult),
            _ => None,
        }
    }

    /// Wire name of the operation the error belongs to, when known
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            DcomError::MissingIpid { op } | DcomError::Status { op, .. } => Some(op),
            _ => None,
        }
    }
}

/// HRESULT codes commonly used in DCOM
pub mod hresult {
    /// Operation successful
    pub const S_OK: i32 = 0x0000_0000;
    /// Operation successful, returning false
    pub const S_FALSE: i32 = 0x0000_0001;
    /// Not implemented
    pub const E_NOTIMPL: i32 = 0x8000_4001_u32 as i32;
    /// No such interface supported
    pub const E_NOINTERFACE: i32 = 0x8000_4002_u32 as i32;
    /// Invalid pointer
    pub const E_POINTER: i32 = 0x8000_4003_u32 as i32;
    /// Unspecified error
    pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;
    /// Access denied
    pub const E_ACCESSDENIED: i32 = 0x8007_0005_u32 as i32;
    /// Out of memory
    pub const E_OUTOFMEMORY: i32 = 0x8007_000E_u32 as i32;
    /// Invalid argument
    pub const E_INVALIDARG: i32 = 0x8007_0057_u32 as i32;
    /// Unknown name passed to GetIDsOfNames
    pub const DISP_E_UNKNOWNNAME: i32 = 0x8002_0006_u32 as i32;
    /// Member not found by Invoke
    pub const DISP_E_MEMBERNOTFOUND: i32 = 0x8002_0003_u32 as i32;
    /// Invoke raised an exception, details in EXCEPINFO
    pub const DISP_E_EXCEPTION: i32 = 0x8002_0009_u32 as i32;
    /// Object or server not available
    pub const CO_E_OBJNOTCONNECTED: i32 = 0x8004_01FD_u32 as i32;
    /// RPC server unavailable
    pub const RPC_E_SERVER_DIED: i32 = 0x8001_0007_u32 as i32;

    /// Whether `hr` has the severity bit clear
    pub fn succeeded(hr: i32) -> bool {
        hr >= 0
    }
}
