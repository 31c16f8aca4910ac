//! Error types for the DCE RPC client

use crate::dcerpc::SyntaxId;
use thiserror::Error;

/// Errors raised while talking to an RPC server.
///
/// Faults returned by the server keep their raw status so callers can map
/// them (for example `nca_s_op_rng_error` = 0x1c010002).
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PDU body could not be decoded
    #[error("NDR error: {0}")]
    Ndr(#[from] midl_ndr::NdrError),

    #[error("unsupported RPC version {0}")]
    VersionMismatch(u8),

    #[error("malformed PDU: {0}")]
    MalformedPdu(String),

    #[error("unexpected packet type {0}")]
    UnexpectedPacket(u8),

    #[error("fragment of {size} bytes exceeds maximum {max}")]
    FragmentTooLarge { size: usize, max: usize },

    #[error("connection closed")]
    ConnectionClosed,

    #[error("timeout")]
    Timeout,

    /// The server answered bind with bind_nak
    #[error("bind rejected, reason {0}")]
    BindNak(u16),

    /// The presentation context result was not acceptance
    #[error("presentation context for {0} rejected")]
    ContextRejected(SyntaxId),

    /// A call was issued before any presentation context was negotiated
    #[error("not bound")]
    NotBound,

    #[error("fault: status 0x{0:08x}")]
    Fault(u32),

    #[error("call id mismatch: expected {expected}, got {got}")]
    CallIdMismatch { expected: u32, got: u32 },
}

pub type Result<T> = std::result::Result<T, RpcError>;
