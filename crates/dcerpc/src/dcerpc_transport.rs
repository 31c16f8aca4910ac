//! DCE RPC transport layer
//!
//! Connection-oriented PDUs are self-delimiting through the frag_length
//! field of the header, so a byte stream is split into PDUs by reading the
//! header first and then the rest of the fragment.

use crate::dcerpc::PduHeader;
use crate::error::{Result, RpcError};
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Upper bound on a single fragment; frag_length is a u16
pub const DEFAULT_MAX_PDU_SIZE: usize = u16::MAX as usize;

/// Reads and writes whole PDUs over a byte stream
pub struct DceRpcTransport<T> {
    inner: T,
    max_pdu_size: usize,
    read_buf: BytesMut,
}

impl<T> DceRpcTransport<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            max_pdu_size: DEFAULT_MAX_PDU_SIZE,
            read_buf: BytesMut::with_capacity(8192),
        }
    }

    pub fn with_max_pdu_size(mut self, max_size: usize) -> Self {
        self.max_pdu_size = max_size;
        self
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: AsyncRead + Unpin> DceRpcTransport<T> {
    /// Read one complete PDU fragment
    pub async fn read_pdu(&mut self) -> Result<Bytes> {
        self.fill_to(PduHeader::SIZE).await?;

        let header = PduHeader::decode(&self.read_buf)?;
        let frag_length = header.frag_length as usize;
        if frag_length < PduHeader::SIZE {
            return Err(RpcError::MalformedPdu(format!(
                "fragment length {} shorter than header",
                frag_length
            )));
        }
        if frag_length > self.max_pdu_size {
            return Err(RpcError::FragmentTooLarge {
                size: frag_length,
                max: self.max_pdu_size,
            });
        }

        self.fill_to(frag_length).await?;
        trace!(frag_length, packet_type = ?header.packet_type, "read PDU");
        Ok(self.read_buf.split_to(frag_length).freeze())
    }

    async fn fill_to(&mut self, len: usize) -> Result<()> {
        while self.read_buf.len() < len {
            self.read_buf.reserve(len - self.read_buf.len());
            if self.inner.read_buf(&mut self.read_buf).await? == 0 {
                return Err(if self.read_buf.is_empty() {
                    RpcError::ConnectionClosed
                } else {
                    RpcError::Io(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        format!("incomplete PDU: expected {} bytes, got {}", len, self.read_buf.len()),
                    ))
                });
            }
        }
        Ok(())
    }
}

impl<T: AsyncWrite + Unpin> DceRpcTransport<T> {
    /// Write one encoded PDU
    pub async fn write_pdu(&mut self, data: &[u8]) -> Result<()> {
        trace!(len = data.len(), "write PDU");
        self.inner.write_all(data).await?;
        self.inner.flush().await?;
        Ok(())
    }
}
