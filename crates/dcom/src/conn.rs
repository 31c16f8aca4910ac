//! Connection seam between generated clients and the RPC transport

use crate::operation::{CallOptions, Operation};
use crate::types::{DcomError, Result};
use async_trait::async_trait;
use dcerpc::{DceRpcClient, RpcError, SyntaxId};
use midl_ndr::{NdrReader, NdrWriter};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, trace};

/// Connection that carries ORPC operations
#[async_trait]
pub trait Conn: Send + Sync {
    /// Negotiate `syntax` and return a connection whose calls target it
    async fn bind(&self, syntax: SyntaxId) -> Result<Arc<dyn Conn>>;

    /// Switch this connection's calls to `syntax`
    async fn alter_context(&self, syntax: SyntaxId) -> Result<()>;

    /// Marshal the request of `op`, send it and unmarshal the response into
    /// `op`. The call options carry the target IPID.
    async fn invoke(&self, op: &mut dyn Operation, opts: &CallOptions) -> Result<()>;

    /// Error for a failure HRESULT returned by `op`
    fn error(&self, op: &'static str, hresult: i32) -> DcomError {
        DcomError::Status { op, hresult }
    }
}

const UNBOUND: u32 = u32::MAX;

/// [`Conn`] over a connection-oriented DCE RPC association
pub struct RpcConn<S = TcpStream> {
    client: Arc<DceRpcClient<S>>,
    context_id: AtomicU32,
}

impl<S> RpcConn<S> {
    /// Wrap `client`; calls fail until a syntax is bound
    pub fn new(client: Arc<DceRpcClient<S>>) -> Self {
        Self {
            client,
            context_id: AtomicU32::new(UNBOUND),
        }
    }

    /// Wrap `client` with calls going to an already negotiated context
    pub fn with_context(client: Arc<DceRpcClient<S>>, context_id: u16) -> Self {
        Self {
            client,
            context_id: AtomicU32::new(u32::from(context_id)),
        }
    }

    pub fn client(&self) -> &Arc<DceRpcClient<S>> {
        &self.client
    }

    /// Presentation context used by calls, if bound
    pub fn context_id(&self) -> Option<u16> {
        u16::try_from(self.context_id.load(Ordering::Acquire)).ok()
    }
}

#[async_trait]
impl<S> Conn for RpcConn<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    async fn bind(&self, syntax: SyntaxId) -> Result<Arc<dyn Conn>> {
        let context_id = self.client.bind(syntax).await?;
        debug!(%syntax, context_id, "bound");
        Ok(Arc::new(RpcConn::with_context(self.client.clone(), context_id)))
    }

    async fn alter_context(&self, syntax: SyntaxId) -> Result<()> {
        let context_id = self.client.alter_context(syntax).await?;
        debug!(%syntax, context_id, "altered context");
        self.context_id.store(u32::from(context_id), Ordering::Release);
        Ok(())
    }

    async fn invoke(&self, op: &mut dyn Operation, opts: &CallOptions) -> Result<()> {
        let context_id = self.context_id().ok_or(RpcError::NotBound)?;

        let mut w = NdrWriter::new();
        op.marshal_request(&mut w)?;
        let stub = w.into_bytes();
        trace!(op = op.name(), len = stub.len(), "request stub");

        let object = opts.ipid.map(|ipid| ipid.0);
        let call = self.client.call(context_id, op.opnum(), object, stub);
        let response = match opts.timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .map_err(|_| RpcError::Timeout)??,
            None => call.await?,
        };
        trace!(op = op.name(), len = response.len(), "response stub");

        let mut r = NdrReader::new(response);
        op.unmarshal_response(&mut r)?;
        Ok(())
    }
}
