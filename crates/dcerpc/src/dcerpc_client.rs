//! DCE RPC Client
//!
//! A connection-oriented client: one association, any number of presentation
//! contexts (added with bind / alter_context), calls serialized over the
//! stream.

use crate::dcerpc::{BindPdu, Pdu, RequestPdu, SyntaxId, Uuid, DEFAULT_MAX_FRAG};
use crate::dcerpc_transport::DceRpcTransport;
use crate::error::{Result, RpcError};
use crate::fragmentation::{FragmentAssembler, FragmentGenerator};
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, trace};

/// Client settings
#[derive(Debug, Clone)]
pub struct DceRpcClientConfig {
    pub max_xmit_frag: u16,
    pub max_recv_frag: u16,
    /// Applied to connect and to each round trip
    pub timeout: Option<Duration>,
    pub max_pdu_size: usize,
}

impl Default for DceRpcClientConfig {
    fn default() -> Self {
        Self {
            max_xmit_frag: DEFAULT_MAX_FRAG,
            max_recv_frag: DEFAULT_MAX_FRAG,
            timeout: None,
            max_pdu_size: crate::dcerpc_transport::DEFAULT_MAX_PDU_SIZE,
        }
    }
}

struct Association<S> {
    reader: DceRpcTransport<ReadHalf<S>>,
    writer: DceRpcTransport<WriteHalf<S>>,
    contexts: Vec<SyntaxId>,
    assoc_group_id: u32,
    max_xmit_frag: u16,
    /// Set while a request is being written; still set if that write was
    /// cancelled, leaving a partial PDU on the stream.
    write_pending: bool,
}

impl<S: AsyncRead + AsyncWrite + Send + Unpin> Association<S> {
    async fn send(&mut self, pdus: &[Bytes]) -> Result<()> {
        if self.write_pending {
            return Err(RpcError::ConnectionClosed);
        }
        self.write_pending = true;
        for pdu in pdus {
            self.writer.write_pdu(pdu).await?;
        }
        self.write_pending = false;
        Ok(())
    }

    /// Next PDU belonging to `call_id`.
    ///
    /// Replies to earlier calls are dropped: they belong to calls abandoned
    /// by a timeout after their request went out.
    async fn reply(&mut self, call_id: u32) -> Result<Pdu> {
        loop {
            let data = self.reader.read_pdu().await?;
            let pdu = Pdu::decode(&data)?;
            if matches!(pdu, Pdu::Response(_) | Pdu::Fault(_)) && pdu.call_id() < call_id {
                debug!(call_id, stale = pdu.call_id(), "discarding reply to abandoned call");
                continue;
            }
            return Ok(pdu);
        }
    }
}

/// DCE RPC client over any byte stream (TCP by default)
pub struct DceRpcClient<S = TcpStream> {
    assoc: Mutex<Association<S>>,
    call_id_counter: AtomicU32,
    config: DceRpcClientConfig,
}

impl DceRpcClient<TcpStream> {
    /// Connect and bind `interface` as presentation context 0
    pub async fn connect(addr: SocketAddr, interface: SyntaxId) -> Result<Self> {
        DceRpcClientBuilder::new().connect(addr, interface).await
    }
}

impl<S: AsyncRead + AsyncWrite + Send + Unpin> DceRpcClient<S> {
    /// Wrap an established stream; no context is bound yet
    pub fn from_stream(stream: S, config: DceRpcClientConfig) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            assoc: Mutex::new(Association {
                reader: DceRpcTransport::new(reader).with_max_pdu_size(config.max_pdu_size),
                writer: DceRpcTransport::new(writer),
                contexts: Vec::new(),
                assoc_group_id: 0,
                max_xmit_frag: config.max_xmit_frag,
                write_pending: false,
            }),
            call_id_counter: AtomicU32::new(1),
            config,
        }
    }

    fn next_call_id(&self) -> u32 {
        self.call_id_counter.fetch_add(1, Ordering::SeqCst)
    }

    async fn with_timeout<T>(&self, fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
        match self.config.timeout {
            Some(timeout) => tokio::time::timeout(timeout, fut)
                .await
                .map_err(|_| RpcError::Timeout)?,
            None => fut.await,
        }
    }

    /// Negotiate `interface` and return its presentation context id.
    ///
    /// The first negotiation is a bind; later ones use alter_context on the
    /// same association. An interface already negotiated is not renegotiated.
    pub async fn bind(&self, interface: SyntaxId) -> Result<u16> {
        self.with_timeout(self.negotiate(interface)).await
    }

    /// Same as [`bind`](Self::bind); kept for callers that mirror the PDU name.
    pub async fn alter_context(&self, interface: SyntaxId) -> Result<u16> {
        self.bind(interface).await
    }

    async fn negotiate(&self, interface: SyntaxId) -> Result<u16> {
        let mut assoc = self.assoc.lock().await;
        if let Some(id) = assoc.contexts.iter().position(|s| *s == interface) {
            return Ok(id as u16);
        }

        let call_id = self.next_call_id();
        let context_id = assoc.contexts.len() as u16;
        let mut pdu = if assoc.contexts.is_empty() {
            BindPdu::new(call_id, context_id, interface)
        } else {
            BindPdu::alter_context(call_id, context_id, interface)
        };
        pdu.max_xmit_frag = self.config.max_xmit_frag;
        pdu.max_recv_frag = self.config.max_recv_frag;
        pdu.assoc_group_id = assoc.assoc_group_id;

        debug!(
            call_id,
            context_id,
            %interface,
            packet_type = ?pdu.header.packet_type,
            "negotiating presentation context"
        );
        assoc.send(&[pdu.encode()?]).await?;

        match assoc.reply(call_id).await? {
            Pdu::BindAck(ack) => {
                if ack.header.call_id != call_id {
                    return Err(RpcError::CallIdMismatch {
                        expected: call_id,
                        got: ack.header.call_id,
                    });
                }
                if !ack.accepted() {
                    return Err(RpcError::ContextRejected(interface));
                }
                if ack.assoc_group_id != 0 {
                    assoc.assoc_group_id = ack.assoc_group_id;
                }
                assoc.max_xmit_frag = ack.max_recv_frag.min(self.config.max_xmit_frag);
                assoc.contexts.push(interface);
                debug!(context_id, max_xmit_frag = assoc.max_xmit_frag, "context accepted");
                Ok(context_id)
            }
            Pdu::BindNak(nak) => Err(RpcError::BindNak(nak.reject_reason)),
            Pdu::Fault(fault) => Err(RpcError::Fault(fault.status)),
            other => Err(RpcError::MalformedPdu(format!(
                "unexpected reply to bind: {:?}",
                other
            ))),
        }
    }

    /// Context id of a negotiated interface
    pub async fn context_id(&self, interface: &SyntaxId) -> Option<u16> {
        let assoc = self.assoc.lock().await;
        assoc
            .contexts
            .iter()
            .position(|s| s == interface)
            .map(|id| id as u16)
    }

    /// Make one call and return the response stub.
    ///
    /// `object` is sent as the object UUID of every request fragment.
    pub async fn call(
        &self,
        context_id: u16,
        opnum: u16,
        object: Option<Uuid>,
        stub_data: Bytes,
    ) -> Result<Bytes> {
        self.with_timeout(self.round_trip(context_id, opnum, object, stub_data))
            .await
    }

    async fn round_trip(
        &self,
        context_id: u16,
        opnum: u16,
        object: Option<Uuid>,
        stub_data: Bytes,
    ) -> Result<Bytes> {
        let mut assoc = self.assoc.lock().await;
        if context_id as usize >= assoc.contexts.len() {
            return Err(RpcError::NotBound);
        }

        let call_id = self.next_call_id();
        let mut request = RequestPdu::new(call_id, opnum, stub_data);
        request.context_id = context_id;
        request.object_uuid = object;

        let fragments = FragmentGenerator::fragment_request(&request, assoc.max_xmit_frag);
        debug!(
            call_id,
            opnum,
            stub_len = request.stub_data.len(),
            fragments = fragments.len(),
            "sending request"
        );
        let encoded = fragments
            .iter()
            .map(RequestPdu::encode)
            .collect::<Result<Vec<_>>>()?;
        assoc.send(&encoded).await?;

        let mut assembler = FragmentAssembler::new(call_id);
        loop {
            match assoc.reply(call_id).await? {
                Pdu::Response(response) => {
                    if let Some(stub) = assembler.add_response(&response)? {
                        trace!(call_id, len = stub.len(), "response complete");
                        return Ok(stub);
                    }
                }
                Pdu::Fault(fault) => {
                    if fault.header.call_id != call_id {
                        return Err(RpcError::CallIdMismatch {
                            expected: call_id,
                            got: fault.header.call_id,
                        });
                    }
                    debug!(call_id, status = fault.status, "call faulted");
                    return Err(RpcError::Fault(fault.status));
                }
                other => {
                    return Err(RpcError::MalformedPdu(format!(
                        "unexpected reply to request: {:?}",
                        other
                    )))
                }
            }
        }
    }
}

/// Builder for TCP clients
#[derive(Debug, Clone, Default)]
pub struct DceRpcClientBuilder {
    config: DceRpcClientConfig,
}

impl DceRpcClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn max_frag(mut self, max_frag: u16) -> Self {
        self.config.max_xmit_frag = max_frag;
        self.config.max_recv_frag = max_frag;
        self
    }

    pub fn max_pdu_size(mut self, size: usize) -> Self {
        self.config.max_pdu_size = size;
        self
    }

    pub fn config(&self) -> &DceRpcClientConfig {
        &self.config
    }

    /// Connect and bind `interface` as presentation context 0
    pub async fn connect(self, addr: SocketAddr, interface: SyntaxId) -> Result<DceRpcClient> {
        let stream = match self.config.timeout {
            Some(timeout) => tokio::time::timeout(timeout, TcpStream::connect(addr))
                .await
                .map_err(|_| RpcError::Timeout)??,
            None => TcpStream::connect(addr).await?,
        };
        debug!(%addr, "connected");
        let client = DceRpcClient::from_stream(stream, self.config);
        client.bind(interface).await?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dcerpc::{BindAckPdu, FaultPdu, PacketFlags, PacketType, ResponsePdu};
    use tokio::io::{duplex, DuplexStream};

    fn iface(n: u32) -> SyntaxId {
        SyntaxId::new(Uuid::from_fields(n, 0, 0, [0; 8]), 0, 0)
    }

    async fn serve_one(server: &mut DceRpcTransport<DuplexStream>) -> Pdu {
        let data = server.read_pdu().await.unwrap();
        Pdu::decode(&data).unwrap()
    }

    #[test]
    fn test_client_builder() {
        let builder = DceRpcClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .max_frag(5840);
        assert_eq!(builder.config().timeout, Some(Duration::from_secs(30)));
        assert_eq!(builder.config().max_xmit_frag, 5840);
    }

    #[tokio::test]
    async fn test_bind_then_alter_context() {
        let (client_io, server_io) = duplex(8192);
        let client = DceRpcClient::from_stream(client_io, DceRpcClientConfig::default());
        let mut server = DceRpcTransport::new(server_io);

        let server_task = tokio::spawn(async move {
            for expected in [PacketType::Bind, PacketType::AlterContext] {
                let Pdu::Bind(bind) = serve_one(&mut server).await else {
                    panic!("expected bind");
                };
                assert_eq!(bind.header.packet_type, expected);
                let mut ack = BindAckPdu::new(bind.header.call_id, 0x55);
                if expected == PacketType::AlterContext {
                    ack.header.packet_type = PacketType::AlterContextResp;
                }
                server.write_pdu(&ack.encode().unwrap()).await.unwrap();
            }
        });

        assert_eq!(client.bind(iface(1)).await.unwrap(), 0);
        assert_eq!(client.alter_context(iface(2)).await.unwrap(), 1);
        // already negotiated, no traffic
        assert_eq!(client.bind(iface(1)).await.unwrap(), 0);
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_call_carries_object_uuid() {
        let (client_io, server_io) = duplex(8192);
        let client = DceRpcClient::from_stream(client_io, DceRpcClientConfig::default());
        let mut server = DceRpcTransport::new(server_io);
        let object = Uuid::from_fields(0xfeed, 1, 2, [3; 8]);

        let server_task = tokio::spawn(async move {
            let Pdu::Bind(bind) = serve_one(&mut server).await else {
                panic!("expected bind");
            };
            let ack = BindAckPdu::new(bind.header.call_id, 1);
            server.write_pdu(&ack.encode().unwrap()).await.unwrap();

            let Pdu::Request(request) = serve_one(&mut server).await else {
                panic!("expected request");
            };
            assert_eq!(request.object_uuid, Some(object));
            assert!(request.header.packet_flags.has(PacketFlags::OBJECT_UUID));
            let response = ResponsePdu::new(request.header.call_id, request.stub_data.clone());
            server.write_pdu(&response.encode().unwrap()).await.unwrap();
        });

        client.bind(iface(1)).await.unwrap();
        let reply = client
            .call(0, 12, Some(object), Bytes::from_static(b"ping"))
            .await
            .unwrap();
        assert_eq!(reply.as_ref(), b"ping");
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_fault_is_reported() {
        let (client_io, server_io) = duplex(8192);
        let client = DceRpcClient::from_stream(client_io, DceRpcClientConfig::default());
        let mut server = DceRpcTransport::new(server_io);

        let server_task = tokio::spawn(async move {
            let Pdu::Bind(bind) = serve_one(&mut server).await else {
                panic!("expected bind");
            };
            let ack = BindAckPdu::new(bind.header.call_id, 1);
            server.write_pdu(&ack.encode().unwrap()).await.unwrap();
            let call_id = serve_one(&mut server).await.call_id();
            let fault = FaultPdu::new(call_id, FaultPdu::OP_RANGE_ERROR);
            server.write_pdu(&fault.encode().unwrap()).await.unwrap();
        });

        client.bind(iface(1)).await.unwrap();
        let err = client.call(0, 200, None, Bytes::new()).await.unwrap_err();
        assert!(matches!(err, RpcError::Fault(FaultPdu::OP_RANGE_ERROR)));
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_late_reply_after_timeout_is_discarded() {
        let (client_io, server_io) = duplex(8192);
        let config = DceRpcClientConfig {
            timeout: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let client = DceRpcClient::from_stream(client_io, config);
        let mut server = DceRpcTransport::new(server_io);

        let server_task = tokio::spawn(async move {
            let Pdu::Bind(bind) = serve_one(&mut server).await else {
                panic!("expected bind");
            };
            let ack = BindAckPdu::new(bind.header.call_id, 1);
            server.write_pdu(&ack.encode().unwrap()).await.unwrap();

            for delay in [150, 0] {
                let Pdu::Request(request) = serve_one(&mut server).await else {
                    panic!("expected request");
                };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                let response = ResponsePdu::new(request.header.call_id, request.stub_data.clone());
                server.write_pdu(&response.encode().unwrap()).await.unwrap();
            }
        });

        client.bind(iface(1)).await.unwrap();
        assert!(matches!(
            client.call(0, 1, None, Bytes::from_static(b"slow")).await,
            Err(RpcError::Timeout)
        ));
        // the late reply is queued on the stream by now
        tokio::time::sleep(Duration::from_millis(300)).await;
        let reply = client
            .call(0, 1, None, Bytes::from_static(b"fast"))
            .await
            .unwrap();
        assert_eq!(reply.as_ref(), b"fast");
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_call_before_bind() {
        let (client_io, _server_io) = duplex(64);
        let client = DceRpcClient::from_stream(client_io, DceRpcClientConfig::default());
        assert!(matches!(
            client.call(0, 1, None, Bytes::new()).await,
            Err(RpcError::NotBound)
        ));
    }
}
