//! DCE RPC (MS-RPC) connection-oriented client
//!
//! This crate provides the wire layer DCOM calls ride on, as specified in
//! DCE 1.1 RPC (C706) and MS-RPCE:
//!
//! - PDU types with NDR-encoded bodies (bind, alter_context, request, response, fault)
//! - A PDU framer over any async byte stream
//! - Request fragmentation and response reassembly
//! - An async client with multiple presentation contexts and object UUIDs
//!
//! # Example
//!
//! ```no_run
//! use dcerpc::{DceRpcClient, SyntaxId, Uuid};
//! use bytes::Bytes;
//!
//! #[tokio::main]
//! async fn main() -> dcerpc::Result<()> {
//!     let interface = SyntaxId::new(
//!         "12345678-1234-1234-1234-123456789012".parse()?,
//!         1,
//!         0,
//!     );
//!
//!     let client = DceRpcClient::connect("127.0.0.1:12345".parse().unwrap(), interface).await?;
//!     let reply = client.call(0, 1, None, Bytes::from("hello")).await?;
//!     println!("{} bytes", reply.len());
//!     Ok(())
//! }
//! ```

pub mod dcerpc;
pub mod dcerpc_client;
pub mod dcerpc_transport;
pub mod error;
pub mod fragmentation;

pub use dcerpc::*;
pub use dcerpc_client::{DceRpcClient, DceRpcClientBuilder, DceRpcClientConfig};
pub use dcerpc_transport::{DceRpcTransport, DEFAULT_MAX_PDU_SIZE};
pub use error::{Result, RpcError};
pub use fragmentation::{FragmentAssembler, FragmentGenerator};
