//! MSMQ ActiveX components over DCOM (MS-MQMQ)
//!
//! Client binding for the `IMSMQMessage4` dual interface.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dcom::{CallOptions, ClientOptions, Ipid, RpcConn};
//! use mqac::imsmqmessage4::{MessageClient, SetLabelRequest, MESSAGE4_SYNTAX_V0_0};
//! use midl_ndr::BString;
//!
//! # async fn example(ipid: Ipid) -> dcom::Result<()> {
//! let addr = "192.168.1.10:49152".parse().unwrap();
//! let rpc = dcerpc::DceRpcClient::connect(addr, MESSAGE4_SYNTAX_V0_0).await?;
//! let conn = Arc::new(RpcConn::new(Arc::new(rpc)));
//!
//! let message = MessageClient::new(conn, ClientOptions::new().with_ipid(ipid)).await?;
//! let request = SetLabelRequest {
//!     label: Some(BString::from("invoice 1042")),
//!     ..Default::default()
//! };
//! message.set_label(request, CallOptions::new()).await.into_result()?;
//! # Ok(())
//! # }
//! ```

pub mod imsmqmessage4;

use dcom::Guid;

pub use imsmqmessage4::{MessageClient, MESSAGE4_SYNTAX_V0_0};

/// IMSMQMessage4 interface identifier
pub const IID_IMSMQMESSAGE4: Guid = Guid::from_fields(
    0xeba9_6b23,
    0x2168,
    0x11d3,
    [0x89, 0x8c, 0x00, 0xe0, 0x2c, 0x07, 0x4f, 0x6b],
);

/// MSMQMessage class identifier
pub const CLSID_MSMQMESSAGE: Guid = Guid::from_fields(
    0xd7d6_e075,
    0xdccd,
    0x11d0,
    [0xaa, 0x4b, 0x00, 0x60, 0x97, 0x0d, 0xeb, 0xae],
);

/// `MQMSG_PRIV_LEVEL_*`
pub mod priv_level {
    pub const NONE: i32 = 0;
    pub const BODY_BASE: i32 = 1;
    pub const BODY_ENHANCED: i32 = 3;
}

/// `MQMSG_DELIVERY_*`
pub mod delivery {
    pub const EXPRESS: i32 = 0;
    pub const RECOVERABLE: i32 = 1;
}
