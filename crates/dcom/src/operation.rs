//! ORPC operation adapter
//!
//! Every remote method is an [`Operation`]: a value that holds the request
//! envelope, the typed inputs, the response envelope, the typed outputs and
//! the returned HRESULT, and that knows how to put itself on and take itself
//! off the wire. Operations are normally generated with
//! [`dcom_operations!`](crate::dcom_operations).
//!
//! [`ObjectClient::call`] drives one operation through a [`Conn`]:
//!
//! ```text
//! IPID defaulting -> before_marshal_request -> Conn::invoke
//!                 -> after_unmarshal_response -> HRESULT check
//! ```

use crate::conn::Conn;
use crate::types::{DcomError, Ipid, OrpcThat, OrpcThis, Result};
use midl_ndr::{NdrReader, NdrWriter};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One request/response exchange on an ORPC interface
pub trait Operation: Send {
    /// Operation number within the interface
    fn opnum(&self) -> u16;

    /// Wire name, `/<interface>/v<major>/<operation>`
    fn name(&self) -> &'static str;

    /// HRESULT decoded from the response
    fn status(&self) -> i32;

    fn orpc_this_mut(&mut self) -> &mut OrpcThis;

    fn orpc_that(&self) -> &OrpcThat;

    fn marshal_request(&self, w: &mut NdrWriter) -> midl_ndr::Result<()>;

    fn unmarshal_request(&mut self, r: &mut NdrReader) -> midl_ndr::Result<()>;

    fn marshal_response(&self, w: &mut NdrWriter) -> midl_ndr::Result<()>;

    fn unmarshal_response(&mut self, r: &mut NdrReader) -> midl_ndr::Result<()>;
}

/// Interceptor around the wire payload of every call made by a client
///
/// Both steps default to doing nothing.
pub trait PayloadHook: Send + Sync {
    fn before_marshal_request(&self, _op: &mut dyn Operation) -> Result<()> {
        Ok(())
    }

    fn after_unmarshal_response(&self, _op: &mut dyn Operation) -> Result<()> {
        Ok(())
    }
}

/// Per-call options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Target interface pointer; overrides the client default
    pub ipid: Option<Ipid>,
    /// Bound on the network round trip
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ipid(mut self, ipid: Ipid) -> Self {
        self.ipid = Some(ipid);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Outcome of one call
///
/// A failure HRESULT still carries the decoded response, so both halves
/// can be present at once.
#[derive(Debug)]
pub struct CallResult<R> {
    response: Option<R>,
    error: Option<DcomError>,
}

impl<R> CallResult<R> {
    pub fn ok(response: R) -> Self {
        Self {
            response: Some(response),
            error: None,
        }
    }

    /// No response was decoded
    pub fn failed(error: DcomError) -> Self {
        Self {
            response: None,
            error: Some(error),
        }
    }

    /// Response decoded, but the server reported a failure
    pub fn with_status(response: R, error: DcomError) -> Self {
        Self {
            response: Some(response),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn response(&self) -> Option<&R> {
        self.response.as_ref()
    }

    pub fn error(&self) -> Option<&DcomError> {
        self.error.as_ref()
    }

    pub fn into_parts(self) -> (Option<R>, Option<DcomError>) {
        (self.response, self.error)
    }

    /// Collapse into a `Result`, dropping the response of a failed call
    pub fn into_result(self) -> Result<R> {
        match (self.response, self.error) {
            (_, Some(err)) => Err(err),
            (Some(response), None) => Ok(response),
            (None, None) => Err(DcomError::InvalidData("call produced no response".into())),
        }
    }
}

/// Construction options shared by generated clients
#[derive(Clone, Default)]
pub struct ClientOptions {
    /// Default IPID for calls that do not name one
    pub ipid: Option<Ipid>,
    pub hook: Option<Arc<dyn PayloadHook>>,
    /// The client is the base of a derived interface client and reuses the
    /// derived client's presentation context instead of binding its own.
    pub superclass: bool,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ipid(mut self, ipid: Ipid) -> Self {
        self.ipid = Some(ipid);
        self
    }

    pub fn with_hook(mut self, hook: Arc<dyn PayloadHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn as_superclass(mut self) -> Self {
        self.superclass = true;
        self
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("ipid", &self.ipid)
            .field("hook", &self.hook.is_some())
            .field("superclass", &self.superclass)
            .finish()
    }
}

/// Connection, default IPID and hook of one remote object interface
#[derive(Clone)]
pub struct ObjectClient {
    conn: Arc<dyn Conn>,
    ipid: Option<Ipid>,
    hook: Option<Arc<dyn PayloadHook>>,
}

impl ObjectClient {
    pub fn new(conn: Arc<dyn Conn>, options: &ClientOptions) -> Self {
        Self {
            conn,
            ipid: options.ipid,
            hook: options.hook.clone(),
        }
    }

    pub fn conn(&self) -> &Arc<dyn Conn> {
        &self.conn
    }

    pub fn ipid(&self) -> Option<Ipid> {
        self.ipid
    }

    /// Same connection and hook, different default IPID
    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self {
            ipid: Some(ipid),
            ..self.clone()
        }
    }

    /// Run `op` and convert it into the response type `R`.
    ///
    /// The IPID in `opts` wins over the client default. With neither, the
    /// call fails before anything is sent.
    pub async fn call<O, R>(&self, mut op: O, opts: CallOptions) -> CallResult<R>
    where
        O: Operation,
        R: From<O>,
    {
        let name = op.name();
        let Some(ipid) = opts.ipid.or(self.ipid) else {
            return CallResult::failed(DcomError::MissingIpid { op: name });
        };
        let opts = CallOptions {
            ipid: Some(ipid),
            ..opts
        };

        if let Some(hook) = &self.hook {
            if let Err(err) = hook.before_marshal_request(&mut op) {
                return CallResult::failed(err);
            }
        }

        debug!(op = name, opnum = op.opnum(), %ipid, "invoke");
        if let Err(err) = self.conn.invoke(&mut op, &opts).await {
            return CallResult::failed(err);
        }

        if let Some(hook) = &self.hook {
            if let Err(err) = hook.after_unmarshal_response(&mut op) {
                return CallResult::failed(err);
            }
        }

        let status = op.status();
        let response = R::from(op);
        if status != 0 {
            warn!(op = name, hresult = format_args!("{:#010x}", status), "call failed");
            return CallResult::with_status(response, self.conn.error(name, status));
        }
        CallResult::ok(response)
    }
}

impl fmt::Debug for ObjectClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectClient")
            .field("ipid", &self.ipid)
            .field("hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}
