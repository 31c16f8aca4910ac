//! IDispatch (MS-OAUT 3.1.4)
//!
//! Base interface of every automation dual interface. Derived clients embed
//! a [`DispatchClient`] created as a superclass, which shares their
//! presentation context.

use crate::conn::Conn;
use crate::oaut::{DispParams, ExcepInfo, Variant};
use crate::operation::{ClientOptions, ObjectClient};
use crate::types::{iid, Guid, Ipid, MInterfacePointer, Result};
use dcerpc::SyntaxId;
use midl_ndr::{ConformantArray, NdrWString};
use std::sync::Arc;
use tracing::debug;

/// IDispatch v0.0
pub const DISPATCH_SYNTAX_V0_0: SyntaxId = SyntaxId::new(iid::IDISPATCH, 0, 0);

/// `LOCALE_USER_DEFAULT`
pub const LOCALE_USER_DEFAULT: u32 = 0x0400;

/// `wFlags` values for Invoke
pub mod invoke_flags {
    pub const DISPATCH_METHOD: u32 = 0x1;
    pub const DISPATCH_PROPERTYGET: u32 = 0x2;
    pub const DISPATCH_PROPERTYPUT: u32 = 0x4;
    pub const DISPATCH_PROPERTYPUTREF: u32 = 0x8;
}

/// Client for IDispatch
#[derive(Clone, Debug)]
pub struct DispatchClient {
    object: ObjectClient,
}

impl DispatchClient {
    /// Bind IDispatch on `conn`, unless `options.superclass` is set, in which
    /// case `conn` is used as is.
    pub async fn new(conn: Arc<dyn Conn>, options: ClientOptions) -> Result<Self> {
        let conn = if options.superclass {
            conn
        } else {
            debug!(syntax = %DISPATCH_SYNTAX_V0_0, "binding IDispatch");
            conn.bind(DISPATCH_SYNTAX_V0_0).await?
        };
        Ok(Self {
            object: ObjectClient::new(conn, &options),
        })
    }

    pub fn object(&self) -> &ObjectClient {
        &self.object
    }

    pub fn conn(&self) -> &Arc<dyn Conn> {
        self.object.conn()
    }

    /// Default IPID of this client
    pub fn default_ipid(&self) -> Option<Ipid> {
        self.object.ipid()
    }

    /// Client for another object on the same connection
    pub fn ipid(&self, ipid: Ipid) -> Self {
        Self {
            object: self.object.with_ipid(ipid),
        }
    }

    pub async fn alter_context(&self) -> Result<()> {
        self.conn().alter_context(DISPATCH_SYNTAX_V0_0).await
    }
}

impl GetIDsOfNamesRequest {
    /// Look up `names` with the NULL `riid` and the user default locale
    pub fn for_names<S: AsRef<str>>(names: &[S]) -> Self {
        let names: Vec<Option<NdrWString>> = names
            .iter()
            .map(|name| Some(NdrWString::from(name.as_ref())))
            .collect();
        Self {
            this: None,
            riid: Guid::NIL,
            names_count: names.len() as u32,
            names: ConformantArray::new(names),
            locale_id: LOCALE_USER_DEFAULT,
        }
    }
}

impl InvokeRequest {
    /// Invoke `disp_id` with `params` and no by-reference arguments
    pub fn new(disp_id: i32, flags: u32, params: DispParams) -> Self {
        Self {
            disp_id_member: disp_id,
            riid: Guid::NIL,
            locale_id: LOCALE_USER_DEFAULT,
            flags,
            disp_params: params,
            ..Default::default()
        }
    }
}

crate::dcom_operations! {
    interface: "IDispatch",
    client: DispatchClient,
    operations: {
        /// Number of type information interfaces the object provides (0 or 1)
        fn get_type_info_count => GetTypeInfoCountOperation(GetTypeInfoCountRequest, GetTypeInfoCountResponse) = 3, "GetTypeInfoCount" {
            in {}
            out { type_info_count: u32 = "pctinfo" }
        }
        /// Type information of the object
        fn get_type_info => GetTypeInfoOperation(GetTypeInfoRequest, GetTypeInfoResponse) = 4, "GetTypeInfo" {
            in { index: u32 = "iTInfo", locale_id: u32 = "lcid" }
            out { type_info: Option<MInterfacePointer> = "ppTInfo" }
        }
        /// Map member names to DISPIDs
        fn get_ids_of_names => GetIDsOfNamesOperation(GetIDsOfNamesRequest, GetIDsOfNamesResponse) = 5, "GetIDsOfNames" {
            in {
                riid: Guid = "riid",
                names: ConformantArray<Option<NdrWString>> = "rgszNames",
                names_count: u32 = "cNames",
                locale_id: u32 = "lcid",
            }
            out { disp_ids: ConformantArray<i32> = "rgDispId" }
        }
        /// Invoke a method or access a property
        fn invoke => InvokeOperation(InvokeRequest, InvokeResponse) = 6, "Invoke" {
            in {
                disp_id_member: i32 = "dispIdMember",
                riid: Guid = "riid",
                locale_id: u32 = "lcid",
                flags: u32 = "dwFlags",
                disp_params: DispParams = "pDispParams",
                var_ref_count: u32 = "cVarRef",
                var_ref_index: ConformantArray<u32> = "rgVarRefIdx",
                var_ref: ConformantArray<Option<Variant>> = "rgVarRef",
            }
            out {
                var_result: Option<Variant> = "pVarResult",
                excep_info: ExcepInfo = "pExcepInfo",
                arg_err: u32 = "pArgErr",
                var_ref_out: ConformantArray<Option<Variant>> = "rgVarRef",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{CallOptions, Operation};
    use crate::types::{hresult, DcomError, OrpcThat, OrpcThis};
    use async_trait::async_trait;
    use midl_ndr::{NdrReader, NdrWriter};
    use std::sync::Mutex;

    /// Records binds and answers every call with a fixed response op
    #[derive(Default)]
    struct ScriptedConn {
        binds: Mutex<Vec<SyntaxId>>,
        response: Mutex<Option<Vec<u8>>>,
    }

    #[async_trait]
    impl Conn for ScriptedConn {
        async fn bind(&self, syntax: SyntaxId) -> Result<Arc<dyn Conn>> {
            self.binds.lock().unwrap().push(syntax);
            Ok(Arc::new(ScriptedConn {
                binds: Mutex::new(vec![syntax]),
                response: Mutex::new(self.response.lock().unwrap().clone()),
            }))
        }

        async fn alter_context(&self, _syntax: SyntaxId) -> Result<()> {
            Ok(())
        }

        async fn invoke(&self, op: &mut dyn Operation, _opts: &CallOptions) -> Result<()> {
            let mut w = NdrWriter::new();
            op.marshal_request(&mut w)?;
            let response = self.response.lock().unwrap().clone().unwrap_or_default();
            op.unmarshal_response(&mut NdrReader::new(response))?;
            Ok(())
        }
    }

    fn response_bytes(op: &dyn Operation) -> Vec<u8> {
        let mut w = NdrWriter::new();
        op.marshal_response(&mut w).unwrap();
        w.as_slice().to_vec()
    }

    #[tokio::test]
    async fn test_superclass_does_not_bind() {
        let conn = Arc::new(ScriptedConn::default());
        DispatchClient::new(conn.clone(), ClientOptions::new().as_superclass())
            .await
            .unwrap();
        assert!(conn.binds.lock().unwrap().is_empty());

        DispatchClient::new(conn.clone(), ClientOptions::new()).await.unwrap();
        assert_eq!(*conn.binds.lock().unwrap(), vec![DISPATCH_SYNTAX_V0_0]);
    }

    #[tokio::test]
    async fn test_get_ids_of_names() {
        let canned = GetIDsOfNamesOperation {
            disp_ids: ConformantArray::new(vec![0x60020000]),
            ..Default::default()
        };
        let conn = Arc::new(ScriptedConn {
            response: Mutex::new(Some(response_bytes(&canned))),
            ..Default::default()
        });
        let client = DispatchClient::new(conn, ClientOptions::new().as_superclass())
            .await
            .unwrap()
            .ipid(Ipid::generate());

        let response = client
            .get_ids_of_names(GetIDsOfNamesRequest::for_names(&["Label"]), CallOptions::new())
            .await
            .into_result()
            .unwrap();
        assert_eq!(response.disp_ids.elements, vec![0x60020000]);
    }

    #[tokio::test]
    async fn test_invoke_exception_is_reported() {
        let canned = InvokeOperation {
            excep_info: ExcepInfo {
                description: Some("queue not found".into()),
                scode: hresult::E_FAIL,
                ..Default::default()
            },
            ret: hresult::DISP_E_EXCEPTION,
            ..Default::default()
        };
        let conn = Arc::new(ScriptedConn {
            response: Mutex::new(Some(response_bytes(&canned))),
            ..Default::default()
        });
        let client = DispatchClient::new(conn, ClientOptions::new().with_ipid(Ipid::generate()))
            .await
            .unwrap();

        let request = InvokeRequest::new(
            1,
            invoke_flags::DISPATCH_METHOD,
            DispParams::positional(vec![Variant::I4(5)]),
        );
        let (response, error) = client.invoke(request, CallOptions::new()).await.into_parts();
        let response = response.unwrap();
        assert_eq!(
            response.excep_info.description.as_ref().map(|s| s.as_str()),
            Some("queue not found")
        );
        assert!(matches!(
            error,
            Some(DcomError::Status { op: "/IDispatch/v0/Invoke", hresult: code }) if code == hresult::DISP_E_EXCEPTION
        ));
    }

    #[test]
    fn test_invoke_request_layout() {
        let op = InvokeOperation::from(InvokeRequest {
            this: Some(OrpcThis::with_causality(Guid::NIL)),
            ..InvokeRequest::new(7, invoke_flags::DISPATCH_PROPERTYGET, DispParams::default())
        });
        let mut w = NdrWriter::new();
        op.marshal_request(&mut w).unwrap();
        let bytes = w.as_slice();
        let body = &bytes[OrpcThis::MIN_SIZE..];
        assert_eq!(&body[0..4], &[7, 0, 0, 0]);
        // riid, lcid, dwFlags
        assert_eq!(&body[4..20], &[0u8; 16]);
        assert_eq!(&body[20..24], &[0, 4, 0, 0]);
        assert_eq!(&body[24..28], &[2, 0, 0, 0]);
        // empty DISPPARAMS, cVarRef, two empty arrays
        assert_eq!(&body[28..], &[0u8; 28]);

        let mut decoded = InvokeOperation::default();
        decoded
            .unmarshal_request(&mut NdrReader::new(bytes.to_vec()))
            .unwrap();
        assert_eq!(decoded.disp_id_member, 7);
        assert_eq!(decoded.this, op.this);
    }

    #[test]
    fn test_operation_table() {
        let expected: &[(u16, &str)] = &[
            (3, "/IDispatch/v0/GetTypeInfoCount"),
            (4, "/IDispatch/v0/GetTypeInfo"),
            (5, "/IDispatch/v0/GetIDsOfNames"),
            (6, "/IDispatch/v0/Invoke"),
        ];
        assert_eq!(OPERATIONS, expected);
        assert_eq!(InvokeOperation::OUT_FIELDS[3], "rgVarRef");
        assert_eq!(GetTypeInfoCountOperation::default().that, OrpcThat::default());
    }
}
