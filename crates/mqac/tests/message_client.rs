//! MessageClient against an in-memory connection

use async_trait::async_trait;
use dcerpc::SyntaxId;
use dcom::oaut::{Variant, VariantBool};
use dcom::{
    hresult, CallOptions, ClientOptions, Conn, DcomError, Guid, Ipid, Operation, OrpcThis,
    PayloadHook, Result,
};
use midl_ndr::{BString, NdrReader, NdrWriter};
use mqac::imsmqmessage4::*;
use std::sync::{Arc, Mutex};

/// One request seen by [`RecordingConn`]
#[derive(Clone, Debug)]
struct Recorded {
    opnum: u16,
    name: &'static str,
    ipid: Option<Ipid>,
    stub: Vec<u8>,
}

/// Records every request and answers with queued response stubs
#[derive(Default)]
struct RecordingConn {
    binds: Mutex<Vec<SyntaxId>>,
    requests: Mutex<Vec<Recorded>>,
    responses: Mutex<Vec<Vec<u8>>>,
}

impl RecordingConn {
    fn replying(op: &dyn Operation) -> Arc<Self> {
        let conn = Arc::new(Self::default());
        conn.queue(op);
        conn
    }

    fn queue(&self, op: &dyn Operation) {
        let mut w = NdrWriter::new();
        op.marshal_response(&mut w).unwrap();
        self.responses.lock().unwrap().push(w.as_slice().to_vec());
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Conn for RecordingConn {
    async fn bind(&self, syntax: SyntaxId) -> Result<Arc<dyn Conn>> {
        self.binds.lock().unwrap().push(syntax);
        Err(DcomError::InvalidData("bind is not scripted".into()))
    }

    async fn alter_context(&self, syntax: SyntaxId) -> Result<()> {
        self.binds.lock().unwrap().push(syntax);
        Ok(())
    }

    async fn invoke(&self, op: &mut dyn Operation, opts: &CallOptions) -> Result<()> {
        let mut w = NdrWriter::new();
        op.marshal_request(&mut w)?;
        self.requests.lock().unwrap().push(Recorded {
            opnum: op.opnum(),
            name: op.name(),
            ipid: opts.ipid,
            stub: w.as_slice().to_vec(),
        });
        let response = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(dcerpc::RpcError::ConnectionClosed.into());
            }
            responses.remove(0)
        };
        op.unmarshal_response(&mut NdrReader::new(response))?;
        Ok(())
    }
}

async fn client(conn: Arc<RecordingConn>, ipid: Option<Ipid>) -> MessageClient {
    let mut options = ClientOptions::new().as_superclass();
    options.ipid = ipid;
    MessageClient::new(conn, options).await.unwrap()
}

fn fixed_this() -> OrpcThis {
    OrpcThis::with_causality(Guid::from_fields(1, 2, 3, [4; 8]))
}

#[tokio::test]
async fn set_integer_property_writes_envelope_then_value() {
    let conn = RecordingConn::replying(&SetPriorityOperation::default());
    let message = client(conn.clone(), Some(Ipid::generate())).await;

    let request = SetPriorityRequest {
        this: Some(fixed_this()),
        priority: 42,
    };
    let response = message
        .set_priority(request, CallOptions::new())
        .await
        .into_result()
        .unwrap();
    assert_eq!(response.ret, hresult::S_OK);

    let sent = &conn.requests()[0];
    assert_eq!(sent.opnum, 18);
    assert_eq!(sent.name, "/IMSMQMessage4/v0/Priority");
    assert_eq!(sent.stub.len(), OrpcThis::MIN_SIZE + 4);
    assert_eq!(&sent.stub[OrpcThis::MIN_SIZE..], &42i32.to_le_bytes());

    let mut decoded = SetPriorityOperation::default();
    decoded
        .unmarshal_request(&mut NdrReader::new(sent.stub.clone()))
        .unwrap();
    assert_eq!(decoded.priority, 42);
    assert_eq!(decoded.this, fixed_this());
}

#[tokio::test]
async fn missing_envelope_is_replaced() {
    let conn = RecordingConn::replying(&SetDeliveryOperation::default());
    let message = client(conn.clone(), Some(Ipid::generate())).await;

    message
        .set_delivery(
            SetDeliveryRequest {
                this: None,
                delivery: mqac::delivery::RECOVERABLE,
            },
            CallOptions::new(),
        )
        .await
        .into_result()
        .unwrap();

    let mut decoded = SetDeliveryOperation::default();
    decoded
        .unmarshal_request(&mut NdrReader::new(conn.requests()[0].stub.clone()))
        .unwrap();
    assert_eq!(decoded.this.version, dcom::DCOM_VERSION);
    assert!(!decoded.this.causality_id.is_nil());
    assert_eq!(decoded.delivery, 1);
}

#[tokio::test]
async fn null_string_response_decodes_to_none() {
    let canned = GetLabelOperation::default();
    let mut w = NdrWriter::new();
    canned.marshal_response(&mut w).unwrap();
    // ORPCTHAT, null BSTR referent, HRESULT
    assert_eq!(w.as_slice().len(), 8 + 4 + 4);
    assert_eq!(&w.as_slice()[8..12], &[0, 0, 0, 0]);

    let conn = RecordingConn::replying(&canned);
    let message = client(conn, Some(Ipid::generate())).await;
    let response = message
        .get_label(GetLabelRequest::default(), CallOptions::new())
        .await
        .into_result()
        .unwrap();
    assert_eq!(response.label, None);
}

#[tokio::test]
async fn empty_and_null_labels_differ_on_the_wire() {
    let conn = Arc::new(RecordingConn::default());
    conn.queue(&SetLabelOperation::default());
    conn.queue(&SetLabelOperation::default());
    let message = client(conn.clone(), Some(Ipid::generate())).await;

    for label in [None, Some(BString::default())] {
        message
            .set_label(
                SetLabelRequest {
                    this: Some(fixed_this()),
                    label,
                },
                CallOptions::new(),
            )
            .await
            .into_result()
            .unwrap();
    }

    let requests = conn.requests();
    let null_tail = &requests[0].stub[OrpcThis::MIN_SIZE..];
    let empty_tail = &requests[1].stub[OrpcThis::MIN_SIZE..];
    assert_eq!(null_tail, &[0, 0, 0, 0]);
    assert_ne!(&empty_tail[..4], &[0, 0, 0, 0]);
    assert_eq!(&empty_tail[4..], &[0u8; 12]);
}

#[tokio::test]
async fn failure_hresult_returns_response_and_error() {
    let canned = GetBodyOperation {
        body: Some(Variant::bytes(b"partial".to_vec())),
        ret: hresult::E_ACCESSDENIED,
        ..Default::default()
    };
    let conn = RecordingConn::replying(&canned);
    let message = client(conn, Some(Ipid::generate())).await;

    let (response, error) = message
        .get_body(GetBodyRequest::default(), CallOptions::new())
        .await
        .into_parts();
    let response = response.unwrap();
    assert_eq!(response.ret, hresult::E_ACCESSDENIED);
    assert_eq!(
        response.body.as_ref().and_then(Variant::as_bytes),
        Some(&b"partial"[..])
    );

    let error = error.unwrap();
    assert_eq!(error.hresult(), Some(hresult::E_ACCESSDENIED));
    assert_eq!(error.operation(), Some("/IMSMQMessage4/v0/Body"));
    assert_eq!(error.to_string(), "/IMSMQMessage4/v0/Body: hresult 0x80070005");
}

#[tokio::test]
async fn ipid_option_overrides_client_default() {
    let default = Ipid::generate();
    let explicit = Ipid::generate();
    let conn = Arc::new(RecordingConn::default());
    conn.queue(&GetClassOperation::default());
    conn.queue(&GetClassOperation::default());
    let message = client(conn.clone(), Some(default)).await;

    message
        .get_class(GetClassRequest::default(), CallOptions::new())
        .await
        .into_result()
        .unwrap();
    message
        .get_class(GetClassRequest::default(), CallOptions::new().with_ipid(explicit))
        .await
        .into_result()
        .unwrap();

    let requests = conn.requests();
    assert_eq!(requests[0].ipid, Some(default));
    assert_eq!(requests[1].ipid, Some(explicit));
}

#[tokio::test]
async fn missing_ipid_fails_before_sending() {
    let conn = RecordingConn::replying(&GetClassOperation::default());
    let message = client(conn.clone(), None).await;

    let (response, error) = message
        .get_class(GetClassRequest::default(), CallOptions::new())
        .await
        .into_parts();
    assert!(response.is_none());
    assert!(matches!(
        error,
        Some(DcomError::MissingIpid { op: "/IMSMQMessage4/v0/Class" })
    ));
    assert!(conn.requests().is_empty());
}

#[tokio::test]
async fn rebinding_moves_facade_and_base() {
    let conn = Arc::new(RecordingConn::default());
    conn.queue(&GetPriorityOperation::default());
    conn.queue(&dcom::dispatch::GetTypeInfoCountOperation {
        type_info_count: 1,
        ..Default::default()
    });
    let message = client(conn.clone(), None).await;
    let target = Ipid::generate();
    let rebound = message.ipid(target);
    assert_eq!(rebound.default_ipid(), Some(target));
    assert_eq!(message.default_ipid(), None);

    rebound
        .get_priority(GetPriorityRequest::default(), CallOptions::new())
        .await
        .into_result()
        .unwrap();
    let count = rebound
        .dispatch()
        .get_type_info_count(Default::default(), CallOptions::new())
        .await
        .into_result()
        .unwrap();
    assert_eq!(count.type_info_count, 1);

    let requests = conn.requests();
    assert_eq!(requests[1].opnum, 3);
    assert!(requests.iter().all(|r| r.ipid == Some(target)));
}

#[tokio::test]
async fn transport_error_is_passed_through() {
    let conn = Arc::new(RecordingConn::default());
    let message = client(conn, Some(Ipid::generate())).await;
    let error = message
        .attach_current_security_context(Default::default(), CallOptions::new())
        .await
        .into_result()
        .unwrap_err();
    assert!(matches!(
        error,
        DcomError::Rpc(dcerpc::RpcError::ConnectionClosed)
    ));
}

#[tokio::test]
async fn send_writes_interface_then_optional_variant() {
    let conn = RecordingConn::replying(&SendOperation::default());
    let message = client(conn.clone(), Some(Ipid::generate())).await;
    let queue = dcom::MInterfacePointer::new(b"MEOW".to_vec());

    message
        .send(
            SendRequest {
                this: Some(fixed_this()),
                destination_queue: Some(queue.clone()),
                transaction: None,
            },
            CallOptions::new(),
        )
        .await
        .into_result()
        .unwrap();

    let stub = &conn.requests()[0].stub;
    let mut decoded = SendOperation::default();
    decoded
        .unmarshal_request(&mut NdrReader::new(stub.clone()))
        .unwrap();
    assert_eq!(decoded.destination_queue, Some(queue));
    assert_eq!(decoded.transaction, None);
    // interface referent, max_count, ulCntData, OBJREF, null transaction
    assert_eq!(stub.len(), OrpcThis::MIN_SIZE + 4 + 4 + 4 + 4 + 4);
}

#[tokio::test]
async fn variant_bool_property() {
    let canned = GetIsAuthenticated2Operation {
        is_authenticated: VariantBool::TRUE,
        ..Default::default()
    };
    let conn = RecordingConn::replying(&canned);
    let message = client(conn, Some(Ipid::generate())).await;
    let response = message
        .get_is_authenticated2(Default::default(), CallOptions::new())
        .await
        .into_result()
        .unwrap();
    assert!(response.is_authenticated.is_true());
}

struct StampExtension;

impl PayloadHook for StampExtension {
    fn before_marshal_request(&self, op: &mut dyn Operation) -> Result<()> {
        op.orpc_this_mut().flags = 1;
        Ok(())
    }
}

#[tokio::test]
async fn payload_hook_runs_before_marshal() {
    let conn = RecordingConn::replying(&GetSentTimeOperation::default());
    let options = ClientOptions::new()
        .as_superclass()
        .with_ipid(Ipid::generate())
        .with_hook(Arc::new(StampExtension));
    let message = MessageClient::new(conn.clone(), options).await.unwrap();

    message
        .get_sent_time(GetSentTimeRequest::default(), CallOptions::new())
        .await
        .into_result()
        .unwrap();
    let mut decoded = GetSentTimeOperation::default();
    decoded
        .unmarshal_request(&mut NdrReader::new(conn.requests()[0].stub.clone()))
        .unwrap();
    assert_eq!(decoded.this.flags, 1);
}

#[tokio::test]
async fn non_superclass_client_binds_its_syntax() {
    let conn = Arc::new(RecordingConn::default());
    let err = MessageClient::new(conn.clone(), ClientOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DcomError::InvalidData(_)));
    assert_eq!(*conn.binds.lock().unwrap(), vec![MESSAGE4_SYNTAX_V0_0]);
}

#[test]
fn opnums_and_names_are_fixed() {
    assert_eq!(OPERATIONS.len(), 87);
    assert_eq!(OPERATIONS.first(), Some(&(7, "/IMSMQMessage4/v0/Class")));
    assert_eq!(OPERATIONS.last(), Some(&(93, "/IMSMQMessage4/v0/SoapBody")));
    for (i, (opnum, _)) in OPERATIONS.iter().enumerate() {
        assert_eq!(*opnum as usize, i + 7);
    }

    let op = GetPrivLevelOperation {
        priv_level: 3,
        ..Default::default()
    };
    assert_eq!(op.opnum(), 8);
    assert_eq!(op.name(), "/IMSMQMessage4/v0/PrivLevel");
    assert_eq!(SetPrivLevelOperation::default().name(), op.name());
    assert_eq!(SetPrivLevelOperation::OPNUM, 9);
    assert_eq!(GetArrivedTimeOperation::OUT_FIELDS, &["plArrivedTime"]);
    assert_eq!(SendOperation::IN_FIELDS, &["DestinationQueue", "Transaction"]);
    assert_eq!(
        GetResponseQueueInfoV1Operation::NAME,
        "/IMSMQMessage4/v0/ResponseQueueInfo_v1"
    );
}

#[test]
fn request_round_trips_through_operation() {
    let request = SetCorrelationIdRequest {
        this: Some(fixed_this()),
        correlation_id: Some(Variant::bytes(vec![7; 20])),
    };
    let op = SetCorrelationIdOperation::from(request.clone());
    let mut w = NdrWriter::new();
    op.marshal_request(&mut w).unwrap();

    let mut decoded = SetCorrelationIdOperation::default();
    decoded
        .unmarshal_request(&mut NdrReader::new(w.into_bytes()))
        .unwrap();
    assert_eq!(SetCorrelationIdRequest::from(decoded), request);
}

#[test]
fn response_round_trips_through_operation() {
    let response = GetReceivedAuthenticationLevelResponse {
        received_authentication_level: -2,
        ret: hresult::S_FALSE,
        ..Default::default()
    };
    let op = GetReceivedAuthenticationLevelOperation::from(response.clone());
    let mut w = NdrWriter::new();
    op.marshal_response(&mut w).unwrap();

    let mut decoded = GetReceivedAuthenticationLevelOperation::default();
    decoded
        .unmarshal_response(&mut NdrReader::new(w.into_bytes()))
        .unwrap();
    assert_eq!(GetReceivedAuthenticationLevelResponse::from(decoded), response);
}

fn assert_request_round_trip<O>(op: O)
where
    O: Operation + Default + PartialEq + std::fmt::Debug,
{
    let mut w = NdrWriter::new();
    op.marshal_request(&mut w).unwrap();
    let mut r = NdrReader::new(w.into_bytes());
    let mut decoded = O::default();
    decoded.unmarshal_request(&mut r).unwrap();
    assert_eq!(r.remaining(), 0, "{}", op.name());
    assert_eq!(decoded, op);
}

/// Decodes the response and checks that encoding it again gives the same bytes
fn assert_response_round_trip<O>(op: O)
where
    O: Operation + Default,
{
    let mut w = NdrWriter::new();
    op.marshal_response(&mut w).unwrap();
    let bytes = w.into_bytes();
    let mut r = NdrReader::new(bytes.clone());
    let mut decoded = O::default();
    decoded.unmarshal_response(&mut r).unwrap();
    assert_eq!(r.remaining(), 0, "{}", op.name());
    assert_eq!(decoded.status(), op.status());
    assert_eq!(decoded.orpc_that(), op.orpc_that());

    let mut again = NdrWriter::new();
    decoded.marshal_response(&mut again).unwrap();
    assert_eq!(again.as_slice(), bytes.as_ref(), "{}", op.name());
}

#[test]
fn requests_round_trip_for_every_field_kind() {
    let this = fixed_this();
    let queue = || Some(dcom::MInterfacePointer::new(vec![0x4d, 0x45, 0x4f, 0x57, 1, 2]));

    assert_request_round_trip(SetAppSpecificOperation {
        this: this.clone(),
        app_specific: -7,
        ..Default::default()
    });
    for label in [None, Some(BString::default()), Some(BString::from("invoice"))] {
        assert_request_round_trip(SetLabelOperation {
            this: this.clone(),
            label: label.clone(),
            ..Default::default()
        });
        assert_request_round_trip(SetSoapBodyOperation {
            this: this.clone(),
            soap_body: label,
            ..Default::default()
        });
    }
    for body in [
        None,
        Some(Variant::Empty),
        Some(Variant::I4(9)),
        Some(Variant::bstr("body")),
        Some(Variant::Bstr(None)),
        Some(Variant::bytes(vec![0xca, 0xfe, 0xba, 0xbe, 0x00])),
        Some(Variant::Bytes(None)),
        Some(Variant::Date(45123.5)),
    ] {
        assert_request_round_trip(SetBodyOperation {
            this: this.clone(),
            body,
            ..Default::default()
        });
    }
    for (destination_queue, transaction) in [
        (None, None),
        (queue(), None),
        (queue(), Some(Variant::I4(1))),
        (queue(), Some(Variant::Dispatch(queue()))),
    ] {
        assert_request_round_trip(SendOperation {
            this: this.clone(),
            destination_queue,
            transaction,
            ..Default::default()
        });
    }
    for info in [None, queue()] {
        assert_request_round_trip(SetByRefResponseQueueInfoOperation {
            this: this.clone(),
            response_queue_info: info,
            ..Default::default()
        });
    }
}

#[test]
fn responses_round_trip_for_every_field_kind() {
    assert_response_round_trip(GetBodyLengthOperation {
        body_length: 4096,
        ..Default::default()
    });
    assert_response_round_trip(GetIsAuthenticated2Operation {
        is_authenticated: VariantBool::TRUE,
        ret: hresult::S_FALSE,
        ..Default::default()
    });
    for label in [None, Some(BString::from("reply"))] {
        assert_response_round_trip(GetLabelOperation {
            label,
            ..Default::default()
        });
    }
    for body in [
        None,
        Some(Variant::bytes(vec![1; 33])),
        Some(Variant::Bytes(None)),
        Some(Variant::Ui8(u64::MAX)),
    ] {
        assert_response_round_trip(GetBodyOperation {
            body: body.clone(),
            ..Default::default()
        });
        assert_response_round_trip(GetSenderIdOperation {
            sender_id: body,
            ret: hresult::E_ACCESSDENIED,
            ..Default::default()
        });
    }
    for destination in [None, Some(dcom::MInterfacePointer::new(vec![7; 12]))] {
        assert_response_round_trip(GetDestinationOperation {
            destination,
            ..Default::default()
        });
    }
    assert_response_round_trip(GetSentTimeOperation {
        sent_time: Some(Variant::Date(45000.0)),
        ..Default::default()
    });
}
