//! IMSMQMessage4 (MS-MQMQ 3.1.4.7)
//!
//! Properties and methods of an MSMQ message. Opnums 3..=6 are the
//! IDispatch methods, reached through [`MessageClient::dispatch`].

use crate::IID_IMSMQMESSAGE4;
use dcerpc::SyntaxId;
use dcom::oaut::{Variant, VariantBool};
use dcom::{ClientOptions, Conn, DispatchClient, Ipid, MInterfacePointer, ObjectClient, Result};
use midl_ndr::BString;
use std::sync::Arc;
use tracing::debug;

/// IMSMQMessage4 v0.0
pub const MESSAGE4_SYNTAX_V0_0: SyntaxId = SyntaxId::new(IID_IMSMQMESSAGE4, 0, 0);

/// Client for IMSMQMessage4
///
/// Every call takes [`CallOptions`](dcom::CallOptions); an IPID given there
/// overrides the default IPID of the client.
#[derive(Clone, Debug)]
pub struct MessageClient {
    object: ObjectClient,
    dispatch: DispatchClient,
}

impl MessageClient {
    /// Bind IMSMQMessage4 on `conn`, unless `options.superclass` is set.
    ///
    /// The embedded IDispatch client shares the resulting connection.
    pub async fn new(conn: Arc<dyn Conn>, options: ClientOptions) -> Result<Self> {
        let conn = if options.superclass {
            conn
        } else {
            debug!(syntax = %MESSAGE4_SYNTAX_V0_0, "binding IMSMQMessage4");
            conn.bind(MESSAGE4_SYNTAX_V0_0).await?
        };
        let dispatch = DispatchClient::new(conn.clone(), options.clone().as_superclass()).await?;
        Ok(Self {
            object: ObjectClient::new(conn, &options),
            dispatch,
        })
    }

    pub fn object(&self) -> &ObjectClient {
        &self.object
    }

    /// IDispatch operations of the same object
    pub fn dispatch(&self) -> &DispatchClient {
        &self.dispatch
    }

    pub fn conn(&self) -> &Arc<dyn Conn> {
        self.object.conn()
    }

    pub fn default_ipid(&self) -> Option<Ipid> {
        self.object.ipid()
    }

    /// Client for another message object on the same connection
    pub fn ipid(&self, ipid: Ipid) -> Self {
        Self {
            object: self.object.with_ipid(ipid),
            dispatch: self.dispatch.ipid(ipid),
        }
    }

    pub async fn alter_context(&self) -> Result<()> {
        self.conn().alter_context(MESSAGE4_SYNTAX_V0_0).await
    }
}

dcom::dcom_operations! {
    interface: "IMSMQMessage4",
    client: MessageClient,
    operations: {
        /// Message class (`MQMSG_CLASS_*`)
        fn get_class => GetClassOperation(GetClassRequest, GetClassResponse) = 7, "Class" {
            in {}
            out { class: i32 = "plClass" }
        }
        /// Privacy level of the body
        fn get_priv_level => GetPrivLevelOperation(GetPrivLevelRequest, GetPrivLevelResponse) = 8, "PrivLevel" {
            in {}
            out { priv_level: i32 = "plPrivLevel" }
        }
        fn set_priv_level => SetPrivLevelOperation(SetPrivLevelRequest, SetPrivLevelResponse) = 9, "PrivLevel" {
            in { priv_level: i32 = "lPrivLevel" }
            out {}
        }
        /// Requested authentication level
        fn get_auth_level => GetAuthLevelOperation(GetAuthLevelRequest, GetAuthLevelResponse) = 10, "AuthLevel" {
            in {}
            out { auth_level: i32 = "plAuthLevel" }
        }
        fn set_auth_level => SetAuthLevelOperation(SetAuthLevelRequest, SetAuthLevelResponse) = 11, "AuthLevel" {
            in { auth_level: i32 = "lAuthLevel" }
            out {}
        }
        /// Whether the message was authenticated, as a `Boolean`
        fn get_is_authenticated => GetIsAuthenticatedOperation(GetIsAuthenticatedRequest, GetIsAuthenticatedResponse) = 12, "IsAuthenticated" {
            in {}
            out { is_authenticated: u8 = "pisAuthenticated" }
        }
        /// Express or recoverable delivery
        fn get_delivery => GetDeliveryOperation(GetDeliveryRequest, GetDeliveryResponse) = 13, "Delivery" {
            in {}
            out { delivery: i32 = "plDelivery" }
        }
        fn set_delivery => SetDeliveryOperation(SetDeliveryRequest, SetDeliveryResponse) = 14, "Delivery" {
            in { delivery: i32 = "lDelivery" }
            out {}
        }
        fn get_trace => GetTraceOperation(GetTraceRequest, GetTraceResponse) = 15, "Trace" {
            in {}
            out { trace: i32 = "plTrace" }
        }
        fn set_trace => SetTraceOperation(SetTraceRequest, SetTraceResponse) = 16, "Trace" {
            in { trace: i32 = "lTrace" }
            out {}
        }
        /// Message priority, 0 to 7
        fn get_priority => GetPriorityOperation(GetPriorityRequest, GetPriorityResponse) = 17, "Priority" {
            in {}
            out { priority: i32 = "plPriority" }
        }
        fn set_priority => SetPriorityOperation(SetPriorityRequest, SetPriorityResponse) = 18, "Priority" {
            in { priority: i32 = "lPriority" }
            out {}
        }
        fn get_journal => GetJournalOperation(GetJournalRequest, GetJournalResponse) = 19, "Journal" {
            in {}
            out { journal: i32 = "plJournal" }
        }
        fn set_journal => SetJournalOperation(SetJournalRequest, SetJournalResponse) = 20, "Journal" {
            in { journal: i32 = "lJournal" }
            out {}
        }
        /// Response queue, MSMQ 1.0 form
        fn get_response_queue_info_v1 => GetResponseQueueInfoV1Operation(GetResponseQueueInfoV1Request, GetResponseQueueInfoV1Response) = 21, "ResponseQueueInfo_v1" {
            in {}
            out { response_queue_info: Option<MInterfacePointer> = "ppqinfoResponse" }
        }
        fn set_response_queue_info_v1 => SetResponseQueueInfoV1Operation(SetResponseQueueInfoV1Request, SetResponseQueueInfoV1Response) = 22, "ResponseQueueInfo_v1" {
            in { response_queue_info: Option<MInterfacePointer> = "pqinfoResponse" }
            out {}
        }
        /// Application-defined value
        fn get_app_specific => GetAppSpecificOperation(GetAppSpecificRequest, GetAppSpecificResponse) = 23, "AppSpecific" {
            in {}
            out { app_specific: i32 = "plAppSpecific" }
        }
        fn set_app_specific => SetAppSpecificOperation(SetAppSpecificRequest, SetAppSpecificResponse) = 24, "AppSpecific" {
            in { app_specific: i32 = "lAppSpecific" }
            out {}
        }
        /// Identifier of the computer that sent the message
        fn get_source_machine_guid => GetSourceMachineGuidOperation(GetSourceMachineGuidRequest, GetSourceMachineGuidResponse) = 25, "SourceMachineGuid" {
            in {}
            out { guid_src_machine: Option<BString> = "pbstrGuidSrcMachine" }
        }
        /// Body size in bytes
        fn get_body_length => GetBodyLengthOperation(GetBodyLengthRequest, GetBodyLengthResponse) = 26, "BodyLength" {
            in {}
            out { body_length: i32 = "pcbBody" }
        }
        /// Message body
        fn get_body => GetBodyOperation(GetBodyRequest, GetBodyResponse) = 27, "Body" {
            in {}
            out { body: Option<Variant> = "pvarBody" }
        }
        fn set_body => SetBodyOperation(SetBodyRequest, SetBodyResponse) = 28, "Body" {
            in { body: Option<Variant> = "varBody" }
            out {}
        }
        /// Administration queue, MSMQ 1.0 form
        fn get_admin_queue_info_v1 => GetAdminQueueInfoV1Operation(GetAdminQueueInfoV1Request, GetAdminQueueInfoV1Response) = 29, "AdminQueueInfo_v1" {
            in {}
            out { admin_queue_info: Option<MInterfacePointer> = "ppqinfoAdmin" }
        }
        fn set_admin_queue_info_v1 => SetAdminQueueInfoV1Operation(SetAdminQueueInfoV1Request, SetAdminQueueInfoV1Response) = 30, "AdminQueueInfo_v1" {
            in { admin_queue_info: Option<MInterfacePointer> = "pqinfoAdmin" }
            out {}
        }
        /// Message identifier, a 20-byte array
        fn get_id => GetIdOperation(GetIdRequest, GetIdResponse) = 31, "Id" {
            in {}
            out { message_id: Option<Variant> = "pvarMsgId" }
        }
        /// Correlation identifier
        fn get_correlation_id => GetCorrelationIdOperation(GetCorrelationIdRequest, GetCorrelationIdResponse) = 32, "CorrelationId" {
            in {}
            out { correlation_id: Option<Variant> = "pvarMsgId" }
        }
        fn set_correlation_id => SetCorrelationIdOperation(SetCorrelationIdRequest, SetCorrelationIdResponse) = 33, "CorrelationId" {
            in { correlation_id: Option<Variant> = "varMsgId" }
            out {}
        }
        /// Acknowledgments requested
        fn get_ack => GetAckOperation(GetAckRequest, GetAckResponse) = 34, "Ack" {
            in {}
            out { ack: i32 = "plAck" }
        }
        fn set_ack => SetAckOperation(SetAckRequest, SetAckResponse) = 35, "Ack" {
            in { ack: i32 = "lAck" }
            out {}
        }
        /// Message label
        fn get_label => GetLabelOperation(GetLabelRequest, GetLabelResponse) = 36, "Label" {
            in {}
            out { label: Option<BString> = "pbstrLabel" }
        }
        fn set_label => SetLabelOperation(SetLabelRequest, SetLabelResponse) = 37, "Label" {
            in { label: Option<BString> = "bstrLabel" }
            out {}
        }
        /// Seconds allowed to reach the destination queue
        fn get_max_time_to_reach_queue => GetMaxTimeToReachQueueOperation(GetMaxTimeToReachQueueRequest, GetMaxTimeToReachQueueResponse) = 38, "MaxTimeToReachQueue" {
            in {}
            out { max_time_to_reach_queue: i32 = "plMaxTimeToReachQueue" }
        }
        fn set_max_time_to_reach_queue => SetMaxTimeToReachQueueOperation(SetMaxTimeToReachQueueRequest, SetMaxTimeToReachQueueResponse) = 39, "MaxTimeToReachQueue" {
            in { max_time_to_reach_queue: i32 = "lMaxTimeToReachQueue" }
            out {}
        }
        /// Seconds allowed to be received
        fn get_max_time_to_receive => GetMaxTimeToReceiveOperation(GetMaxTimeToReceiveRequest, GetMaxTimeToReceiveResponse) = 40, "MaxTimeToReceive" {
            in {}
            out { max_time_to_receive: i32 = "plMaxTimeToReceive" }
        }
        fn set_max_time_to_receive => SetMaxTimeToReceiveOperation(SetMaxTimeToReceiveRequest, SetMaxTimeToReceiveResponse) = 41, "MaxTimeToReceive" {
            in { max_time_to_receive: i32 = "lMaxTimeToReceive" }
            out {}
        }
        fn get_hash_algorithm => GetHashAlgorithmOperation(GetHashAlgorithmRequest, GetHashAlgorithmResponse) = 42, "HashAlgorithm" {
            in {}
            out { hash_algorithm: i32 = "plHashAlg" }
        }
        fn set_hash_algorithm => SetHashAlgorithmOperation(SetHashAlgorithmRequest, SetHashAlgorithmResponse) = 43, "HashAlgorithm" {
            in { hash_algorithm: i32 = "lHashAlg" }
            out {}
        }
        fn get_encrypt_algorithm => GetEncryptAlgorithmOperation(GetEncryptAlgorithmRequest, GetEncryptAlgorithmResponse) = 44, "EncryptAlgorithm" {
            in {}
            out { encrypt_algorithm: i32 = "plEncryptAlg" }
        }
        fn set_encrypt_algorithm => SetEncryptAlgorithmOperation(SetEncryptAlgorithmRequest, SetEncryptAlgorithmResponse) = 45, "EncryptAlgorithm" {
            in { encrypt_algorithm: i32 = "lEncryptAlg" }
            out {}
        }
        /// Time the message was sent, as a `DATE`
        fn get_sent_time => GetSentTimeOperation(GetSentTimeRequest, GetSentTimeResponse) = 46, "SentTime" {
            in {}
            out { sent_time: Option<Variant> = "pvarSentTime" }
        }
        /// Time the message arrived, as a `DATE`
        fn get_arrived_time => GetArrivedTimeOperation(GetArrivedTimeRequest, GetArrivedTimeResponse) = 47, "ArrivedTime" {
            in {}
            out { arrived_time: Option<Variant> = "plArrivedTime" }
        }
        /// Queue the message was sent to
        fn get_destination_queue_info => GetDestinationQueueInfoOperation(GetDestinationQueueInfoRequest, GetDestinationQueueInfoResponse) = 48, "DestinationQueueInfo" {
            in {}
            out { destination_queue_info: Option<MInterfacePointer> = "ppqinfoDest" }
        }
        /// Certificate used to authenticate the message
        fn get_sender_certificate => GetSenderCertificateOperation(GetSenderCertificateRequest, GetSenderCertificateResponse) = 49, "SenderCertificate" {
            in {}
            out { sender_certificate: Option<Variant> = "pvarSenderCert" }
        }
        fn set_sender_certificate => SetSenderCertificateOperation(SetSenderCertificateRequest, SetSenderCertificateResponse) = 50, "SenderCertificate" {
            in { sender_certificate: Option<Variant> = "varSenderCert" }
            out {}
        }
        /// Sender identifier
        fn get_sender_id => GetSenderIdOperation(GetSenderIdRequest, GetSenderIdResponse) = 51, "SenderId" {
            in {}
            out { sender_id: Option<Variant> = "pvarSenderId" }
        }
        fn get_sender_id_type => GetSenderIdTypeOperation(GetSenderIdTypeRequest, GetSenderIdTypeResponse) = 52, "SenderIdType" {
            in {}
            out { sender_id_type: i32 = "plSenderIdType" }
        }
        fn set_sender_id_type => SetSenderIdTypeOperation(SetSenderIdTypeRequest, SetSenderIdTypeResponse) = 53, "SenderIdType" {
            in { sender_id_type: i32 = "lSenderIdType" }
            out {}
        }
        /// Send the message to `DestinationQueue`, optionally inside `Transaction`
        fn send => SendOperation(SendRequest, SendResponse) = 54, "Send" {
            in { destination_queue: Option<MInterfacePointer> = "DestinationQueue", transaction: Option<Variant> = "Transaction" }
            out {}
        }
        /// Attach the caller security context for authentication
        fn attach_current_security_context => AttachCurrentSecurityContextOperation(AttachCurrentSecurityContextRequest, AttachCurrentSecurityContextResponse) = 55, "AttachCurrentSecurityContext" {
            in {}
            out {}
        }
        /// MSMQ version of the sending queue manager
        fn get_sender_version => GetSenderVersionOperation(GetSenderVersionRequest, GetSenderVersionResponse) = 56, "SenderVersion" {
            in {}
            out { sender_version: i32 = "plSenderVersion" }
        }
        /// Application-defined extension bytes
        fn get_extension => GetExtensionOperation(GetExtensionRequest, GetExtensionResponse) = 57, "Extension" {
            in {}
            out { extension: Option<Variant> = "pvarExtension" }
        }
        fn set_extension => SetExtensionOperation(SetExtensionRequest, SetExtensionResponse) = 58, "Extension" {
            in { extension: Option<Variant> = "varExtension" }
            out {}
        }
        fn get_connector_type_guid => GetConnectorTypeGuidOperation(GetConnectorTypeGuidRequest, GetConnectorTypeGuidResponse) = 59, "ConnectorTypeGuid" {
            in {}
            out { connector_type_guid: Option<BString> = "pbstrGuidConnectorType" }
        }
        fn set_connector_type_guid => SetConnectorTypeGuidOperation(SetConnectorTypeGuidRequest, SetConnectorTypeGuidResponse) = 60, "ConnectorTypeGuid" {
            in { connector_type_guid: Option<BString> = "bstrGuidConnectorType" }
            out {}
        }
        /// Transaction status queue on the source computer
        fn get_transaction_status_queue_info => GetTransactionStatusQueueInfoOperation(GetTransactionStatusQueueInfoRequest, GetTransactionStatusQueueInfoResponse) = 61, "TransactionStatusQueueInfo" {
            in {}
            out { transaction_status_queue_info: Option<MInterfacePointer> = "ppqinfoXactStatus" }
        }
        /// Symmetric key for connector-encrypted messages
        fn get_destination_symmetric_key => GetDestinationSymmetricKeyOperation(GetDestinationSymmetricKeyRequest, GetDestinationSymmetricKeyResponse) = 62, "DestinationSymmetricKey" {
            in {}
            out { destination_symmetric_key: Option<Variant> = "pvarDestSymmKey" }
        }
        fn set_destination_symmetric_key => SetDestinationSymmetricKeyOperation(SetDestinationSymmetricKeyRequest, SetDestinationSymmetricKeyResponse) = 63, "DestinationSymmetricKey" {
            in { destination_symmetric_key: Option<Variant> = "varDestSymmKey" }
            out {}
        }
        /// Digital signature
        fn get_signature => GetSignatureOperation(GetSignatureRequest, GetSignatureResponse) = 64, "Signature" {
            in {}
            out { signature: Option<Variant> = "pvarSignature" }
        }
        fn set_signature => SetSignatureOperation(SetSignatureRequest, SetSignatureResponse) = 65, "Signature" {
            in { signature: Option<Variant> = "varSignature" }
            out {}
        }
        /// Cryptographic provider type
        fn get_authentication_provider_type => GetAuthenticationProviderTypeOperation(GetAuthenticationProviderTypeRequest, GetAuthenticationProviderTypeResponse) = 66, "AuthenticationProviderType" {
            in {}
            out { authentication_provider_type: i32 = "plAuthProvType" }
        }
        fn set_authentication_provider_type => SetAuthenticationProviderTypeOperation(SetAuthenticationProviderTypeRequest, SetAuthenticationProviderTypeResponse) = 67, "AuthenticationProviderType" {
            in { authentication_provider_type: i32 = "lAuthProvType" }
            out {}
        }
        /// Cryptographic provider name
        fn get_authentication_provider_name => GetAuthenticationProviderNameOperation(GetAuthenticationProviderNameRequest, GetAuthenticationProviderNameResponse) = 68, "AuthenticationProviderName" {
            in {}
            out { authentication_provider_name: Option<BString> = "pbstrAuthProvName" }
        }
        fn set_authentication_provider_name => SetAuthenticationProviderNameOperation(SetAuthenticationProviderNameRequest, SetAuthenticationProviderNameResponse) = 69, "AuthenticationProviderName" {
            in { authentication_provider_name: Option<BString> = "bstrAuthProvName" }
            out {}
        }
        /// Set the sender identifier
        fn set_sender_id => SetSenderIdOperation(SetSenderIdRequest, SetSenderIdResponse) = 70, "SenderId" {
            in { sender_id: Option<Variant> = "varSenderId" }
            out {}
        }
        /// Message class, settable by connector applications
        fn get_message_class => GetMessageClassOperation(GetMessageClassRequest, GetMessageClassResponse) = 71, "MsgClass" {
            in {}
            out { message_class: i32 = "plMsgClass" }
        }
        fn set_message_class => SetMessageClassOperation(SetMessageClassRequest, SetMessageClassResponse) = 72, "MsgClass" {
            in { message_class: i32 = "lMsgClass" }
            out {}
        }
        /// Collection of all message properties
        fn get_properties => GetPropertiesOperation(GetPropertiesRequest, GetPropertiesResponse) = 73, "Properties" {
            in {}
            out { properties: Option<MInterfacePointer> = "ppcolProperties" }
        }
        /// Transaction identifier
        fn get_transaction_id => GetTransactionIdOperation(GetTransactionIdRequest, GetTransactionIdResponse) = 74, "TransactionId" {
            in {}
            out { transaction_id: Option<Variant> = "pvarXactId" }
        }
        fn get_is_first_in_transaction => GetIsFirstInTransactionOperation(GetIsFirstInTransactionRequest, GetIsFirstInTransactionResponse) = 75, "IsFirstInTransaction" {
            in {}
            out { is_first_in_transaction: u8 = "pisFirstInXact" }
        }
        fn get_is_last_in_transaction => GetIsLastInTransactionOperation(GetIsLastInTransactionRequest, GetIsLastInTransactionResponse) = 76, "IsLastInTransaction" {
            in {}
            out { is_last_in_transaction: u8 = "pisLastInXact" }
        }
        /// Response queue
        fn get_response_queue_info => GetResponseQueueInfoOperation(GetResponseQueueInfoRequest, GetResponseQueueInfoResponse) = 77, "ResponseQueueInfo" {
            in {}
            out { response_queue_info: Option<MInterfacePointer> = "ppqinfoResponse" }
        }
        fn set_by_ref_response_queue_info => SetByRefResponseQueueInfoOperation(SetByRefResponseQueueInfoRequest, SetByRefResponseQueueInfoResponse) = 78, "ResponseQueueInfo" {
            in { response_queue_info: Option<MInterfacePointer> = "pqinfoResponse" }
            out {}
        }
        /// Administration queue
        fn get_admin_queue_info => GetAdminQueueInfoOperation(GetAdminQueueInfoRequest, GetAdminQueueInfoResponse) = 79, "AdminQueueInfo" {
            in {}
            out { admin_queue_info: Option<MInterfacePointer> = "ppqinfoAdmin" }
        }
        fn set_by_ref_admin_queue_info => SetByRefAdminQueueInfoOperation(SetByRefAdminQueueInfoRequest, SetByRefAdminQueueInfoResponse) = 80, "AdminQueueInfo" {
            in { admin_queue_info: Option<MInterfacePointer> = "pqinfoAdmin" }
            out {}
        }
        /// Authentication level the receiving queue manager verified
        fn get_received_authentication_level => GetReceivedAuthenticationLevelOperation(GetReceivedAuthenticationLevelRequest, GetReceivedAuthenticationLevelResponse) = 81, "ReceivedAuthenticationLevel" {
            in {}
            out { received_authentication_level: i16 = "psReceivedAuthenticationLevel" }
        }
        /// Response destination
        fn get_response_destination => GetResponseDestinationOperation(GetResponseDestinationRequest, GetResponseDestinationResponse) = 82, "ResponseDestination" {
            in {}
            out { response_destination: Option<MInterfacePointer> = "ppdestResponse" }
        }
        fn set_by_ref_response_destination => SetByRefResponseDestinationOperation(SetByRefResponseDestinationRequest, SetByRefResponseDestinationResponse) = 83, "ResponseDestination" {
            in { response_destination: Option<MInterfacePointer> = "pdestResponse" }
            out {}
        }
        /// Destination object the message was sent to
        fn get_destination => GetDestinationOperation(GetDestinationRequest, GetDestinationResponse) = 84, "Destination" {
            in {}
            out { destination: Option<MInterfacePointer> = "ppdestDestination" }
        }
        /// 64-bit lookup identifier
        fn get_lookup_id => GetLookupIdOperation(GetLookupIdRequest, GetLookupIdResponse) = 85, "LookupId" {
            in {}
            out { lookup_id: Option<Variant> = "pvarLookupId" }
        }
        /// Whether the message was authenticated
        fn get_is_authenticated2 => GetIsAuthenticated2Operation(GetIsAuthenticated2Request, GetIsAuthenticated2Response) = 86, "IsAuthenticated2" {
            in {}
            out { is_authenticated: VariantBool = "pisAuthenticated" }
        }
        /// First message of its transaction
        fn get_is_first_in_transaction2 => GetIsFirstInTransaction2Operation(GetIsFirstInTransaction2Request, GetIsFirstInTransaction2Response) = 87, "IsFirstInTransaction2" {
            in {}
            out { is_first_in_transaction: VariantBool = "pisFirstInXact" }
        }
        /// Last message of its transaction
        fn get_is_last_in_transaction2 => GetIsLastInTransaction2Operation(GetIsLastInTransaction2Request, GetIsLastInTransaction2Response) = 88, "IsLastInTransaction2" {
            in {}
            out { is_last_in_transaction: VariantBool = "pisLastInXact" }
        }
        /// Attach the caller security context, keeping it cached
        fn attach_current_security_context2 => AttachCurrentSecurityContext2Operation(AttachCurrentSecurityContext2Request, AttachCurrentSecurityContext2Response) = 89, "AttachCurrentSecurityContext2" {
            in {}
            out {}
        }
        /// SOAP envelope of an HTTP message
        fn get_soap_envelope => GetSoapEnvelopeOperation(GetSoapEnvelopeRequest, GetSoapEnvelopeResponse) = 90, "SoapEnvelope" {
            in {}
            out { soap_envelope: Option<BString> = "pbstrSoapEnvelope" }
        }
        /// Whole SRMP message, SOAP envelope and attachments
        fn get_compound_message => GetCompoundMessageOperation(GetCompoundMessageRequest, GetCompoundMessageResponse) = 91, "CompoundMessage" {
            in {}
            out { compound_message: Option<Variant> = "pvarCompoundMessage" }
        }
        /// Additional SOAP header elements
        fn set_soap_header => SetSoapHeaderOperation(SetSoapHeaderRequest, SetSoapHeaderResponse) = 92, "SoapHeader" {
            in { soap_header: Option<BString> = "bstrSoapHeader" }
            out {}
        }
        /// SOAP body of an HTTP message
        fn set_soap_body => SetSoapBodyOperation(SetSoapBodyRequest, SetSoapBodyResponse) = 93, "SoapBody" {
            in { soap_body: Option<BString> = "bstrSoapBody" }
            out {}
        }
    }
}
