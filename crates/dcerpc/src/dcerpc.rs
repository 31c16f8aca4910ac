//! DCE RPC PDU (Protocol Data Unit) types
//!
//! Connection-oriented PDUs as defined in:
//! - DCE 1.1: Remote Procedure Call (C706), chapter 12
//! - MS-RPCE: Remote Procedure Call Protocol Extensions
//!
//! DCE RPC PDU Header Format:
//! ```text
//! +--------+--------+--------+--------+
//! |  vers  |vers_min| ptype  | pflags |
//! +--------+--------+--------+--------+
//! |        data representation        |
//! +--------+--------+--------+--------+
//! |   frag_len      |   auth_len      |
//! +--------+--------+--------+--------+
//! |             call_id               |
//! +--------+--------+--------+--------+
//! ```
//!
//! PDU bodies are NDR-encoded with alignment measured from the start of the
//! PDU, so they are written through [`NdrWriter`] after a 16-byte header slot.

use crate::error::{Result, RpcError};
use bytes::{BufMut, Bytes, BytesMut};
use midl_ndr::{NdrContext, NdrDecode, NdrEncode, NdrReader, NdrWriter};

/// DCE RPC protocol version
pub const DCE_RPC_VERSION: u8 = 5;
/// DCE RPC protocol minor version
pub const DCE_RPC_VERSION_MINOR: u8 = 0;

/// Default fragment size negotiated by Windows peers
pub const DEFAULT_MAX_FRAG: u16 = 4280;

/// Connection-oriented packet types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    Request = 0,
    Response = 2,
    Fault = 3,
    Bind = 11,
    BindAck = 12,
    BindNak = 13,
    AlterContext = 14,
    AlterContextResp = 15,
    Auth3 = 16,
    Shutdown = 17,
    CoCancel = 18,
    Orphaned = 19,
}

impl PacketType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Request),
            2 => Some(Self::Response),
            3 => Some(Self::Fault),
            11 => Some(Self::Bind),
            12 => Some(Self::BindAck),
            13 => Some(Self::BindNak),
            14 => Some(Self::AlterContext),
            15 => Some(Self::AlterContextResp),
            16 => Some(Self::Auth3),
            17 => Some(Self::Shutdown),
            18 => Some(Self::CoCancel),
            19 => Some(Self::Orphaned),
            _ => None,
        }
    }
}

/// Packet flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketFlags(u8);

impl PacketFlags {
    pub const FIRST_FRAG: u8 = 0x01;
    pub const LAST_FRAG: u8 = 0x02;
    pub const PENDING_CANCEL: u8 = 0x04;
    pub const CONC_MPX: u8 = 0x10;
    pub const DID_NOT_EXECUTE: u8 = 0x20;
    pub const MAYBE: u8 = 0x40;
    /// An object UUID follows the request body header
    pub const OBJECT_UUID: u8 = 0x80;

    pub fn new() -> Self {
        Self(0)
    }

    /// A single-fragment PDU
    pub fn complete() -> Self {
        Self(Self::FIRST_FRAG | Self::LAST_FRAG)
    }

    pub fn set(&mut self, flag: u8) -> &mut Self {
        self.0 |= flag;
        self
    }

    pub fn has(&self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn is_first_frag(&self) -> bool {
        self.has(Self::FIRST_FRAG)
    }

    pub fn is_last_frag(&self) -> bool {
        self.has(Self::LAST_FRAG)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn from_u8(value: u8) -> Self {
        Self(value)
    }
}

/// UUID / GUID (128 bits), in the DCE field layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
pub struct Uuid {
    pub time_low: u32,
    pub time_mid: u16,
    pub time_hi_and_version: u16,
    pub clock_seq_hi_and_reserved: u8,
    pub clock_seq_low: u8,
    pub node: [u8; 6],
}

impl Uuid {
    /// Nil UUID (all zeros)
    pub const NIL: Self = Self::from_fields(0, 0, 0, [0; 8]);

    /// Build from the `Data1`..`Data4` form used in IDL headers.
    pub const fn from_fields(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            time_low: data1,
            time_mid: data2,
            time_hi_and_version: data3,
            clock_seq_hi_and_reserved: data4[0],
            clock_seq_low: data4[1],
            node: [data4[2], data4[3], data4[4], data4[5], data4[6], data4[7]],
        }
    }

    /// Parse from string format "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('{').trim_end_matches('}');
        let parts: Vec<&str> = s.split('-').collect();
        if s.len() != 36 || parts.len() != 5 || parts[4].len() != 12 {
            return None;
        }

        let time_low = u32::from_str_radix(parts[0], 16).ok()?;
        let time_mid = u16::from_str_radix(parts[1], 16).ok()?;
        let time_hi_and_version = u16::from_str_radix(parts[2], 16).ok()?;
        let clock = u16::from_str_radix(parts[3], 16).ok()?;

        let mut node = [0u8; 6];
        for (i, byte) in node.iter_mut().enumerate() {
            *byte = u8::from_str_radix(parts[4].get(i * 2..i * 2 + 2)?, 16).ok()?;
        }

        Some(Self {
            time_low,
            time_mid,
            time_hi_and_version,
            clock_seq_hi_and_reserved: (clock >> 8) as u8,
            clock_seq_low: clock as u8,
            node,
        })
    }

    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Encode UUID to 16 bytes in little-endian format
    pub fn to_bytes_le(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..4].copy_from_slice(&self.time_low.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.time_mid.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.time_hi_and_version.to_le_bytes());
        bytes[8] = self.clock_seq_hi_and_reserved;
        bytes[9] = self.clock_seq_low;
        bytes[10..16].copy_from_slice(&self.node);
        bytes
    }

    /// Build from the 16 raw bytes of an RFC 4122 UUID (big-endian fields).
    pub fn from_bytes_be(bytes: [u8; 16]) -> Self {
        Self::from_fields(
            u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            u16::from_be_bytes([bytes[4], bytes[5]]),
            u16::from_be_bytes([bytes[6], bytes[7]]),
            [
                bytes[8], bytes[9], bytes[10], bytes[11], bytes[12], bytes[13], bytes[14],
                bytes[15],
            ],
        )
    }
}

impl std::fmt::Display for Uuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-",
            self.time_low,
            self.time_mid,
            self.time_hi_and_version,
            self.clock_seq_hi_and_reserved,
            self.clock_seq_low,
        )?;
        for byte in self.node {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Uuid {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| RpcError::MalformedPdu(format!("invalid UUID: {s}")))
    }
}

// GUID is a 4-byte aligned struct of u32, u16, u16, byte[8]
impl NdrEncode for Uuid {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.put_u32(self.time_low);
        w.put_u16(self.time_mid);
        w.put_u16(self.time_hi_and_version);
        w.put_u8(self.clock_seq_hi_and_reserved);
        w.put_u8(self.clock_seq_low);
        w.put_slice(&self.node);
        Ok(())
    }
}

impl NdrDecode for Uuid {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        r.align(4)?;
        let time_low = r.get_u32()?;
        let time_mid = r.get_u16()?;
        let time_hi_and_version = r.get_u16()?;
        let clock_seq_hi_and_reserved = r.get_u8()?;
        let clock_seq_low = r.get_u8()?;
        let mut node = [0u8; 6];
        node.copy_from_slice(&r.get_bytes(6)?);
        Ok(Self {
            time_low,
            time_mid,
            time_hi_and_version,
            clock_seq_hi_and_reserved,
            clock_seq_low,
            node,
        })
    }
}

/// Syntax ID - interface UUID with version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntaxId {
    pub uuid: Uuid,
    /// major in lower 16 bits, minor in upper 16 bits
    pub version: u32,
}

impl SyntaxId {
    pub const fn new(uuid: Uuid, major: u16, minor: u16) -> Self {
        Self {
            uuid,
            version: (major as u32) | ((minor as u32) << 16),
        }
    }

    pub fn major_version(&self) -> u16 {
        self.version as u16
    }

    pub fn minor_version(&self) -> u16 {
        (self.version >> 16) as u16
    }
}

impl std::fmt::Display for SyntaxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} v{}.{}",
            self.uuid,
            self.major_version(),
            self.minor_version()
        )
    }
}

impl NdrEncode for SyntaxId {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.write(&self.uuid)?;
        w.put_u32(self.version);
        Ok(())
    }
}

impl NdrDecode for SyntaxId {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        Ok(Self {
            uuid: r.read()?,
            version: r.get_u32()?,
        })
    }
}

/// NDR20 transfer syntax 8a885d04-1ceb-11c9-9fe8-08002b104860 v2.0
pub const NDR_SYNTAX: SyntaxId = SyntaxId::new(
    Uuid::from_fields(
        0x8a885d04,
        0x1ceb,
        0x11c9,
        [0x9f, 0xe8, 0x08, 0x00, 0x2b, 0x10, 0x48, 0x60],
    ),
    2,
    0,
);

/// Common PDU header (16 bytes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduHeader {
    pub version: u8,
    pub version_minor: u8,
    pub packet_type: PacketType,
    pub packet_flags: PacketFlags,
    pub data_rep: [u8; 4],
    /// Total length of the PDU fragment, filled in on encode
    pub frag_length: u16,
    pub auth_length: u16,
    pub call_id: u32,
}

impl PduHeader {
    /// PDU header size in bytes
    pub const SIZE: usize = 16;

    pub fn new(packet_type: PacketType, call_id: u32) -> Self {
        Self {
            version: DCE_RPC_VERSION,
            version_minor: DCE_RPC_VERSION_MINOR,
            packet_type,
            packet_flags: PacketFlags::complete(),
            data_rep: NdrContext::new().drep(),
            frag_length: 0,
            auth_length: 0,
            call_id,
        }
    }

    pub fn ndr_context(&self) -> NdrContext {
        NdrContext::from_drep(self.data_rep)
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        let ctx = self.ndr_context();
        buf.put_u8(self.version);
        buf.put_u8(self.version_minor);
        buf.put_u8(self.packet_type as u8);
        buf.put_u8(self.packet_flags.as_u8());
        buf.put_slice(&self.data_rep);
        ctx.put_u16(buf, self.frag_length);
        ctx.put_u16(buf, self.auth_length);
        ctx.put_u32(buf, self.call_id);
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(RpcError::MalformedPdu(format!(
                "PDU header too short: {} bytes",
                data.len()
            )));
        }

        let version = data[0];
        if version != DCE_RPC_VERSION {
            return Err(RpcError::VersionMismatch(version));
        }
        let packet_type = PacketType::from_u8(data[2])
            .ok_or(RpcError::UnexpectedPacket(data[2]))?;
        let data_rep = [data[4], data[5], data[6], data[7]];
        let ctx = NdrContext::from_drep(data_rep);
        let mut rest = &data[8..Self::SIZE];

        Ok(Self {
            version,
            version_minor: data[1],
            packet_type,
            packet_flags: PacketFlags::from_u8(data[3]),
            data_rep,
            frag_length: ctx.get_u16(&mut rest),
            auth_length: ctx.get_u16(&mut rest),
            call_id: ctx.get_u32(&mut rest),
        })
    }

    /// Writer positioned just after an empty header slot.
    fn body_writer(&self) -> NdrWriter {
        let mut w = NdrWriter::with_context(self.ndr_context());
        w.put_slice(&[0u8; Self::SIZE]);
        w
    }

    /// Stitch the header, with its final lengths, onto an encoded body.
    fn finish(&self, w: NdrWriter) -> Result<Bytes> {
        let pdu = w.into_bytes();
        let frag_length = u16::try_from(pdu.len()).map_err(|_| RpcError::FragmentTooLarge {
            size: pdu.len(),
            max: u16::MAX as usize,
        })?;
        let mut header = self.clone();
        header.frag_length = frag_length;
        let mut buf = BytesMut::with_capacity(pdu.len());
        header.encode(&mut buf);
        buf.extend_from_slice(&pdu[Self::SIZE..]);
        Ok(buf.freeze())
    }

    /// Reader positioned at the first body byte of `data`.
    fn body_reader(data: &Bytes) -> Result<(Self, NdrReader)> {
        let header = Self::decode(data)?;
        let frag_length = header.frag_length as usize;
        if frag_length < Self::SIZE || frag_length > data.len() {
            return Err(RpcError::MalformedPdu(format!(
                "fragment length {} does not match {} bytes",
                frag_length,
                data.len()
            )));
        }
        let mut r = NdrReader::with_context(data.slice(..frag_length), header.ndr_context());
        r.get_bytes(Self::SIZE)?;
        Ok((header, r))
    }

    fn expect(&self, packet_type: PacketType) -> Result<()> {
        if self.packet_type != packet_type {
            return Err(RpcError::UnexpectedPacket(self.packet_type as u8));
        }
        Ok(())
    }

    /// Bytes at the end of the fragment taken by the auth verifier.
    fn auth_trailer_len(&self) -> usize {
        match self.auth_length {
            0 => 0,
            len => len as usize + 8,
        }
    }
}

/// Presentation context element (p_cont_elem_t)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextElement {
    pub context_id: u16,
    pub abstract_syntax: SyntaxId,
    pub transfer_syntaxes: Vec<SyntaxId>,
}

impl ContextElement {
    pub fn new(context_id: u16, abstract_syntax: SyntaxId) -> Self {
        Self {
            context_id,
            abstract_syntax,
            transfer_syntaxes: vec![NDR_SYNTAX],
        }
    }
}

impl NdrEncode for ContextElement {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.put_u16(self.context_id);
        w.put_u8(self.transfer_syntaxes.len() as u8);
        w.put_u8(0);
        w.write(&self.abstract_syntax)?;
        for syntax in &self.transfer_syntaxes {
            w.write(syntax)?;
        }
        Ok(())
    }
}

impl NdrDecode for ContextElement {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        let context_id = r.get_u16()?;
        let count = r.get_u8()?;
        let _reserved = r.get_u8()?;
        let abstract_syntax = r.read()?;
        let transfer_syntaxes = (0..count)
            .map(|_| r.read())
            .collect::<midl_ndr::Result<Vec<SyntaxId>>>()?;
        Ok(Self {
            context_id,
            abstract_syntax,
            transfer_syntaxes,
        })
    }
}

/// Bind PDU. Alter-context shares the same body and differs only in type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindPdu {
    pub header: PduHeader,
    pub max_xmit_frag: u16,
    pub max_recv_frag: u16,
    pub assoc_group_id: u32,
    pub context_list: Vec<ContextElement>,
}

impl BindPdu {
    pub fn new(call_id: u32, context_id: u16, interface: SyntaxId) -> Self {
        Self {
            header: PduHeader::new(PacketType::Bind, call_id),
            max_xmit_frag: DEFAULT_MAX_FRAG,
            max_recv_frag: DEFAULT_MAX_FRAG,
            assoc_group_id: 0,
            context_list: vec![ContextElement::new(context_id, interface)],
        }
    }

    pub fn alter_context(call_id: u32, context_id: u16, interface: SyntaxId) -> Self {
        let mut pdu = Self::new(call_id, context_id, interface);
        pdu.header.packet_type = PacketType::AlterContext;
        pdu
    }

    pub fn encode(&self) -> Result<Bytes> {
        let mut w = self.header.body_writer();
        w.put_u16(self.max_xmit_frag);
        w.put_u16(self.max_recv_frag);
        w.put_u32(self.assoc_group_id);
        w.put_u8(self.context_list.len() as u8);
        w.put_u8(0);
        w.put_u16(0);
        for element in &self.context_list {
            w.write(element)?;
        }
        self.header.finish(w)
    }

    pub fn decode(data: &Bytes) -> Result<Self> {
        let (header, mut r) = PduHeader::body_reader(data)?;
        if header.packet_type != PacketType::AlterContext {
            header.expect(PacketType::Bind)?;
        }
        let max_xmit_frag = r.get_u16()?;
        let max_recv_frag = r.get_u16()?;
        let assoc_group_id = r.get_u32()?;
        let count = r.get_u8()?;
        let _reserved = r.get_u8()?;
        let _reserved2 = r.get_u16()?;
        let context_list = (0..count)
            .map(|_| r.read())
            .collect::<midl_ndr::Result<Vec<ContextElement>>>()?;
        Ok(Self {
            header,
            max_xmit_frag,
            max_recv_frag,
            assoc_group_id,
            context_list,
        })
    }
}

/// Result of one presentation context negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextResult {
    Acceptance,
    UserRejection,
    ProviderRejection,
    NegotiateAck,
}

impl ContextResult {
    fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::Acceptance,
            1 => Self::UserRejection,
            3 => Self::NegotiateAck,
            _ => Self::ProviderRejection,
        }
    }

    fn as_u16(self) -> u16 {
        match self {
            Self::Acceptance => 0,
            Self::UserRejection => 1,
            Self::ProviderRejection => 2,
            Self::NegotiateAck => 3,
        }
    }
}

/// Bind-ack PDU. Alter-context-response shares the same body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindAckPdu {
    pub header: PduHeader,
    pub max_xmit_frag: u16,
    pub max_recv_frag: u16,
    pub assoc_group_id: u32,
    pub secondary_addr: String,
    /// (result, reason, transfer syntax)
    pub results: Vec<(ContextResult, u16, SyntaxId)>,
}

impl BindAckPdu {
    pub fn new(call_id: u32, assoc_group_id: u32) -> Self {
        Self {
            header: PduHeader::new(PacketType::BindAck, call_id),
            max_xmit_frag: DEFAULT_MAX_FRAG,
            max_recv_frag: DEFAULT_MAX_FRAG,
            assoc_group_id,
            secondary_addr: String::new(),
            results: vec![(ContextResult::Acceptance, 0, NDR_SYNTAX)],
        }
    }

    /// Whether the first presentation context was accepted.
    pub fn accepted(&self) -> bool {
        matches!(self.results.first(), Some((ContextResult::Acceptance, _, _)))
    }

    pub fn encode(&self) -> Result<Bytes> {
        let mut w = self.header.body_writer();
        w.put_u16(self.max_xmit_frag);
        w.put_u16(self.max_recv_frag);
        w.put_u32(self.assoc_group_id);
        if self.secondary_addr.is_empty() {
            w.put_u16(0);
        } else {
            w.put_u16(self.secondary_addr.len() as u16 + 1);
            w.put_slice(self.secondary_addr.as_bytes());
            w.put_u8(0);
        }
        w.align(4);
        w.put_u8(self.results.len() as u8);
        w.put_u8(0);
        w.put_u16(0);
        for (result, reason, syntax) in &self.results {
            w.put_u16(result.as_u16());
            w.put_u16(*reason);
            w.write(syntax)?;
        }
        self.header.finish(w)
    }

    pub fn decode(data: &Bytes) -> Result<Self> {
        let (header, mut r) = PduHeader::body_reader(data)?;
        if header.packet_type != PacketType::AlterContextResp {
            header.expect(PacketType::BindAck)?;
        }
        let max_xmit_frag = r.get_u16()?;
        let max_recv_frag = r.get_u16()?;
        let assoc_group_id = r.get_u32()?;
        let addr_len = r.get_u16()? as usize;
        let addr = r.get_bytes(addr_len)?;
        let secondary_addr = String::from_utf8_lossy(&addr)
            .trim_end_matches('\0')
            .to_string();
        r.align(4)?;
        let count = r.get_u8()?;
        let _reserved = r.get_u8()?;
        let _reserved2 = r.get_u16()?;
        let mut results = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let result = ContextResult::from_u16(r.get_u16()?);
            let reason = r.get_u16()?;
            results.push((result, reason, r.read()?));
        }
        Ok(Self {
            header,
            max_xmit_frag,
            max_recv_frag,
            assoc_group_id,
            secondary_addr,
            results,
        })
    }
}

/// Bind-nak PDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindNakPdu {
    pub header: PduHeader,
    pub reject_reason: u16,
}

impl BindNakPdu {
    pub fn decode(data: &Bytes) -> Result<Self> {
        let (header, mut r) = PduHeader::body_reader(data)?;
        header.expect(PacketType::BindNak)?;
        Ok(Self {
            header,
            reject_reason: r.get_u16()?,
        })
    }
}

/// Request PDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPdu {
    pub header: PduHeader,
    pub alloc_hint: u32,
    pub context_id: u16,
    pub opnum: u16,
    /// Object UUID; DCOM carries the IPID here
    pub object_uuid: Option<Uuid>,
    pub stub_data: Bytes,
}

impl RequestPdu {
    /// alloc_hint + p_cont_id + opnum
    pub const BODY_HEADER_SIZE: usize = 8;

    pub fn new(call_id: u32, opnum: u16, stub_data: Bytes) -> Self {
        Self {
            header: PduHeader::new(PacketType::Request, call_id),
            alloc_hint: stub_data.len() as u32,
            context_id: 0,
            opnum,
            object_uuid: None,
            stub_data,
        }
    }

    pub fn with_object(mut self, object: Uuid) -> Self {
        self.object_uuid = Some(object);
        self
    }

    pub fn encode(&self) -> Result<Bytes> {
        let mut header = self.header.clone();
        if self.object_uuid.is_some() {
            header.packet_flags.set(PacketFlags::OBJECT_UUID);
        }
        let mut w = header.body_writer();
        w.put_u32(self.alloc_hint);
        w.put_u16(self.context_id);
        w.put_u16(self.opnum);
        if let Some(object) = &self.object_uuid {
            w.write(object)?;
        }
        w.put_slice(&self.stub_data);
        header.finish(w)
    }

    pub fn decode(data: &Bytes) -> Result<Self> {
        let (header, mut r) = PduHeader::body_reader(data)?;
        header.expect(PacketType::Request)?;
        let alloc_hint = r.get_u32()?;
        let context_id = r.get_u16()?;
        let opnum = r.get_u16()?;
        let object_uuid = if header.packet_flags.has(PacketFlags::OBJECT_UUID) {
            Some(r.read()?)
        } else {
            None
        };
        let stub_len = r.remaining().saturating_sub(header.auth_trailer_len());
        let stub_data = r.get_bytes(stub_len)?;
        Ok(Self {
            header,
            alloc_hint,
            context_id,
            opnum,
            object_uuid,
            stub_data,
        })
    }
}

/// Response PDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePdu {
    pub header: PduHeader,
    pub alloc_hint: u32,
    pub context_id: u16,
    pub cancel_count: u8,
    pub stub_data: Bytes,
}

impl ResponsePdu {
    /// alloc_hint + p_cont_id + cancel_count + reserved
    pub const BODY_HEADER_SIZE: usize = 8;

    pub fn new(call_id: u32, stub_data: Bytes) -> Self {
        Self {
            header: PduHeader::new(PacketType::Response, call_id),
            alloc_hint: stub_data.len() as u32,
            context_id: 0,
            cancel_count: 0,
            stub_data,
        }
    }

    pub fn encode(&self) -> Result<Bytes> {
        let mut w = self.header.body_writer();
        w.put_u32(self.alloc_hint);
        w.put_u16(self.context_id);
        w.put_u8(self.cancel_count);
        w.put_u8(0);
        w.put_slice(&self.stub_data);
        self.header.finish(w)
    }

    pub fn decode(data: &Bytes) -> Result<Self> {
        let (header, mut r) = PduHeader::body_reader(data)?;
        header.expect(PacketType::Response)?;
        let alloc_hint = r.get_u32()?;
        let context_id = r.get_u16()?;
        let cancel_count = r.get_u8()?;
        let _reserved = r.get_u8()?;
        let stub_len = r.remaining().saturating_sub(header.auth_trailer_len());
        let stub_data = r.get_bytes(stub_len)?;
        Ok(Self {
            header,
            alloc_hint,
            context_id,
            cancel_count,
            stub_data,
        })
    }
}

/// Fault PDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultPdu {
    pub header: PduHeader,
    pub context_id: u16,
    pub status: u32,
}

impl FaultPdu {
    /// nca_s_op_rng_error: the opnum is out of range
    pub const OP_RANGE_ERROR: u32 = 0x1c01_0002;
    /// nca_s_unk_if: unknown interface
    pub const UNKNOWN_INTERFACE: u32 = 0x1c01_0003;
    /// nca_s_fault_ndr: the stub could not be unmarshaled
    pub const FAULT_NDR: u32 = 0x0000_06f7;

    pub fn new(call_id: u32, status: u32) -> Self {
        Self {
            header: PduHeader::new(PacketType::Fault, call_id),
            context_id: 0,
            status,
        }
    }

    pub fn encode(&self) -> Result<Bytes> {
        let mut w = self.header.body_writer();
        w.put_u32(0);
        w.put_u16(self.context_id);
        w.put_u8(0);
        w.put_u8(0);
        w.put_u32(self.status);
        w.put_u32(0);
        self.header.finish(w)
    }

    pub fn decode(data: &Bytes) -> Result<Self> {
        let (header, mut r) = PduHeader::body_reader(data)?;
        header.expect(PacketType::Fault)?;
        let _alloc_hint = r.get_u32()?;
        let context_id = r.get_u16()?;
        let _cancel_count = r.get_u8()?;
        let _reserved = r.get_u8()?;
        let status = r.get_u32()?;
        Ok(Self {
            header,
            context_id,
            status,
        })
    }
}

/// Any connection-oriented PDU this client understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pdu {
    Bind(BindPdu),
    BindAck(BindAckPdu),
    BindNak(BindNakPdu),
    Request(RequestPdu),
    Response(ResponsePdu),
    Fault(FaultPdu),
}

impl Pdu {
    /// Decode a PDU from raw bytes
    pub fn decode(data: &Bytes) -> Result<Self> {
        let header = PduHeader::decode(data)?;
        match header.packet_type {
            PacketType::Bind | PacketType::AlterContext => Ok(Pdu::Bind(BindPdu::decode(data)?)),
            PacketType::BindAck | PacketType::AlterContextResp => {
                Ok(Pdu::BindAck(BindAckPdu::decode(data)?))
            }
            PacketType::BindNak => Ok(Pdu::BindNak(BindNakPdu::decode(data)?)),
            PacketType::Request => Ok(Pdu::Request(RequestPdu::decode(data)?)),
            PacketType::Response => Ok(Pdu::Response(ResponsePdu::decode(data)?)),
            PacketType::Fault => Ok(Pdu::Fault(FaultPdu::decode(data)?)),
            other => Err(RpcError::UnexpectedPacket(other as u8)),
        }
    }

    pub fn call_id(&self) -> u32 {
        match self {
            Pdu::Bind(pdu) => pdu.header.call_id,
            Pdu::BindAck(pdu) => pdu.header.call_id,
            Pdu::BindNak(pdu) => pdu.header.call_id,
            Pdu::Request(pdu) => pdu.header.call_id,
            Pdu::Response(pdu) => pdu.header.call_id,
            Pdu::Fault(pdu) => pdu.header.call_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_parse_and_display() {
        let text = "8a885d04-1ceb-11c9-9fe8-08002b104860";
        let uuid = Uuid::parse(text).unwrap();
        assert_eq!(uuid, NDR_SYNTAX.uuid);
        assert_eq!(uuid.to_string(), text);
        assert!(Uuid::parse("not-a-uuid").is_none());
        assert_eq!(
            Uuid::parse("{8A885D04-1CEB-11C9-9FE8-08002B104860}"),
            Some(uuid)
        );
    }

    #[test]
    fn test_uuid_ndr_layout_matches_le_bytes() {
        let uuid = NDR_SYNTAX.uuid;
        let mut w = NdrWriter::new();
        w.write(&uuid).unwrap();
        assert_eq!(w.as_slice(), &uuid.to_bytes_le());
    }

    #[test]
    fn test_header_roundtrip() {
        let mut header = PduHeader::new(PacketType::Request, 7);
        header.frag_length = 40;
        let mut buf = BytesMut::new();
        header.encode(&mut buf);
        assert_eq!(buf.len(), PduHeader::SIZE);
        assert_eq!(PduHeader::decode(&buf).unwrap(), header);
    }

    #[test]
    fn test_bind_roundtrip() {
        let iface = SyntaxId::new(Uuid::from_fields(1, 2, 3, [4; 8]), 0, 0);
        let pdu = BindPdu::new(1, 0, iface);
        let bytes = pdu.encode().unwrap();
        let decoded = BindPdu::decode(&bytes).unwrap();
        assert_eq!(decoded.context_list, pdu.context_list);
        assert_eq!(decoded.header.frag_length as usize, bytes.len());
        assert_eq!(bytes.len(), 72);
    }

    #[test]
    fn test_bind_ack_with_secondary_address() {
        let mut ack = BindAckPdu::new(3, 0x1234);
        ack.secondary_addr = "135".to_string();
        let bytes = ack.encode().unwrap();
        let decoded = BindAckPdu::decode(&bytes).unwrap();
        assert_eq!(decoded.secondary_addr, "135");
        assert_eq!(decoded.assoc_group_id, 0x1234);
        assert!(decoded.accepted());
    }

    #[test]
    fn test_request_with_object_uuid() {
        let object = Uuid::from_fields(0xaabbccdd, 1, 2, [9; 8]);
        let pdu = RequestPdu::new(5, 36, Bytes::from_static(&[1, 2, 3, 4])).with_object(object);
        let bytes = pdu.encode().unwrap();
        assert_eq!(bytes[3] & PacketFlags::OBJECT_UUID, PacketFlags::OBJECT_UUID);
        assert_eq!(bytes.len(), 16 + 8 + 16 + 4);

        let decoded = RequestPdu::decode(&bytes).unwrap();
        assert_eq!(decoded.object_uuid, Some(object));
        assert_eq!(decoded.opnum, 36);
        assert_eq!(decoded.stub_data.as_ref(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_fault_decode() {
        let bytes = FaultPdu::new(9, FaultPdu::OP_RANGE_ERROR).encode().unwrap();
        match Pdu::decode(&bytes).unwrap() {
            Pdu::Fault(fault) => assert_eq!(fault.status, FaultPdu::OP_RANGE_ERROR),
            other => panic!("expected fault, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_pdu_rejected() {
        let bytes = ResponsePdu::new(1, Bytes::from_static(&[0; 8])).encode().unwrap();
        assert!(ResponsePdu::decode(&bytes.slice(..20)).is_err());
    }
}
