//! DCE RPC PDU fragmentation
//!
//! When stub data exceeds the negotiated `max_xmit_frag`, a request is split
//! into several PDUs sharing one call_id. The first carries FIRST_FRAG, the
//! last LAST_FRAG, and every fragment repeats the opnum, context id and
//! object UUID.
//!
//! ```text
//! max_frag (e.g. 4280)
//! ├── PDU header (16)
//! ├── request body header (8)
//! ├── object UUID (16, optional)
//! └── stub data fragment
//! ```

use crate::dcerpc::{PacketFlags, PduHeader, RequestPdu, ResponsePdu};
use crate::error::{Result, RpcError};
use bytes::{Bytes, BytesMut};
use midl_ndr::MAX_NDR_ALLOCATION_SIZE;

/// Splits outgoing requests into fragments.
pub struct FragmentGenerator;

impl FragmentGenerator {
    /// Largest stub chunk that fits in one request fragment.
    pub fn max_stub_size(max_frag: u16, has_object_uuid: bool) -> usize {
        let overhead = PduHeader::SIZE
            + RequestPdu::BODY_HEADER_SIZE
            + if has_object_uuid { 16 } else { 0 };
        // keep chunks 8-aligned so NDR alignment survives reassembly
        (max_frag as usize).saturating_sub(overhead) & !7
    }

    pub fn fragment_request(request: &RequestPdu, max_frag: u16) -> Vec<RequestPdu> {
        let max_stub = Self::max_stub_size(max_frag, request.object_uuid.is_some()).max(8);
        let total_len = request.stub_data.len();

        if total_len <= max_stub {
            let mut single = request.clone();
            single.header.packet_flags = PacketFlags::complete();
            single.alloc_hint = total_len as u32;
            return vec![single];
        }

        let mut fragments = Vec::with_capacity(total_len.div_ceil(max_stub));
        let mut offset = 0;
        while offset < total_len {
            let chunk_size = (total_len - offset).min(max_stub);
            let mut flags = PacketFlags::new();
            if offset == 0 {
                flags.set(PacketFlags::FIRST_FRAG);
            }
            if offset + chunk_size >= total_len {
                flags.set(PacketFlags::LAST_FRAG);
            }

            let mut frag = request.clone();
            frag.header.packet_flags = flags;
            frag.alloc_hint = (total_len - offset) as u32;
            frag.stub_data = request.stub_data.slice(offset..offset + chunk_size);
            fragments.push(frag);
            offset += chunk_size;
        }
        fragments
    }
}

/// Reassembles the stub of a fragmented response.
///
/// The reassembled stub is capped at `max_stub_size` bytes
/// ([`MAX_NDR_ALLOCATION_SIZE`] by default); `alloc_hint` is only a hint.
pub struct FragmentAssembler {
    call_id: u32,
    stub_data: BytesMut,
    received_first: bool,
    max_stub_size: usize,
}

impl FragmentAssembler {
    pub fn new(call_id: u32) -> Self {
        Self {
            call_id,
            stub_data: BytesMut::new(),
            received_first: false,
            max_stub_size: MAX_NDR_ALLOCATION_SIZE,
        }
    }

    pub fn with_max_stub_size(mut self, max_stub_size: usize) -> Self {
        self.max_stub_size = max_stub_size;
        self
    }

    /// Add one fragment; returns the full stub once LAST_FRAG arrives.
    pub fn add_response(&mut self, response: &ResponsePdu) -> Result<Option<Bytes>> {
        if response.header.call_id != self.call_id {
            return Err(RpcError::CallIdMismatch {
                expected: self.call_id,
                got: response.header.call_id,
            });
        }

        let flags = response.header.packet_flags;
        if flags.is_first_frag() {
            if self.received_first {
                return Err(RpcError::MalformedPdu(
                    "duplicate first fragment".to_string(),
                ));
            }
            self.received_first = true;
            let hint = (response.alloc_hint as usize).min(self.max_stub_size);
            self.stub_data.reserve(hint);
        } else if !self.received_first {
            return Err(RpcError::MalformedPdu(
                "fragment before first fragment".to_string(),
            ));
        }

        let total = self.stub_data.len() + response.stub_data.len();
        if total > self.max_stub_size {
            return Err(RpcError::MalformedPdu(format!(
                "response stub of {} bytes exceeds limit {}",
                total, self.max_stub_size
            )));
        }
        self.stub_data.extend_from_slice(&response.stub_data);

        if flags.is_last_frag() {
            Ok(Some(self.stub_data.split().freeze()))
        } else {
            Ok(None)
        }
    }
}
