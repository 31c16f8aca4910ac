//! NDR (Network Data Representation) runtime library
//!
//! This crate implements the NDR20 transfer syntax used by DCE RPC and DCOM
//! stubs.
//!
//! # NDR Wire Format
//!
//! - Primitives align to their natural size (1, 2, 4, or 8 bytes), measured
//!   from the start of the stub
//! - Conformant data carries its max_count up front
//! - Embedded pointers are written as a referent tag inline; the pointee
//!   follows later, in the deferred pass, in field order
//!
//! Every type implements the two passes through [`NdrEncode`] and
//! [`NdrDecode`]; [`NdrWriter::write_full`] and [`NdrReader::read_full`]
//! run both for a top-level parameter.

mod arrays;
mod context;
mod decode;
mod encode;
mod error;
mod pointers;
mod primitives;
mod strings;

pub use arrays::{
    read_elements, read_elements_deferred, write_elements, write_elements_deferred,
    ConformantArray,
};
pub use context::NdrContext;
pub use decode::{NdrDecode, NdrReader};
pub use encode::{NdrEncode, NdrWriter, REFERENT_ID_BASE};
pub use error::{NdrError, Result, MAX_NDR_ALLOCATION_SIZE, MAX_NDR_ARRAY_ELEMENTS};
pub use strings::{BString, NdrWString};

/// Re-export bytes for convenience
pub use bytes::{Buf, BufMut, Bytes, BytesMut};
