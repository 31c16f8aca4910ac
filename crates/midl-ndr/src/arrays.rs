//! NDR array types
//!
//! Conformant array wire format:
//! ```text
//! max_count: u32      # element count
//! elements[max_count] # inline parts
//! ...                 # deferred parts of each element, in order
//! ```
//!
//! When a conformant array is the last member of a struct, the max_count
//! moves to the front of the struct; such structs write it themselves and use
//! [`write_elements`] / [`read_elements`] for the body.

use crate::error::MAX_NDR_ARRAY_ELEMENTS;
use crate::{NdrDecode, NdrEncode, NdrReader, NdrWriter, Result};

/// Conformant array - size determined at runtime
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConformantArray<T> {
    pub elements: Vec<T>,
}

impl<T> ConformantArray<T> {
    pub fn new(elements: Vec<T>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.elements
    }
}

impl<T> From<Vec<T>> for ConformantArray<T> {
    fn from(elements: Vec<T>) -> Self {
        Self { elements }
    }
}

/// Inline parts of `elements`, without conformance.
pub fn write_elements<T: NdrEncode>(w: &mut NdrWriter, elements: &[T]) -> Result<()> {
    for element in elements {
        element.ndr_encode(w)?;
    }
    Ok(())
}

/// Deferred parts of `elements`.
pub fn write_elements_deferred<T: NdrEncode>(w: &mut NdrWriter, elements: &[T]) -> Result<()> {
    for element in elements {
        element.ndr_encode_deferred(w)?;
    }
    Ok(())
}

pub fn read_elements<T: NdrDecode>(r: &mut NdrReader, count: usize) -> Result<Vec<T>> {
    let mut elements = Vec::with_capacity(count.min(MAX_NDR_ARRAY_ELEMENTS));
    for _ in 0..count {
        elements.push(T::ndr_decode(r)?);
    }
    Ok(elements)
}

pub fn read_elements_deferred<T: NdrDecode>(r: &mut NdrReader, elements: &mut [T]) -> Result<()> {
    for element in elements {
        element.ndr_decode_deferred(r)?;
    }
    Ok(())
}

impl<T: NdrEncode> NdrEncode for ConformantArray<T> {
    fn ndr_encode(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_conformance(self.elements.len())?;
        write_elements(w, &self.elements)
    }

    fn ndr_encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        write_elements_deferred(w, &self.elements)
    }
}

impl<T: NdrDecode> NdrDecode for ConformantArray<T> {
    fn ndr_decode(r: &mut NdrReader) -> Result<Self> {
        let count = r.read_conformance(MAX_NDR_ARRAY_ELEMENTS)?;
        read_elements(r, count).map(Self::new)
    }

    fn ndr_decode_deferred(&mut self, r: &mut NdrReader) -> Result<()> {
        read_elements_deferred(r, &mut self.elements)
    }
}
