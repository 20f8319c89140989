//! # Encoder Engine
//!
//! The encoder walks a record's schema declaration once, emitting head bytes
//! immediately. Fixed fields write their little-endian representation in
//! place; variable fields write a 4-byte offset computed from the *tail
//! cursor*, the absolute position inside the current container at which that
//! field's payload will start. The cursor begins at the container's head size
//! and advances by each variable field's total size as offsets are stamped,
//! so by the time the content declarations run, every payload lands exactly
//! where its offset promised.
//!
//! ## Container Layout
//!
//! ```text
//! +------------------------------+-------------------------------+
//! | Head (fixed fields, offsets) | Tail (payloads, decl. order)  |
//! +------------------------------+-------------------------------+
//! ^ cursor starts at head size   ^ first offset == head size
//! ```
//!
//! Nested variable containers push the enclosing cursor onto a stack and
//! restore it when their own declaration finishes; the enclosing cursor was
//! already advanced past the whole child when the child's offset was stamped.
//!
//! ## Error Latching
//!
//! The first failure is latched and every subsequent operation becomes a
//! no-op; the top-level entry point reports the latched error. Encoding can
//! only fail from the underlying sink or an undersized output buffer.
//!
//! ## Allocation Discipline
//!
//! The cursor stack is a `SmallVec` with inline capacity covering any
//! realistic nesting depth, and every emit works from borrowed slices. Warm
//! encodes perform no heap allocation.

use smallvec::SmallVec;

use crate::codec::SszObject;
use crate::error::SszError;
use crate::io::Output;
use crate::size::{
    size_dynamic_bytes, size_slice_of_bits, size_slice_of_dynamic_bytes,
    size_slice_of_dynamic_objects, size_slice_of_static_bytes, size_slice_of_static_objects,
    size_slice_of_uint64s,
};
use crate::types::{Bitlist, Bitvector, U256};

/// Inline capacity of the container stack. Beacon-chain types nest at most
/// five deep; deeper types spill to the heap and keep working.
const NESTING_INLINE: usize = 8;

pub struct Encoder<'a> {
    out: Output<'a>,
    err: Option<SszError>,
    offset: u32,
    stack: SmallVec<[u32; NESTING_INLINE]>,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(out: Output<'a>) -> Self {
        Self {
            out,
            err: None,
            offset: 0,
            stack: SmallVec::new(),
        }
    }

    pub(crate) fn has_error(&self) -> bool {
        self.err.is_some()
    }

    pub(crate) fn latch(&mut self, err: SszError) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }

    pub(crate) fn finish(self) -> Result<(), SszError> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Enters a variable container: saves the enclosing tail cursor and
    /// restarts it at the new container's head size.
    pub(crate) fn start_dynamics(&mut self, head_size: u32) {
        self.stack.push(self.offset);
        self.offset = head_size;
    }

    /// Leaves a variable container, restoring the enclosing tail cursor.
    pub(crate) fn finish_dynamics(&mut self) {
        // INVARIANT: paired with start_dynamics by the facade.
        self.offset = self.stack.pop().unwrap();
    }

    fn emit(&mut self, bytes: &[u8]) {
        if self.err.is_some() {
            return;
        }
        if let Err(err) = self.out.write_all(bytes) {
            self.err = Some(err);
        }
    }

    /// Stamps the current tail cursor as a little-endian u32 and advances it
    /// past a payload of `size` bytes.
    fn emit_offset(&mut self, size: u32) {
        let offset = self.offset;
        self.emit(&offset.to_le_bytes());
        debug_assert!(
            self.offset.checked_add(size).is_some(),
            "tail cursor overflows u32"
        );
        self.offset = self.offset.wrapping_add(size);
    }

    // Fixed fields.

    pub fn encode_bool(&mut self, value: bool) {
        self.emit(&[value as u8]);
    }

    pub fn encode_uint16(&mut self, value: u16) {
        self.emit(&value.to_le_bytes());
    }

    pub fn encode_uint64(&mut self, value: u64) {
        self.emit(&value.to_le_bytes());
    }

    pub fn encode_uint256(&mut self, value: &U256) {
        self.emit(&value.to_le_bytes());
    }

    pub fn encode_static_bytes(&mut self, bytes: &[u8]) {
        self.emit(bytes);
    }

    pub fn encode_array_of_static_bytes<const N: usize>(&mut self, items: &[[u8; N]]) {
        for item in items {
            self.emit(item);
        }
    }

    pub fn encode_bitvector<const BYTES: usize>(&mut self, bits: &Bitvector<BYTES>) {
        self.emit(bits.as_bytes());
    }

    // Variable fields: offset declarations.

    pub fn encode_dynamic_bytes_offset(&mut self, blob: &[u8]) {
        self.emit_offset(size_dynamic_bytes(blob));
    }

    pub fn encode_bitlist_offset(&mut self, bits: &Bitlist) {
        self.emit_offset(size_slice_of_bits(bits));
    }

    pub fn encode_uint64s_offset(&mut self, values: &[u64]) {
        self.emit_offset(size_slice_of_uint64s(values));
    }

    pub fn encode_slice_of_static_bytes_offset<const N: usize>(&mut self, items: &[[u8; N]]) {
        self.emit_offset(size_slice_of_static_bytes(items));
    }

    pub fn encode_slice_of_dynamic_bytes_offset(&mut self, blobs: &[Vec<u8>]) {
        self.emit_offset(size_slice_of_dynamic_bytes(blobs));
    }

    pub fn encode_slice_of_static_objects_offset<T: SszObject>(&mut self, objects: &[T]) {
        self.emit_offset(size_slice_of_static_objects(objects));
    }

    pub fn encode_slice_of_dynamic_objects_offset<T: SszObject>(&mut self, objects: &[T]) {
        self.emit_offset(size_slice_of_dynamic_objects(objects));
    }

    pub fn encode_dynamic_object_offset<T: SszObject>(&mut self, obj: &T) {
        self.emit_offset(obj.size_ssz(false));
    }

    // Variable fields: content declarations.

    pub fn encode_dynamic_bytes_content(&mut self, blob: &[u8]) {
        self.emit(blob);
    }

    pub fn encode_bitlist_content(&mut self, bits: &Bitlist) {
        if self.err.is_some() {
            return;
        }
        let bytes = bits.as_bytes();
        let sentinel = bits.len() % 8;
        if sentinel == 0 {
            // Stored bits fill whole bytes; the sentinel opens a fresh one.
            self.emit(bytes);
            self.emit(&[0x01]);
        } else {
            let (head, last) = bytes.split_at(bytes.len() - 1);
            self.emit(head);
            self.emit(&[last[0] | 1 << sentinel]);
        }
    }

    pub fn encode_uint64s_content(&mut self, values: &[u64]) {
        for value in values {
            self.emit(&value.to_le_bytes());
        }
    }

    pub fn encode_slice_of_static_bytes_content<const N: usize>(&mut self, items: &[[u8; N]]) {
        for item in items {
            self.emit(item);
        }
    }

    pub fn encode_slice_of_dynamic_bytes_content(&mut self, blobs: &[Vec<u8>]) {
        if self.err.is_some() {
            return;
        }
        debug_assert!(4 * blobs.len() as u64 <= u32::MAX as u64);
        // Nested offset table: item payloads start after all the offsets.
        let mut offset = 4 * blobs.len() as u32;
        for blob in blobs {
            self.emit(&offset.to_le_bytes());
            offset = offset.wrapping_add(size_dynamic_bytes(blob));
        }
        for blob in blobs {
            self.emit(blob);
        }
    }

    /// Writes the nested offset table for a slice of variable records; the
    /// facade follows up by encoding each record in declaration order.
    pub(crate) fn encode_dynamic_objects_table<T: SszObject>(&mut self, objects: &[T]) {
        if self.err.is_some() {
            return;
        }
        debug_assert!(4 * objects.len() as u64 <= u32::MAX as u64);
        let mut offset = 4 * objects.len() as u32;
        for obj in objects {
            self.emit(&offset.to_le_bytes());
            offset = offset.wrapping_add(obj.size_ssz(false));
        }
    }
}
