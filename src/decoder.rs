//! # Decoder Engine
//!
//! Mirror image of the encoder. The decoder walks the same schema declaration,
//! consuming head bytes immediately. Each offset declaration reads a
//! little-endian u32, validates it against the container's length and the
//! offsets seen so far, and appends it to the container's offset queue. The
//! content declarations then drain that queue in declaration order, deriving
//! each tail region's length from the difference between consecutive offsets,
//! or from the container's total length for the last one.
//!
//! ## Offset Validation
//!
//! 1. An offset may never exceed the container's length.
//! 2. The first offset in a container must equal the head size, except for a
//!    list counter, which doubles as the item count times four.
//! 3. Every later offset must be at least the previous one. Equal offsets are
//!    legal and denote a zero-length region.
//!
//! ## Nesting
//!
//! Descending into a variable sub-container (an embedded variable record or a
//! slice of variable items) pushes the current coordination state as a frame,
//! installs the region's derived length as the new container length, and
//! starts an empty offset queue. The frame stack depth equals the type's
//! nesting depth.
//!
//! ## Buffer Reuse
//!
//! Decoded variable-length regions grow in place: when the caller-provided
//! buffer's capacity suffices the length is adjusted, otherwise the buffer
//! reallocates to exactly the needed length. Repeated decodes into the same
//! value therefore reach a steady state with no per-call allocation.

use smallvec::SmallVec;

use crate::error::SszError;
use crate::io::Input;
use crate::types::{Bitlist, Bitvector, U256};

/// Inline capacity of a container's offset queue; spills for containers with
/// more variable fields than any beacon-chain type has.
const OFFSETS_INLINE: usize = 16;

/// Inline capacity of the container frame stack.
const NESTING_INLINE: usize = 4;

/// Grows a caller-owned buffer to `size` zeroed bytes: in place when its
/// capacity suffices, otherwise as a fresh allocation of exactly `size`.
fn grow_buffer(blob: &mut Vec<u8>, size: usize) {
    if blob.capacity() < size {
        *blob = vec![0; size];
    } else {
        blob.clear();
        blob.resize(size, 0);
    }
}

struct Frame {
    length: u32,
    offset: u32,
    offsets: SmallVec<[u32; OFFSETS_INLINE]>,
    head: usize,
}

pub struct Decoder<'a> {
    input: Input<'a>,
    err: Option<SszError>,
    /// Byte count of the container currently being decoded.
    length: u32,
    /// Expected first offset on entry, last seen offset afterwards.
    offset: u32,
    /// Offsets read in the current container's head, drained by `head` index
    /// so the queue never shifts.
    offsets: SmallVec<[u32; OFFSETS_INLINE]>,
    head: usize,
    stack: SmallVec<[Frame; NESTING_INLINE]>,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(input: Input<'a>, length: u32) -> Self {
        Self {
            input,
            err: None,
            length,
            offset: 0,
            offsets: SmallVec::new(),
            head: 0,
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

    pub(crate) fn length(&self) -> u32 {
        self.length
    }

    /// Enters a container of `length` bytes whose first offset must equal
    /// `expect` (ignored for list containers, whose first offset is the
    /// counter).
    pub(crate) fn descend(&mut self, length: u32, expect: u32) {
        self.stack.push(Frame {
            length: self.length,
            offset: self.offset,
            offsets: std::mem::take(&mut self.offsets),
            head: self.head,
        });
        self.length = length;
        self.offset = expect;
        self.head = 0;
    }

    /// Leaves a container, restoring the enclosing coordination state.
    pub(crate) fn ascend(&mut self) {
        // INVARIANT: paired with descend by the facade.
        let frame = self.stack.pop().unwrap();
        self.length = frame.length;
        self.offset = frame.offset;
        self.offsets = frame.offsets;
        self.head = frame.head;
    }

    /// Reads and validates the next head offset. `list` marks a counter
    /// offset, which is exempt from the first-offset check.
    pub(crate) fn decode_offset(&mut self, list: bool) -> Result<(), SszError> {
        let mut buf = [0u8; 4];
        self.input.read_exact(&mut buf)?;
        let offset = u32::from_le_bytes(buf);
        if offset > self.length {
            return Err(SszError::OffsetBeyondCapacity {
                offset,
                length: self.length,
            });
        }
        if self.offsets.is_empty() {
            if !list && self.offset != offset {
                return Err(SszError::FirstOffsetMismatch {
                    offset,
                    expected: self.offset,
                });
            }
        } else if self.offset > offset {
            return Err(SszError::BadOffsetProgression {
                offset,
                previous: self.offset,
            });
        }
        self.offset = offset;
        self.offsets.push(offset);
        Ok(())
    }

    /// Derives the next tail region's length and pops its offset from the
    /// queue. Content declarations must follow a matching offset declaration;
    /// an unmatched call is a schema bug and panics.
    pub(crate) fn retrieve_size(&mut self) -> u32 {
        let start = self.offsets[self.head];
        let size = match self.offsets.get(self.head + 1) {
            Some(next) => next - start,
            None => self.length - start,
        };
        self.head += 1;
        size
    }

    /// Consumes a list container's counter offset and derives the item count.
    pub(crate) fn read_dynamic_list_header(&mut self, max_items: u32) -> Result<u32, SszError> {
        self.decode_offset(true)?;
        let counter = self.offset;
        if counter == 0 || counter % 4 != 0 {
            return Err(SszError::BadCounterOffset { offset: counter });
        }
        let items = counter / 4;
        if items > max_items {
            return Err(SszError::MaxItemsExceeded {
                decoded: items,
                max: max_items,
            });
        }
        Ok(items)
    }

    // Fixed fields.

    pub fn decode_bool(&mut self, value: &mut bool) {
        if self.err.is_some() {
            return;
        }
        let mut buf = [0u8; 1];
        match self.input.read_exact(&mut buf) {
            Ok(()) => *value = buf[0] != 0,
            Err(err) => self.latch(err),
        }
    }

    pub fn decode_uint16(&mut self, value: &mut u16) {
        if self.err.is_some() {
            return;
        }
        let mut buf = [0u8; 2];
        match self.input.read_exact(&mut buf) {
            Ok(()) => *value = u16::from_le_bytes(buf),
            Err(err) => self.latch(err),
        }
    }

    pub fn decode_uint64(&mut self, value: &mut u64) {
        if self.err.is_some() {
            return;
        }
        let mut buf = [0u8; 8];
        match self.input.read_exact(&mut buf) {
            Ok(()) => *value = u64::from_le_bytes(buf),
            Err(err) => self.latch(err),
        }
    }

    pub fn decode_uint256(&mut self, value: &mut U256) {
        if self.err.is_some() {
            return;
        }
        let mut buf = [0u8; 32];
        match self.input.read_exact(&mut buf) {
            Ok(()) => *value = U256::from_le_bytes(buf),
            Err(err) => self.latch(err),
        }
    }

    pub fn decode_static_bytes(&mut self, bytes: &mut [u8]) {
        if self.err.is_some() {
            return;
        }
        if let Err(err) = self.input.read_exact(bytes) {
            self.latch(err);
        }
    }

    pub fn decode_array_of_static_bytes<const N: usize>(&mut self, items: &mut [[u8; N]]) {
        for item in items {
            self.decode_static_bytes(item);
        }
    }

    pub fn decode_bitvector<const BYTES: usize>(&mut self, bits: &mut Bitvector<BYTES>) {
        if self.err.is_some() {
            return;
        }
        if let Err(err) = self.input.read_exact(bits.as_bytes_mut()) {
            self.latch(err);
        }
    }

    // Variable fields: offset declarations. On decode the offset slot is
    // kind-independent, so a single declaration covers every variable field.

    pub fn decode_dynamic_offset(&mut self) {
        if self.err.is_some() {
            return;
        }
        if let Err(err) = self.decode_offset(false) {
            self.latch(err);
        }
    }

    // Variable fields: content declarations.

    pub fn decode_dynamic_bytes_content(&mut self, blob: &mut Vec<u8>, max_size: u32) {
        if self.err.is_some() {
            return;
        }
        let size = self.retrieve_size();
        if size > max_size {
            self.latch(SszError::MaxLengthExceeded {
                decoded: size,
                max: max_size,
            });
            return;
        }
        grow_buffer(blob, size as usize);
        if let Err(err) = self.input.read_exact(blob) {
            self.latch(err);
        }
    }

    pub fn decode_bitlist_content(&mut self, bits: &mut Bitlist, max_bits: u32) {
        if self.err.is_some() {
            return;
        }
        let size = self.retrieve_size() as usize;
        if size == 0 {
            self.latch(SszError::BadBitlistTerminator);
            return;
        }
        let storage = bits.storage_mut();
        grow_buffer(storage, size);
        if let Err(err) = self.input.read_exact(storage) {
            self.latch(err);
            return;
        }
        let last = storage[size - 1];
        if last == 0 {
            self.latch(SszError::BadBitlistTerminator);
            return;
        }
        let sentinel = 7 - last.leading_zeros() as usize;
        let nbits = (size - 1) * 8 + sentinel;
        if nbits as u64 > max_bits as u64 {
            self.latch(SszError::MaxItemsExceeded {
                decoded: nbits as u32,
                max: max_bits,
            });
            return;
        }
        storage[size - 1] &= !(1u8 << sentinel);
        storage.truncate(nbits.div_ceil(8));
        bits.set_bit_len(nbits);
    }

    pub fn decode_uint64s_content(&mut self, values: &mut Vec<u64>, max_items: u32) {
        if self.err.is_some() {
            return;
        }
        let size = self.retrieve_size();
        if size == 0 {
            values.clear();
            return;
        }
        if size % 8 != 0 {
            self.latch(SszError::DynamicStaticsIndivisible {
                length: size,
                item_size: 8,
            });
            return;
        }
        let count = size / 8;
        if count > max_items {
            self.latch(SszError::MaxItemsExceeded {
                decoded: count,
                max: max_items,
            });
            return;
        }
        values.clear();
        values.resize(count as usize, 0);
        for value in values.iter_mut() {
            let mut buf = [0u8; 8];
            if let Err(err) = self.input.read_exact(&mut buf) {
                self.latch(err);
                return;
            }
            *value = u64::from_le_bytes(buf);
        }
    }

    pub fn decode_slice_of_static_bytes_content<const N: usize>(
        &mut self,
        items: &mut Vec<[u8; N]>,
        max_items: u32,
    ) {
        if self.err.is_some() {
            return;
        }
        let size = self.retrieve_size();
        if size == 0 {
            items.clear();
            return;
        }
        if size % N as u32 != 0 {
            self.latch(SszError::DynamicStaticsIndivisible {
                length: size,
                item_size: N as u32,
            });
            return;
        }
        let count = size / N as u32;
        if count > max_items {
            self.latch(SszError::MaxItemsExceeded {
                decoded: count,
                max: max_items,
            });
            return;
        }
        items.clear();
        items.resize(count as usize, [0u8; N]);
        for item in items.iter_mut() {
            if let Err(err) = self.input.read_exact(item) {
                self.latch(err);
                return;
            }
        }
    }

    pub fn decode_slice_of_dynamic_bytes_content(
        &mut self,
        blobs: &mut Vec<Vec<u8>>,
        max_items: u32,
        max_size: u32,
    ) {
        if self.err.is_some() {
            return;
        }
        let size = self.retrieve_size();
        if size == 0 {
            blobs.clear();
            return;
        }
        if size < 4 {
            self.latch(SszError::ShortCounterOffset { available: size });
            return;
        }
        self.descend(size, 0);
        match self.read_dynamic_list_header(max_items) {
            Ok(items) => {
                blobs.resize_with(items as usize, Vec::new);
                for _ in 1..items {
                    if let Err(err) = self.decode_offset(false) {
                        self.latch(err);
                        break;
                    }
                }
                for blob in blobs.iter_mut() {
                    self.decode_dynamic_bytes_content(blob, max_size);
                }
            }
            Err(err) => self.latch(err),
        }
        self.ascend();
    }
}
