//! # Codec Facade
//!
//! A single schema declaration per record drives encoding, decoding, and (via
//! the free sizing helpers) size computation. The facade wraps either an
//! encoder or a decoder and dispatches each `define_*` call to the active
//! pass.
//!
//! ## Declaring a Record
//!
//! Fields are declared in on-wire order. Fixed fields take one declaration;
//! variable fields take two: an offset declaration at the field's positional
//! slot in the head, then a content declaration after all head slots. Caps sit
//! on the content declaration and are enforced during decode only.
//!
//! ```ignore
//! impl SszObject for ExecutionPayload {
//!     const STATIC: bool = false;
//!
//!     fn size_ssz(&self, fixed: bool) -> u32 {
//!         let size = 512; // head: fixed fields plus three 4-byte offsets
//!         if fixed {
//!             return size;
//!         }
//!         size + size_dynamic_bytes(&self.extra_data)
//!             + size_slice_of_dynamic_bytes(&self.transactions)
//!             + size_slice_of_static_objects(&self.withdrawals)
//!     }
//!
//!     fn define_ssz(&mut self, codec: &mut Codec<'_>) {
//!         codec.define_static_bytes(&mut self.parent_hash);
//!         codec.define_dynamic_bytes_offset(&mut self.extra_data);
//!         codec.define_slice_of_dynamic_bytes_offset(&mut self.transactions);
//!         codec.define_slice_of_static_objects_offset(&mut self.withdrawals);
//!
//!         codec.define_dynamic_bytes_content(&mut self.extra_data, 32);
//!         codec.define_slice_of_dynamic_bytes_content(&mut self.transactions, 1048576, 1073741824);
//!         codec.define_slice_of_static_objects_content(&mut self.withdrawals, 16);
//!     }
//! }
//! ```
//!
//! Asymmetric records fork with [`Codec::define_encoder`] /
//! [`Codec::define_decoder`], inside which the pass-specific primitives on
//! [`Encoder`] and [`Decoder`] are called directly.
//!
//! ## Entry Points
//!
//! [`encode_to_stream`], [`encode_to_bytes`], [`decode_from_stream`] and
//! [`decode_from_bytes`] each build one codec context, run the record's
//! declaration, and surface the first latched error. SSZ is not
//! self-delimiting, so both decode paths need the message length up front.

use std::io::{Read, Write};

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::SszError;
use crate::io::{Input, Output};
use crate::types::{Bitlist, Bitvector, U256};

/// Contract every SSZ record implements.
///
/// `STATIC` discriminates fixed-size records from variable-size ones.
/// `size_ssz(true)` is the head-only size (fixed fields plus 4 bytes per
/// variable field); `size_ssz(false)` is the total serialized size. Static
/// records return the same value for both. The head size of a variable record
/// must not depend on field contents.
pub trait SszObject {
    const STATIC: bool;

    fn size_ssz(&self, fixed: bool) -> u32;

    fn define_ssz(&mut self, codec: &mut Codec<'_>);
}

enum Pass<'a> {
    Encode(Encoder<'a>),
    Decode(Decoder<'a>),
}

/// Per-call codec context: an encoder or decoder plus the dispatch layer that
/// lets one declaration drive both passes.
pub struct Codec<'a> {
    pass: Pass<'a>,
}

impl<'a> Codec<'a> {
    fn latch(&mut self, err: SszError) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.latch(err),
            Pass::Decode(dec) => dec.latch(err),
        }
    }

    fn has_error(&self) -> bool {
        match &self.pass {
            Pass::Encode(enc) => enc.has_error(),
            Pass::Decode(dec) => dec.has_error(),
        }
    }

    fn finish(self) -> Result<(), SszError> {
        match self.pass {
            Pass::Encode(enc) => enc.finish(),
            Pass::Decode(dec) => dec.finish(),
        }
    }

    // Fixed fields.

    pub fn define_bool(&mut self, value: &mut bool) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_bool(*value),
            Pass::Decode(dec) => dec.decode_bool(value),
        }
    }

    pub fn define_uint16(&mut self, value: &mut u16) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_uint16(*value),
            Pass::Decode(dec) => dec.decode_uint16(value),
        }
    }

    pub fn define_uint64(&mut self, value: &mut u64) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_uint64(*value),
            Pass::Decode(dec) => dec.decode_uint64(value),
        }
    }

    pub fn define_uint256(&mut self, value: &mut U256) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_uint256(value),
            Pass::Decode(dec) => dec.decode_uint256(value),
        }
    }

    pub fn define_static_bytes<const N: usize>(&mut self, bytes: &mut [u8; N]) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_static_bytes(bytes),
            Pass::Decode(dec) => dec.decode_static_bytes(bytes),
        }
    }

    pub fn define_array_of_static_bytes<const N: usize>(&mut self, items: &mut [[u8; N]]) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_array_of_static_bytes(items),
            Pass::Decode(dec) => dec.decode_array_of_static_bytes(items),
        }
    }

    pub fn define_bitvector<const BYTES: usize>(&mut self, bits: &mut Bitvector<BYTES>) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_bitvector(bits),
            Pass::Decode(dec) => dec.decode_bitvector(bits),
        }
    }

    /// Embedded static record: its fields inline into the enclosing head.
    pub fn define_static_object<T: SszObject>(&mut self, obj: &mut T) {
        if !T::STATIC {
            self.latch(SszError::DynamicObjectInStaticSlot);
            return;
        }
        obj.define_ssz(self);
    }

    // Variable fields: offset declarations.

    pub fn define_dynamic_bytes_offset(&mut self, blob: &mut Vec<u8>) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_dynamic_bytes_offset(blob),
            Pass::Decode(dec) => dec.decode_dynamic_offset(),
        }
    }

    pub fn define_bitlist_offset(&mut self, bits: &mut Bitlist) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_bitlist_offset(bits),
            Pass::Decode(dec) => dec.decode_dynamic_offset(),
        }
    }

    pub fn define_uint64s_offset(&mut self, values: &mut Vec<u64>) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_uint64s_offset(values),
            Pass::Decode(dec) => dec.decode_dynamic_offset(),
        }
    }

    pub fn define_slice_of_static_bytes_offset<const N: usize>(&mut self, items: &mut Vec<[u8; N]>) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_slice_of_static_bytes_offset(items),
            Pass::Decode(dec) => dec.decode_dynamic_offset(),
        }
    }

    pub fn define_slice_of_dynamic_bytes_offset(&mut self, blobs: &mut Vec<Vec<u8>>) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_slice_of_dynamic_bytes_offset(blobs),
            Pass::Decode(dec) => dec.decode_dynamic_offset(),
        }
    }

    pub fn define_slice_of_static_objects_offset<T: SszObject>(&mut self, objects: &mut Vec<T>) {
        if !T::STATIC {
            self.latch(SszError::DynamicObjectInStaticSlot);
            return;
        }
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_slice_of_static_objects_offset(objects),
            Pass::Decode(dec) => dec.decode_dynamic_offset(),
        }
    }

    pub fn define_slice_of_dynamic_objects_offset<T: SszObject>(&mut self, objects: &mut Vec<T>) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_slice_of_dynamic_objects_offset(objects),
            Pass::Decode(dec) => dec.decode_dynamic_offset(),
        }
    }

    pub fn define_dynamic_object_offset<T: SszObject>(&mut self, obj: &mut T) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_dynamic_object_offset(obj),
            Pass::Decode(dec) => dec.decode_dynamic_offset(),
        }
    }

    // Variable fields: content declarations.

    pub fn define_dynamic_bytes_content(&mut self, blob: &mut Vec<u8>, max_size: u32) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_dynamic_bytes_content(blob),
            Pass::Decode(dec) => dec.decode_dynamic_bytes_content(blob, max_size),
        }
    }

    pub fn define_bitlist_content(&mut self, bits: &mut Bitlist, max_bits: u32) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_bitlist_content(bits),
            Pass::Decode(dec) => dec.decode_bitlist_content(bits, max_bits),
        }
    }

    pub fn define_uint64s_content(&mut self, values: &mut Vec<u64>, max_items: u32) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_uint64s_content(values),
            Pass::Decode(dec) => dec.decode_uint64s_content(values, max_items),
        }
    }

    pub fn define_slice_of_static_bytes_content<const N: usize>(
        &mut self,
        items: &mut Vec<[u8; N]>,
        max_items: u32,
    ) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_slice_of_static_bytes_content(items),
            Pass::Decode(dec) => dec.decode_slice_of_static_bytes_content(items, max_items),
        }
    }

    pub fn define_slice_of_dynamic_bytes_content(
        &mut self,
        blobs: &mut Vec<Vec<u8>>,
        max_items: u32,
        max_size: u32,
    ) {
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_slice_of_dynamic_bytes_content(blobs),
            Pass::Decode(dec) => dec.decode_slice_of_dynamic_bytes_content(blobs, max_items, max_size),
        }
    }

    pub fn define_slice_of_static_objects_content<T: SszObject + Default>(
        &mut self,
        objects: &mut Vec<T>,
        max_items: u32,
    ) {
        if !T::STATIC {
            self.latch(SszError::DynamicObjectInStaticSlot);
            return;
        }
        if self.has_error() {
            return;
        }
        if let Pass::Decode(dec) = &mut self.pass {
            let size = dec.retrieve_size();
            if size == 0 {
                objects.clear();
                return;
            }
            let item_size = T::default().size_ssz(true);
            if item_size == 0 || size % item_size != 0 {
                dec.latch(SszError::DynamicStaticsIndivisible {
                    length: size,
                    item_size,
                });
                return;
            }
            let count = size / item_size;
            if count > max_items {
                dec.latch(SszError::MaxItemsExceeded {
                    decoded: count,
                    max: max_items,
                });
                return;
            }
            objects.resize_with(count as usize, T::default);
        }
        for obj in objects.iter_mut() {
            obj.define_ssz(self);
        }
    }

    pub fn define_slice_of_dynamic_objects_content<T: SszObject + Default>(
        &mut self,
        objects: &mut Vec<T>,
        max_items: u32,
    ) {
        if self.has_error() {
            return;
        }
        match &mut self.pass {
            Pass::Encode(enc) => enc.encode_dynamic_objects_table(objects),
            Pass::Decode(dec) => {
                let size = dec.retrieve_size();
                if size == 0 {
                    objects.clear();
                    return;
                }
                if size < 4 {
                    dec.latch(SszError::ShortCounterOffset { available: size });
                    return;
                }
                dec.descend(size, 0);
                match dec.read_dynamic_list_header(max_items) {
                    Ok(items) => {
                        objects.resize_with(items as usize, T::default);
                        for _ in 1..items {
                            if let Err(err) = dec.decode_offset(false) {
                                dec.latch(err);
                                break;
                            }
                        }
                    }
                    Err(err) => dec.latch(err),
                }
            }
        }
        for obj in objects.iter_mut() {
            self.define_dynamic_object_content(obj);
        }
        if let Pass::Decode(dec) = &mut self.pass {
            dec.ascend();
        }
    }

    /// Embedded variable record: descends into its own head/tail coordination
    /// with the tail region's derived length as the container length.
    pub fn define_dynamic_object_content<T: SszObject>(&mut self, obj: &mut T) {
        if self.has_error() {
            return;
        }
        match &mut self.pass {
            Pass::Encode(enc) => enc.start_dynamics(obj.size_ssz(true)),
            Pass::Decode(dec) => {
                let size = dec.retrieve_size();
                dec.descend(size, obj.size_ssz(true));
            }
        }
        obj.define_ssz(self);
        match &mut self.pass {
            Pass::Encode(enc) => enc.finish_dynamics(),
            Pass::Decode(dec) => dec.ascend(),
        }
    }

    // Asymmetric records.

    /// Runs `f` in the encode pass only.
    pub fn define_encoder(&mut self, f: impl FnOnce(&mut Encoder<'a>)) {
        if let Pass::Encode(enc) = &mut self.pass {
            f(enc);
        }
    }

    /// Runs `f` in the decode pass only.
    pub fn define_decoder(&mut self, f: impl FnOnce(&mut Decoder<'a>)) {
        if let Pass::Decode(dec) = &mut self.pass {
            f(dec);
        }
    }
}

fn run_encode<T: SszObject>(enc: Encoder<'_>, obj: &mut T) -> Result<(), SszError> {
    let mut codec = Codec {
        pass: Pass::Encode(enc),
    };
    if T::STATIC {
        obj.define_ssz(&mut codec);
    } else {
        let head = obj.size_ssz(true);
        if let Pass::Encode(enc) = &mut codec.pass {
            enc.start_dynamics(head);
        }
        obj.define_ssz(&mut codec);
        if let Pass::Encode(enc) = &mut codec.pass {
            enc.finish_dynamics();
        }
    }
    codec.finish()
}

fn run_decode<T: SszObject>(dec: Decoder<'_>, obj: &mut T) -> Result<(), SszError> {
    let mut codec = Codec {
        pass: Pass::Decode(dec),
    };
    if T::STATIC {
        obj.define_ssz(&mut codec);
    } else {
        let head = obj.size_ssz(true);
        if let Pass::Decode(dec) = &mut codec.pass {
            let length = dec.length();
            dec.descend(length, head);
        }
        obj.define_ssz(&mut codec);
        if let Pass::Decode(dec) = &mut codec.pass {
            dec.ascend();
        }
    }
    codec.finish()
}

/// Serializes `obj` into the stream. The object is not mutated; the mutable
/// borrow is an artifact of the unified declaration.
pub fn encode_to_stream<T: SszObject>(out: &mut dyn Write, obj: &mut T) -> Result<(), SszError> {
    run_encode(Encoder::new(Output::Stream(out)), obj)
}

/// Serializes `obj` into a buffer pre-sized to at least `obj.size_ssz(false)`
/// bytes.
pub fn encode_to_bytes<T: SszObject>(buf: &mut [u8], obj: &mut T) -> Result<(), SszError> {
    let need = obj.size_ssz(false);
    if (buf.len() as u64) < need as u64 {
        return Err(SszError::ShortWrite {
            have: buf.len() as u32,
            need,
        });
    }
    run_encode(Encoder::new(Output::Buffer { buf, pos: 0 }), obj)
}

/// Deserializes `obj` from the stream. SSZ is not self-delimiting at the top
/// level, so the message `length` must be supplied.
pub fn decode_from_stream<T: SszObject>(
    input: &mut dyn Read,
    obj: &mut T,
    length: u32,
) -> Result<(), SszError> {
    run_decode(Decoder::new(Input::Stream(input), length), obj)
}

/// Deserializes `obj` from a byte slice; the slice length is the message
/// length.
pub fn decode_from_bytes<T: SszObject>(bytes: &[u8], obj: &mut T) -> Result<(), SszError> {
    debug_assert!(bytes.len() as u64 <= u32::MAX as u64);
    run_decode(
        Decoder::new(Input::Buffer { buf: bytes, pos: 0 }, bytes.len() as u32),
        obj,
    )
}
