//! # ssz - Allocation-Conscious Simple Serialize Codec
//!
//! An SSZ codec for Ethereum's deterministic binary format, built around a
//! single schema declaration per record that drives encoding, decoding, and
//! size computation. This implementation prioritizes:
//!
//! - **Zero per-field allocation**: coordination state lives in inline
//!   small-vectors; the only hot-path growth is caller-owned buffers
//! - **Streaming two-pass coordination**: head bytes emit or parse in one
//!   forward walk, tail payloads follow in declaration order
//! - **Deterministic failure**: every offset violation maps to one error kind
//!   carrying the offending values
//!
//! ## Quick Start
//!
//! ```ignore
//! use ssz::{encode_to_stream, decode_from_bytes, Codec, SszObject};
//!
//! #[derive(Default)]
//! struct Checkpoint {
//!     epoch: u64,
//!     root: [u8; 32],
//! }
//!
//! impl SszObject for Checkpoint {
//!     const STATIC: bool = true;
//!
//!     fn size_ssz(&self, _fixed: bool) -> u32 {
//!         8 + 32
//!     }
//!
//!     fn define_ssz(&mut self, codec: &mut Codec<'_>) {
//!         codec.define_uint64(&mut self.epoch);
//!         codec.define_static_bytes(&mut self.root);
//!     }
//! }
//!
//! let mut point = Checkpoint { epoch: 3, root: [0; 32] };
//! let mut wire = Vec::new();
//! encode_to_stream(&mut wire, &mut point)?;
//! decode_from_bytes(&wire, &mut point)?;
//! ```
//!
//! ## Wire Layout
//!
//! Every container is a fixed-size head followed by a variable-size tail:
//!
//! ```text
//! +--------------------------------------+------------------------------+
//! | Head                                 | Tail                         |
//! | fixed fields | 4-byte LE offsets     | variable payloads, in        |
//! |              | into the tail         | declaration order            |
//! +--------------------------------------+------------------------------+
//! ```
//!
//! The first offset equals the head size, offsets never decrease, and no
//! offset passes the container's end. Nested variable containers repeat the
//! same layout inside their tail region.
//!
//! ## Module Overview
//!
//! - [`codec`]: the [`SszObject`] contract, the declaration facade, and the
//!   four top-level entry points
//! - [`encoder`]: head/tail emission with the tail-cursor stack
//! - [`decoder`]: head parsing, offset validation, tail-length derivation
//! - [`size`]: pure sizing helpers for variable-length fields
//! - [`types`]: [`U256`], [`Bitvector`], [`Bitlist`]
//! - [`error`]: the [`SszError`] taxonomy
//!
//! Merkleization, SSZ unions, and JSON mappings are out of scope.

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod size;
pub mod types;

mod io;

pub use codec::{
    decode_from_bytes, decode_from_stream, encode_to_bytes, encode_to_stream, Codec, SszObject,
};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::SszError;
pub use size::{
    size_dynamic_bytes, size_dynamic_object, size_slice_of_bits, size_slice_of_dynamic_bytes,
    size_slice_of_dynamic_objects, size_slice_of_static_bytes, size_slice_of_static_objects,
    size_slice_of_uint64s,
};
pub use types::{Bitlist, Bitvector, U256};
