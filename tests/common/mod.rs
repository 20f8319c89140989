//! Shared test records for the integration suites.
//!
//! The types mirror beacon-chain containers closely enough to exercise every
//! field kind: fixed scalars and byte arrays, embedded records, bit
//! containers, and all the variable-length slice shapes.

#![allow(dead_code)]

use ssz::{
    decode_from_bytes, decode_from_stream, encode_to_bytes, encode_to_stream, size_dynamic_bytes,
    size_dynamic_object, size_slice_of_bits, size_slice_of_dynamic_bytes,
    size_slice_of_dynamic_objects, size_slice_of_static_bytes, size_slice_of_static_objects,
    size_slice_of_uint64s, Bitlist, Bitvector, Codec, SszObject, U256,
};

pub const MAX_EXTRA_DATA_BYTES: u32 = 32;
pub const MAX_TRANSACTIONS: u32 = 1_048_576;
pub const MAX_TRANSACTION_BYTES: u32 = 1_073_741_824;
pub const MAX_WITHDRAWALS: u32 = 16;
pub const MAX_AGGREGATION_BITS: u32 = 2048;
pub const MAX_BALANCES: u32 = 1024;
pub const MAX_COMMITMENTS: u32 = 4096;
pub const MAX_SHARDS: u32 = 128;
pub const MAX_SHARD_PAYLOAD_BYTES: u32 = 65536;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoint {
    pub epoch: u64,
    pub root: [u8; 32],
}

impl SszObject for Checkpoint {
    const STATIC: bool = true;

    fn size_ssz(&self, _fixed: bool) -> u32 {
        8 + 32
    }

    fn define_ssz(&mut self, codec: &mut Codec<'_>) {
        codec.define_uint64(&mut self.epoch);
        codec.define_static_bytes(&mut self.root);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Withdrawal {
    pub index: u64,
    pub validator_index: u64,
    pub address: [u8; 20],
    pub amount: u64,
}

impl SszObject for Withdrawal {
    const STATIC: bool = true;

    fn size_ssz(&self, _fixed: bool) -> u32 {
        8 + 8 + 20 + 8
    }

    fn define_ssz(&mut self, codec: &mut Codec<'_>) {
        codec.define_uint64(&mut self.index);
        codec.define_uint64(&mut self.validator_index);
        codec.define_static_bytes(&mut self.address);
        codec.define_uint64(&mut self.amount);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmallTestStruct {
    pub a: u16,
    pub b: u16,
}

impl SszObject for SmallTestStruct {
    const STATIC: bool = true;

    fn size_ssz(&self, _fixed: bool) -> u32 {
        2 + 2
    }

    fn define_ssz(&mut self, codec: &mut Codec<'_>) {
        codec.define_uint16(&mut self.a);
        codec.define_uint16(&mut self.b);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncAggregate {
    pub sync_committee_bits: Bitvector<64>,
    pub sync_committee_signature: [u8; 96],
}

impl Default for SyncAggregate {
    fn default() -> Self {
        Self {
            sync_committee_bits: Bitvector::new(),
            sync_committee_signature: [0; 96],
        }
    }
}

impl SszObject for SyncAggregate {
    const STATIC: bool = true;

    fn size_ssz(&self, _fixed: bool) -> u32 {
        64 + 96
    }

    fn define_ssz(&mut self, codec: &mut Codec<'_>) {
        codec.define_bitvector(&mut self.sync_committee_bits);
        codec.define_static_bytes(&mut self.sync_committee_signature);
    }
}

/// Capella execution payload: 512-byte head, three variable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPayload {
    pub parent_hash: [u8; 32],
    pub fee_recipient: [u8; 20],
    pub state_root: [u8; 32],
    pub receipts_root: [u8; 32],
    pub logs_bloom: [u8; 256],
    pub prev_randao: [u8; 32],
    pub block_number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Vec<u8>,
    pub base_fee_per_gas: U256,
    pub block_hash: [u8; 32],
    pub transactions: Vec<Vec<u8>>,
    pub withdrawals: Vec<Withdrawal>,
}

impl Default for ExecutionPayload {
    fn default() -> Self {
        Self {
            parent_hash: [0; 32],
            fee_recipient: [0; 20],
            state_root: [0; 32],
            receipts_root: [0; 32],
            logs_bloom: [0; 256],
            prev_randao: [0; 32],
            block_number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: Vec::new(),
            base_fee_per_gas: U256::ZERO,
            block_hash: [0; 32],
            transactions: Vec::new(),
            withdrawals: Vec::new(),
        }
    }
}

impl SszObject for ExecutionPayload {
    const STATIC: bool = false;

    fn size_ssz(&self, fixed: bool) -> u32 {
        let size = 32 + 20 + 32 + 32 + 256 + 32 + 8 + 8 + 8 + 8 + 4 + 32 + 32 + 4 + 4;
        if fixed {
            return size;
        }
        size + size_dynamic_bytes(&self.extra_data)
            + size_slice_of_dynamic_bytes(&self.transactions)
            + size_slice_of_static_objects(&self.withdrawals)
    }

    fn define_ssz(&mut self, codec: &mut Codec<'_>) {
        codec.define_static_bytes(&mut self.parent_hash);
        codec.define_static_bytes(&mut self.fee_recipient);
        codec.define_static_bytes(&mut self.state_root);
        codec.define_static_bytes(&mut self.receipts_root);
        codec.define_static_bytes(&mut self.logs_bloom);
        codec.define_static_bytes(&mut self.prev_randao);
        codec.define_uint64(&mut self.block_number);
        codec.define_uint64(&mut self.gas_limit);
        codec.define_uint64(&mut self.gas_used);
        codec.define_uint64(&mut self.timestamp);
        codec.define_dynamic_bytes_offset(&mut self.extra_data);
        codec.define_uint256(&mut self.base_fee_per_gas);
        codec.define_static_bytes(&mut self.block_hash);
        codec.define_slice_of_dynamic_bytes_offset(&mut self.transactions);
        codec.define_slice_of_static_objects_offset(&mut self.withdrawals);

        codec.define_dynamic_bytes_content(&mut self.extra_data, MAX_EXTRA_DATA_BYTES);
        codec.define_slice_of_dynamic_bytes_content(
            &mut self.transactions,
            MAX_TRANSACTIONS,
            MAX_TRANSACTION_BYTES,
        );
        codec.define_slice_of_static_objects_content(&mut self.withdrawals, MAX_WITHDRAWALS);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attestation {
    pub aggregation_bits: Bitlist,
    pub data: Checkpoint,
    pub signature: [u8; 96],
}

impl Default for Attestation {
    fn default() -> Self {
        Self {
            aggregation_bits: Bitlist::new(),
            data: Checkpoint::default(),
            signature: [0; 96],
        }
    }
}

impl SszObject for Attestation {
    const STATIC: bool = false;

    fn size_ssz(&self, fixed: bool) -> u32 {
        let size = 4 + 40 + 96;
        if fixed {
            return size;
        }
        size + size_slice_of_bits(&self.aggregation_bits)
    }

    fn define_ssz(&mut self, codec: &mut Codec<'_>) {
        codec.define_bitlist_offset(&mut self.aggregation_bits);
        codec.define_static_object(&mut self.data);
        codec.define_static_bytes(&mut self.signature);

        codec.define_bitlist_content(&mut self.aggregation_bits, MAX_AGGREGATION_BITS);
    }
}

/// Exercises bool, fixed arrays of byte arrays, uint64 slices and slices of
/// fixed-length byte strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorSummary {
    pub active: bool,
    pub roots: [[u8; 32]; 2],
    pub balances: Vec<u64>,
    pub commitments: Vec<[u8; 48]>,
}

impl SszObject for ValidatorSummary {
    const STATIC: bool = false;

    fn size_ssz(&self, fixed: bool) -> u32 {
        let size = 1 + 64 + 4 + 4;
        if fixed {
            return size;
        }
        size + size_slice_of_uint64s(&self.balances)
            + size_slice_of_static_bytes(&self.commitments)
    }

    fn define_ssz(&mut self, codec: &mut Codec<'_>) {
        codec.define_bool(&mut self.active);
        codec.define_array_of_static_bytes(&mut self.roots);
        codec.define_uint64s_offset(&mut self.balances);
        codec.define_slice_of_static_bytes_offset(&mut self.commitments);

        codec.define_uint64s_content(&mut self.balances, MAX_BALANCES);
        codec.define_slice_of_static_bytes_content(&mut self.commitments, MAX_COMMITMENTS);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shard {
    pub id: u64,
    pub payload: Vec<u8>,
}

impl SszObject for Shard {
    const STATIC: bool = false;

    fn size_ssz(&self, fixed: bool) -> u32 {
        let size = 8 + 4;
        if fixed {
            return size;
        }
        size + size_dynamic_bytes(&self.payload)
    }

    fn define_ssz(&mut self, codec: &mut Codec<'_>) {
        codec.define_uint64(&mut self.id);
        codec.define_dynamic_bytes_offset(&mut self.payload);
        codec.define_dynamic_bytes_content(&mut self.payload, MAX_SHARD_PAYLOAD_BYTES);
    }
}

/// Slice of variable records nested under a variable record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardBatch {
    pub epoch: u64,
    pub shards: Vec<Shard>,
}

impl SszObject for ShardBatch {
    const STATIC: bool = false;

    fn size_ssz(&self, fixed: bool) -> u32 {
        let size = 8 + 4;
        if fixed {
            return size;
        }
        size + size_slice_of_dynamic_objects(&self.shards)
    }

    fn define_ssz(&mut self, codec: &mut Codec<'_>) {
        codec.define_uint64(&mut self.epoch);
        codec.define_slice_of_dynamic_objects_offset(&mut self.shards);
        codec.define_slice_of_dynamic_objects_content(&mut self.shards, MAX_SHARDS);
    }
}

/// Embedded variable record behind an offset slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardEnvelope {
    pub version: u16,
    pub shard: Shard,
}

impl SszObject for ShardEnvelope {
    const STATIC: bool = false;

    fn size_ssz(&self, fixed: bool) -> u32 {
        let size = 2 + 4;
        if fixed {
            return size;
        }
        size + size_dynamic_object(&self.shard)
    }

    fn define_ssz(&mut self, codec: &mut Codec<'_>) {
        codec.define_uint16(&mut self.version);
        codec.define_dynamic_object_offset(&mut self.shard);
        codec.define_dynamic_object_content(&mut self.shard);
    }
}

/// Encodes through both sinks, checks size agreement, decodes back through
/// both sources, and returns the wire bytes.
pub fn roundtrip<T>(obj: &mut T) -> Vec<u8>
where
    T: SszObject + Default + PartialEq + std::fmt::Debug,
{
    let mut wire = Vec::new();
    encode_to_stream(&mut wire, obj).expect("stream encoding failed");
    assert_eq!(
        wire.len() as u32,
        obj.size_ssz(false),
        "encoded length disagrees with size_ssz"
    );

    let mut buf = vec![0u8; wire.len()];
    encode_to_bytes(&mut buf, obj).expect("buffer encoding failed");
    assert_eq!(wire, buf, "stream and buffer encodings disagree");

    let mut from_bytes = T::default();
    decode_from_bytes(&wire, &mut from_bytes).expect("byte decoding failed");
    assert_eq!(&from_bytes, obj, "byte decode did not round-trip");

    let mut from_stream = T::default();
    let mut cursor = std::io::Cursor::new(&wire);
    decode_from_stream(&mut cursor, &mut from_stream, wire.len() as u32)
        .expect("stream decoding failed");
    assert_eq!(&from_stream, obj, "stream decode did not round-trip");

    wire
}

pub fn bitlist_of(bits: &[bool]) -> Bitlist {
    let mut list = Bitlist::new();
    for &bit in bits {
        list.push(bit);
    }
    list
}
