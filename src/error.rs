//! # Error Taxonomy
//!
//! Every failure the codec can produce is a variant of [`SszError`], carrying
//! the offending numeric values for debugging. The encoder and decoder latch
//! the first error they hit; all subsequent field operations become no-ops and
//! the top-level entry point returns the latched error.
//!
//! ## Error Kinds
//!
//! | Variant | Produced by | Meaning |
//! |---------|-------------|---------|
//! | `Io` | both | Underlying stream failed |
//! | `ShortRead` / `ShortWrite` | both | Caller-owned buffer exhausted |
//! | `OffsetBeyondCapacity` | decode | Offset exceeds the container length |
//! | `FirstOffsetMismatch` | decode | First offset is not the head size |
//! | `BadOffsetProgression` | decode | Offset smaller than its predecessor |
//! | `BadCounterOffset` | decode | List counter offset zero or not 4-aligned |
//! | `ShortCounterOffset` | decode | List region shorter than one offset |
//! | `DynamicStaticsIndivisible` | decode | Static-item region not a multiple of the item size |
//! | `MaxItemsExceeded` / `MaxLengthExceeded` | decode | Configured cap violated |
//! | `BadBitlistTerminator` | decode | Bitlist region empty or missing its sentinel bit |
//! | `DynamicObjectInStaticSlot` | both | Variable-size type declared in a static slot |
//!
//! No partial output is promised on failure; callers must discard the output
//! buffer when an error is returned.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SszError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    #[error("short read: {have} bytes available, {need} needed")]
    ShortRead { have: u32, need: u32 },

    #[error("short write: {have} bytes available, {need} needed")]
    ShortWrite { have: u32, need: u32 },

    #[error("offset beyond capacity: decoded {offset}, message length {length}")]
    OffsetBeyondCapacity { offset: u32, length: u32 },

    #[error("first offset mismatch: decoded {offset}, type expects {expected}")]
    FirstOffsetMismatch { offset: u32, expected: u32 },

    #[error("bad offset progression: decoded {offset}, previous was {previous}")]
    BadOffsetProgression { offset: u32, previous: u32 },

    #[error("bad counter offset: {offset}")]
    BadCounterOffset { offset: u32 },

    #[error("short counter offset: {available} bytes available")]
    ShortCounterOffset { available: u32 },

    #[error("dynamic statics indivisible: length {length}, item size {item_size}")]
    DynamicStaticsIndivisible { length: u32, item_size: u32 },

    #[error("max items exceeded: decoded {decoded}, max {max}")]
    MaxItemsExceeded { decoded: u32, max: u32 },

    #[error("max length exceeded: decoded {decoded}, max {max}")]
    MaxLengthExceeded { decoded: u32, max: u32 },

    #[error("bad bitlist terminator: no sentinel bit in final byte")]
    BadBitlistTerminator,

    #[error("dynamic object in static slot")]
    DynamicObjectInStaticSlot,
}

pub type Result<T> = std::result::Result<T, SszError>;
