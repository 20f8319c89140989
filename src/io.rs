//! # I/O Endpoints
//!
//! The encoder and decoder are generic over their endpoint without being
//! generic in the type system: each wraps a two-variant enum that is either a
//! borrowed stream (`&mut dyn Write` / `&mut dyn Read`) or a caller-owned byte
//! buffer with a cursor. Buffer exhaustion surfaces as `ShortWrite` /
//! `ShortRead` with the offending byte counts; stream failures pass through as
//! `Io`.
//!
//! Neither endpoint buffers. If the caller needs buffering on the stream path,
//! that is up to the caller.

use std::io::{Read, Write};

use crate::error::SszError;

pub(crate) enum Output<'a> {
    Stream(&'a mut dyn Write),
    Buffer { buf: &'a mut [u8], pos: usize },
}

impl Output<'_> {
    pub(crate) fn write_all(&mut self, bytes: &[u8]) -> Result<(), SszError> {
        match self {
            Output::Stream(out) => out.write_all(bytes).map_err(SszError::from),
            Output::Buffer { buf, pos } => {
                let end = *pos + bytes.len();
                if end > buf.len() {
                    return Err(SszError::ShortWrite {
                        have: (buf.len() - *pos) as u32,
                        need: bytes.len() as u32,
                    });
                }
                buf[*pos..end].copy_from_slice(bytes);
                *pos = end;
                Ok(())
            }
        }
    }
}

pub(crate) enum Input<'a> {
    Stream(&'a mut dyn Read),
    Buffer { buf: &'a [u8], pos: usize },
}

impl Input<'_> {
    pub(crate) fn read_exact(&mut self, out: &mut [u8]) -> Result<(), SszError> {
        match self {
            Input::Stream(input) => input.read_exact(out).map_err(SszError::from),
            Input::Buffer { buf, pos } => {
                let end = *pos + out.len();
                if end > buf.len() {
                    return Err(SszError::ShortRead {
                        have: (buf.len() - *pos) as u32,
                        need: out.len() as u32,
                    });
                }
                out.copy_from_slice(&buf[*pos..end]);
                *pos = end;
                Ok(())
            }
        }
    }
}
