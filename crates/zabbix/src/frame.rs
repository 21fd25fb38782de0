//! Trapper wire framing.
//!
//! Every trapper exchange carries exactly one frame:
//!
//! ```text
//! bytes 0-4:   "ZBXD" (ASCII) followed by protocol version 0x01
//! bytes 5-12:  payload length, little-endian 64-bit, high 32 bits zero
//! bytes 13-N:  UTF-8 JSON payload, no trailing delimiter
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use common::{Error, Result};
use serde::Serialize;

/// Protocol magic plus version byte.
pub const FRAME_HEADER: [u8; 5] = *b"ZBXD\x01";

/// Bytes preceding the JSON payload in every frame.
pub const FRAME_OVERHEAD: usize = FRAME_HEADER.len() + 8;

/// Encode a packet into a complete trapper frame.
///
/// The payload is serialized exactly once; the length field and the
/// transmitted body both come from that one buffer, so they cannot diverge.
pub fn encode<T: Serialize>(packet: &T) -> Result<Bytes> {
    let body = serde_json::to_vec(packet)?;

    let mut buf = BytesMut::with_capacity(FRAME_OVERHEAD + body.len());
    buf.put_slice(&FRAME_HEADER);
    buf.put_u64_le(body.len() as u64);
    buf.put_slice(&body);

    Ok(buf.freeze())
}

/// Extract the JSON payload from a complete trapper frame.
///
/// Validates the magic, version, and declared length against the bytes
/// actually present.
pub fn decode(frame: &[u8]) -> Result<&[u8]> {
    if frame.len() < FRAME_OVERHEAD {
        return Err(Error::frame(format!(
            "frame of {} bytes is shorter than the {} byte header",
            frame.len(),
            FRAME_OVERHEAD
        )));
    }

    if frame[..FRAME_HEADER.len()] != FRAME_HEADER {
        return Err(Error::frame("bad magic or protocol version"));
    }

    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&frame[FRAME_HEADER.len()..FRAME_OVERHEAD]);
    let declared = u64::from_le_bytes(len_bytes) as usize;

    let body = &frame[FRAME_OVERHEAD..];
    if body.len() != declared {
        return Err(Error::frame(format!(
            "declared length {} does not match body length {}",
            declared,
            body.len()
        )));
    }

    Ok(body)
}
