// Path: crates/node/src/framing.rs

//! Response framing: 4-byte big-endian length, then UTF-8 JSON.
//!
//! Requests are NOT framed; each user's input fd carries the raw bytes of
//! one JSON message and is read to EOF. Only responses use frames, so a
//! client can split concatenated replies without re-parsing.

use serde_json::Value;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on an accepted frame body, to fail fast on corrupt lengths.
pub const MAX_FRAME_BYTES: u32 = 16 * 1024 * 1024;

/// Encodes one response frame.
pub fn encode_frame(body: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(body);
    frame
}

/// Serializes `value` and writes it as one frame.
pub async fn write_frame<W>(writer: &mut W, value: &Value) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let body = value.to_string();
    writer.write_all(&encode_frame(body.as_bytes())).await?;
    writer.flush().await
}

/// Reads one frame body. Client-side helper, also used by tests.
pub async fn read_frame<R>(reader: &mut R) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes).await?;
    let len = u32::from_be_bytes(len_bytes);
    if len > MAX_FRAME_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {len} bytes exceeds limit {MAX_FRAME_BYTES}"),
        ));
    }
    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body).await?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frames_carry_a_big_endian_length_prefix() {
        let frame = encode_frame(br#"{"ok":true}"#);
        assert_eq!(&frame[..4], &11u32.to_be_bytes());
        assert_eq!(&frame[4..], br#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn write_then_read_round_trips_multiple_frames() {
        let mut buf = Vec::new();
        let first = json!({"ok": true, "operation": "stateDigest"});
        let second = json!({"ok": false, "code": "UnknownOperation"});
        write_frame(&mut buf, &first).await.unwrap();
        write_frame(&mut buf, &second).await.unwrap();

        let mut reader = buf.as_slice();
        let a: serde_json::Value =
            serde_json::from_slice(&read_frame(&mut reader).await.unwrap()).unwrap();
        let b: serde_json::Value =
            serde_json::from_slice(&read_frame(&mut reader).await.unwrap()).unwrap();
        assert_eq!(a, first);
        assert_eq!(b, second);
        assert!(read_frame(&mut reader).await.is_err(), "stream exhausted");
    }

    #[tokio::test]
    async fn absurd_lengths_are_rejected() {
        let mut corrupt: Vec<u8> = u32::MAX.to_be_bytes().to_vec();
        corrupt.extend_from_slice(b"{}");
        let mut reader = corrupt.as_slice();
        let err = read_frame(&mut reader).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
