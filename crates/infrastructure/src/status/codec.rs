//! Server list protocol framing.
//!
//! A packet is a VarInt length, then a VarInt packet ID and the payload.
//! VarInts are little-endian groups of seven bits with the high bit set on
//! every byte but the last, at most five bytes for an `i32`.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const SEGMENT_BITS: u8 = 0x7F;
const CONTINUE_BIT: u8 = 0x80;
const MAX_VARINT_LEN: usize = 5;

pub(crate) const HANDSHAKE_ID: i32 = 0x00;
pub(crate) const STATUS_REQUEST_ID: i32 = 0x00;
pub(crate) const STATUS_RESPONSE_ID: i32 = 0x00;

/// Next-state value in the handshake that selects the status exchange
const NEXT_STATE_STATUS: i32 = 0x01;

/// Upper bound on a status response; the JSON plus an inline favicon stays far below it.
pub(crate) const MAX_PACKET_LEN: usize = 2 * 1024 * 1024;

pub(crate) fn write_varint(buf: &mut Vec<u8>, value: i32) {
    let mut value = value as u32;
    while value & !(SEGMENT_BITS as u32) != 0 {
        buf.push((value as u8 & SEGMENT_BITS) | CONTINUE_BIT);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Decodes the VarInt at the front of `buf`, returning it with the number of
/// bytes it occupied.
pub(crate) fn read_varint(buf: &[u8]) -> io::Result<(i32, usize)> {
    let mut value: u32 = 0;
    for (i, byte) in buf.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= ((byte & SEGMENT_BITS) as u32) << (7 * i);
        if byte & CONTINUE_BIT == 0 {
            return Ok((value as i32, i + 1));
        }
    }

    if buf.len() >= MAX_VARINT_LEN {
        Err(varint_too_big())
    } else {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "VarInt cut short",
        ))
    }
}

async fn read_varint_from<S>(stream: &mut S) -> io::Result<i32>
where
    S: AsyncRead + Unpin,
{
    let mut value: u32 = 0;
    for i in 0..MAX_VARINT_LEN {
        let byte = stream.read_u8().await?;
        value |= ((byte & SEGMENT_BITS) as u32) << (7 * i);
        if byte & CONTINUE_BIT == 0 {
            return Ok(value as i32);
        }
    }
    Err(varint_too_big())
}

fn varint_too_big() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "VarInt is too big")
}

/// Handshake body announcing `host:port` and asking for the status state.
pub(crate) fn handshake(protocol_version: i32, host: &str, port: u16) -> Vec<u8> {
    let mut body = Vec::with_capacity(host.len() + 12);
    write_varint(&mut body, HANDSHAKE_ID);
    write_varint(&mut body, protocol_version);
    write_varint(&mut body, host.len() as i32);
    body.extend_from_slice(host.as_bytes());
    body.extend_from_slice(&port.to_be_bytes());
    write_varint(&mut body, NEXT_STATE_STATUS);
    body
}

pub(crate) fn status_request() -> Vec<u8> {
    let mut body = Vec::with_capacity(1);
    write_varint(&mut body, STATUS_REQUEST_ID);
    body
}

pub(crate) async fn write_packet<S>(stream: &mut S, body: &[u8]) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let mut framed = Vec::with_capacity(body.len() + MAX_VARINT_LEN);
    write_varint(&mut framed, body.len() as i32);
    framed.extend_from_slice(body);
    stream.write_all(&framed).await?;
    stream.flush().await
}

/// Reads one packet, returning its ID and the bytes after it.
pub(crate) async fn read_packet<S>(stream: &mut S) -> io::Result<(i32, Vec<u8>)>
where
    S: AsyncRead + Unpin,
{
    let length = read_varint_from(stream).await?;
    let length = usize::try_from(length)
        .ok()
        .filter(|len| (1..=MAX_PACKET_LEN).contains(len))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("packet length {} out of range", length),
            )
        })?;

    let mut packet = vec![0u8; length];
    stream.read_exact(&mut packet).await?;

    let (id, consumed) = read_varint(&packet)?;
    packet.drain(..consumed);
    Ok((id, packet))
}

/// Splits a protocol string (VarInt byte length, then UTF-8) off `payload`.
pub(crate) fn read_string(payload: &[u8]) -> io::Result<&[u8]> {
    let (length, consumed) = read_varint(payload)?;
    let rest = &payload[consumed..];
    usize::try_from(length)
        .ok()
        .and_then(|len| rest.get(..len))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("string of {} bytes, {} available", length, rest.len()),
            )
        })
}
