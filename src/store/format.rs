//! Result file layout
//!
//! Format:
//! - Magic (4 bytes): `SLRS`
//! - Format version (u8)
//! - Store id (16 bytes, UUID)
//! - Written at (i64 LE, unix millis)
//! - Component count (small int)
//! - Per component:
//!   - group, module, version (strings)
//!   - Selection reason (codec-encoded)
//! - Checksum (u32 LE): CRC32 over every preceding byte
//!
//! The whole file is one codec run: the codec is reset before encoding and
//! before decoding, so a file never depends on dictionary state from outside
//! itself.

use std::io::Cursor;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use super::checksum::{compute_checksum, verify_checksum};
use super::component::{ComponentId, ResolutionResult};
use super::errors::{StoreError, StoreResult};
use crate::codec::wire::{WireDecoder, WireEncoder};
use crate::codec::{CodecError, CodecLimits, CodecResult, ReasonCodec};

/// File magic
pub const MAGIC: [u8; 4] = *b"SLRS";

/// Current format version. Bump on any change to the layout, the cause tag
/// assignment, or the codec's dictionary rules.
pub const FORMAT_VERSION: u8 = 1;

/// magic + version + store id + timestamp
const HEADER_LEN: usize = 4 + 1 + 16 + 8;
const CHECKSUM_LEN: usize = 4;

/// Metadata written at the start of every result file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreHeader {
    pub format_version: u8,
    /// Unique per written file
    pub store_id: Uuid,
    pub written_at: DateTime<Utc>,
}

impl StoreHeader {
    /// Header for a file written now
    pub fn new_now() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            store_id: Uuid::new_v4(),
            written_at: Utc::now(),
        }
    }

    fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&MAGIC);
        buf.push(self.format_version);
        buf.extend_from_slice(self.store_id.as_bytes());
        buf.extend_from_slice(&self.written_at.timestamp_millis().to_le_bytes());
    }

    fn read_from(data: &[u8]) -> StoreResult<Self> {
        if data.len() < HEADER_LEN {
            return Err(StoreError::corrupted("header truncated"));
        }
        if data[0..4] != MAGIC {
            return Err(StoreError::corrupted(format!(
                "bad magic: {:02x?}",
                &data[0..4]
            )));
        }
        let format_version = data[4];
        if format_version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: format_version,
                expected: FORMAT_VERSION,
            });
        }

        let mut id_bytes = [0u8; 16];
        id_bytes.copy_from_slice(&data[5..21]);
        let mut millis_bytes = [0u8; 8];
        millis_bytes.copy_from_slice(&data[21..29]);
        let millis = i64::from_le_bytes(millis_bytes);
        let written_at = Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| StoreError::corrupted(format!("invalid timestamp: {}", millis)))?;

        Ok(Self {
            format_version,
            store_id: Uuid::from_bytes(id_bytes),
            written_at,
        })
    }
}

fn codec_error(component: usize) -> impl FnOnce(CodecError) -> StoreError {
    move |source| StoreError::Codec { component, source }
}

fn write_component_id(
    buf: &mut Vec<u8>,
    id: &ComponentId,
    limits: &CodecLimits,
) -> CodecResult<()> {
    limits.check_text(id.group())?;
    limits.check_text(id.module())?;
    limits.check_text(id.version())?;

    let mut encoder = WireEncoder::new(buf);
    encoder.write_string(id.group())?;
    encoder.write_string(id.module())?;
    encoder.write_string(id.version())
}

/// Serialize `result` into a complete result file.
///
/// Refuses, before any file exists, a result that [`decode_file`] with the
/// same codec limits would reject: invalid component ids fail with
/// `InvalidComponentId`, oversized values with a `LimitExceeded` codec error.
pub fn encode_file(
    codec: &mut ReasonCodec,
    header: &StoreHeader,
    result: &ResolutionResult,
) -> StoreResult<Vec<u8>> {
    codec.reset();

    let mut buf = Vec::with_capacity(HEADER_LEN + result.len() * 32 + CHECKSUM_LEN);
    header.write_to(&mut buf);

    WireEncoder::new(&mut buf)
        .write_len(result.len())
        .map_err(codec_error(0))?;

    let limits = codec.limits();
    for (position, component) in result.iter().enumerate() {
        if !component.id().is_valid() {
            return Err(StoreError::InvalidComponentId(component.id().to_string()));
        }
        write_component_id(&mut buf, component.id(), &limits).map_err(codec_error(position))?;
        codec
            .encode(&mut buf, component.reason())
            .map_err(codec_error(position))?;
    }

    let checksum = compute_checksum(&buf);
    buf.extend_from_slice(&checksum.to_le_bytes());
    Ok(buf)
}

/// Verify and deserialize a complete result file.
pub fn decode_file(
    codec: &mut ReasonCodec,
    data: &[u8],
) -> StoreResult<(StoreHeader, ResolutionResult)> {
    if data.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(StoreError::corrupted(format!(
            "file too short: {} bytes",
            data.len()
        )));
    }

    let checksum_offset = data.len() - CHECKSUM_LEN;
    let mut stored = [0u8; CHECKSUM_LEN];
    stored.copy_from_slice(&data[checksum_offset..]);
    let stored = u32::from_le_bytes(stored);
    let body = &data[..checksum_offset];
    if !verify_checksum(body, stored) {
        return Err(StoreError::corrupted(format!(
            "checksum mismatch: computed {:08x}, stored {:08x}",
            compute_checksum(body),
            stored
        )));
    }

    let header = StoreHeader::read_from(body)?;

    codec.reset();
    let max_text = codec.limits().max_text_bytes;
    let mut cursor = Cursor::new(&body[HEADER_LEN..]);
    let count = WireDecoder::new(&mut cursor)
        .read_small_int()
        .map_err(codec_error(0))? as usize;

    let mut result = ResolutionResult::new();
    for position in 0..count {
        let id = {
            let mut decoder = WireDecoder::new(&mut cursor);
            let group = decoder.read_string(max_text).map_err(codec_error(position))?;
            let module = decoder.read_string(max_text).map_err(codec_error(position))?;
            let version = decoder.read_string(max_text).map_err(codec_error(position))?;
            ComponentId::from_parts(group, module, version).map_err(|e| {
                StoreError::corrupted(format!("component #{}: {}", position, e))
            })?
        };
        let reason = codec.decode(&mut cursor).map_err(codec_error(position))?;
        if result.insert(id.clone(), reason).is_some() {
            return Err(StoreError::corrupted(format!("duplicate component {}", id)));
        }
    }

    let consumed = cursor.position() as usize;
    let remaining = body.len() - HEADER_LEN - consumed;
    if remaining != 0 {
        return Err(StoreError::corrupted(format!(
            "{} trailing bytes after {} components",
            remaining, count
        )));
    }

    Ok((header, result))
}
