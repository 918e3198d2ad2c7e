//! Fixed-layout binary achievement-record decoder.
//!
//! File layout:
//! - 4-byte header; reversing it yields the declared entry count in the
//!   first byte (u8).
//! - N fixed 24-byte records. Per record, after byte-reversal of each
//!   field: bytes [0,4) are a 4-byte identifier (CRC32 of the
//!   achievement's internal name — the format stores hashed keys, not
//!   literal names), bytes [8,12) read little-endian are the unlock
//!   timestamp in epoch seconds, and byte 20 is the achieved flag.
//!
//! The declared count must match the decoded record count exactly;
//! anything else (including trailing bytes that do not fill a record)
//! fails with a content-integrity error so truncated or foreign files
//! are never silently misread.

use celes_core::ScrapError;

const HEADER_SIZE: usize = 4;
const RECORD_SIZE: usize = 24;
const IDENT_RANGE: std::ops::Range<usize> = 0..4;
const UNLOCK_TIME_RANGE: std::ops::Range<usize> = 8..12;
const ACHIEVED_OFFSET: usize = 20;

/// One decoded achievement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryRecord {
    /// CRC32 of the achievement's internal name.
    pub ident: u32,
    /// Unlock timestamp, epoch seconds (0 = unknown).
    pub unlock_time: u32,
    pub achieved: bool,
}

fn reversed4(bytes: &[u8]) -> [u8; 4] {
    [bytes[3], bytes[2], bytes[1], bytes[0]]
}

/// Decode a complete binary achievement file.
pub fn parse_records(data: &[u8]) -> Result<Vec<BinaryRecord>, ScrapError> {
    if data.len() < HEADER_SIZE {
        return Err(ScrapError::parse(format!(
            "record file shorter than its {HEADER_SIZE}-byte header"
        )));
    }

    let declared = reversed4(&data[..HEADER_SIZE])[0] as usize;
    let body = &data[HEADER_SIZE..];

    if body.len() != declared * RECORD_SIZE {
        return Err(ScrapError::ContentIntegrity {
            declared,
            actual: body.len() / RECORD_SIZE,
        });
    }

    let records = body
        .chunks_exact(RECORD_SIZE)
        .map(|record| BinaryRecord {
            ident: u32::from_le_bytes(reversed4(&record[IDENT_RANGE])),
            unlock_time: u32::from_le_bytes(reversed4(&record[UNLOCK_TIME_RANGE])),
            achieved: record[ACHIEVED_OFFSET] != 0,
        })
        .collect();

    Ok(records)
}
