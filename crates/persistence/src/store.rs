// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::error::{PersistenceError, Result};
use crate::record::StakeRecord;
use byteorder::{ByteOrder, LittleEndian};
use crc64fast::Digest;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub height: u32,
    pub payload_len: u32,
    pub checksum: u64,
}

impl RecordHeader {
    pub const SIZE: usize = 4 + 4 + 8; // 16 bytes

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        reader.read_exact(&mut buf)?;

        Ok(Self {
            height: LittleEndian::read_u32(&buf[0..4]),
            payload_len: LittleEndian::read_u32(&buf[4..8]),
            checksum: LittleEndian::read_u64(&buf[8..16]),
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        LittleEndian::write_u32(&mut buf[0..4], self.height);
        LittleEndian::write_u32(&mut buf[4..8], self.payload_len);
        LittleEndian::write_u64(&mut buf[8..16], self.checksum);
        buf
    }
}

fn record_digest(height: u32, payload: &[u8]) -> u64 {
    let mut digest = Digest::new();
    digest.write(&height.to_le_bytes());
    digest.write(&(payload.len() as u32).to_le_bytes());
    digest.write(payload);
    digest.sum64()
}

pub fn append_record(path: impl AsRef<Path>, record: &StakeRecord) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let payload = record.encode_payload();
    let header = RecordHeader {
        height: record.height,
        payload_len: payload.len() as u32,
        checksum: record_digest(record.height, &payload),
    };

    file.write_all(&header.to_bytes())?;
    file.write_all(&payload)?;
    file.sync_data()?;

    Ok(())
}

/// Streams records in append order. A clean end of file ends iteration.
pub struct RecordReader {
    reader: BufReader<File>,
}

impl RecordReader {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
        })
    }
}

impl Iterator for RecordReader {
    type Item = Result<StakeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = match RecordHeader::read_from(&mut self.reader) {
            Ok(h) => h,
            Err(PersistenceError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => return None,
            Err(e) => return Some(Err(e)),
        };

        let mut payload = vec![0u8; header.payload_len as usize];
        if let Err(e) = self.reader.read_exact(&mut payload) {
            return Some(Err(PersistenceError::IoError(e)));
        }

        let found = record_digest(header.height, &payload);
        if found != header.checksum {
            return Some(Err(PersistenceError::ChecksumMismatch {
                height: header.height,
                expected: header.checksum,
                found,
            }));
        }

        Some(StakeRecord::decode_payload(header.height, &payload))
    }
}

pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<StakeRecord>> {
    RecordReader::new(path)?.collect()
}
