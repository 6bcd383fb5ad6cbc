//! WOFF 1.0 container
//!
//! Each sfnt table is zlib-compressed on its own and stored compressed only
//! when that makes it smaller.

use super::bytes::{padded_len, table_records, u16_at, u32_at, write_sfnt};
use super::CodecError;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

const SIGNATURE: &[u8; 4] = b"wOFF";
const HEADER_LEN: usize = 44;
const ENTRY_LEN: usize = 20;

/// Wrap an sfnt file into a WOFF container.
pub(crate) fn wrap(sfnt: &[u8]) -> Result<Vec<u8>, CodecError> {
    let flavor = u32_at(sfnt, 0).ok_or_else(|| CodecError::Woff("sfnt header is truncated".into()))?;
    let records =
        table_records(sfnt).ok_or_else(|| CodecError::Woff("sfnt directory is truncated".into()))?;

    let mut entries = Vec::with_capacity(records.len());
    let mut total_sfnt_size = 12 + 16 * records.len();
    for record in &records {
        let data = sfnt
            .get(record.offset..record.offset + record.length)
            .ok_or_else(|| CodecError::Woff("sfnt table is out of bounds".into()))?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;
        let stored = if compressed.len() < data.len() {
            compressed
        } else {
            data.to_vec()
        };
        total_sfnt_size += padded_len(data.len());
        entries.push((record, stored));
    }

    let mut offset = HEADER_LEN + ENTRY_LEN * entries.len();
    let mut directory = Vec::with_capacity(ENTRY_LEN * entries.len());
    for (record, stored) in &entries {
        directory.extend_from_slice(&record.tag);
        directory.extend_from_slice(&(offset as u32).to_be_bytes());
        directory.extend_from_slice(&(stored.len() as u32).to_be_bytes());
        directory.extend_from_slice(&(record.length as u32).to_be_bytes());
        directory.extend_from_slice(&record.checksum.to_be_bytes());
        offset += padded_len(stored.len());
    }
    let total_len = offset;

    let mut woff = Vec::with_capacity(total_len);
    woff.extend_from_slice(SIGNATURE);
    woff.extend_from_slice(&flavor.to_be_bytes());
    woff.extend_from_slice(&(total_len as u32).to_be_bytes());
    woff.extend_from_slice(&(entries.len() as u16).to_be_bytes());
    woff.extend_from_slice(&0u16.to_be_bytes()); // reserved
    woff.extend_from_slice(&(total_sfnt_size as u32).to_be_bytes());
    woff.extend_from_slice(&1u16.to_be_bytes()); // majorVersion
    woff.extend_from_slice(&0u16.to_be_bytes()); // minorVersion
    // metaOffset, metaLength, metaOrigLength, privOffset, privLength
    woff.extend_from_slice(&[0u8; 20]);
    woff.extend_from_slice(&directory);
    for (_, stored) in &entries {
        woff.extend_from_slice(stored);
        woff.resize(padded_len(woff.len()), 0);
    }
    Ok(woff)
}

/// Unpack a WOFF container back into an sfnt file.
pub(crate) fn unwrap(woff: &[u8]) -> Result<Vec<u8>, CodecError> {
    if woff.get(..4) != Some(SIGNATURE.as_slice()) {
        return Err(CodecError::Woff("missing wOFF signature".into()));
    }
    let truncated = || CodecError::Woff("header is truncated".into());
    let flavor = u32_at(woff, 4).ok_or_else(truncated)?;
    let num_tables = u16_at(woff, 12).ok_or_else(truncated)? as usize;

    let mut tables = Vec::with_capacity(num_tables);
    for i in 0..num_tables {
        let base = HEADER_LEN + i * ENTRY_LEN;
        let tag = woff
            .get(base..base + 4)
            .ok_or_else(|| CodecError::Woff("table directory is truncated".into()))?;
        let tag = [tag[0], tag[1], tag[2], tag[3]];
        let field = |at: usize| {
            u32_at(woff, base + at)
                .map(|v| v as usize)
                .ok_or_else(|| CodecError::Woff("table directory is truncated".into()))
        };
        let (offset, comp_length, orig_length) = (field(4)?, field(8)?, field(12)?);

        let stored = woff.get(offset..offset + comp_length).ok_or_else(|| {
            CodecError::Woff(format!("table '{}' is out of bounds", String::from_utf8_lossy(&tag)))
        })?;
        let data = if comp_length < orig_length {
            let mut data = Vec::with_capacity(orig_length);
            ZlibDecoder::new(stored).read_to_end(&mut data)?;
            if data.len() != orig_length {
                return Err(CodecError::Woff(format!(
                    "table '{}' inflates to {} bytes, expected {orig_length}",
                    String::from_utf8_lossy(&tag),
                    data.len()
                )));
            }
            data
        } else if comp_length == orig_length {
            stored.to_vec()
        } else {
            return Err(CodecError::Woff(format!(
                "table '{}' is larger compressed than uncompressed",
                String::from_utf8_lossy(&tag)
            )));
        };
        tables.push((tag, data));
    }

    Ok(write_sfnt(flavor, tables))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_sfnt() -> Vec<u8> {
        write_sfnt(
            0x0001_0000,
            vec![(*b"glyf", vec![0u8; 400]), (*b"zzzz", vec![1, 2, 3])],
        )
    }

    #[test]
    fn test_wrap_compresses_repetitive_tables() {
        let sfnt = tiny_sfnt();
        let woff = wrap(&sfnt).unwrap();
        assert_eq!(&woff[..4], b"wOFF");
        assert_eq!(u32_at(&woff, 8), Some(woff.len() as u32));
        assert_eq!(u32_at(&woff, 16), Some(sfnt.len() as u32));
        // glyf entry: compLength < origLength
        let comp = u32_at(&woff, HEADER_LEN + 8).unwrap();
        let orig = u32_at(&woff, HEADER_LEN + 12).unwrap();
        assert!(comp < orig);
        // tiny table stays uncompressed
        let comp = u32_at(&woff, HEADER_LEN + ENTRY_LEN + 8).unwrap();
        assert_eq!(comp, 3);
    }

    #[test]
    fn test_unwrap_restores_tables() {
        let sfnt = tiny_sfnt();
        let restored = unwrap(&wrap(&sfnt).unwrap()).unwrap();
        assert_eq!(restored, sfnt);
    }

    #[test]
    fn test_unwrap_rejects_plain_sfnt() {
        assert!(matches!(unwrap(&tiny_sfnt()), Err(CodecError::Woff(_))));
    }
}
