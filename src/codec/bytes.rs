//! Big-endian byte helpers and the sfnt file writer

pub(crate) fn u16_at(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn i16_at(data: &[u8], offset: usize) -> Option<i16> {
    u16_at(data, offset).map(|v| v as i16)
}

pub(crate) fn u32_at(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Callers check the table length before patching.
pub(crate) fn write_u16(data: &mut [u8], offset: usize, val: u16) {
    data[offset..offset + 2].copy_from_slice(&val.to_be_bytes());
}

pub(crate) fn write_u32(data: &mut [u8], offset: usize, val: u32) {
    data[offset..offset + 4].copy_from_slice(&val.to_be_bytes());
}

pub(crate) fn pad4(data: &mut Vec<u8>) {
    while data.len() % 4 != 0 {
        data.push(0);
    }
}

pub(crate) fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// Sum of the data as big-endian u32 words, the last word zero-padded.
pub(crate) fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// `(entrySelector, searchRange)` for a binary-search header over `count`
/// items of `unit` bytes.
pub(crate) fn search_params(count: u16, unit: u16) -> (u16, u16) {
    if count == 0 {
        return (0, 0);
    }
    let entry_selector = (u16::BITS - 1 - count.leading_zeros()) as u16;
    let search_range = (1u16 << entry_selector).wrapping_mul(unit);
    (entry_selector, search_range)
}

pub(crate) const HEAD_TAG: [u8; 4] = *b"head";
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

/// Assemble an sfnt file from `(tag, data)` pairs.
///
/// Tables are sorted by tag, padded to 4 bytes, and the `head`
/// `checkSumAdjustment` is recomputed over the finished file.
pub(crate) fn write_sfnt(flavor: u32, mut tables: Vec<([u8; 4], Vec<u8>)>) -> Vec<u8> {
    tables.sort_by(|a, b| a.0.cmp(&b.0));
    for (tag, data) in tables.iter_mut() {
        if *tag == HEAD_TAG && data.len() >= 12 {
            write_u32(data, 8, 0);
        }
    }

    let num_tables = tables.len() as u16;
    let (entry_selector, search_range) = search_params(num_tables, 16);
    let range_shift = (num_tables * 16).saturating_sub(search_range);

    let mut output = Vec::new();
    output.extend_from_slice(&flavor.to_be_bytes());
    output.extend_from_slice(&num_tables.to_be_bytes());
    output.extend_from_slice(&search_range.to_be_bytes());
    output.extend_from_slice(&entry_selector.to_be_bytes());
    output.extend_from_slice(&range_shift.to_be_bytes());

    let mut table_offset = 12 + tables.len() * 16;
    let mut head_offset = None;
    for (tag, data) in &tables {
        if *tag == HEAD_TAG && data.len() >= 12 {
            head_offset = Some(table_offset);
        }
        output.extend_from_slice(tag);
        output.extend_from_slice(&checksum(data).to_be_bytes());
        output.extend_from_slice(&(table_offset as u32).to_be_bytes());
        output.extend_from_slice(&(data.len() as u32).to_be_bytes());
        table_offset += padded_len(data.len());
    }

    for (_, data) in &tables {
        output.extend_from_slice(data);
        pad4(&mut output);
    }

    // The directory checksum of head is computed with a zero adjustment,
    // so only the file-level field changes here.
    if let Some(offset) = head_offset {
        let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(&output));
        write_u32(&mut output, offset + 8, adjustment);
    }

    output
}

/// Table directory entry of an sfnt file
pub(crate) struct TableRecord {
    pub tag: [u8; 4],
    pub checksum: u32,
    pub offset: usize,
    pub length: usize,
}

/// Read the table directory of an sfnt file.
pub(crate) fn table_records(sfnt: &[u8]) -> Option<Vec<TableRecord>> {
    let num_tables = u16_at(sfnt, 4)? as usize;
    (0..num_tables)
        .map(|i| {
            let base = 12 + i * 16;
            let tag = sfnt.get(base..base + 4)?;
            Some(TableRecord {
                tag: [tag[0], tag[1], tag[2], tag[3]],
                checksum: u32_at(sfnt, base + 4)?,
                offset: u32_at(sfnt, base + 8)? as usize,
                length: u32_at(sfnt, base + 12)? as usize,
            })
        })
        .collect()
}
