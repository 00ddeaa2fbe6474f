//! WOFF 1.0: per-table zlib compression around an sfnt.

use std::io::{Read, Write};

use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};
use read_fonts::types::Tag;

use crate::{
    error::{FlavorError, Result},
    reader::Reader,
    sfnt::{MAX_SFNT_SIZE, SfntTables, Table, checksum, padded_len},
};

pub const SIGNATURE: u32 = u32::from_be_bytes(*b"wOFF");

const FORMAT: &str = "WOFF";
const HEADER_LEN: usize = 44;
const ENTRY_LEN: usize = 20;

/// Decode a WOFF file into its sfnt tables.
pub fn decode(data: &[u8]) -> Result<SfntTables> {
    if data.len() < HEADER_LEN {
        return Err(FlavorError::Truncated { expected: HEADER_LEN, actual: data.len() });
    }
    let mut header = Reader::new(data, FORMAT);
    if header.u32()? != SIGNATURE {
        return Err(FlavorError::malformed(FORMAT, "bad signature"));
    }
    let flavor = header.u32()?;
    let length = header.u32()? as usize;
    if length != data.len() {
        log::warn!("WOFF header length {length} does not match file size {}", data.len());
    }
    let num_tables = header.u16()?;
    header.u16()?; // reserved
    if u64::from(header.u32()?) > MAX_SFNT_SIZE {
        return Err(FlavorError::DecompressionLimit { format: FORMAT, limit: MAX_SFNT_SIZE });
    }

    let mut directory = Reader::new(&data[HEADER_LEN..], FORMAT);
    let mut tables = Vec::with_capacity(num_tables as usize);
    let mut total_len = 0u64;
    for _ in 0..num_tables {
        let tag = Tag::from_be_bytes(directory.u32()?.to_be_bytes());
        let offset = directory.u32()? as usize;
        let comp_length = directory.u32()? as usize;
        let orig_length = directory.u32()? as usize;
        directory.u32()?; // origChecksum

        total_len += orig_length as u64;
        if total_len > MAX_SFNT_SIZE {
            return Err(FlavorError::DecompressionLimit { format: FORMAT, limit: MAX_SFNT_SIZE });
        }

        let stored = offset
            .checked_add(comp_length)
            .and_then(|end| data.get(offset..end))
            .ok_or_else(|| FlavorError::malformed(FORMAT, format!("table '{tag}' out of bounds")))?;

        let table = if comp_length < orig_length {
            inflate(stored, orig_length)?
        } else if comp_length == orig_length {
            stored.to_vec()
        } else {
            return Err(FlavorError::malformed(
                FORMAT,
                format!("table '{tag}' compressed length exceeds original length"),
            ));
        };
        if table.len() != orig_length {
            return Err(FlavorError::malformed(
                FORMAT,
                format!("table '{tag}' inflated to {} bytes, expected {orig_length}", table.len()),
            ));
        }
        tables.push(Table { tag, data: table });
    }

    Ok(SfntTables { version: flavor, tables })
}

/// Inflate one table, reading at most one byte past `orig_length`.
fn inflate(stored: &[u8], orig_length: usize) -> Result<Vec<u8>> {
    let limit = orig_length as u64;
    let mut inflated = Vec::new();
    ZlibDecoder::new(stored)
        .take(limit + 1)
        .read_to_end(&mut inflated)
        .map_err(FlavorError::Zlib)?;
    if inflated.len() > orig_length {
        return Err(FlavorError::DecompressionLimit { format: FORMAT, limit });
    }
    Ok(inflated)
}

/// Encode sfnt tables as WOFF.
///
/// Each table is zlib-compressed and stored compressed only when that makes it smaller.
pub fn encode(mut sfnt: SfntTables) -> Result<Vec<u8>> {
    // checksums and head.checkSumAdjustment come from a canonical sfnt layout
    let canonical = sfnt.clone().assemble();
    sfnt = SfntTables::read(&canonical)?;
    sfnt.tables.sort_by_key(|t| t.tag);

    let num_tables = sfnt.tables.len();
    let total_sfnt_size = 12
        + 16 * num_tables
        + sfnt.tables.iter().map(|t| padded_len(t.data.len())).sum::<usize>();

    let mut entries = Vec::with_capacity(num_tables);
    for table in &sfnt.tables {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&table.data).map_err(FlavorError::Zlib)?;
        let compressed = encoder.finish().map_err(FlavorError::Zlib)?;
        let stored = if compressed.len() < table.data.len() { compressed } else { table.data.clone() };
        entries.push((table, stored));
    }

    let mut out = vec![0u8; HEADER_LEN + ENTRY_LEN * num_tables];
    let mut directory = Vec::with_capacity(ENTRY_LEN * num_tables);
    for (table, stored) in &entries {
        let offset = out.len();
        directory.extend_from_slice(&table.tag.to_be_bytes());
        directory.extend_from_slice(&(offset as u32).to_be_bytes());
        directory.extend_from_slice(&(stored.len() as u32).to_be_bytes());
        directory.extend_from_slice(&(table.data.len() as u32).to_be_bytes());
        directory.extend_from_slice(&checksum(&table.data).to_be_bytes());
        out.extend_from_slice(stored);
        out.resize(padded_len(out.len()), 0);
    }
    out[HEADER_LEN..HEADER_LEN + directory.len()].copy_from_slice(&directory);

    let length = out.len() as u32;
    let mut header = Vec::with_capacity(HEADER_LEN);
    header.extend_from_slice(&SIGNATURE.to_be_bytes());
    header.extend_from_slice(&sfnt.version.to_be_bytes());
    header.extend_from_slice(&length.to_be_bytes());
    header.extend_from_slice(&(num_tables as u16).to_be_bytes());
    header.extend_from_slice(&0u16.to_be_bytes());
    header.extend_from_slice(&(total_sfnt_size as u32).to_be_bytes());
    header.extend_from_slice(&1u16.to_be_bytes()); // majorVersion
    header.extend_from_slice(&0u16.to_be_bytes()); // minorVersion
    // metaOffset, metaLength, metaOrigLength, privOffset, privLength
    header.extend_from_slice(&[0u8; 20]);
    out[..HEADER_LEN].copy_from_slice(&header);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfnt::TRUETYPE_VERSION;

    fn sample() -> SfntTables {
        SfntTables {
            version: TRUETYPE_VERSION,
            tables: vec![
                Table { tag: Tag::new(b"prep"), data: vec![0xB0; 400] },
                Table { tag: Tag::new(b"cvt "), data: vec![0, 1, 2] },
            ],
        }
    }

    #[test]
    fn header_fields() {
        let woff = encode(sample()).unwrap();
        assert_eq!(&woff[..4], b"wOFF");
        assert_eq!(u32::from_be_bytes(woff[4..8].try_into().unwrap()), TRUETYPE_VERSION);
        assert_eq!(u32::from_be_bytes(woff[8..12].try_into().unwrap()) as usize, woff.len());
        assert_eq!(u16::from_be_bytes([woff[12], woff[13]]), 2);
        // 12 + 2 * 16 + 4 + 400
        assert_eq!(u32::from_be_bytes(woff[16..20].try_into().unwrap()), 448);
    }

    #[test]
    fn compresses_only_when_smaller() {
        let woff = encode(sample()).unwrap();
        let entry = |i: usize| {
            let at = HEADER_LEN + i * ENTRY_LEN;
            let comp = u32::from_be_bytes(woff[at + 8..at + 12].try_into().unwrap());
            let orig = u32::from_be_bytes(woff[at + 12..at + 16].try_into().unwrap());
            (comp, orig)
        };
        // 'cvt ' sorts first and is too small to compress
        assert_eq!(entry(0), (3, 3));
        let (comp, orig) = entry(1);
        assert_eq!(orig, 400);
        assert!(comp < orig);
    }

    #[test]
    fn decode_restores_tables() {
        let decoded = decode(&encode(sample()).unwrap()).unwrap();
        assert_eq!(decoded.version, TRUETYPE_VERSION);
        assert_eq!(decoded.get(Tag::new(b"prep")), Some(&[0xB0u8; 400][..]));
        assert_eq!(decoded.get(Tag::new(b"cvt ")), Some(&[0u8, 1, 2][..]));
    }

    #[test]
    fn truncated_header_is_rejected() {
        assert!(matches!(decode(b"wOFF\0\0"), Err(FlavorError::Truncated { .. })));
    }

    /// A single-table WOFF whose zlib payload is stored verbatim.
    fn single_table(payload: &[u8], orig_length: u32) -> Vec<u8> {
        let offset = (HEADER_LEN + ENTRY_LEN) as u32;
        let mut data = Vec::new();
        data.extend_from_slice(b"wOFF");
        data.extend_from_slice(&TRUETYPE_VERSION.to_be_bytes());
        data.extend_from_slice(&(offset + payload.len() as u32).to_be_bytes());
        data.extend_from_slice(&1u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&(12 + 16 + orig_length).to_be_bytes());
        data.extend_from_slice(&[0u8; 24]);
        data.extend_from_slice(b"prep");
        data.extend_from_slice(&offset.to_be_bytes());
        data.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        data.extend_from_slice(&orig_length.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn inflation_past_original_length_is_rejected() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&vec![0u8; 200_000]).unwrap();
        let payload = encoder.finish().unwrap();
        assert!(payload.len() < 1000);

        let err = decode(&single_table(&payload, 1000)).unwrap_err();
        assert!(matches!(err, FlavorError::DecompressionLimit { format: "WOFF", limit: 1000 }));
    }

    #[test]
    fn short_inflation_is_rejected() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&[7u8; 500]).unwrap();
        let payload = encoder.finish().unwrap();

        let err = decode(&single_table(&payload, 1000)).unwrap_err();
        assert!(matches!(err, FlavorError::Malformed { format: "WOFF", .. }));
    }

    #[test]
    fn oversized_declared_font_is_rejected() {
        let mut data = single_table(&[0; 4], 4);
        data[16..20].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(decode(&data), Err(FlavorError::DecompressionLimit { .. })));
    }
}
