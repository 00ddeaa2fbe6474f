//! Plain sfnt (TrueType / OpenType) table access and assembly.

use read_fonts::{FontRef, types::Tag};

use crate::error::Result;

pub const TRUETYPE_VERSION: u32 = 0x0001_0000;
pub const CFF_VERSION: u32 = u32::from_be_bytes(*b"OTTO");
pub const APPLE_TRUE_VERSION: u32 = u32::from_be_bytes(*b"true");

/// Largest decoded font the WOFF and WOFF2 decoders will produce.
pub const MAX_SFNT_SIZE: u64 = 256 * 1024 * 1024;

const HEAD: Tag = Tag::new(b"head");
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;
const HEADER_LEN: usize = 12;
const RECORD_LEN: usize = 16;

/// One table lifted out of a font container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub tag: Tag,
    pub data: Vec<u8>,
}

/// Tables of an sfnt, together with the sfnt version they were stored under.
#[derive(Debug, Clone)]
pub struct SfntTables {
    pub version: u32,
    pub tables: Vec<Table>,
}

impl SfntTables {
    /// Copy every table out of sfnt data, in directory order.
    pub fn read(data: &[u8]) -> Result<Self> {
        let font = FontRef::new(data)?;
        let version = font.table_directory.sfnt_version();
        let tables = font
            .table_directory
            .table_records()
            .iter()
            .filter_map(|record| {
                let tag = record.tag();
                font.table_data(tag).map(|d| Table { tag, data: d.as_bytes().to_vec() })
            })
            .collect();
        Ok(Self { version, tables })
    }

    pub fn get(&self, tag: Tag) -> Option<&[u8]> {
        self.tables.iter().find(|t| t.tag == tag).map(|t| t.data.as_slice())
    }

    /// Assemble a binary sfnt.
    ///
    /// Tables are sorted by tag, padded to four bytes, and `head.checkSumAdjustment`
    /// is recomputed for the assembled file.
    pub fn assemble(mut self) -> Vec<u8> {
        self.tables.sort_by_key(|t| t.tag);
        let num_tables = self.tables.len();

        let (search_range, entry_selector, range_shift) = search_params(num_tables as u16);

        let mut out = Vec::with_capacity(
            HEADER_LEN
                + RECORD_LEN * num_tables
                + self.tables.iter().map(|t| padded_len(t.data.len())).sum::<usize>(),
        );
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&(num_tables as u16).to_be_bytes());
        out.extend_from_slice(&search_range.to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&range_shift.to_be_bytes());

        let mut offset = HEADER_LEN + RECORD_LEN * num_tables;
        let mut head_offset = None;
        for table in &mut self.tables {
            if table.tag == HEAD && table.data.len() >= 12 {
                table.data[8..12].fill(0);
                head_offset = Some(offset);
            }
            out.extend_from_slice(&table.tag.to_be_bytes());
            out.extend_from_slice(&checksum(&table.data).to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(table.data.len() as u32).to_be_bytes());
            offset += padded_len(table.data.len());
        }

        for table in &self.tables {
            out.extend_from_slice(&table.data);
            out.resize(padded_len(out.len()), 0);
        }

        if let Some(head_offset) = head_offset {
            let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(&out));
            out[head_offset + 8..head_offset + 12].copy_from_slice(&adjustment.to_be_bytes());
        }

        out
    }
}

pub(crate) fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// OpenType table checksum: the wrapping sum of big-endian u32 words, zero padded.
pub(crate) fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn search_params(num_tables: u16) -> (u16, u16, u16) {
    if num_tables == 0 {
        return (0, 0, 0);
    }
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * RECORD_LEN as u16;
    let range_shift = num_tables * RECORD_LEN as u16 - search_range;
    (search_range, entry_selector, range_shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_match_opentype_formula() {
        assert_eq!(search_params(1), (16, 0, 0));
        assert_eq!(search_params(9), (128, 3, 16));
        assert_eq!(search_params(16), (256, 4, 0));
    }

    #[test]
    fn checksum_pads_trailing_bytes() {
        assert_eq!(checksum(&[0, 0, 0, 1, 0x80]), 1 + 0x8000_0000);
    }

    #[test]
    fn assemble_then_read_keeps_tables() {
        let tables = SfntTables {
            version: TRUETYPE_VERSION,
            tables: vec![
                Table { tag: Tag::new(b"name"), data: vec![0, 0, 0, 0, 0, 6] },
                Table { tag: Tag::new(b"cvt "), data: vec![1, 2, 3] },
            ],
        };
        let data = tables.clone().assemble();
        let read = SfntTables::read(&data).unwrap();
        assert_eq!(read.version, TRUETYPE_VERSION);
        assert_eq!(read.get(Tag::new(b"cvt ")), Some(&[1u8, 2, 3][..]));
        assert_eq!(read.get(Tag::new(b"name")), Some(&[0u8, 0, 0, 0, 0, 6][..]));
        // tables come back sorted by tag
        assert_eq!(read.tables[0].tag, Tag::new(b"cvt "));
    }
}
