//! WOFF 2.0: Brotli-compressed font data with table transforms.
//!
//! Encoding goes through `ttf2woff2` and decoding through the `woff2` decoder.
//! Before decoding, the header and table directory are read and the Brotli
//! stream is measured against the table lengths they declare.

use read_fonts::types::Tag;

use crate::{
    error::{FlavorError, Result},
    reader::Reader,
    sfnt::{MAX_SFNT_SIZE, SfntTables},
};

pub const SIGNATURE: u32 = u32::from_be_bytes(*b"wOF2");

const FORMAT: &str = "WOFF2";
const HEADER_LEN: usize = 48;
const COLLECTION: u32 = u32::from_be_bytes(*b"ttcf");

/// Directory flag index meaning "tag follows explicitly".
const EXPLICIT_TAG: u8 = 63;
const GLYF_INDEX: u8 = 10;
const LOCA_INDEX: u8 = 11;
const GLYF: Tag = Tag::new(b"glyf");
const LOCA: Tag = Tag::new(b"loca");

/// What the header and table directory promise about the payload.
#[derive(Debug)]
struct Directory<'a> {
    total_sfnt_size: u64,
    /// Length of the decompressed stream: every table as stored, transformed or not.
    stream_len: u64,
    compressed: &'a [u8],
}

/// Decode a WOFF2 file into its sfnt tables.
pub fn decode(data: &[u8]) -> Result<SfntTables> {
    let directory = read_directory(data)?;
    check_stream(directory.compressed, directory.stream_len)?;

    let sfnt = decode_to_sfnt(data)?;
    if sfnt.len() as u64 > directory.total_sfnt_size {
        log::debug!(
            "decoded WOFF2 is {} bytes, header declares {}",
            sfnt.len(),
            directory.total_sfnt_size
        );
    }
    SfntTables::read(&sfnt)
}

/// Encode sfnt data as WOFF2.
#[cfg(feature = "woff2")]
pub fn encode(sfnt: &[u8]) -> Result<Vec<u8>> {
    ttf2woff2::encode(sfnt, ttf2woff2::BrotliQuality::default())
        .map_err(|e| FlavorError::Woff2Encode(e.to_string()))
}

#[cfg(not(feature = "woff2"))]
pub fn encode(_sfnt: &[u8]) -> Result<Vec<u8>> {
    Err(FlavorError::Woff2Unavailable)
}

#[cfg(feature = "woff2")]
fn decode_to_sfnt(data: &[u8]) -> Result<Vec<u8>> {
    let mut input = data;
    woff2::decode::convert_woff2_to_ttf(&mut input).map_err(|e| FlavorError::Woff2Decode(e.to_string()))
}

#[cfg(not(feature = "woff2"))]
fn decode_to_sfnt(_data: &[u8]) -> Result<Vec<u8>> {
    Err(FlavorError::Woff2Unavailable)
}

/// Fail if the Brotli stream inflates past `limit` bytes.
///
/// Output is discarded as it is produced, so memory stays bounded whatever the
/// stream contains.
#[cfg(feature = "woff2")]
fn check_stream(compressed: &[u8], limit: u64) -> Result<()> {
    use std::io::{self, Read};

    let mut stream = brotli_decompressor::Decompressor::new(compressed, 4096).take(limit + 1);
    let len = io::copy(&mut stream, &mut io::sink()).map_err(FlavorError::Brotli)?;
    if len > limit {
        return Err(FlavorError::DecompressionLimit { format: FORMAT, limit });
    }
    Ok(())
}

#[cfg(not(feature = "woff2"))]
fn check_stream(_compressed: &[u8], _limit: u64) -> Result<()> {
    Err(FlavorError::Woff2Unavailable)
}

fn read_directory(data: &[u8]) -> Result<Directory<'_>> {
    if data.len() < HEADER_LEN {
        return Err(FlavorError::Truncated { expected: HEADER_LEN, actual: data.len() });
    }
    let mut reader = Reader::new(data, FORMAT);
    if reader.u32()? != SIGNATURE {
        return Err(FlavorError::malformed(FORMAT, "bad signature"));
    }
    if reader.u32()? == COLLECTION {
        return Err(FlavorError::Collection);
    }
    let length = reader.u32()? as usize;
    if length != data.len() {
        log::warn!("WOFF2 header length {length} does not match file size {}", data.len());
    }
    let num_tables = reader.u16()?;
    reader.u16()?; // reserved
    let total_sfnt_size = u64::from(reader.u32()?);
    let compressed_len = reader.u32()? as usize;
    reader.take(HEADER_LEN - 24)?;

    if total_sfnt_size > MAX_SFNT_SIZE {
        return Err(FlavorError::DecompressionLimit { format: FORMAT, limit: MAX_SFNT_SIZE });
    }

    let mut stream_len = 0u64;
    for _ in 0..num_tables {
        stream_len += u64::from(stored_length(&mut reader)?);
    }
    if stream_len > MAX_SFNT_SIZE {
        return Err(FlavorError::DecompressionLimit { format: FORMAT, limit: MAX_SFNT_SIZE });
    }

    let compressed = reader.take(compressed_len)?;
    Ok(Directory { total_sfnt_size, stream_len, compressed })
}

/// Read one directory entry and return the table's length in the stream.
fn stored_length(reader: &mut Reader) -> Result<u32> {
    let flags = reader.u8()?;
    let index = flags & 0x3F;
    let is_glyf_or_loca = match index {
        EXPLICIT_TAG => {
            let tag = Tag::from_be_bytes(reader.u32()?.to_be_bytes());
            tag == GLYF || tag == LOCA
        }
        GLYF_INDEX | LOCA_INDEX => true,
        _ => false,
    };
    let transform_version = flags >> 6;
    let orig_length = reader.uint_base128()?;

    // glyf and loca use version 0 for their transform; other tables use it for none
    let transformed = if is_glyf_or_loca { transform_version == 0 } else { transform_version != 0 };
    if transformed { reader.uint_base128() } else { Ok(orig_length) }
}
