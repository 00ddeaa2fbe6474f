//! Font container flavors.
//!
//! Detects whether font data is a plain sfnt (TrueType or CFF outlines), WOFF or
//! WOFF2 by its signature, unwraps compressed containers to sfnt, and wraps sfnt
//! data into the requested container.
//!
//! # Example
//!
//! ```no_run
//! use typeforge_font_flavor::{Container, Flavor};
//!
//! let data = std::fs::read("font.woff2").unwrap();
//! assert_eq!(Flavor::detect(&data).unwrap(), Flavor::Woff2);
//! let sfnt = typeforge_font_flavor::to_sfnt(&data).unwrap();
//! let woff = typeforge_font_flavor::encode(&sfnt, Container::Woff).unwrap();
//! ```

mod error;
mod reader;
pub mod sfnt;
pub mod woff;
pub mod woff2;

use std::fmt;

pub use error::{FlavorError, Result};
pub use sfnt::{SfntTables, Table};

const COLLECTION: u32 = u32::from_be_bytes(*b"ttcf");

/// The container and outline kind of font data, as identified by its signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// sfnt with TrueType outlines (`0x00010000` or `true`).
    TrueType,
    /// sfnt with CFF outlines (`OTTO`).
    Cff,
    Woff,
    Woff2,
}

impl Flavor {
    pub fn detect(data: &[u8]) -> Result<Self> {
        let Some(signature) = data.get(..4) else {
            return Err(FlavorError::Truncated { expected: 4, actual: data.len() });
        };
        match u32::from_be_bytes([signature[0], signature[1], signature[2], signature[3]]) {
            sfnt::TRUETYPE_VERSION | sfnt::APPLE_TRUE_VERSION => Ok(Self::TrueType),
            sfnt::CFF_VERSION => Ok(Self::Cff),
            woff::SIGNATURE => Ok(Self::Woff),
            woff2::SIGNATURE => Ok(Self::Woff2),
            COLLECTION => Err(FlavorError::Collection),
            other => Err(FlavorError::UnknownSignature(other)),
        }
    }

    pub fn is_sfnt(self) -> bool {
        matches!(self, Self::TrueType | Self::Cff)
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TrueType => "TrueType",
            Self::Cff => "OpenType/CFF",
            Self::Woff => "WOFF",
            Self::Woff2 => "WOFF2",
        })
    }
}

/// Output container for [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Sfnt,
    Woff,
    Woff2,
}

/// Returns plain sfnt data, decompressing WOFF and WOFF2 input.
pub fn to_sfnt(data: &[u8]) -> Result<Vec<u8>> {
    match Flavor::detect(data)? {
        Flavor::TrueType | Flavor::Cff => Ok(data.to_vec()),
        Flavor::Woff => Ok(woff::decode(data)?.assemble()),
        Flavor::Woff2 => Ok(woff2::decode(data)?.assemble()),
    }
}

/// Wrap sfnt data into `container`.
pub fn encode(sfnt: &[u8], container: Container) -> Result<Vec<u8>> {
    if !Flavor::detect(sfnt)?.is_sfnt() {
        return Err(FlavorError::malformed("sfnt", "input is not an uncompressed sfnt"));
    }
    match container {
        Container::Sfnt => Ok(sfnt.to_vec()),
        Container::Woff => woff::encode(SfntTables::read(sfnt)?),
        Container::Woff2 => woff2::encode(sfnt),
    }
}
