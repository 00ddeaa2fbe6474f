//! Table-specific merge implementations

pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod maxp;
pub mod os2;
pub mod post;

use read_fonts::{FontRef, ReadError};

use crate::Result;

/// Read one table from every font, failing on the first font without it.
fn read_all<'a, T>(
    fonts: &[FontRef<'a>],
    table: impl Fn(&FontRef<'a>) -> std::result::Result<T, ReadError>,
) -> Result<Vec<T>> {
    Ok(fonts.iter().map(table).collect::<std::result::Result<Vec<_>, _>>()?)
}
