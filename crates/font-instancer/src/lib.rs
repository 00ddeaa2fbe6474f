//! # Weight instancer
//!
//! Produce static instances of TrueType-outline variable fonts pinned at a
//! position on the `wght` axis. Every other axis stays at its default.
//!
//! ## Example
//!
//! ```no_run
//! use typeforge_font_instancer::{instantiate_weight, weight_axis};
//!
//! let vf_data = std::fs::read("variable.ttf").unwrap();
//! let axis = weight_axis(&vf_data).unwrap();
//! println!("weight range {}..{}", axis.min, axis.max);
//! let bold = instantiate_weight(&vf_data, 700.0).unwrap();
//! std::fs::write("variable-700.ttf", bold.data).unwrap();
//! ```

mod error;
mod instance;
mod iup;
mod metrics;
mod outline;

pub use error::{Error, Result};
pub use instance::{Instance, instantiate_weight};
use read_fonts::{FontRef, TableProvider, types::Tag};

pub const WGHT: Tag = Tag::new(b"wght");
const FVAR: Tag = Tag::new(b"fvar");

/// User-space range of a font's weight axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightAxis {
    pub min: f32,
    pub default: f32,
    pub max: f32,
}

impl WeightAxis {
    pub fn contains(&self, weight: f32) -> bool {
        (self.min..=self.max).contains(&weight)
    }

    pub fn clamp(&self, weight: f32) -> f32 {
        weight.clamp(self.min, self.max.max(self.min))
    }
}

/// Returns whether the font's table directory lists an `fvar` table.
///
/// Only the sfnt header and table records are read; no table is parsed.
pub fn has_variation_axes(data: &[u8]) -> Result<bool> {
    let font = FontRef::new(data)?;
    Ok(font
        .table_directory
        .table_records()
        .iter()
        .any(|record| record.tag() == FVAR))
}

/// Look up the weight axis of a variable font.
pub fn weight_axis(data: &[u8]) -> Result<WeightAxis> {
    let font = FontRef::new(data)?;
    weight_axis_of(&font)
}

pub(crate) fn weight_axis_of(font: &FontRef) -> Result<WeightAxis> {
    let fvar = font.fvar().map_err(|_| Error::NotVariableFont)?;
    let axis = fvar
        .axes()?
        .iter()
        .find(|axis| axis.axis_tag() == WGHT)
        .ok_or(Error::NoWeightAxis)?;
    Ok(WeightAxis {
        min: axis.min_value().to_f64() as f32,
        default: axis.default_value().to_f64() as f32,
        max: axis.max_value().to_f64() as f32,
    })
}
