//! Container conversion with optional subsetting.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use typeforge_font_flavor::{Flavor, encode, to_sfnt};
use typeforge_font_subsetter::Subsetter;

use crate::{io::FontFile, job::TargetFormat, progress::Progress};

/// Convert `input` to `format` and save it at `output`.
///
/// With `subset` set, only glyphs reachable from its characters are kept. An
/// empty string is still a subset request.
pub fn convert_font(
    input: &Path,
    output: &Path,
    format: TargetFormat,
    subset: Option<&str>,
    progress: &mut dyn Progress,
) -> Result<PathBuf> {
    progress.start(&format!("converting to {format}"));

    let data = FontFile::new(input).read()?;
    let source = Flavor::detect(&data)
        .with_context(|| format!("unsupported font file: {}", input.display()))?;
    let mut sfnt =
        to_sfnt(&data).with_context(|| format!("failed to decode {source} font {}", input.display()))?;
    let outlines = Flavor::detect(&sfnt)?;
    if outline_mismatch(outlines, format) {
        warn!("{outlines} outlines will be saved with a .{} extension", format.extension());
    }
    progress.advance(30, "parsed");

    if let Some(text) = subset {
        let subsetter = Subsetter::new().with_text(text);
        sfnt = subsetter
            .subset(&sfnt)
            .with_context(|| format!("failed to subset {}", input.display()))?;
        info!("subset to {} characters", subsetter.chars().len());
    }
    progress.advance(60, "subset");

    let encoded = encode(&sfnt, format.container())
        .with_context(|| format!("failed to encode {format}"))?;
    FontFile::new(output).write(&encoded)?;
    progress.advance(100, "saved");
    progress.finish();

    info!("{} -> {} ({} bytes)", input.display(), output.display(), encoded.len());
    Ok(output.to_path_buf())
}

/// True when the outline kind does not match the sfnt extension.
fn outline_mismatch(outlines: Flavor, format: TargetFormat) -> bool {
    matches!(
        (outlines, format),
        (Flavor::Cff, TargetFormat::Ttf) | (Flavor::TrueType, TargetFormat::Otf)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{NoProgress, testing::Recorder};

    #[test]
    fn mismatch_only_for_plain_sfnt_targets() {
        assert!(outline_mismatch(Flavor::Cff, TargetFormat::Ttf));
        assert!(outline_mismatch(Flavor::TrueType, TargetFormat::Otf));
        assert!(!outline_mismatch(Flavor::Cff, TargetFormat::Otf));
        assert!(!outline_mismatch(Flavor::Cff, TargetFormat::Woff2));
        assert!(!outline_mismatch(Flavor::TrueType, TargetFormat::Woff));
    }

    #[test]
    fn reports_milestones_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.ttf");
        std::fs::write(&input, font_test_data::VAZIRMATN_VAR).unwrap();
        let output = dir.path().join("out.woff");

        let mut progress = Recorder::default();
        convert_font(&input, &output, TargetFormat::Woff, None, &mut progress).unwrap();
        assert_eq!(
            progress.events,
            vec!["start converting to WOFF", "30 parsed", "60 subset", "100 saved", "finish"]
        );
        assert_eq!(&std::fs::read(&output).unwrap()[..4], b"wOFF");
    }

    #[test]
    fn non_font_input_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("fake.ttf");
        std::fs::write(&input, b"this is not a font").unwrap();
        let output = dir.path().join("out.ttf");

        let err = convert_font(&input, &output, TargetFormat::Ttf, None, &mut NoProgress).unwrap_err();
        assert!(err.to_string().contains("unsupported font file"));
        assert!(!output.exists());
    }
}
