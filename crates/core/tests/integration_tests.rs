use std::{
    fs::{create_dir_all, read, write},
    path::{Path, PathBuf},
};

use read_fonts::{FontRef, TableProvider, types::Tag};
use tempfile::TempDir;
use typeforge_core::{
    ConvertSession, FontJob, InstanceSession, MergeBackend, MergeSession, NoProgress, Report,
    SessionState, TargetFormat, ValidationError, WeightSelection, execute,
};

fn write_fixture(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    write(&path, data).unwrap();
    path
}

fn table_tags(data: &[u8]) -> Vec<Tag> {
    let font = FontRef::new(data).unwrap();
    let mut tags: Vec<_> = font.table_directory.table_records().iter().map(|r| r.tag()).collect();
    tags.sort();
    tags
}

fn num_glyphs(data: &[u8]) -> u16 {
    FontRef::new(data).unwrap().maxp().unwrap().num_glyphs()
}

fn convert(input: &Path, output: &Path, format: TargetFormat, subset: Option<&str>) -> Report {
    let job =
        FontJob::convert(input, format, subset.map(str::to_owned), Some(output.to_path_buf()))
            .unwrap();
    execute(&job, &mut NoProgress).unwrap()
}

#[test]
fn woff_round_trip_preserves_tables_and_glyphs() {
    let dir = TempDir::new().unwrap();
    let source = write_fixture(&dir, "Vazirmatn.ttf", font_test_data::VAZIRMATN_VAR);
    let woff = dir.path().join("Vazirmatn.woff");
    let back = dir.path().join("Vazirmatn-back.ttf");

    convert(&source, &woff, TargetFormat::Woff, None);
    assert_eq!(&read(&woff).unwrap()[..4], b"wOFF");
    convert(&woff, &back, TargetFormat::Ttf, None);

    let original = font_test_data::VAZIRMATN_VAR;
    let restored = read(&back).unwrap();
    assert_eq!(table_tags(&restored), table_tags(original));
    assert_eq!(num_glyphs(&restored), num_glyphs(original));
}

#[cfg(feature = "woff2")]
#[test]
fn woff2_round_trip_preserves_tables_and_glyphs() {
    let dir = TempDir::new().unwrap();
    let source = write_fixture(&dir, "Vazirmatn.ttf", font_test_data::VAZIRMATN_VAR);
    let woff2 = dir.path().join("Vazirmatn.woff2");
    let back = dir.path().join("Vazirmatn-back.otf");

    convert(&source, &woff2, TargetFormat::Woff2, None);
    assert_eq!(&read(&woff2).unwrap()[..4], b"wOF2");
    convert(&woff2, &back, TargetFormat::Otf, None);

    let original = font_test_data::VAZIRMATN_VAR;
    let restored = read(&back).unwrap();
    assert_eq!(table_tags(&restored), table_tags(original));
    assert_eq!(num_glyphs(&restored), num_glyphs(original));
}

#[test]
fn empty_subset_keeps_only_notdef() {
    let dir = TempDir::new().unwrap();
    let source = write_fixture(&dir, "Vazirmatn.ttf", font_test_data::VAZIRMATN_VAR);
    let output = dir.path().join("subset.ttf");

    convert(&source, &output, TargetFormat::Ttf, Some("\n\n"));

    assert_eq!(num_glyphs(&read(&output).unwrap()), 1);
}

#[test]
fn convert_session_writes_timestamped_default() {
    let dir = TempDir::new().unwrap();
    let source = write_fixture(&dir, "Vazirmatn.ttf", font_test_data::VAZIRMATN_VAR);

    let mut session = ConvertSession::new();
    session.add_paths([&source]).unwrap();
    session.format = TargetFormat::Woff;
    let report = session.run(&mut NoProgress).unwrap();
    assert_eq!(session.state(), SessionState::Reported);

    let Report::Converted { output } = report else { panic!("expected a conversion report") };
    assert_eq!(output.parent(), Some(dir.path()));
    let name = output.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("Vazirmatn_"), "{name}");
    assert!(name.ends_with(".woff"), "{name}");
    // stem, underscore, 12 timestamp digits, extension
    assert_eq!(name.len(), "Vazirmatn_".len() + 12 + ".woff".len());
}

#[test]
fn instance_writes_one_file_per_weight() {
    let dir = TempDir::new().unwrap();
    let source = write_fixture(&dir, "Vazirmatn.ttf", font_test_data::VAZIRMATN_VAR);
    let out_dir = dir.path().join("static");

    let mut session = InstanceSession::new();
    session.add_paths([&source]).unwrap();
    session.output_dir = Some(out_dir.clone());
    for weight in ["700", "100", "400"] {
        session.weights_mut().add_text(weight).unwrap();
    }
    let report = session.run(&mut NoProgress).unwrap();
    assert!(report.is_success(), "{report}");

    let Report::Instanced(outcomes) = report else { panic!("expected an instancing report") };
    let weights: Vec<_> = outcomes.iter().map(|o| o.weight).collect();
    assert_eq!(weights, vec![100, 400, 700]);

    for outcome in &outcomes {
        let path = outcome.result.as_ref().unwrap();
        assert_eq!(*path, out_dir.join(format!("Vazirmatn-{}.ttf", outcome.weight)));
        let data = read(path).unwrap();
        let font = FontRef::new(&data).unwrap();
        assert!(font.fvar().is_err());
        assert_eq!(font.os2().unwrap().us_weight_class(), outcome.weight);
    }
}

#[test]
fn failed_weight_does_not_stop_the_others() {
    let dir = TempDir::new().unwrap();
    let source = write_fixture(&dir, "Vazirmatn.ttf", font_test_data::VAZIRMATN_VAR);
    let out_dir = dir.path().join("static");
    // a directory in the way of the 400 output
    create_dir_all(out_dir.join("Vazirmatn-400.ttf")).unwrap();

    let mut weights = WeightSelection::new();
    for weight in [300, 400, 500] {
        weights.add(weight).unwrap();
    }
    let job = FontJob::instance(&source, &weights, Some(out_dir.clone())).unwrap();
    let report = execute(&job, &mut NoProgress).unwrap();
    assert_eq!(report.failures(), 1);

    let Report::Instanced(outcomes) = report else { panic!("expected an instancing report") };
    assert!(outcomes[0].is_ok());
    assert!(!outcomes[1].is_ok());
    assert!(outcomes[2].is_ok());
    assert!(out_dir.join("Vazirmatn-500.ttf").is_file());
}

#[test]
fn static_font_is_rejected_before_instancing() {
    let dir = TempDir::new().unwrap();
    let source = write_fixture(&dir, "Static.ttf", font_test_data::SIMPLE_GLYF);

    let err = InstanceSession::new().add_paths([&source]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::NotVariableFont(source))
    );
}

#[test]
fn library_merge_writes_combined_font() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(&dir, "a.ttf", font_test_data::VAZIRMATN_VAR);
    let b = write_fixture(&dir, "b.ttf", font_test_data::VAZIRMATN_VAR);
    write_fixture(&dir, "notes.txt", b"not a font");
    let output = dir.path().join("out/merged.ttf");

    let mut session = MergeSession::new(MergeBackend::Library);
    assert_eq!(session.add_paths([dir.path()]).unwrap(), 2);
    let inputs: Vec<_> = session.inputs().map(Path::to_path_buf).collect();
    assert_eq!(inputs, vec![a, b]);
    session.output = Some(output.clone());

    let report = session.run(&mut NoProgress).unwrap();
    assert!(matches!(report, Report::Merged { output: ref path } if *path == output));

    let merged = read(&output).unwrap();
    let single = num_glyphs(font_test_data::VAZIRMATN_VAR);
    assert_eq!(num_glyphs(&merged), single * 2);
}

#[test]
fn library_merge_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(&dir, "a.ttf", font_test_data::VAZIRMATN_VAR);
    let b = write_fixture(&dir, "b.ttf", b"garbage");
    let output = dir.path().join("merged.ttf");

    let job = FontJob::merge(vec![a, b], MergeBackend::Library, Some(output.clone())).unwrap();
    let err = execute(&job, &mut NoProgress).unwrap_err();
    assert!(err.to_string().contains("failed to merge fonts"), "{err:#}");
    assert!(!output.exists());
}

#[cfg(unix)]
#[test]
fn external_merge_status_decides_the_outcome() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_fixture(&dir, "a.ttf", font_test_data::VAZIRMATN_VAR),
        write_fixture(&dir, "b.ttf", font_test_data::VAZIRMATN_VAR),
    ];
    let output = dir.path().join("merged.ttf");

    let ok = MergeBackend::External { program: "true".into() };
    let job = FontJob::merge(inputs.clone(), ok, Some(output.clone())).unwrap();
    assert!(execute(&job, &mut NoProgress).unwrap().is_success());

    let failing = MergeBackend::External { program: "false".into() };
    let job = FontJob::merge(inputs, failing, Some(output)).unwrap();
    let err = execute(&job, &mut NoProgress).unwrap_err();
    assert!(err.to_string().starts_with("false exited with"), "{err:#}");
}

#[test]
fn missing_external_merger_is_a_launch_error() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![dir.path().join("a.ttf"), dir.path().join("b.ttf")];
    let backend = MergeBackend::External { program: "typeforge-missing-merger".into() };
    let job = FontJob::merge(inputs, backend, Some(dir.path().join("m.ttf"))).unwrap();

    let err = execute(&job, &mut NoProgress).unwrap_err();
    assert_eq!(err.to_string(), "failed to launch typeforge-missing-merger");
}
