use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use intentio::dataset::assembler::{AssembleOptions, assemble};
use intentio::dataset::fingerprint::short_sha;
use intentio::dataset::synthetic::SyntheticConfig;
use intentio::dataset::{SampleSource, load_file};
use intentio::error::IntentioError;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_txt_dataset_rejected_before_reading() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "dataset.txt", "text,label\nhello,概念解释\n");
    let err = load_file(&path, SampleSource::UserProvided).unwrap_err();
    assert!(matches!(err, IntentioError::UnsupportedFormat(_)));

    let options = AssembleOptions {
        user_path: Some(path),
        template_path: dir.path().join("missing.csv"),
        ..AssembleOptions::default()
    };
    let err = assemble(&options).unwrap_err();
    assert!(matches!(err, IntentioError::UnsupportedFormat(_)));
}

#[test]
fn test_missing_label_column_is_schema_error() {
    let dir = TempDir::new().unwrap();
    let csv = write_file(&dir, "bad.csv", "text,category\nhello,misc\n");
    let err = load_file(&csv, SampleSource::UserProvided).unwrap_err();
    assert!(matches!(err, IntentioError::Schema(_)));

    let jsonl = write_file(&dir, "bad.jsonl", "{\"text\": \"hello\"}\n");
    let err = load_file(&jsonl, SampleSource::UserProvided).unwrap_err();
    assert!(matches!(err, IntentioError::Schema(_)));
}

#[test]
fn test_fingerprint_deterministic_across_assemblies() {
    let dir = TempDir::new().unwrap();
    let content = "text,label\n什么是交叉熵,概念解释\nshow an example,示例代码\n推荐资料,资料推荐\n";
    let first = write_file(&dir, "first.csv", content);
    let second = write_file(&dir, "second.csv", content);

    // Identical content in identical order yields the identical
    // fingerprint even through different files.
    let make_options = |path: PathBuf| AssembleOptions {
        user_path: Some(path),
        template_path: dir.path().join("missing.csv"),
        ..AssembleOptions::default()
    };
    let (_, fp_a) = assemble(&make_options(first.clone())).unwrap();
    let (_, fp_b) = assemble(&make_options(second)).unwrap();
    let (_, fp_c) = assemble(&make_options(first)).unwrap();
    assert_eq!(fp_a, fp_b);
    assert_eq!(fp_a, fp_c);
}

#[test]
fn test_row_change_changes_fingerprint() {
    let dir = TempDir::new().unwrap();
    let base = write_file(
        &dir,
        "base.csv",
        "text,label\nrow one,概念解释\nrow two,示例代码\n",
    );
    let edited = write_file(
        &dir,
        "edited.csv",
        "text,label\nrow one edited,概念解释\nrow two,示例代码\n",
    );
    let reordered = write_file(
        &dir,
        "reordered.csv",
        "text,label\nrow two,示例代码\nrow one,概念解释\n",
    );

    let fp = |path: PathBuf| {
        let options = AssembleOptions {
            user_path: Some(path),
            template_path: dir.path().join("missing.csv"),
            ..AssembleOptions::default()
        };
        assemble(&options).unwrap().1
    };
    let base_fp = fp(base);
    assert_ne!(base_fp, fp(edited));
    assert_ne!(base_fp, fp(reordered));
}

#[test]
fn test_synthetic_fingerprint_is_autosample_form() {
    let (dataset, fp) = assemble(&AssembleOptions {
        use_synthetic: true,
        template_path: PathBuf::from("definitely-missing-template.csv"),
        synthetic: SyntheticConfig::default(),
        user_path: None,
    })
    .unwrap();
    assert_eq!(dataset.len(), 240);
    assert_eq!(fp.as_str(), short_sha("autosample-240"));
}

#[test]
fn test_jsonl_and_csv_merge_with_synthetic() {
    let dir = TempDir::new().unwrap();
    let user = write_file(
        &dir,
        "user.jsonl",
        "{\"text\": \"帮我总结要点\", \"label\": \"复习总结/要点\"}\n",
    );
    let template = write_file(&dir, "template.csv", "text,label\n模板行,资料推荐\n");

    let options = AssembleOptions {
        user_path: Some(user),
        use_synthetic: true,
        template_path: template,
        synthetic: SyntheticConfig {
            n_per_label: 2,
            ..SyntheticConfig::default()
        },
    };
    let (dataset, _) = assemble(&options).unwrap();
    assert_eq!(dataset.len(), 1 + 1 + 16);
    assert_eq!(dataset.samples()[0].source, SampleSource::UserProvided);
    assert_eq!(dataset.samples()[1].source, SampleSource::Template);
    assert!(
        dataset.samples()[2..]
            .iter()
            .all(|s| s.source == SampleSource::Synthetic)
    );
}
