//! Dataset file loading.
//!
//! Two formats are supported, dispatched on file extension before any row
//! is read: CSV with a header row, and JSONL (newline-delimited JSON
//! objects). Both must provide `text` and `label` columns; `source` and
//! `lang` columns are optional. Rows with a missing or blank `text` or
//! `label` are dropped; scalar values are coerced to strings.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::ReaderBuilder;
use serde_json::Value;

use crate::dataset::types::{Dataset, LabeledSample, Language, SampleSource};
use crate::error::{IntentioError, Result};

/// Load a dataset file, dispatching on its extension.
///
/// Rows without an explicit `source` column are tagged `default_source`.
/// Unknown extensions fail with [`IntentioError::UnsupportedFormat`] without
/// opening the file.
pub fn load_file(path: &Path, default_source: SampleSource) -> Result<Dataset> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => load_csv(path, default_source),
        "jsonl" | "json" => load_jsonl(path, default_source),
        other => Err(IntentioError::unsupported_format(format!(
            ".{other} (expected .csv, .jsonl or .json)"
        ))),
    }
}

/// Load a CSV dataset with a header row.
pub fn load_csv(path: &Path, default_source: SampleSource) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let text_idx = column("text")
        .ok_or_else(|| IntentioError::schema("dataset must contain 'text' and 'label' columns"))?;
    let label_idx = column("label")
        .ok_or_else(|| IntentioError::schema("dataset must contain 'text' and 'label' columns"))?;
    let source_idx = column("source");
    let lang_idx = column("lang");

    let mut dataset = Dataset::new();
    for record in reader.records() {
        let record = record?;
        let text = record.get(text_idx).unwrap_or("").trim();
        let label = record.get(label_idx).unwrap_or("").trim();
        if text.is_empty() || label.is_empty() {
            continue;
        }

        let source = source_idx
            .and_then(|i| record.get(i))
            .and_then(SampleSource::parse)
            .unwrap_or(default_source);
        let lang = lang_idx
            .and_then(|i| record.get(i))
            .and_then(Language::parse)
            .unwrap_or_else(|| Language::detect(text));

        dataset.push(LabeledSample {
            text: text.to_string(),
            label: label.to_string(),
            source,
            lang,
        });
    }

    Ok(dataset)
}

/// Load a JSONL dataset: one JSON object per non-blank line.
///
/// The column check mirrors tabular semantics: if no row in the file
/// carries a `text` (or `label`) key, the dataset as a whole is missing
/// that column and loading fails with a schema error. Individual rows
/// missing either value are dropped.
pub fn load_jsonl(path: &Path, default_source: SampleSource) -> Result<Dataset> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut rows: Vec<Value> = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line)?;
        if !value.is_object() {
            return Err(IntentioError::schema(
                "JSONL rows must be objects with 'text' and 'label' keys",
            ));
        }
        rows.push(value);
    }

    let has_column = |name: &str| rows.iter().any(|row| row.get(name).is_some());
    if !rows.is_empty() && (!has_column("text") || !has_column("label")) {
        return Err(IntentioError::schema(
            "dataset must contain 'text' and 'label' columns",
        ));
    }

    let mut dataset = Dataset::new();
    for row in &rows {
        let text = match scalar_to_string(row.get("text")) {
            Some(t) => t,
            None => continue,
        };
        let label = match scalar_to_string(row.get("label")) {
            Some(l) => l,
            None => continue,
        };

        let source = row
            .get("source")
            .and_then(|v| v.as_str())
            .and_then(SampleSource::parse)
            .unwrap_or(default_source);
        let lang = row
            .get("lang")
            .and_then(|v| v.as_str())
            .and_then(Language::parse)
            .unwrap_or_else(|| Language::detect(&text));

        dataset.push(LabeledSample {
            text,
            label,
            source,
            lang,
        });
    }

    Ok(dataset)
}

/// Coerce a scalar JSON value to a non-blank string.
fn scalar_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.txt", "text,label\nhello,概念解释\n");
        let err = load_file(&path, SampleSource::UserProvided).unwrap_err();
        assert!(matches!(err, IntentioError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_csv_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            "text,label,source,lang\n什么是交叉熵,概念解释,synthetic,zh\nshow an example,示例代码,,\n",
        );
        let dataset = load_file(&path, SampleSource::UserProvided).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.samples()[0].source, SampleSource::Synthetic);
        assert_eq!(dataset.samples()[1].source, SampleSource::UserProvided);
        assert_eq!(dataset.samples()[1].lang, Language::En);
    }

    #[test]
    fn test_csv_missing_label_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.csv", "text,category\nhello,misc\n");
        let err = load_file(&path, SampleSource::UserProvided).unwrap_err();
        assert!(matches!(err, IntentioError::Schema(_)));
    }

    #[test]
    fn test_csv_drops_incomplete_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            "text,label\nhello,概念解释\n,概念解释\nworld,\n",
        );
        let dataset = load_file(&path, SampleSource::UserProvided).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.jsonl",
            "{\"text\": \"hello\", \"label\": \"概念解释\"}\n\n{\"text\": \"推荐资料\", \"label\": \"资料推荐\", \"lang\": \"zh\"}\n",
        );
        let dataset = load_file(&path, SampleSource::UserProvided).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.samples()[0].lang, Language::En);
        assert_eq!(dataset.samples()[1].lang, Language::Zh);
    }

    #[test]
    fn test_jsonl_missing_label_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "data.jsonl",
            "{\"text\": \"a\"}\n{\"text\": \"b\"}\n",
        );
        let err = load_file(&path, SampleSource::UserProvided).unwrap_err();
        assert!(matches!(err, IntentioError::Schema(_)));
    }

    #[test]
    fn test_jsonl_coerces_scalars() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.jsonl", "{\"text\": 42, \"label\": \"概念解释\"}\n");
        let dataset = load_file(&path, SampleSource::UserProvided).unwrap();
        assert_eq!(dataset.samples()[0].text, "42");
    }
}
