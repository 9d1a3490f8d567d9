//! Reading theorem records from an input directory.
//!
//! `*.json` files hold one record or an array of records; `*.jsonl` files hold
//! one record per non-blank line. Files are visited in name order.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use theograph_models::Theorem;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One entry read from a file, decoded or not.
#[derive(Debug)]
pub enum Record {
    Valid(Theorem),
    Invalid { name: String, error: String },
}

/// Theorem files directly inside `dir`, sorted by file name.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let io_err = |source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_theorem_file = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("json") | Some("jsonl")
        );
        if path.is_file() && is_theorem_file {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

pub fn read_file(path: &Path) -> Result<Vec<Record>, SourceError> {
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &text)
}

/// Split file contents into records. A syntax error fails the whole file;
/// a well-formed entry that is not a valid theorem becomes [`Record::Invalid`].
pub fn parse(path: &Path, text: &str) -> Result<Vec<Record>, SourceError> {
    let json_err = |source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    };

    let values: Vec<Value> = if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str::<Value>(line))
            .collect::<Result<_, _>>()
            .map_err(json_err)?
    } else {
        match serde_json::from_str(text).map_err(json_err)? {
            Value::Array(items) => items,
            single => vec![single],
        }
    };

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, value)| decode(path, index, value))
        .collect())
}

fn decode(path: &Path, index: usize, value: Value) -> Record {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}#{}", path.display(), index));

    match serde_json::from_value::<Theorem>(value) {
        Ok(theorem) => Record::Valid(theorem),
        Err(e) => Record::Invalid {
            name,
            error: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use theograph_models::TheoremKind;

    const LAGRANGE: &str = r#"{
        "name": "Lagrange's Theorem",
        "statement": "The order of a subgroup divides the order of the group",
        "subject": "Algebra",
        "domain": "Group Theory",
        "dependencies": ["Coset Partition Lemma"],
        "t_type": "Theorem"
    }"#;

    fn valid(records: &[Record]) -> Vec<&Theorem> {
        records
            .iter()
            .filter_map(|r| match r {
                Record::Valid(t) => Some(t),
                Record::Invalid { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_single_object_and_array() {
        let single = parse(Path::new("a.json"), LAGRANGE).unwrap();
        assert_eq!(valid(&single).len(), 1);

        let array = parse(Path::new("b.json"), &format!("[{}, {}]", LAGRANGE, LAGRANGE)).unwrap();
        assert_eq!(valid(&array).len(), 2);
    }

    #[test]
    fn test_jsonl_skips_blank_lines() {
        let text = concat!(
            r#"{"name": "A", "statement": "a", "subject": "S", "domain": "D", "type": "lemma"}"#,
            "\n\n",
            r#"{"name": "B", "statement": "b", "subject": "S", "domain": "D"}"#,
            "\n"
        );
        let records = parse(Path::new("c.jsonl"), text).unwrap();
        let theorems = valid(&records);

        assert_eq!(theorems.len(), 2);
        assert_eq!(theorems[0].kind, TheoremKind::Lemma);
        assert_eq!(theorems[1].kind, TheoremKind::Theorem);
        assert_eq!(theorems[1].proof, "Not provided");
    }

    #[test]
    fn test_bad_entry_is_reported_by_name() {
        let text = r#"[{"name": "Odd", "statement": "s", "subject": "S", "domain": "D", "type": "Conjecture"},
                       {"statement": "nameless"}]"#;
        let records = parse(Path::new("d.json"), text).unwrap();

        match &records[0] {
            Record::Invalid { name, error } => {
                assert_eq!(name, "Odd");
                assert!(error.contains("Conjecture"));
            }
            other => panic!("expected invalid record, got {:?}", other),
        }
        match &records[1] {
            Record::Invalid { name, .. } => assert_eq!(name, "d.json#1"),
            other => panic!("expected invalid record, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error_fails_file() {
        let err = parse(Path::new("e.json"), "{oops").unwrap_err();
        assert!(matches!(err, SourceError::Json { .. }));
    }

    #[test]
    fn test_discover_orders_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jsonl", "a.json", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = discover(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.json", "b.jsonl"]);
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lagrange.json");
        fs::write(&path, LAGRANGE).unwrap();

        let records = read_file(&path).unwrap();
        assert_eq!(valid(&records)[0].name, "Lagrange's Theorem");
    }
}
