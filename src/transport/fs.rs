use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;

use crate::constants::output::{EXTENSION, SUFFIX_SEPARATOR};
use crate::errors::ImportError;

/// Row type that can be written as one line of an output table.
pub trait TableRow: Serialize {
    /// Header names, in serialization order.
    const COLUMNS: &'static [&'static str];
}

/// Read a local dataset into memory.
pub fn read_text(dataset: &str, path: &Path) -> Result<String, ImportError> {
    fs::read_to_string(path).map_err(|err| ImportError::DatasetUnavailable {
        dataset: dataset.to_string(),
        reason: format!("failed reading {}: {err}", path.display()),
    })
}

/// Derive a sibling output path `<dir>/<stem>__<suffix>.csv` from a base path.
///
/// The base path's own extension is discarded, so `out/run.csv` with suffix
/// `links` yields `out/run__links.csv`.
pub fn suffixed_output_path(base: &Path, suffix: &str) -> Result<PathBuf, ImportError> {
    let stem = base
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            ImportError::Configuration(format!(
                "output path '{}' has no usable file stem",
                base.display()
            ))
        })?;
    let file_name = format!("{stem}{SUFFIX_SEPARATOR}{suffix}.{EXTENSION}");
    Ok(match base.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    })
}

/// Write `rows` as a CSV file with a header line, replacing any existing file.
///
/// The header is written even when `rows` is empty.
pub fn write_table<T: TableRow>(path: &Path, rows: &[T]) -> Result<(), ImportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(T::COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Serialize)]
    struct Pair {
        left: String,
        right: Option<String>,
    }

    impl TableRow for Pair {
        const COLUMNS: &'static [&'static str] = &["left", "right"];
    }

    #[test]
    fn suffixed_path_replaces_extension_and_keeps_directory() {
        let path = suffixed_output_path(Path::new("out/run.csv"), "links").unwrap();
        assert_eq!(path, PathBuf::from("out/run__links.csv"));
        let bare = suffixed_output_path(Path::new("run"), "missing").unwrap();
        assert_eq!(bare, PathBuf::from("run__missing.csv"));
    }

    #[test]
    fn suffixed_path_rejects_stemless_paths() {
        assert!(matches!(
            suffixed_output_path(Path::new("/"), "links"),
            Err(ImportError::Configuration(_))
        ));
    }

    #[test]
    fn write_table_emits_header_for_empty_rows() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("empty.csv");
        write_table::<Pair>(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "left,right\n");
    }

    #[test]
    fn write_table_renders_none_as_empty_cell() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pairs.csv");
        let rows = vec![
            Pair {
                left: "a".into(),
                right: None,
            },
            Pair {
                left: "b, c".into(),
                right: Some("d".into()),
            },
        ];
        write_table(&path, &rows).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "left,right\na,\n\"b, c\",d\n"
        );
    }

    #[test]
    fn read_text_reports_missing_files_as_unavailable() {
        let temp = tempdir().unwrap();
        let err = read_text("registry", &temp.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, ImportError::DatasetUnavailable { .. }));
    }
}
