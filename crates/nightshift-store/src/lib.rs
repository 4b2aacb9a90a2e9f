use nightshift_core::Result;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// `report.md` → `report.json`.
pub fn sidecar_path(markdown_path: &Path) -> PathBuf {
    markdown_path.with_extension("json")
}

/// Where a saved report landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub markdown: PathBuf,
    pub json: PathBuf,
}

/// Write a Markdown report and its pretty-printed JSON sidecar.
///
/// The JSON is serialized before anything touches disk, so a serialization
/// failure leaves no files behind.
pub fn save_report<T: Serialize + ?Sized>(
    markdown_path: &Path,
    markdown: &str,
    report: &T,
) -> Result<ReportPaths> {
    let json = serde_json::to_string_pretty(report)?;
    let json_path = sidecar_path(markdown_path);
    write_atomic(markdown_path, markdown.as_bytes())?;
    write_atomic(&json_path, json.as_bytes())?;
    debug!(
        markdown = %markdown_path.display(),
        json = %json_path.display(),
        "report saved"
    );
    Ok(ReportPaths {
        markdown: markdown_path.to_path_buf(),
        json: json_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_creates_file_and_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("reports").join("nested").join("test.txt");
        write_atomic(&path, b"hello world").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");
    }

    #[test]
    fn write_atomic_replaces_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.txt");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        // no temp files left behind
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn sidecar_shares_base_name() {
        assert_eq!(
            sidecar_path(Path::new("out/nightshift-report.md")),
            PathBuf::from("out/nightshift-report.json")
        );
    }

    #[test]
    fn save_report_writes_both_files() {
        let tmp = tempfile::tempdir().unwrap();
        let md = tmp.path().join("report.md");
        let paths = save_report(&md, "# Report\n", &serde_json::json!({"total_sessions": 2}))
            .unwrap();
        assert_eq!(fs::read_to_string(&paths.markdown).unwrap(), "# Report\n");
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.json).unwrap()).unwrap();
        assert_eq!(json["total_sessions"], 2);
    }
}
