// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

//! Content source: loads the chapter archive from a JSON file into an
//! in-memory `Archive`. The file is an ordered array of chapter objects
//! in canonical (chronological) order; `SourceIndex` identity is assigned
//! by file position at load and never changes afterwards. There is no
//! pagination and no lazy loading; the whole archive is resident.

use anyhow::{Context, Result, anyhow, bail};
use chronicle_app::{Archive, NewChapter};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "chronicle";
pub const ARCHIVE_FILE_NAME: &str = "archive.json";

/// Parses archive JSON: an array of chapter objects whose fields are all
/// optional. Order in the file is canonical order.
pub fn parse_archive(raw: &str) -> Result<Archive> {
    let drafts: Vec<NewChapter> =
        serde_json::from_str(raw).context("parse archive JSON (expected an array of chapters)")?;
    Ok(Archive::new(drafts))
}

pub fn load_archive(path: &Path) -> Result<Archive> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read archive file {}", path.display()))?;
    parse_archive(&raw).with_context(|| format!("load archive {}", path.display()))
}

pub fn default_archive_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("CHRONICLE_ARCHIVE_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set CHRONICLE_ARCHIVE_PATH to the archive file")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join(ARCHIVE_FILE_NAME))
}

pub fn validate_archive_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("archive path must not be empty");
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "archive path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("archive path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "archive path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{default_archive_path, load_archive, parse_archive, validate_archive_path};
    use anyhow::Result;
    use chronicle_app::SourceIndex;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn parse_assigns_source_indices_in_file_order() -> Result<()> {
        let archive = parse_archive(
            r#"[
                {"title": "first", "written_date": "2024-01-01"},
                {"title": "second", "text": "ChatGPT: hello"},
                {}
            ]"#,
        )?;

        assert_eq!(archive.len(), 3);
        let first = archive.get(SourceIndex::new(0)).expect("chapter 0");
        assert_eq!(first.title.as_deref(), Some("first"));
        let third = archive.get(SourceIndex::new(2)).expect("chapter 2");
        assert_eq!(third.title, None);
        assert_eq!(third.text, None);
        Ok(())
    }

    #[test]
    fn parse_rejects_non_array_documents() {
        let error = parse_archive("{\"title\": \"x\"}").expect_err("object should fail");
        assert!(error.to_string().contains("array of chapters"));
    }

    #[test]
    fn load_round_trips_through_a_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("archive.json");
        std::fs::write(&path, r#"[{"title": "only", "prologue": "a summary"}]"#)?;

        let archive = load_archive(&path)?;
        assert_eq!(archive.len(), 1);
        assert_eq!(
            archive.chapters()[0].prologue.as_deref(),
            Some("a summary")
        );
        Ok(())
    }

    #[test]
    fn load_demo_archive_from_testkit() -> Result<()> {
        let archive = parse_archive(&chronicle_testkit::demo_archive_json())?;
        assert!(archive.len() >= chronicle_testkit::DEMO_CHAPTER_COUNT);
        Ok(())
    }

    #[test]
    fn missing_file_reports_the_path() {
        let error = load_archive(&PathBuf::from("/definitely/not/here.json"))
            .expect_err("missing file should fail");
        assert!(error.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn malformed_json_reports_a_parse_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("archive.json");
        std::fs::write(&path, "{{not json")?;

        let error = load_archive(&path).expect_err("malformed archive should fail");
        assert!(format!("{error:#}").contains("parse archive JSON"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-archive.json");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("CHRONICLE_ARCHIVE_PATH", &override_path);
        }
        let resolved = default_archive_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("CHRONICLE_ARCHIVE_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_ends_with_archive_json_when_no_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("CHRONICLE_ARCHIVE_PATH");
        }
        let path = default_archive_path()?;
        assert!(path.ends_with("archive.json"), "got {}", path.display());
        Ok(())
    }

    #[test]
    fn path_validation_rejects_uri_shapes() {
        assert!(validate_archive_path("").is_err());
        assert!(validate_archive_path("https://evil.example/archive.json").is_err());
        assert!(validate_archive_path("file:archive.json").is_err());
        assert!(validate_archive_path("/data/archive.json?mode=ro").is_err());
        assert!(validate_archive_path("/data/archive.json").is_ok());
        assert!(validate_archive_path("relative/archive.json").is_ok());
    }
}
