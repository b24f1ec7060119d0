//! Text and JSON file adapter
//!
//! All locale I/O goes through this module so that callers can tell a
//! missing file apart from an unreadable or malformed one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;

use crate::LocaleDocument;
use crate::error::{Result, TranslateError};

/// Path of the locale file for `code` inside `locales_dir`
pub fn locale_file_path(locales_dir: &Path, code: &str) -> PathBuf {
    locales_dir.join(format!("{}.json", code))
}

/// Read a UTF-8 text file
///
/// # Errors
/// - `FileNotFound` if nothing exists at `path`
/// - `FileRead` for any other I/O failure
pub async fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => TranslateError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => TranslateError::FileRead {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Parse text as a locale document. The root must be a JSON object.
pub fn parse_locale_document(content: &str) -> std::result::Result<LocaleDocument, String> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("root must be an object, found {}", json_kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

/// Read and parse a JSON locale file
///
/// # Errors
/// - `FileNotFound` if the file does not exist
/// - `FileRead` if it cannot be read
/// - `FileParse` if the content is not a JSON object
pub async fn read_json_file(path: &Path) -> Result<LocaleDocument> {
    let content = read_text_file(path).await?;
    parse_locale_document(&content).map_err(|message| TranslateError::FileParse {
        path: path.to_path_buf(),
        message,
    })
}

/// Write a locale document, pretty-printed with 2-space indentation
///
/// Parent directories are created as needed. The content goes to a sibling
/// `.tmp` file first and is renamed over the target, so readers never see a
/// partially written file.
pub async fn write_json_file(path: &Path, doc: &LocaleDocument) -> Result<()> {
    let write_err = |source: std::io::Error| TranslateError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let json = serde_json::to_string_pretty(doc)
        .map_err(|e| write_err(std::io::Error::new(ErrorKind::InvalidData, e)))?;

    let temp_path = path.with_extension("json.tmp");
    let persisted = async {
        fs::write(&temp_path, json).await?;
        fs::rename(&temp_path, path).await
    }
    .await;

    if let Err(e) = persisted {
        let _ = fs::remove_file(&temp_path).await;
        return Err(write_err(e));
    }

    Ok(())
}

/// List the names of the entries in a directory
pub async fn list_directory_contents(dir: &Path) -> Result<Vec<String>> {
    let dir_err = |e: std::io::Error| match e.kind() {
        ErrorKind::NotFound => TranslateError::FileNotFound {
            path: dir.to_path_buf(),
        },
        _ => TranslateError::FileRead {
            path: dir.to_path_buf(),
            source: e,
        },
    };

    let mut entries = fs::read_dir(dir).await.map_err(dir_err)?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(dir_err)? {
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Find every target locale in `locales_dir`
///
/// Returns the stems of all `*.json` entries except `<source_locale>.json`,
/// sorted so that runs are reproducible.
pub async fn discover_target_locales(locales_dir: &Path, source_locale: &str) -> Result<Vec<String>> {
    let source_file = format!("{}.json", source_locale);
    let mut codes: Vec<String> = list_directory_contents(locales_dir)
        .await?
        .into_iter()
        .filter(|name| name != &source_file)
        .filter_map(|name| name.strip_suffix(".json").map(str::to_string))
        .filter(|code| !code.is_empty())
        .collect();
    codes.sort();
    Ok(codes)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
