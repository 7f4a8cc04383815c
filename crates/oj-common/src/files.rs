//! JSON file I/O and directory helpers.
//!
//! Thin wrappers over `std::fs` and `serde_json`. None of them retry or
//! recover: file-system errors surface as [`Error::Io`] (or a plain
//! `std::io::Error` for [`clear_directory`]) and parse errors as
//! [`Error::Json`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Read a text file, returning `None` when it does not exist.
pub fn read_text(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Read a file and parse it as an arbitrary JSON value.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    read_json_as(path)
}

/// Read a file and deserialize it into `T`.
pub fn read_json_as<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write `data` as JSON with four-space indentation.
///
/// Non-ASCII text is written as UTF-8, not `\u` escapes. The content goes
/// to `<name>.tmp` next to `path` and is renamed over it, so readers see
/// either the old file or the complete new one.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser)?;
    buf.push(b'\n');

    let tmp_path = temp_sibling(path);
    let written = write_then_rename(&tmp_path, path, &buf);
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written.map_err(Error::Io)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_then_rename(tmp_path: &Path, path: &Path, buf: &[u8]) -> io::Result<()> {
    {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(tmp_path)?;
        file.write_all(buf)?;
        file.flush()?;
        file.sync_all()?;
    }
    fs::rename(tmp_path, path)
}

/// Remove every file and subdirectory inside `dir`, keeping `dir` itself.
///
/// Symbolic links are unlinked, never followed.
pub fn clear_directory(dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Render a JSON value as text.
///
/// Strings are returned without quotes. Everything else is single-line
/// JSON with `", "` and `": "` separators, e.g. `{"k": "v"}`. Non-ASCII
/// text stays UTF-8 rather than `\u` escapes, as in [`write_json`].
pub fn dumps(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => {
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
            if other.serialize(&mut ser).is_err() {
                return other.to_string();
            }
            String::from_utf8(buf).unwrap_or_else(|_| other.to_string())
        }
    }
}

/// Single-line JSON with a space after each separator.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}
