//! Atomic file writes shared by `rank --output` and `export`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize JSON for {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> WriteError + '_ {
    move |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
    }
    Ok(())
}

fn open_atomic(path: &Path) -> Result<AtomicWriteFile, WriteError> {
    ensure_parent_dir(path)?;
    AtomicWriteFile::open(path).map_err(io_error(path))
}

/// Write `value` as four-space indented JSON, atomically.
///
/// The parent directory is created if missing. Non-ASCII text is written
/// as UTF-8 rather than escaped.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), WriteError> {
    let mut file = open_atomic(path)?;
    {
        let mut serializer =
            Serializer::with_formatter(&mut file, PrettyFormatter::with_indent(b"    "));
        value
            .serialize(&mut serializer)
            .map_err(|source| WriteError::Json {
                path: path.to_path_buf(),
                source,
            })?;
    }
    file.write_all(b"\n").map_err(io_error(path))?;
    file.commit().map_err(io_error(path))
}

/// Write rendered text atomically, creating the parent directory if missing.
pub fn write_text_atomic(path: &Path, contents: &str) -> Result<(), WriteError> {
    let mut file = open_atomic(path)?;
    file.write_all(contents.as_bytes()).map_err(io_error(path))?;
    file.commit().map_err(io_error(path))
}
