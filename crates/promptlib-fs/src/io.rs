//! Filesystem operations used by setup and reset
//!
//! Every function maps `std::io::Error` into [`Error::Io`] carrying the path
//! that failed, so callers can log something actionable.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;
use walkdir::WalkDir;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Writes to a temp file in the same directory, then renames over the target.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Create a directory and all of its parents if missing.
pub fn ensure_dir(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Remove a file or a directory tree.
///
/// Returns `false` when nothing existed at `path`, which is not an error:
/// removal is used to undo additions that may already be gone.
pub fn remove_path(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    let metadata = match fs::symlink_metadata(&native_path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::io(&native_path, e)),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))?;
    } else {
        fs::remove_file(&native_path).map_err(|e| Error::io(&native_path, e))?;
    }

    Ok(true)
}

/// Recursively copy `src` into `dst`, overwriting files that already exist.
///
/// Files present in `dst` but not in `src` are left alone. Symlinks are
/// skipped. Returns the number of files copied.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Err(Error::PathNotFound {
            path: src.to_path_buf(),
        });
    }

    fs::create_dir_all(dst).map_err(|e| Error::io(dst, e))?;

    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| Error::Walk {
            path: src.to_path_buf(),
            message: e.to_string(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::Walk {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
        let target = dst.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else if file_type.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
            copied += 1;
        } else {
            tracing::warn!(path = %entry.path().display(), "Skipping non-regular file during copy");
        }
    }

    Ok(copied)
}

/// Make sure every line in `lines` appears in the text file at `path`.
///
/// A missing file is created with `header` followed by all lines. An existing
/// file only receives the lines it lacks (compared after trimming), appended
/// under `header`. Returns the number of lines written.
pub fn ensure_lines(path: &NormalizedPath, header: &str, lines: &[&str]) -> Result<usize> {
    if !path.exists() {
        let mut content = String::new();
        content.push_str(header);
        content.push('\n');
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        write_text(path, &content)?;
        return Ok(lines.len());
    }

    let existing = read_text(path)?;
    let present: Vec<&str> = existing.lines().map(str::trim).collect();
    let missing: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| !present.contains(&line.trim()))
        .collect();

    if missing.is_empty() {
        return Ok(0);
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push('\n');
    content.push_str(header);
    content.push('\n');
    for line in &missing {
        content.push_str(line);
        content.push('\n');
    }
    write_text(path, &content)?;

    Ok(missing.len())
}

/// Resolve a user-supplied directory to an absolute, canonical path.
///
/// Uses `dunce` so Windows paths do not come back in `\\?\` form.
pub fn canonicalize_existing(path: &Path) -> Result<std::path::PathBuf> {
    dunce::canonicalize(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::io(path, e)
        }
    })
}
