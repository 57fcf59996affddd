//! File name normalization for the files the engine reads and writes.
//!
//! The client never looks inside these files. It only makes sure the
//! engine is handed an absolute path with the expected extension.

use std::io;
use std::path::{Path, PathBuf};

/// Circuit (schematic) file.
pub const CIRCUIT_EXT: &str = "nl5";
/// License file.
pub const LICENSE_EXT: &str = "nll";
/// Transient data file.
pub const TRANSIENT_DATA_EXT: &str = "nlt";
/// AC data file.
pub const AC_DATA_EXT: &str = "nlf";

const LIBRARY_EXTS: [&str; 3] = ["dll", "so", "dylib"];

/// Append `.ext` to `name` unless it already ends with it.
pub fn with_extension_once(name: &str, ext: &str) -> String {
    let suffix = format!(".{}", ext);
    if name.ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// Native library extension for the platform we were built for.
pub fn platform_library_ext() -> &'static str {
    if cfg!(target_os = "windows") {
        "dll"
    } else if cfg!(target_os = "macos") {
        "dylib"
    } else {
        "so"
    }
}

/// Library file name. A name that already carries a library extension is kept as-is.
pub fn library_file_name(name: &str) -> String {
    let has_ext = LIBRARY_EXTS
        .iter()
        .any(|ext| name.ends_with(&format!(".{}", ext)));
    if has_ext {
        name.to_string()
    } else {
        format!("{}.{}", name, platform_library_ext())
    }
}

/// Make `dir` absolute, or fall back to `default` when no directory was given.
pub fn resolve_dir(dir: Option<&Path>, default: &Path) -> io::Result<PathBuf> {
    match dir {
        Some(d) if !d.as_os_str().is_empty() => std::path::absolute(d),
        _ => Ok(default.to_path_buf()),
    }
}

/// Resolve a file the engine should read or write: `<dir>/<name>.<ext>`.
pub fn resolve_file(name: &str, ext: &str, dir: Option<&Path>, default: &Path) -> io::Result<PathBuf> {
    let dir = resolve_dir(dir, default)?;
    Ok(dir.join(with_extension_once(name, ext)))
}
