// touchline-core/src/infrastructure/fs.rs

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::error::TouchlineError;
use crate::infrastructure::error::InfrastructureError;

/// Writes `content` to `path` through a temporary sibling file that is then
/// renamed over the target, so the target is either the old file or the new
/// one. Missing parent directories are created.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    // Same directory as the target so the rename never crosses filesystems
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;
    Ok(())
}

/// Joins a slash-separated object key under `root`, refusing anything that
/// could land outside of it (absolute keys, `..`, drive prefixes).
pub fn safe_join(root: &Path, key: &str) -> Result<PathBuf, TouchlineError> {
    let relative = Path::new(key);
    if key.is_empty() {
        return Err(TouchlineError::UnsafePath("empty key".to_string()));
    }
    let mut out = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(TouchlineError::UnsafePath(key.to_string()));
            }
        }
    }
    Ok(out)
}
