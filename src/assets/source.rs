use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{BlendError, BlendResult};

/// Opaque locator for one flag image.
///
/// The string is interpreted by the [`SourceResolver`] the compositor runs
/// against: a repository-relative path for [`FsResolver`], a bare name for
/// [`MemoryResolver`]. Immutable and owned by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ImageSource(String);

impl ImageSource {
    /// Wrap a locator string.
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// The locator string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Boundary through which the hosting environment supplies raw image bytes.
///
/// A failed resolution surfaces as an `Err` per source; the compositor records
/// it and continues with the remaining sources rather than aborting.
pub trait SourceResolver: Send + Sync {
    /// Return the raw encoded bytes for `source`.
    fn resolve(&self, source: &ImageSource) -> BlendResult<Vec<u8>>;
}

/// Filesystem resolver rooted at a directory of flag assets.
#[derive(Clone, Debug)]
pub struct FsResolver {
    root: PathBuf,
}

impl FsResolver {
    /// Build a resolver reading sources relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory used when resolving relative source paths.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceResolver for FsResolver {
    fn resolve(&self, source: &ImageSource) -> BlendResult<Vec<u8>> {
        let norm = normalize_rel_path(source.as_str())?;
        let path = self.root.join(Path::new(&norm));
        std::fs::read(&path)
            .with_context(|| format!("read flag bytes from '{}'", path.display()))
            .map_err(BlendError::from)
    }
}

/// In-memory resolver mapping source names to encoded bytes.
///
/// Used for embedded flag sets and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryResolver {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryResolver {
    /// Build an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(name.into(), bytes);
    }
}

impl SourceResolver for MemoryResolver {
    fn resolve(&self, source: &ImageSource) -> BlendResult<Vec<u8>> {
        self.entries
            .get(source.as_str())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown source '{source}'").into())
    }
}

/// Normalize and validate resolver-relative source paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects
/// absolute paths or parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> BlendResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(anyhow::anyhow!("source paths must be relative").into());
    }
    if s.is_empty() {
        return Err(anyhow::anyhow!("source path must be non-empty").into());
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(anyhow::anyhow!("source paths must not contain '..'").into());
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(anyhow::anyhow!("source path must contain a file name").into());
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
