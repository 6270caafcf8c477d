use std::{collections::HashMap, future::Future, path::PathBuf, sync::Mutex};

use anyhow::Context;

use crate::{
    assets::decode::{Bitmap, decode_bitmap},
    foundation::error::{PhototagError, PhototagResult},
};

/// Asynchronous "URL to decoded bitmap" capability.
///
/// One call is issued per resource. A returned error is fatal for the render that requested it.
pub trait ResourceLoader {
    /// Load and decode the resource at an already-resolved `url`.
    fn load(&self, url: &str) -> impl Future<Output = PhototagResult<Bitmap>>;
}

/// Loads resources from the filesystem, relative to a root directory.
///
/// Accepts relative paths and `file://` URLs. Network URLs are rejected; hosts that need them
/// fetch the bytes themselves and feed a [`MemoryLoader`].
#[derive(Clone, Debug)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    /// Loader resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, url: &str) -> PhototagResult<PathBuf> {
        if url.starts_with("file:") {
            let parsed = url::Url::parse(url)
                .map_err(|e| PhototagError::validation(format!("invalid file URL: {e}")))?;
            return parsed
                .to_file_path()
                .map_err(|_| PhototagError::validation("file URL has no local path"));
        }
        if url.contains("://") {
            return Err(PhototagError::validation(format!(
                "unsupported URL scheme for filesystem loader: '{url}'"
            )));
        }
        Ok(self.root.join(normalize_rel_path(url)?))
    }
}

impl ResourceLoader for FsLoader {
    async fn load(&self, url: &str) -> PhototagResult<Bitmap> {
        let path = self.path_for(url)?;
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read resource bytes from '{}'", path.display()))?;
        decode_bitmap(&bytes)
    }
}

/// Normalize and validate a relative resource path.
///
/// The result uses `/` separators, drops `.` segments, and rejects absolute paths or parent
/// traversals (`..`).
pub fn normalize_rel_path(source: &str) -> PhototagResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(PhototagError::validation("resource paths must be relative"));
    }
    if s.is_empty() {
        return Err(PhototagError::validation("resource path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(PhototagError::validation(
                "resource paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(PhototagError::validation(
            "resource path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[derive(Clone, Debug)]
enum MemoryEntry {
    Ready(Bitmap),
    Fail(String),
    Hang,
}

/// In-memory loader with pre-registered outcomes per URL.
///
/// Unknown URLs fail. Every requested URL is recorded, in request order.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    entries: HashMap<String, MemoryEntry>,
    requests: Mutex<Vec<String>>,
}

impl MemoryLoader {
    /// Empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bitmap` for `url`.
    pub fn with_bitmap(mut self, url: impl Into<String>, bitmap: Bitmap) -> Self {
        self.entries.insert(url.into(), MemoryEntry::Ready(bitmap));
        self
    }

    /// Decode `bytes` now and serve the result for `url`.
    pub fn with_bytes(self, url: impl Into<String>, bytes: &[u8]) -> PhototagResult<Self> {
        let bitmap = decode_bitmap(bytes)?;
        Ok(self.with_bitmap(url, bitmap))
    }

    /// Fail loads of `url` with `reason`.
    pub fn with_failure(mut self, url: impl Into<String>, reason: impl Into<String>) -> Self {
        self.entries
            .insert(url.into(), MemoryEntry::Fail(reason.into()));
        self
    }

    /// Never complete loads of `url`.
    pub fn with_hang(mut self, url: impl Into<String>) -> Self {
        self.entries.insert(url.into(), MemoryEntry::Hang);
        self
    }

    /// URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl ResourceLoader for MemoryLoader {
    async fn load(&self, url: &str) -> PhototagResult<Bitmap> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match self.entries.get(url).cloned() {
            Some(MemoryEntry::Ready(bitmap)) => Ok(bitmap),
            Some(MemoryEntry::Fail(reason)) => Err(PhototagError::resource_load(url, reason)),
            Some(MemoryEntry::Hang) => futures::future::pending().await,
            None => Err(PhototagError::resource_load(url, "no such resource")),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
