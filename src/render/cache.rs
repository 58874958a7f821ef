//! In-process cache of template sources keyed by absolute path.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
    time::SystemTime,
};

#[derive(Clone)]
struct Entry {
    modified: Option<SystemTime>,
    source: String,
}

#[derive(Default)]
pub struct SourceCache {
    entries: Mutex<HashMap<PathBuf, Entry>>,
}

impl SourceCache {
    /// Return the source at `path`, reading it only on a miss.
    ///
    /// With `auto_reload` a hit is reused only while the file's mtime is
    /// unchanged.
    pub fn fetch(&self, path: &Path, auto_reload: bool) -> io::Result<String> {
        let cached = self.lock().get(path).cloned();

        if let Some(entry) = cached {
            if !auto_reload || modified(path)? == entry.modified {
                tracing::debug!(template = %path.display(), "template cache hit");
                return Ok(entry.source);
            }
        }

        let modified = modified(path)?;
        let source = fs::read_to_string(path)?;
        self.lock().insert(
            path.to_path_buf(),
            Entry {
                modified,
                source: source.clone(),
            },
        );
        Ok(source)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn modified(path: &Path) -> io::Result<Option<SystemTime>> {
    Ok(fs::metadata(path)?.modified().ok())
}
