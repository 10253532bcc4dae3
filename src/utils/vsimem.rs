// src/utils/vsimem.rs
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use gdal::vsi;
use parking_lot::Mutex;

use crate::error::Result;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

// Paths currently mounted by a live `MemFile`.
static MOUNTED: Mutex<Vec<PathBuf>> = parking_lot::const_mutex(Vec::new());

/// A buffer mounted in GDAL's `/vsimem/` filesystem.
///
/// The file is unlinked when the guard drops, so datasets opened from it must
/// be dropped first.
pub struct MemFile {
    path: PathBuf,
}

impl MemFile {
    pub fn create(stem: &str, extension: &str, data: Vec<u8>) -> Result<Self> {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let path = PathBuf::from(format!(
            "/vsimem/{}_{}_{}.{}",
            stem,
            std::process::id(),
            id,
            extension
        ));
        vsi::create_mem_file(&path, data)?;
        MOUNTED.lock().push(path.clone());
        log::debug!("Mounted in-memory file {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for MemFile {
    fn drop(&mut self) {
        if let Err(e) = vsi::unlink_mem_file(&self.path) {
            log::warn!("Failed to unlink {}: {}", self.path.display(), e);
        }
        MOUNTED.lock().retain(|p| p != &self.path);
    }
}

/// `/vsimem/` paths mounted by guards that have not been dropped yet.
pub fn mounted_files() -> Vec<PathBuf> {
    MOUNTED.lock().clone()
}
