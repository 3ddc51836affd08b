//! Per-worker working directories.

use std::io;
use std::path::{Path, PathBuf};

/// Exclusive working-directory pair for one worker: a download area and a
/// compressed-output area.
///
/// The pool creates one per worker under a shared temp base, keyed by worker
/// index, so no two workers ever write to the same path. The handle is
/// passed into each pipeline invocation; cleanup is the pool's
/// responsibility via the owning temp directory.
#[derive(Debug, Clone)]
pub struct WorkDirs {
    pub download_dir: PathBuf,
    pub compressed_dir: PathBuf,
}

impl WorkDirs {
    pub fn create(base: &Path, worker_id: usize) -> io::Result<Self> {
        let root = base.join(format!("worker_{worker_id}"));
        let download_dir = root.join("downloads");
        let compressed_dir = root.join("compressed");
        std::fs::create_dir_all(&download_dir)?;
        std::fs::create_dir_all(&compressed_dir)?;
        Ok(Self {
            download_dir,
            compressed_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workers_get_disjoint_directories() {
        let base = tempfile::tempdir().unwrap();
        let a = WorkDirs::create(base.path(), 0).unwrap();
        let b = WorkDirs::create(base.path(), 1).unwrap();
        assert_ne!(a.download_dir, b.download_dir);
        assert_ne!(a.compressed_dir, b.compressed_dir);
        assert!(a.download_dir.is_dir());
        assert!(a.compressed_dir.is_dir());
        assert!(b.download_dir.is_dir());
    }
}
