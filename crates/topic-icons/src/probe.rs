//! Asset existence checks.

use std::path::Path;

/// Answers whether an icon asset exists on disk.
pub trait AssetProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// Checks the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl AssetProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

impl<F> AssetProbe for F
where
    F: Fn(&Path) -> bool,
{
    fn exists(&self, path: &Path) -> bool {
        self(path)
    }
}
