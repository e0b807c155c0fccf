//! Scratch files for in-flight uploads.

use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;

const NAME_RANDOM_BYTES: usize = 16;

/// A temp file path that removes itself.
///
/// Removal also runs on drop, so an early return anywhere in the pipeline
/// cannot leave staged bytes behind. A path that was never created, or is
/// already gone, is not an error; failed removals are logged and never
/// escalated.
pub struct ScratchFile {
    path: PathBuf,
    removed: bool,
}

impl ScratchFile {
    /// Reserves a fresh random name under `dir`. The file itself is not
    /// created until someone writes to the path.
    pub fn with_random_name(dir: &Path, extension: &str) -> Self {
        let mut rng = rand::rng();
        let random_bytes: Vec<u8> = (0..NAME_RANDOM_BYTES).map(|_| rng.random()).collect();
        let file_name = format!("ingest-{}.{}", hex::encode(random_bytes), extension);
        Self {
            path: dir.join(file_name),
            removed: false,
        }
    }

    /// Takes ownership of an existing path, typically a tool's output
    /// file, so it is removed with the rest of the scratch state.
    pub fn adopt(path: PathBuf) -> Self {
        Self {
            path,
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the file now instead of at drop. Idempotent.
    pub async fn cleanup(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove scratch file"
                );
            }
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove scratch file"
                );
            }
        }
    }
}
