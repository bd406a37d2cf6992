//! Infrastructure implementation of the `ProfileStore` port.
//!
//! All profile state lives in the installer state directory. Writes go
//! through a temp file + rename so a crashed run never leaves a partially
//! written profile behind.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::ProfileStore;
use crate::domain::profile::{self, ProfileDocument};
use crate::infra::paths::Paths;

/// Production `ProfileStore` rooted at the installer state directory.
pub struct DiskProfileStore {
    paths: Paths,
}

impl DiskProfileStore {
    #[must_use]
    pub fn new(paths: Paths) -> Self {
        Self { paths }
    }

    fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let temp = path.with_extension("yaml.tmp");
        std::fs::write(&temp, bytes).with_context(|| format!("writing {}", temp.display()))?;
        std::fs::rename(&temp, path).with_context(|| format!("finalizing {}", path.display()))?;
        Ok(())
    }
}

impl ProfileStore for DiskProfileStore {
    fn stage(&self, bytes: &[u8]) -> Result<()> {
        Self::write_atomic(&self.paths.staged_profile(), bytes)
    }

    fn staged_bytes(&self) -> Result<Option<Vec<u8>>> {
        let path = self.paths.staged_profile();
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read(&path)
            .map(Some)
            .with_context(|| format!("reading {}", path.display()))
    }

    fn publish_for_inspection(&self) -> Result<()> {
        let staged = self.paths.staged_profile();
        let copy = self.paths.inspection_copy();
        std::fs::copy(&staged, &copy)
            .with_context(|| format!("copying {} to {}", staged.display(), copy.display()))?;
        Ok(())
    }

    fn put_modified(&self, doc: &ProfileDocument) -> Result<()> {
        let text = doc.to_yaml().context("serializing rewritten profile")?;
        Self::write_atomic(&self.paths.modified_profile(), text.as_bytes())
    }

    fn take_modified(&self) -> Result<Option<ProfileDocument>> {
        let path = self.paths.modified_profile();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let document = profile::parse_profile(&bytes)
            .with_context(|| format!("parsing rewritten profile {}", path.display()))?;
        // The rewrite becomes the staged profile; clearing the drop point
        // makes the next check report no delta.
        Self::write_atomic(&self.paths.staged_profile(), &bytes)?;
        std::fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
        Ok(Some(document))
    }

    fn restart_requested(&self) -> bool {
        self.paths.restart_sentinel().exists()
    }
}
