//! Infrastructure implementation of the `ProductCatalog` port.
//!
//! The installation media describes its installable base products in a
//! YAML list. A missing catalog is an empty offer, not an error — the
//! base-product gate downstream produces the diagnostic.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ProductCatalog;
use crate::domain::product::BaseProduct;

/// Production `ProductCatalog` backed by a YAML file.
pub struct YamlProductCatalog {
    path: PathBuf,
}

impl YamlProductCatalog {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ProductCatalog for YamlProductCatalog {
    fn available(&self) -> Result<Vec<BaseProduct>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing {}", self.path.display()))
    }
}
