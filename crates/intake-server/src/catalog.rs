//! Product catalog file

use std::path::{Path, PathBuf};

/// Read-only catalog, served verbatim
pub struct ProductCatalog {
    path: PathBuf,
}

impl ProductCatalog {
    /// Catalog stored at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw catalog contents
    pub async fn load(&self) -> std::io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, "[ {\"sku\": \"A-1\"} ]").unwrap();

        let catalog = ProductCatalog::new(&path);
        assert_eq!(tokio_test::block_on(catalog.load()).unwrap(), "[ {\"sku\": \"A-1\"} ]");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ProductCatalog::new(dir.path().join("products.json"));
        assert!(tokio_test::block_on(catalog.load()).is_err());
    }
}
