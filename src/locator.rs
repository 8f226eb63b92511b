//! Language resource lookup.
//!
//! Resources are addressed by `/`-separated relative paths such as
//! `lang/en_US.ini`. A locator maps them onto real storage.

use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::path::{
    Path,
    PathBuf,
};

/// Metadata about a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileInfo {
    /// Whether the resource exists.
    pub exists: bool,
    /// Whether the resource is a directory.
    pub is_directory: bool,
    /// Size in bytes.
    pub size: u64,
}

/// Resolves resource paths to their contents.
pub trait ResourceLocator: fmt::Debug {
    /// Metadata for `path`, or `None` when the locator cannot see it.
    fn file_info(&self, path: &str) -> Option<FileInfo>;

    /// Reads the whole resource.
    ///
    /// # Errors
    /// - The resource does not exist or cannot be read
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;

    /// File names (not paths) directly inside `dir`, sorted.
    ///
    /// # Errors
    /// - The directory cannot be listed
    fn list(&self, dir: &str) -> io::Result<Vec<String>>;
}

/// Serves resources from a directory on disk.
///
/// Absolute resource paths bypass the root.
#[derive(Debug, Clone)]
pub struct DirectoryLocator {
    /// Directory relative paths are joined onto.
    root: PathBuf,
}

impl DirectoryLocator {
    /// Serves resources below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory relative paths are joined onto.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for a resource path.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl ResourceLocator for DirectoryLocator {
    fn file_info(&self, path: &str) -> Option<FileInfo> {
        let metadata = std::fs::metadata(self.resolve(path)).ok()?;
        Some(FileInfo { exists: true, is_directory: metadata.is_dir(), size: metadata.len() })
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.resolve(path))
    }

    fn list(&self, dir: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(self.resolve(dir))? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Layers several locators; earlier layers shadow later ones.
#[derive(Debug, Default)]
pub struct OverlayLocator {
    /// Highest priority first.
    layers: Vec<Box<dyn ResourceLocator>>,
}

impl OverlayLocator {
    /// Creates an overlay without layers; it sees nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer below the existing ones.
    #[must_use]
    pub fn with_layer(mut self, layer: impl ResourceLocator + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// First layer that has `path`, with its metadata.
    fn find(&self, path: &str) -> Option<(&dyn ResourceLocator, FileInfo)> {
        self.layers.iter().find_map(|layer| {
            layer.file_info(path).filter(|info| info.exists).map(|info| (layer.as_ref(), info))
        })
    }
}

impl ResourceLocator for OverlayLocator {
    fn file_info(&self, path: &str) -> Option<FileInfo> {
        self.find(path).map(|(_, info)| info)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.find(path).map_or_else(
            || Err(io::Error::new(io::ErrorKind::NotFound, format!("'{path}' not found"))),
            |(layer, _)| layer.read(path),
        )
    }

    fn list(&self, dir: &str) -> io::Result<Vec<String>> {
        let mut names = BTreeSet::new();
        let mut listed = false;
        for layer in &self.layers {
            match layer.list(dir) {
                Ok(found) => {
                    listed = true;
                    names.extend(found);
                }
                Err(e) => tracing::debug!("Layer cannot list {}: {}", dir, e),
            }
        }
        if !listed {
            return Err(io::Error::new(io::ErrorKind::NotFound, format!("'{dir}' not found")));
        }
        Ok(names.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::test_utils::write;

    #[rstest]
    fn directory_file_info() {
        let dir = TempDir::new().unwrap();
        write(&dir, "lang/en_US.ini", "[Main]\n");
        let locator = DirectoryLocator::new(dir.path());

        let info = locator.file_info("lang/en_US.ini").unwrap();

        assert_that!(info.exists, eq(true));
        assert_that!(info.is_directory, eq(false));
        assert_that!(info.size, eq(7));
        assert_that!(locator.file_info("lang").unwrap().is_directory, eq(true));
        assert_that!(locator.file_info("lang/fr_FR.ini"), none());
    }

    #[rstest]
    fn directory_read_and_list() {
        let dir = TempDir::new().unwrap();
        write(&dir, "lang/fr_FR.ini", "b");
        write(&dir, "lang/de_DE.ini", "a");
        fs::create_dir_all(dir.path().join("lang/nested")).unwrap();
        let locator = DirectoryLocator::new(dir.path());

        assert_that!(locator.read("lang/fr_FR.ini").unwrap(), eq(&b"b".to_vec()));
        assert_that!(
            locator.list("lang").unwrap(),
            elements_are![eq("de_DE.ini"), eq("fr_FR.ini")]
        );
        assert_that!(locator.read("lang/missing.ini"), err(anything()));
    }

    /// The first layer that has the file serves it.
    #[rstest]
    fn overlay_prefers_earlier_layers() {
        let user = TempDir::new().unwrap();
        let bundled = TempDir::new().unwrap();
        write(&user, "lang/en_US.ini", "user");
        write(&bundled, "lang/en_US.ini", "bundled");
        write(&bundled, "lang/ja_JP.ini", "bundled-ja");
        let overlay = OverlayLocator::new()
            .with_layer(DirectoryLocator::new(user.path()))
            .with_layer(DirectoryLocator::new(bundled.path()));

        assert_that!(overlay.read("lang/en_US.ini").unwrap(), eq(&b"user".to_vec()));
        assert_that!(overlay.read("lang/ja_JP.ini").unwrap(), eq(&b"bundled-ja".to_vec()));
        assert_that!(
            overlay.list("lang").unwrap(),
            elements_are![eq("en_US.ini"), eq("ja_JP.ini")]
        );
    }

    #[rstest]
    fn overlay_missing_everywhere() {
        let empty = TempDir::new().unwrap();
        let overlay = OverlayLocator::new().with_layer(DirectoryLocator::new(empty.path()));

        assert_that!(overlay.file_info("lang/en_US.ini"), none());
        assert_that!(overlay.read("lang/en_US.ini"), err(anything()));
        assert_that!(overlay.list("lang"), err(anything()));
    }
}
