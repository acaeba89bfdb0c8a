//! Where the manifest and compiled fragments are read from.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::LoadError;
use crate::manifest::ComponentSchema;

/// Read-only access to published assets by relative path.
pub trait AssetSource {
    /// Read an asset as text.
    fn read(&self, path: &str) -> Result<String, LoadError>;
}

/// Assets in a published directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Serve assets below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory assets are served from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirectorySource {
    fn read(&self, path: &str) -> Result<String, LoadError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(LoadError::unreachable(path, "path escapes the asset root"));
        }
        match std::fs::read_to_string(self.root.join(relative)) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(LoadError::unreachable(path, "not found"))
            }
            Err(err) => Err(LoadError::Io(err)),
        }
    }
}

/// Assets held in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    assets: HashMap<String, String>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add an asset.
    pub fn with(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Add or replace an asset.
    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        let path = path.into();
        self.assets
            .insert(path.trim_start_matches('/').to_string(), text.into());
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> Result<String, LoadError> {
        self.assets
            .get(path.trim_start_matches('/'))
            .cloned()
            .ok_or_else(|| LoadError::unreachable(path, "not found"))
    }
}

/// Fetch the compiled markup fragment of a component.
pub fn load_fragment(source: &dyn AssetSource, schema: &ComponentSchema) -> Result<String, LoadError> {
    let path = schema.fragment_path();
    source.read(&path).inspect_err(|err| {
        log::error!("Failed to load fragment for component '{}': {}", schema.id, err);
    })
}
