#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML document {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid settings in {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },

    #[error("invalid template in {path}: {message}")]
    InvalidTemplate { path: PathBuf, message: String },

    #[error("invalid reference document {path}: {message}")]
    InvalidReference { path: PathBuf, message: String },

    #[error("duplicate source directory id in {path}: {id}")]
    DuplicateSource { path: PathBuf, id: String },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Toml {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Read a whole document, mapping failures to [`CatalogError::Io`].
pub(crate) fn read_document(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))
}
