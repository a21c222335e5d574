#![deny(unsafe_code)]

//! Configuration documents for the AWDRIP translator.
//!
//! Three TOML documents drive a batch:
//!
//! - the settings document ([`Settings`]): directories, interval and the
//!   paths of the other two documents;
//! - the template document ([`load_template`]): the ordered output fields;
//! - the reference document ([`ReferenceDocument`]): the destination and
//!   status tables that make up the [`TranslationCatalog`], plus the source
//!   directories to scan.

pub mod catalog;
pub mod error;
pub mod reference;
pub mod settings;
pub mod template;

pub use crate::catalog::TranslationCatalog;
pub use crate::error::{CatalogError, Result};
pub use crate::reference::ReferenceDocument;
pub use crate::settings::{
    CONFIG_ENV_VAR, DEFAULT_SETTINGS_FILE, ENVIRONMENT_ENV_VAR, Settings, SettingsLocator,
};
pub use crate::template::{load_template, parse_template};
