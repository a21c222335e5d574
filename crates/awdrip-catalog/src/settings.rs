//! Settings document and its location.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CatalogError, Result, read_document};

/// Environment variable naming the settings file explicitly.
pub const CONFIG_ENV_VAR: &str = "AWDRIP_CONFIG";

/// Environment variable naming a deployment environment; selects
/// `awdrip.<env>.toml` when that file exists.
pub const ENVIRONMENT_ENV_VAR: &str = "AWDRIP_ENV";

/// Settings file used when nothing else is configured.
pub const DEFAULT_SETTINGS_FILE: &str = "awdrip.toml";

const DEFAULT_INTERVAL_MINUTES: u64 = 5;
const DEFAULT_TEMPLATE_FILE: &str = "FileTranslation.toml";
const DEFAULT_REFERENCE_FILE: &str = "SystemIdTranslation.toml";

/// Operational settings for a batch run.
///
/// Relative paths are resolved against the directory holding the settings
/// file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Minutes between scheduled batches.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    /// Directory read by downstream consumers.
    pub output_dir: PathBuf,
    /// Documents are written here first, under a dated subfolder.
    pub staging_dir: PathBuf,
    /// Processed source files are moved here, under a dated subfolder.
    pub archive_dir: PathBuf,
    /// Directory for the log file; logs go to stderr when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    #[serde(default = "default_reference_path")]
    pub reference_path: PathBuf,
    /// Field delimiter of source files.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_interval_minutes() -> u64 {
    DEFAULT_INTERVAL_MINUTES
}

fn default_template_path() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATE_FILE)
}

fn default_reference_path() -> PathBuf {
    PathBuf::from(DEFAULT_REFERENCE_FILE)
}

fn default_delimiter() -> char {
    ','
}

impl Settings {
    /// Load and validate the settings document at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_document(path)?;
        Self::parse(&text, path)
    }

    /// Parse settings text; `path` anchors relative paths and error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut settings: Self = toml::from_str(text).map_err(|e| CatalogError::toml(path, e))?;
        if settings.interval_minutes == 0 {
            return Err(CatalogError::InvalidSettings {
                path: path.to_path_buf(),
                message: "interval_minutes must be greater than zero".to_string(),
            });
        }
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        settings.resolve_relative_to(base);
        Ok(settings)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [
            &mut self.output_dir,
            &mut self.staging_dir,
            &mut self.archive_dir,
            &mut self.template_path,
            &mut self.reference_path,
        ] {
            anchor(path, base);
        }
        if let Some(log_dir) = self.log_dir.as_mut() {
            anchor(log_dir, base);
        }
    }
}

fn anchor(path: &mut PathBuf, base: &Path) {
    if path.is_relative() && !base.as_os_str().is_empty() {
        *path = base.join(&*path);
    }
}

/// Decides which settings file to load.
///
/// Resolution order:
/// 1. an explicit path (the `--config` flag)
/// 2. `AWDRIP_CONFIG`
/// 3. `awdrip.<AWDRIP_ENV>.toml` in the working directory, if it exists
/// 4. `awdrip.toml` in the working directory
#[derive(Debug, Clone, Default)]
pub struct SettingsLocator {
    pub explicit: Option<PathBuf>,
    pub config_var: Option<String>,
    pub environment: Option<String>,
    pub working_dir: PathBuf,
}

impl SettingsLocator {
    /// Locator populated from the process environment.
    pub fn from_env(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            config_var: std::env::var(CONFIG_ENV_VAR).ok(),
            environment: std::env::var(ENVIRONMENT_ENV_VAR).ok(),
            working_dir: std::env::current_dir().unwrap_or_default(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.explicit {
            return path.clone();
        }
        if let Some(path) = self.config_var.as_deref().filter(|v| !v.trim().is_empty()) {
            return PathBuf::from(path);
        }
        if let Some(env) = self.environment.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            let candidate = self.working_dir.join(format!("awdrip.{env}.toml"));
            if candidate.is_file() {
                return candidate;
            }
        }
        self.working_dir.join(DEFAULT_SETTINGS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
output_dir = "out"
staging_dir = "staging"
archive_dir = "/var/awdrip/archive"
"#;

    #[test]
    fn defaults_and_relative_paths() {
        let settings = Settings::parse(MINIMAL, Path::new("/etc/awdrip/awdrip.toml"))
            .expect("parse settings");
        assert_eq!(settings.interval_minutes, 5);
        assert_eq!(settings.interval(), Duration::from_secs(300));
        assert_eq!(settings.output_dir, PathBuf::from("/etc/awdrip/out"));
        assert_eq!(settings.staging_dir, PathBuf::from("/etc/awdrip/staging"));
        assert_eq!(settings.archive_dir, PathBuf::from("/var/awdrip/archive"));
        assert_eq!(
            settings.template_path,
            PathBuf::from("/etc/awdrip/FileTranslation.toml")
        );
        assert_eq!(
            settings.reference_path,
            PathBuf::from("/etc/awdrip/SystemIdTranslation.toml")
        );
        assert_eq!(settings.log_dir, None);
        assert_eq!(settings.delimiter, ',');
    }

    #[test]
    fn zero_interval_is_rejected() {
        let text = format!("interval_minutes = 0\n{MINIMAL}");
        let err = Settings::parse(&text, Path::new("awdrip.toml")).expect_err("zero interval");
        assert!(matches!(err, CatalogError::InvalidSettings { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let text = format!("{MINIMAL}\nOutputRIPPath = \"x\"\n");
        let err = Settings::parse(&text, Path::new("awdrip.toml")).expect_err("unknown key");
        assert!(matches!(err, CatalogError::Toml { .. }));
    }

    #[test]
    fn missing_required_directory_is_rejected() {
        let err = Settings::parse("output_dir = \"out\"\n", Path::new("awdrip.toml"))
            .expect_err("missing dirs");
        assert!(matches!(err, CatalogError::Toml { .. }));
    }

    #[test]
    fn locator_precedence() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let mut locator = SettingsLocator {
            working_dir: dir.path().to_path_buf(),
            ..SettingsLocator::default()
        };
        assert_eq!(locator.resolve(), dir.path().join("awdrip.toml"));

        locator.environment = Some("prod".to_string());
        assert_eq!(locator.resolve(), dir.path().join("awdrip.toml"));
        std::fs::write(dir.path().join("awdrip.prod.toml"), MINIMAL).expect("write env file");
        assert_eq!(locator.resolve(), dir.path().join("awdrip.prod.toml"));

        locator.config_var = Some("/etc/awdrip/custom.toml".to_string());
        assert_eq!(locator.resolve(), PathBuf::from("/etc/awdrip/custom.toml"));

        locator.explicit = Some(PathBuf::from("cli.toml"));
        assert_eq!(locator.resolve(), PathBuf::from("cli.toml"));
    }
}
