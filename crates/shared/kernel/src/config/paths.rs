use super::ConfigError;
use aegis_domain::config::PathsConfig;
use aegis_domain::constants::{APPLICATION_NAME, ORGANIZATION_NAME};
use std::path::{Path, PathBuf};

const SETTINGS_EXTENSION: &str = "conf";
const ASSETS_DIR: &str = "assets";

/// Concrete directories after applying platform defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Platform configuration root (`~/.config` on Linux).
    pub config_root: PathBuf,
    pub log_dir: PathBuf,
    pub runtime_dir: PathBuf,
    pub assets_dir: PathBuf,
}

impl ResolvedPaths {
    /// Fills unset directories from the platform.
    ///
    /// # Errors
    /// [`ConfigError::Path`] when no configuration root is configured and the
    /// platform does not report one.
    pub fn resolve(paths: &PathsConfig) -> Result<Self, ConfigError> {
        let config_root = paths.config_dir.clone().or_else(dirs::config_dir).ok_or_else(|| {
            ConfigError::Path {
                message: "no configuration directory available".into(),
                context: Some("Set paths.config_dir".into()),
            }
        })?;

        let log_dir = paths.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| config_root.clone())
                .join(ORGANIZATION_NAME)
                .join(APPLICATION_NAME)
                .join("log")
        });

        let runtime_dir = paths
            .runtime_dir
            .clone()
            .or_else(dirs::runtime_dir)
            .unwrap_or_else(std::env::temp_dir);

        let assets_dir = paths.assets_dir.clone().unwrap_or_else(default_assets_dir);

        Ok(Self { config_root, log_dir, runtime_dir, assets_dir })
    }

    /// Primary settings file: `<config>/<org>/<app>.conf`.
    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        settings_files(&self.config_root)[0].clone()
    }
}

/// `assets/` beside the running executable, independent of the working directory.
fn default_assets_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(ASSETS_DIR)))
        .unwrap_or_else(|| PathBuf::from(ASSETS_DIR))
}

/// Both settings files the client may have written under `config_root`:
/// `<org>/<app>.conf` and the legacy `<org>/<app>/<app>.conf`.
#[must_use]
pub fn settings_files(config_root: &Path) -> [PathBuf; 2] {
    let org = config_root.join(ORGANIZATION_NAME);
    let file_name = format!("{APPLICATION_NAME}.{SETTINGS_EXTENSION}");
    [org.join(&file_name), org.join(APPLICATION_NAME).join(file_name)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directories_win() {
        let paths = PathsConfig {
            config_dir: Some("/cfg".into()),
            log_dir: Some("/logs".into()),
            runtime_dir: Some("/run/user/1000".into()),
            assets_dir: Some("/usr/share/aegis".into()),
        };

        let resolved = ResolvedPaths::resolve(&paths).expect("resolve");
        assert_eq!(resolved.config_root, PathBuf::from("/cfg"));
        assert_eq!(resolved.log_dir, PathBuf::from("/logs"));
        assert_eq!(resolved.runtime_dir, PathBuf::from("/run/user/1000"));
        assert_eq!(resolved.assets_dir, PathBuf::from("/usr/share/aegis"));
        assert_eq!(resolved.settings_file(), PathBuf::from("/cfg/Aegis/AegisVPN.conf"));
    }

    #[test]
    fn both_settings_locations_are_listed() {
        let [primary, legacy] = settings_files(Path::new("/home/u/.config"));
        assert_eq!(primary, PathBuf::from("/home/u/.config/Aegis/AegisVPN.conf"));
        assert_eq!(legacy, PathBuf::from("/home/u/.config/Aegis/AegisVPN/AegisVPN.conf"));
    }
}
