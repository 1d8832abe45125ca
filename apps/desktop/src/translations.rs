//! Translation catalogues for the presentation layer.
//!
//! Catalogues are flat TOML tables under `<assets>/translations`, named
//! `aegis_<locale>.toml`. A full locale (`de_DE`) falls back to its language
//! (`de`).

use crate::error::{DesktopError, DesktopErrorExt};
use aegis_domain::constants::APPLICATION_ID;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOCALE: &str = "en-US";
pub const TRANSLATIONS_DIR: &str = "translations";

const LOCALE_VARS: [&str; 3] = ["AEGIS_LOCALE", "LC_ALL", "LANG"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translations {
    locale: String,
    entries: BTreeMap<String, String>,
}

impl Translations {
    /// Loads the catalogue best matching `locale`.
    pub fn load(assets_dir: &Path, locale: &str) -> Result<Self, DesktopError> {
        let locale = normalize(locale);
        let candidates = candidates(assets_dir, &locale);
        let path = candidates.iter().find(|p| p.is_file()).ok_or_else(|| DesktopError::Internal {
            message: format!("no catalogue for locale {locale}").into(),
            context: None,
        })?;

        let raw = std::fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
        let entries = toml::from_str::<BTreeMap<String, String>>(&raw)
            .context(format!("Failed to parse {}", path.display()))?;
        Ok(Self { locale, entries })
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Translated text for `key`, or `key` itself.
    #[must_use]
    pub fn tr<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Locale from the environment, in precedence order.
#[must_use]
pub fn detect_locale() -> String {
    detect_locale_from(|key| std::env::var(key).ok())
}

pub(crate) fn detect_locale_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    LOCALE_VARS
        .into_iter()
        .filter_map(lookup)
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
        .unwrap_or_else(|| DEFAULT_LOCALE.to_owned())
}

/// `de_DE.UTF-8@euro` -> `de_DE`, `en-US` -> `en_US`.
fn normalize(locale: &str) -> String {
    locale.split(['.', '@']).next().unwrap_or(locale).replace('-', "_")
}

fn candidates(assets_dir: &Path, locale: &str) -> Vec<PathBuf> {
    let dir = assets_dir.join(TRANSLATIONS_DIR);
    let mut names = vec![locale.to_owned()];
    if let Some((language, _)) = locale.split_once('_') {
        names.push(language.to_owned());
    }
    names.into_iter().map(|name| dir.join(format!("{APPLICATION_ID}_{name}.toml"))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn locale_precedence_skips_c_and_empty() {
        let env = |key: &str| match key {
            "AEGIS_LOCALE" => Some(String::new()),
            "LC_ALL" => Some("C".to_owned()),
            "LANG" => Some("de_DE.UTF-8".to_owned()),
            _ => None,
        };
        assert_eq!(detect_locale_from(env), "de_DE.UTF-8");
        assert_eq!(detect_locale_from(|_| None), DEFAULT_LOCALE);
    }

    #[test]
    fn language_catalogue_is_a_fallback() {
        let tmp = tempdir().expect("tempdir");
        let dir = tmp.path().join(TRANSLATIONS_DIR);
        fs::create_dir_all(&dir).expect("dir");
        fs::write(dir.join("aegis_de.toml"), "\"Connect\" = \"Verbinden\"\n").expect("write");

        let translations = Translations::load(tmp.path(), "de_DE.UTF-8").expect("load");

        assert_eq!(translations.locale(), "de_DE");
        assert_eq!(translations.tr("Connect"), "Verbinden");
        assert_eq!(translations.tr("Disconnect"), "Disconnect");
    }

    #[test]
    fn missing_catalogue_is_an_error() {
        let tmp = tempdir().expect("tempdir");
        assert!(Translations::load(tmp.path(), DEFAULT_LOCALE).is_err());
    }
}
