//! Translated UI strings.
//!
//! Strings are addressed by [`MessageKey`], never by free-form text. A
//! [`Catalog`] is only handed out after every key has been found for every
//! [`Locale`], so lookups cannot fail at render time.
//!
//! Catalog files are TOML, one per locale (`en.toml`, `zh.toml`, ...), with
//! nested tables mirroring the dotted key path:
//!
//! ```toml
//! data_saved = "Your data has been saved."
//!
//! [single]
//! title = "Single Reading"
//! ```

mod keys;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::models::Locale;

pub use keys::MessageKey;

/// Errors raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Failed to parse catalog for locale '{locale}': {reason}")]
    Parse { locale: Locale, reason: String },

    #[error("No catalog provided for locale '{0}'")]
    MissingLocale(Locale),

    #[error("Catalog for locale '{locale}' is missing key '{key}'")]
    MissingKey { locale: Locale, key: MessageKey },

    #[error("Catalog entry '{key}' for locale '{locale}' is not a string")]
    NotAString { locale: Locale, key: String },
}

const BUILTIN_EN: &str = include_str!("../../translations/en.toml");
const BUILTIN_ZH: &str = include_str!("../../translations/zh.toml");
const BUILTIN_KO: &str = include_str!("../../translations/ko.toml");
const BUILTIN_JA: &str = include_str!("../../translations/ja.toml");

/// Validated mapping from (locale, key) to text.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: HashMap<Locale, HashMap<MessageKey, String>>,
}

impl Catalog {
    /// Catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_sources([
            (Locale::En, BUILTIN_EN),
            (Locale::Zh, BUILTIN_ZH),
            (Locale::Ko, BUILTIN_KO),
            (Locale::Ja, BUILTIN_JA),
        ])
    }

    /// Load `<dir>/<locale>.toml` for every supported locale.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let mut sources = Vec::with_capacity(Locale::ALL.len());
        for locale in Locale::ALL {
            let path = dir.join(format!("{}.toml", locale.code()));
            let content = fs::read_to_string(&path).map_err(|e| CatalogError::Io {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            sources.push((locale, content));
        }
        Self::from_sources(sources.iter().map(|(l, c)| (*l, c.as_str())))
    }

    /// Build from raw TOML documents, one per locale.
    ///
    /// # Errors
    /// Fails on the first locale that does not parse or lacks a key. Every
    /// locale in [`Locale::ALL`] must be present.
    pub fn from_sources<'a, I>(sources: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (Locale, &'a str)>,
    {
        let mut entries = HashMap::new();
        for (locale, source) in sources {
            entries.insert(locale, parse_locale(locale, source)?);
        }

        for locale in Locale::ALL {
            if !entries.contains_key(&locale) {
                return Err(CatalogError::MissingLocale(locale));
            }
        }

        Ok(Self { entries })
    }

    /// Text for `key` in `locale`.
    pub fn get(&self, locale: Locale, key: MessageKey) -> &str {
        self.entries
            .get(&locale)
            .and_then(|table| table.get(&key))
            .map(String::as_str)
            // Unreachable once validated; keep rendering rather than panic.
            .unwrap_or_else(|| key.as_str())
    }

    /// Every string for one locale, keyed by dotted path.
    pub fn entries(&self, locale: Locale) -> BTreeMap<&'static str, &str> {
        MessageKey::ALL
            .iter()
            .map(|key| (key.as_str(), self.get(locale, *key)))
            .collect()
    }
}

fn parse_locale(locale: Locale, source: &str) -> Result<HashMap<MessageKey, String>, CatalogError> {
    let table: toml::Table = toml::from_str(source).map_err(|e| CatalogError::Parse {
        locale,
        reason: e.to_string(),
    })?;

    let mut flat = BTreeMap::new();
    flatten(locale, "", &table, &mut flat)?;

    let mut resolved = HashMap::with_capacity(MessageKey::ALL.len());
    for key in MessageKey::ALL {
        let text = flat
            .remove(key.as_str())
            .ok_or(CatalogError::MissingKey { locale, key: *key })?;
        resolved.insert(*key, text);
    }

    if !flat.is_empty() {
        debug!(
            "Catalog '{}' has {} unused entries: {:?}",
            locale,
            flat.len(),
            flat.keys().collect::<Vec<_>>()
        );
    }

    Ok(resolved)
}

fn flatten(
    locale: Locale,
    prefix: &str,
    table: &toml::Table,
    out: &mut BTreeMap<String, String>,
) -> Result<(), CatalogError> {
    for (name, value) in table {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        match value {
            toml::Value::String(text) => {
                out.insert(path, text.clone());
            }
            toml::Value::Table(nested) => flatten(locale, &path, nested, out)?,
            _ => return Err(CatalogError::NotAString { locale, key: path }),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_complete() {
        let catalog = Catalog::builtin().unwrap();
        for locale in Locale::ALL {
            for key in MessageKey::ALL {
                assert!(!catalog.get(locale, *key).is_empty(), "{} {} empty", locale, key);
            }
        }
    }

    #[test]
    fn test_builtin_lookup() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.get(Locale::En, MessageKey::DataSaved), "Your data has been saved.");
        assert_eq!(
            catalog.get(Locale::Ja, MessageKey::RegionalJa),
            "日本のために特別に調整された運命の洞察をご覧ください。"
        );
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let broken = BUILTIN_EN.replace("data_saved = ", "data_saved_typo = ");
        let err = Catalog::from_sources([
            (Locale::En, broken.as_str()),
            (Locale::Zh, BUILTIN_ZH),
            (Locale::Ko, BUILTIN_KO),
            (Locale::Ja, BUILTIN_JA),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingKey { locale: Locale::En, key: MessageKey::DataSaved }
        ));
    }

    #[test]
    fn test_missing_locale_fails() {
        let err = Catalog::from_sources([(Locale::En, BUILTIN_EN)]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingLocale(Locale::Zh)));
    }

    #[test]
    fn test_non_string_entry_rejected() {
        let err = parse_locale(Locale::En, "[single]\ntitle = 3\n").unwrap_err();
        assert!(matches!(err, CatalogError::NotAString { .. }));
    }

    #[test]
    fn test_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        for (locale, source) in [
            (Locale::En, BUILTIN_EN),
            (Locale::Zh, BUILTIN_ZH),
            (Locale::Ko, BUILTIN_KO),
            (Locale::Ja, BUILTIN_JA),
        ] {
            fs::write(dir.path().join(format!("{}.toml", locale)), source).unwrap();
        }
        let catalog = Catalog::from_dir(dir.path()).unwrap();
        assert_eq!(catalog.entries(Locale::Ko).len(), MessageKey::ALL.len());
    }

    #[test]
    fn test_from_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Catalog::from_dir(dir.path()), Err(CatalogError::Io { .. })));
    }
}
