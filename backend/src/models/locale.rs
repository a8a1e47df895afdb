use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// UI language selected in the sidebar.
///
/// Drives string lookup and currency selection; never touches the numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
    Ko,
    Ja,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Zh, Locale::Ko, Locale::Ja];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
            Locale::Ko => "ko",
            Locale::Ja => "ja",
        }
    }

    /// Currency used for premium links in this language.
    pub fn currency(&self) -> Currency {
        match self {
            Locale::Ja => Currency::Jpy,
            _ => Currency::Usd,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "zh" => Ok(Locale::Zh),
            "ko" => Ok(Locale::Ko),
            "ja" => Ok(Locale::Ja),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Jpy,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Jpy => "jpy",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_roundtrip() {
        for locale in Locale::ALL {
            assert_eq!(locale.code().parse::<Locale>().unwrap(), locale);
        }
    }

    #[test]
    fn test_locale_rejects_unknown() {
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_currency_follows_locale() {
        assert_eq!(Locale::Ja.currency(), Currency::Jpy);
        assert_eq!(Locale::En.currency(), Currency::Usd);
        assert_eq!(Locale::Zh.currency(), Currency::Usd);
        assert_eq!(Locale::Ko.currency(), Currency::Usd);
    }
}
