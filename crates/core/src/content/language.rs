use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Encode, Postgres, Type};
use thiserror::Error;

/// The two site languages. Stored as lowercase ISO 639-1 codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported language code: '{0}'")]
pub struct UnknownLanguage(pub String);

impl Language {
    pub const ALL: [Language; 2] = [Language::De, Language::En];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }

    pub fn parse(code: &str) -> Result<Language, UnknownLanguage> {
        match code {
            "de" => Ok(Language::De),
            "en" => Ok(Language::En),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }

    /// The opposite language of a translation pair.
    pub fn other(self) -> Language {
        match self {
            Language::De => Language::En,
            Language::En => Language::De,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The `language` column is plain TEXT, so the sqlx mapping goes through
// string encode/decode rather than a Postgres enum type.

impl Type<Postgres> for Language {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for Language {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let code = <&str as Decode<'r, Postgres>>::decode(value)?;
        Ok(Language::parse(code)?)
    }
}

impl<'q> Encode<'q, Postgres> for Language {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as Encode<'q, Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_codes() {
        for lang in Language::ALL {
            assert_eq!(Language::parse(lang.as_str()), Ok(lang));
        }
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert_eq!(
            Language::parse("fr"),
            Err(UnknownLanguage("fr".to_string()))
        );
        assert!(Language::parse("DE").is_err());
    }

    #[test]
    fn other_flips_the_pair() {
        assert_eq!(Language::De.other(), Language::En);
        assert_eq!(Language::En.other(), Language::De);
    }

    #[test]
    fn serde_uses_lowercase_codes() {
        assert_eq!(serde_json::to_string(&Language::De).unwrap(), "\"de\"");
        let parsed: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Language::En);
    }
}
