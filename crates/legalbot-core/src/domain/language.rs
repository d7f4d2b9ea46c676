use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A chat's preferred language code, e.g. `en` or `pt-br`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    pub const DEFAULT: &'static str = "en";

    /// Parse a user-supplied language code.
    ///
    /// Codes are lowercased and must be 2-8 ASCII letters, optionally with
    /// `-` separated subtags.
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        let code = code.trim().to_ascii_lowercase();
        let valid_len = (2..=8).contains(&code.len());
        let valid_chars = code.split('-').all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_alphabetic())
        });

        if !valid_len || !valid_chars {
            return Err(DomainError::Validation(format!(
                "Invalid language code: {code:?}"
            )));
        }

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
