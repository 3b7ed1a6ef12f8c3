//! Hex color codes

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// A `#RRGGBB` color code, upper-cased.
///
/// Three-digit shorthand (`#abc`) is expanded on parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexCode(String);

impl HexCode {
    /// The normalised code, including the leading `#`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for HexCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedHexColor(s.to_string());

        let digits = s.trim().strip_prefix('#').ok_or_else(malformed)?;

        if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(malformed());
        }

        let expanded: String = match digits.len() {
            6 => digits.to_ascii_uppercase(),
            3 => digits
                .chars()
                .flat_map(|ch| [ch, ch])
                .collect::<String>()
                .to_ascii_uppercase(),
            _ => return Err(malformed()),
        };

        Ok(Self(format!("#{expanded}")))
    }
}

impl TryFrom<String> for HexCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexCode> for String {
    fn from(value: HexCode) -> Self {
        value.0
    }
}

impl fmt::Display for HexCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
