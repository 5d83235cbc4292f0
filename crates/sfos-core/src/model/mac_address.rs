// ── MacAddress ──
//
// Six hex octets separated by `:` or `-`. The text is kept as given so a
// value written to the firewall reads back unchanged.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

static MAC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$").expect("MAC regex is valid")
});

/// A validated MAC address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// Validate `raw` (surrounding whitespace ignored).
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if MAC_REGEX.is_match(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(CoreError::validation(format!(
                "invalid MAC address '{trimmed}'"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

/// Parse a comma-separated list: entries are trimmed, blanks dropped,
/// duplicates removed keeping first-seen order, and each one validated.
pub fn parse_mac_list(raw: &str) -> Result<Vec<MacAddress>, CoreError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<IndexSet<&str>>()
        .into_iter()
        .map(MacAddress::parse)
        .collect()
}
