use serde::{Deserialize, Serialize};
use std::fmt;

/// Named deployment mode such as `dev`, `prod` or `test`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentProfile(String);

impl DeploymentProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Trims `raw` and accepts it only if a single non-blank word is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return None;
        }
        Some(Self::new(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && !self.0.contains(char::is_whitespace)
    }

    /// Splits a comma or whitespace separated list into profiles.
    ///
    /// Blank entries are dropped, so a list made only of separators yields
    /// no profiles at all. Order is kept and duplicates are not removed.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(|c: char| c == ',' || c.is_whitespace())
            .filter_map(Self::parse)
            .collect()
    }
}

impl fmt::Display for DeploymentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeploymentProfile {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DeploymentProfile {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for DeploymentProfile {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
