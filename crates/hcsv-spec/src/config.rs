use crate::types::DEFAULT_INDEX_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Configuration for one compilation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Treat any bad spec row as fatal instead of counting and skipping it
    pub strict: bool,

    /// Separator for multi-component index keys when no clause names one
    pub default_separator: String,

    /// Header row style the compiled schema renders by default
    pub header_style: HeaderStyle,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            strict: false,
            default_separator: DEFAULT_INDEX_SEPARATOR.to_string(),
            header_style: HeaderStyle::Internal,
        }
    }
}

/// Which column name is written to a target file's header row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    /// Column `name` (the generated member name)
    #[default]
    Internal,

    /// Column `headerstring`
    External,
}

impl FromStr for HeaderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(HeaderStyle::Internal),
            "external" => Ok(HeaderStyle::External),
            other => Err(format!(
                "header style must be \"internal\" or \"external\", not \"{other}\""
            )),
        }
    }
}

impl fmt::Display for HeaderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderStyle::Internal => f.write_str("internal"),
            HeaderStyle::External => f.write_str("external"),
        }
    }
}
