use crate::error::{CliError, CliResult};
use clap::ValueEnum;
use hcsv_spec::{CompileConfig, HeaderStyle};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// How `compile` prints the compiled schema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
    Yaml,
}

/// Optional YAML config file for `compile`; every field can be overridden on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Spec file, relative to the config file's directory
    pub spec: Option<PathBuf>,

    pub header_style: Option<HeaderStyle>,
    pub strict: Option<bool>,

    /// Default separator for composite index keys
    pub separator: Option<String>,

    pub output_format: Option<OutputFormat>,
}

/// Command-line values for `compile`, all optional
#[derive(Debug, Clone, Default)]
pub struct CompileOverrides {
    pub spec: Option<PathBuf>,
    pub header_style: Option<HeaderStyle>,
    pub strict: bool,
    pub separator: Option<String>,
    pub format: Option<OutputFormat>,
}

/// Fully resolved settings for one `compile` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSettings {
    pub spec: PathBuf,
    pub compile: CompileConfig,
    pub format: OutputFormat,
}

impl CliConfig {
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path)?;
        let mut config: CliConfig = serde_yaml::from_str(&text)?;

        if let (Some(spec), Some(dir)) = (&config.spec, path.parent()) {
            if spec.is_relative() {
                config.spec = Some(dir.join(spec));
            }
        }

        Ok(config)
    }

    /// Apply command-line overrides on top of this file's values.
    pub fn resolve(self, overrides: CompileOverrides) -> CliResult<CompileSettings> {
        let spec = overrides.spec.or(self.spec).ok_or_else(|| {
            CliError::InvalidConfig(
                "no spec file given: pass SPEC or set `spec` in the config file".to_string(),
            )
        })?;

        let defaults = CompileConfig::default();
        let default_separator = overrides
            .separator
            .or(self.separator)
            .unwrap_or(defaults.default_separator);
        if default_separator.is_empty() {
            return Err(CliError::InvalidConfig(
                "index separator cannot be empty".to_string(),
            ));
        }

        Ok(CompileSettings {
            spec,
            compile: CompileConfig {
                strict: overrides.strict || self.strict.unwrap_or(defaults.strict),
                default_separator,
                header_style: overrides
                    .header_style
                    .or(self.header_style)
                    .unwrap_or(defaults.header_style),
            },
            format: overrides
                .format
                .or(self.output_format)
                .unwrap_or_default(),
        })
    }
}
