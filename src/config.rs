//! Optional project configuration file.

use crate::{data::DataFormat, render::EngineOptions, vars::VariableSet};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "twig2html.toml";

/// Defaults for a project, overridden by command-line flags.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub data_format: DataFormat,
    pub engine: EngineOptions,
    pub vars: toml::Table,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let mut config: Config =
            toml::from_str(&src).with_context(|| format!("parse {}", path.display()))?;

        // Relative paths in the file are relative to the file itself.
        if let Some(base) = path.parent() {
            for p in [&mut config.source, &mut config.output, &mut config.data]
                .into_iter()
                .flatten()
            {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
        Ok(config)
    }

    /// Load `explicit`, or the default file if it exists, or defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn vars(&self) -> VariableSet {
        VariableSet::from_toml(self.vars.clone())
    }
}
