//! Per-template data files merged over global variables.

use crate::{
    error::{DataError, Error, Result},
    vars::VariableSet,
};
use serde::Deserialize;
use std::{fs, io::ErrorKind, path::Path};

/// Declarative format of data files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    #[default]
    Toml,
    Json,
}

impl DataFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DataFormat::Toml => "toml",
            DataFormat::Json => "json",
        }
    }

    /// Pick a format from a file's extension; anything but `.json` is TOML.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => DataFormat::Json,
            _ => DataFormat::Toml,
        }
    }

    /// Parse `src`; `Ok(None)` when it is well-formed but not a mapping.
    pub fn parse(self, src: &str) -> std::result::Result<Option<VariableSet>, DataError> {
        match self {
            DataFormat::Toml => Ok(Some(VariableSet::from_toml(toml::from_str(src)?))),
            DataFormat::Json => Ok(VariableSet::from_json(serde_json::from_str(src)?)),
        }
    }
}

/// Variables for one template, and whether its data file contributed.
#[derive(Clone, Debug, PartialEq)]
pub struct Loaded {
    pub vars: VariableSet,
    pub used_data_file: bool,
}

impl Loaded {
    fn globals(globals: &VariableSet) -> Self {
        Self {
            vars: globals.clone(),
            used_data_file: false,
        }
    }
}

/// Load the data file for one template and merge it over `globals`.
///
/// Falls back to `globals` unchanged when no data root is configured, the
/// root is not a directory, the file is absent, or its top level is not a
/// mapping. A file that exists but fails to parse is an error.
pub fn load(
    data_root: Option<&Path>,
    data_file: Option<&Path>,
    globals: &VariableSet,
    format: DataFormat,
) -> Result<Loaded> {
    let (Some(root), Some(path)) = (data_root, data_file) else {
        return Ok(Loaded::globals(globals));
    };
    if !root.is_dir() {
        return Ok(Loaded::globals(globals));
    }

    let src = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Loaded::globals(globals)),
        Err(e) => {
            return Err(Error::DataLoad {
                path: path.to_path_buf(),
                raw: e.into(),
            });
        }
    };

    let parsed = format.parse(&src).map_err(|raw| Error::DataLoad {
        path: path.to_path_buf(),
        raw,
    })?;

    match parsed {
        Some(local) => {
            tracing::debug!(data_file = %path.display(), keys = local.len(), "merged data file");
            Ok(Loaded {
                vars: globals.merge(&local),
                used_data_file: true,
            })
        }
        None => {
            tracing::warn!(data_file = %path.display(), "data file is not a mapping, ignoring");
            Ok(Loaded::globals(globals))
        }
    }
}

/// Read a whole variables file, picking the format from its extension.
pub fn load_file(path: &Path) -> Result<VariableSet> {
    let src = fs::read_to_string(path).map_err(|e| Error::DataLoad {
        path: path.to_path_buf(),
        raw: e.into(),
    })?;
    let parsed = DataFormat::for_path(path)
        .parse(&src)
        .map_err(|raw| Error::DataLoad {
            path: path.to_path_buf(),
            raw,
        })?;
    Ok(parsed.unwrap_or_default())
}
