//! Maps templates under a source root to output and data paths.

use crate::{
    classify::{TEMPLATE_SUFFIX, is_template},
    error::{Error, Result},
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// A template discovered under the source root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateRef {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub file_name: OsString,
}

/// Where a template's output goes and where its data file would live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionTarget {
    pub output_path: PathBuf,
    /// Candidate only; existence is checked by the data loader.
    pub data_file_path: Option<PathBuf>,
}

/// The three roots of a directory run, normalized once.
#[derive(Clone, Debug)]
pub struct Layout {
    pub source: PathBuf,
    pub output: PathBuf,
    pub data: Option<PathBuf>,
    data_ext: &'static str,
}

impl Layout {
    pub fn new(source: &Path, output: &Path, data: Option<&Path>, data_ext: &'static str) -> Self {
        Self {
            source: normalize_root(source),
            output: normalize_root(output),
            data: data.map(normalize_root),
            data_ext,
        }
    }

    /// Build a [`TemplateRef`] for a file found under the source root.
    pub fn template_ref(&self, source_path: &Path) -> Result<TemplateRef> {
        let relative_path = source_path
            .strip_prefix(&self.source)
            .map_err(|_| Error::InvalidPath {
                path: source_path.to_path_buf(),
            })?
            .to_path_buf();
        let file_name = source_path
            .file_name()
            .ok_or_else(|| Error::InvalidPath {
                path: source_path.to_path_buf(),
            })?
            .to_owned();

        Ok(TemplateRef {
            source_path: source_path.to_path_buf(),
            relative_path,
            file_name,
        })
    }

    /// Compute output and data-file paths for `relative_path`.
    pub fn resolve(&self, relative_path: &Path) -> Result<ConversionTarget> {
        if !is_template(relative_path) {
            return Err(Error::InvalidPath {
                path: relative_path.to_path_buf(),
            });
        }

        let output_path = self.output.join(swap_suffix(relative_path, "html"));
        let data_file_path = self
            .data
            .as_ref()
            .map(|root| root.join(swap_suffix(relative_path, self.data_ext)));

        Ok(ConversionTarget {
            output_path,
            data_file_path,
        })
    }

    /// `<basename of source root>/<relative>`, as shown in reports.
    pub fn source_label(&self, relative: &Path) -> PathBuf {
        label(&self.source, relative)
    }

    pub fn output_label(&self, output_path: &Path) -> PathBuf {
        label(&self.output, output_path.strip_prefix(&self.output).unwrap_or(output_path))
    }

    pub fn data_label(&self, data_path: &Path) -> PathBuf {
        match &self.data {
            Some(root) => label(root, data_path.strip_prefix(root).unwrap_or(data_path)),
            None => data_path.to_path_buf(),
        }
    }
}

/// Drop trailing separators and interior `.` segments so joins are deterministic.
pub fn normalize_root(root: &Path) -> PathBuf {
    let normalized: PathBuf = root.components().collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Replace the trailing `.twig` of a template path with `.{ext}`.
///
/// Unlike `Path::with_extension` this maps `.twig` itself to `.{ext}`.
fn swap_suffix(relative: &Path, ext: &str) -> PathBuf {
    let stem = relative
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(TEMPLATE_SUFFIX));
    match stem {
        Some(stem) => relative.with_file_name(format!("{stem}.{ext}")),
        None => relative.with_extension(ext),
    }
}

fn label(root: &Path, relative: &Path) -> PathBuf {
    match root.file_name() {
        Some(name) => Path::new(name).join(relative),
        None => root.join(relative),
    }
}
