//! Single-file conversion: validate, classify, render, write.

use crate::{
    classify::is_partial,
    data::DataFormat,
    error::{Error, Result},
    render::{EngineOptions, Renderer},
    vars::VariableSet,
};
use std::{fs, path::Path};

/// Converts Twig templates to HTML, one file or a whole tree at a time.
pub struct Converter {
    pub(crate) renderer: Renderer,
    pub(crate) data_format: DataFormat,
}

impl Converter {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            renderer: Renderer::new(options),
            data_format: DataFormat::default(),
        }
    }

    pub fn with_data_format(mut self, format: DataFormat) -> Self {
        self.data_format = format;
        self
    }

    /// Render `template_path` with `vars` and write the result to `output_path`.
    ///
    /// Includes resolve against the template's own directory. Missing parent
    /// directories of `output_path` are created and an existing file is
    /// overwritten.
    pub fn convert(&self, template_path: &Path, output_path: &Path, vars: &VariableSet) -> Result<()> {
        if !template_path.exists() {
            return Err(Error::FileNotFound {
                path: template_path.to_path_buf(),
            });
        }

        let (template_dir, template_name) = split_template_path(template_path)?;
        if is_partial(template_name) {
            return Err(Error::UnsupportedTemplate {
                path: template_path.to_path_buf(),
            });
        }

        let html = self.renderer.render(template_dir, template_name, vars)?;

        let write_err = |raw| Error::Write {
            path: output_path.to_path_buf(),
            raw,
        };
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(output_path, html).map_err(write_err)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

fn split_template_path(path: &Path) -> Result<(&Path, &str)> {
    let invalid = || Error::InvalidPath {
        path: path.to_path_buf(),
    };
    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Ok((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn converts_a_single_file() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("test.twig");
        fs::write(&template, "Hello {{ name }}!").unwrap();
        let output = dir.path().join("test.html");

        let vars = VariableSet::new().with("name", "World");
        Converter::default().convert(&template, &output, &vars).unwrap();
        assert_eq!(fs::read(&output).unwrap(), b"Hello World!");
    }

    #[test]
    fn creates_missing_output_directories_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("page.twig");
        fs::write(&template, "{{ n }}").unwrap();
        let output = dir.path().join("out/a/b/page.html");

        let converter = Converter::default();
        converter
            .convert(&template, &output, &VariableSet::new().with("n", "first-and-longer"))
            .unwrap();
        converter
            .convert(&template, &output, &VariableSet::new().with("n", "second"))
            .unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "second");
    }

    #[test]
    fn missing_template_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out/test.html");

        let err = Converter::default()
            .convert(&dir.path().join("absent.twig"), &output, &VariableSet::new())
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn partials_are_refused() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("header.part.twig");
        fs::write(&template, "Header {{ name }}").unwrap();
        let output = dir.path().join("header.html");

        let err = Converter::default()
            .convert(&template, &output, &VariableSet::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedTemplate { .. }));
        assert_eq!(
            err.to_string(),
            format!("partial templates cannot be converted directly: '{}'", template.display())
        );
        assert!(!output.exists());
    }

    #[test]
    fn sibling_partials_are_includable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("header.part.twig"), "<h1>{{ title }}</h1>").unwrap();
        let template = dir.path().join("index.twig");
        fs::write(&template, "{% include 'header.part.twig' %}<p>body</p>").unwrap();
        let output = dir.path().join("index.html");

        let vars = VariableSet::new().with("title", "Home");
        Converter::default().convert(&template, &output, &vars).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "<h1>Home</h1><p>body</p>");
    }

    #[test]
    fn render_errors_leave_no_output() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("bad.twig");
        fs::write(&template, "{{ unclosed").unwrap();
        let output = dir.path().join("bad.html");

        let err = Converter::default()
            .convert(&template, &output, &VariableSet::new())
            .unwrap_err();
        assert!(matches!(err, Error::TemplateSyntax { .. }), "{err:?}");
        assert!(!output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_failures_are_reported() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("page.twig");
        fs::write(&template, "x").unwrap();
        // A regular file where a directory is needed.
        fs::write(dir.path().join("blocked"), "").unwrap();
        let output = dir.path().join("blocked/page.html");

        let err = Converter::default()
            .convert(&template, &output, &VariableSet::new())
            .unwrap_err();
        assert!(matches!(err, Error::Write { .. }), "{err:?}");
    }
}
