//! Error taxonomy for single-file and directory conversion.

use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Why a data file could not be loaded.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("read failed")]
    Io(#[from] io::Error),
    #[error("malformed TOML")]
    Toml(#[from] toml::de::Error),
    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),
}

/// Failure conditions of a conversion.
///
/// Only [`Error::SourceNotFound`] aborts a directory run; every other kind is
/// folded into a failed report entry for the file that raised it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The source directory of a batch run does not exist.
    #[error("source directory not found: '{}'", .path.display())]
    SourceNotFound { path: PathBuf },

    /// The template handed to a single-file conversion does not exist.
    #[error("template file not found: '{}'", .path.display())]
    FileNotFound { path: PathBuf },

    /// A partial template was used as a conversion root.
    #[error("partial templates cannot be converted directly: '{}'", .path.display())]
    UnsupportedTemplate { path: PathBuf },

    /// A path that should name a `.twig` template does not.
    #[error("not a template path (expected a .twig extension): '{}'", .path.display())]
    InvalidPath { path: PathBuf },

    /// A data file exists but could not be read or parsed.
    #[error("failed to load data file '{}'", .path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        raw: DataError,
    },

    /// Malformed template source.
    #[error("syntax error in template '{}'", .template.display())]
    TemplateSyntax {
        template: PathBuf,
        #[source]
        raw: minijinja::Error,
    },

    /// Evaluation failed, e.g. an undefined variable under strict mode.
    #[error("failed to render template '{}'", .template.display())]
    TemplateRuntime {
        template: PathBuf,
        #[source]
        raw: minijinja::Error,
    },

    /// A template name could not be resolved under the search root.
    ///
    /// `from` is the template whose include, import or extends asked for
    /// `name`, and is `None` when the rendered template itself is missing.
    #[error("template '{name}' not found under '{}'{}", .root.display(), requested_by(.from.as_deref()))]
    TemplateNotFound {
        name: String,
        from: Option<PathBuf>,
        root: PathBuf,
        #[source]
        raw: minijinja::Error,
    },

    /// A template found while walking the source tree could not be read,
    /// e.g. a dangling symlink.
    #[error("cannot read template '{}'", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        raw: walkdir::Error,
    },

    /// The rendered output could not be written.
    #[error("failed to write '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        raw: io::Error,
    },
}

impl Error {
    /// Short stable tag naming the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::SourceNotFound { .. } => "source-not-found",
            Error::FileNotFound { .. } => "file-not-found",
            Error::UnsupportedTemplate { .. } => "unsupported-template",
            Error::InvalidPath { .. } => "invalid-path",
            Error::DataLoad { .. } => "data-load",
            Error::TemplateSyntax { .. } => "template-syntax",
            Error::TemplateRuntime { .. } => "template-runtime",
            Error::TemplateNotFound { .. } => "template-not-found",
            Error::Unreadable { .. } => "unreadable",
            Error::Write { .. } => "write",
        }
    }

    /// One-line message including every cause in the chain.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            out.push_str(": ");
            out.push_str(&cause.to_string());
            current = cause.source();
        }
        out
    }
}

fn requested_by(from: Option<&Path>) -> String {
    from.map(|p| format!(" (requested by '{}')", p.display()))
        .unwrap_or_default()
}

/// Default return type for fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_includes_causes() {
        let err = Error::Write {
            path: PathBuf::from("out/a.html"),
            raw: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.chain(), "failed to write 'out/a.html': denied");
        assert_eq!(err.kind(), "write");
    }

    #[test]
    fn missing_include_names_the_requesting_template() {
        let raw = || minijinja::Error::new(minijinja::ErrorKind::TemplateNotFound, "nope");
        let root_missing = Error::TemplateNotFound {
            name: "a.twig".into(),
            from: None,
            root: PathBuf::from("src"),
            raw: raw(),
        };
        assert_eq!(root_missing.to_string(), "template 'a.twig' not found under 'src'");

        let include_missing = Error::TemplateNotFound {
            name: "nav.part.twig".into(),
            from: Some(PathBuf::from("src/a.twig")),
            root: PathBuf::from("src"),
            raw: raw(),
        };
        assert_eq!(
            include_missing.to_string(),
            "template 'nav.part.twig' not found under 'src' (requested by 'src/a.twig')"
        );
    }

    #[test]
    fn data_error_keeps_parser_cause() {
        let raw = toml::from_str::<toml::Table>("a = ").unwrap_err();
        let err = Error::DataLoad {
            path: PathBuf::from("data/a.toml"),
            raw: raw.into(),
        };
        let msg = err.chain();
        assert!(msg.starts_with("failed to load data file 'data/a.toml': malformed TOML: "));
    }
}
