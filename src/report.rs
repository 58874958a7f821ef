//! Per-file outcomes of a directory run.

use serde::Serialize;
use std::{fmt, path::PathBuf};

/// A template rendered and written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Converted {
    pub template: PathBuf,
    pub data_file: Option<PathBuf>,
    pub output: PathBuf,
}

/// A template whose conversion failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Failed {
    pub template: PathBuf,
    pub kind: &'static str,
    pub reason: String,
}

/// A partial template, never rendered on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub template: PathBuf,
}

impl fmt::Display for Converted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "📝 {}", self.template.display())?;
        if let Some(data) = &self.data_file {
            write!(f, " + 📊 {}", data.display())?;
        }
        write!(f, " => 📄 {}", self.output.display())
    }
}

impl fmt::Display for Failed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "📝 {} ({}: {})", self.template.display(), self.kind, self.reason)
    }
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "📝 {}", self.template.display())
    }
}

/// Everything that happened during one directory run.
///
/// Append-only while the run is in progress; each discovered template lands
/// in exactly one of the three lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub success: Vec<Converted>,
    pub failed: Vec<Failed>,
    pub skipped: Vec<Skipped>,
}

impl ConversionReport {
    pub fn total(&self) -> usize {
        self.success.len() + self.failed.len() + self.skipped.len()
    }

    /// `true` when no template failed. Skips do not count as failures.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: ConversionReport) {
        self.success.extend(other.success);
        self.failed.extend(other.failed);
        self.skipped.extend(other.skipped);
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} converted, {} failed, {} skipped",
            self.success.len(),
            self.failed.len(),
            self.skipped.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors() {
        let ok = Converted {
            template: "src/blog/post.twig".into(),
            data_file: Some("data/blog/post.toml".into()),
            output: "out/blog/post.html".into(),
        };
        assert_eq!(
            ok.to_string(),
            "📝 src/blog/post.twig + 📊 data/blog/post.toml => 📄 out/blog/post.html"
        );

        let plain = Converted {
            data_file: None,
            ..ok
        };
        assert_eq!(plain.to_string(), "📝 src/blog/post.twig => 📄 out/blog/post.html");

        let failed = Failed {
            template: "src/bad.twig".into(),
            kind: "template-syntax",
            reason: "boom".into(),
        };
        assert_eq!(failed.to_string(), "📝 src/bad.twig (template-syntax: boom)");
    }

    #[test]
    fn merge_and_counts() {
        let mut a = ConversionReport::default();
        a.skipped.push(Skipped {
            template: "src/h.part.twig".into(),
        });
        let mut b = ConversionReport::default();
        b.failed.push(Failed {
            template: "src/x.twig".into(),
            kind: "write",
            reason: "disk full".into(),
        });

        a.merge(b);
        assert_eq!(a.total(), 2);
        assert!(!a.is_clean());
        assert_eq!(a.to_string(), "0 converted, 1 failed, 1 skipped");
    }
}
