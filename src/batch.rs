//! Directory conversion: walk, classify, resolve, load, convert, report.

use crate::{
    classify::{is_partial, is_template},
    convert::Converter,
    data,
    error::{Error, Result},
    layout::{Layout, TemplateRef},
    report::{ConversionReport, Converted, Failed, Skipped},
    vars::VariableSet,
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

impl Converter {
    /// Convert every `.twig` file under `source_dir` into `output_dir`.
    ///
    /// Fails only if `source_dir` is not a directory. Per-file problems end up
    /// in the returned report and never stop the run.
    pub fn convert_directory(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        data_dir: Option<&Path>,
        globals: &VariableSet,
    ) -> Result<ConversionReport> {
        if !source_dir.is_dir() {
            return Err(Error::SourceNotFound {
                path: source_dir.to_path_buf(),
            });
        }

        let layout = Layout::new(source_dir, output_dir, data_dir, self.data_format.extension());
        let mut report = ConversionReport::default();

        for found in templates_in(&layout.source) {
            let path = match found {
                Ok(path) => path,
                Err((path, raw)) => {
                    let label = match layout.template_ref(&path) {
                        Ok(t) => layout.source_label(&t.relative_path),
                        Err(_) => path.clone(),
                    };
                    let e = Error::Unreadable { path, raw };
                    tracing::warn!(template = %label.display(), "{}", e.chain());
                    report.failed.push(failure(label, &e));
                    continue;
                }
            };
            let template = match layout.template_ref(&path) {
                Ok(t) => t,
                Err(e) => {
                    report.failed.push(failure(path, &e));
                    continue;
                }
            };
            let label = layout.source_label(&template.relative_path);

            if is_partial(&template.file_name) {
                tracing::debug!(template = %label.display(), "skipping partial");
                report.skipped.push(Skipped { template: label });
                continue;
            }

            match self.convert_one(&layout, &template, globals) {
                Ok(converted) => {
                    tracing::info!("{converted}");
                    report.success.push(converted);
                }
                Err(e) => {
                    tracing::warn!(template = %label.display(), "{}", e.chain());
                    report.failed.push(failure(label, &e));
                }
            }
        }

        Ok(report)
    }

    fn convert_one(&self, layout: &Layout, template: &TemplateRef, globals: &VariableSet) -> Result<Converted> {
        let target = layout.resolve(&template.relative_path)?;
        let loaded = data::load(
            layout.data.as_deref(),
            target.data_file_path.as_deref(),
            globals,
            self.data_format,
        )?;

        self.convert(&template.source_path, &target.output_path, &loaded.vars)?;

        let data_file = match (&target.data_file_path, loaded.used_data_file) {
            (Some(path), true) => Some(layout.data_label(path)),
            _ => None,
        };
        Ok(Converted {
            template: layout.source_label(&template.relative_path),
            data_file,
            output: layout.output_label(&target.output_path),
        })
    }
}

fn failure(template: PathBuf, err: &Error) -> Failed {
    Failed {
        template,
        kind: err.kind(),
        reason: err.chain(),
    }
}

/// A walk entry that looked like a template but could not be inspected.
type Unreadable = (PathBuf, walkdir::Error);

/// Walk `dir` in file-name order and yield paths of all `*.twig` files.
///
/// A walk error on a `*.twig` path (a dangling symlink, say) is yielded so
/// the caller can report it. Other walk errors are logged and skipped.
fn templates_in(dir: &Path) -> impl Iterator<Item = std::result::Result<PathBuf, Unreadable>> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) if entry.file_type().is_file() && is_template(entry.path()) => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => match err.path().filter(|p| is_template(p)).map(Path::to_path_buf) {
                Some(path) => Some(Err((path, err))),
                None => {
                    tracing::warn!("skipping unreadable entry: {err}");
                    None
                }
            },
        })
}
