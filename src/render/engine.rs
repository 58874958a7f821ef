//! Engine environment construction and error classification.

use super::{EngineOptions, cache::SourceCache};
use crate::error::Error;
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

/// The last template name the loader failed to find.
///
/// The engine's not-found error only carries a message, so the loader keeps
/// the name itself for [`classify`].
#[derive(Clone, Default)]
pub struct LastMiss(Arc<Mutex<Option<String>>>);

impl LastMiss {
    fn record(&self, name: &str) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(name.to_owned());
    }

    pub fn take(&self) -> Option<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Build a fresh environment whose loader only sees `root`.
pub fn environment(
    root: &Path,
    options: &EngineOptions,
    cache: Option<Arc<SourceCache>>,
    misses: LastMiss,
) -> Environment<'static> {
    let mut env = Environment::new();

    // Twig keeps the final newline and eats the one after a block tag.
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_debug(options.debug);

    // Twig prints nothing for a missing attribute of a missing variable.
    env.set_undefined_behavior(if options.strict_variables {
        UndefinedBehavior::Strict
    } else {
        UndefinedBehavior::Chainable
    });

    let escape = if options.autoescape {
        AutoEscape::Html
    } else {
        AutoEscape::None
    };
    env.set_auto_escape_callback(move |_name| escape.clone());

    let root = root.to_path_buf();
    let auto_reload = options.auto_reload;
    env.set_loader(move |name| {
        let Some(path) = scoped_path(&root, name).filter(|p| p.is_file()) else {
            misses.record(name);
            return Ok(None);
        };

        let read = match &cache {
            Some(cache) => cache.fetch(&path, auto_reload),
            None => fs::read_to_string(&path),
        };
        match read {
            Ok(src) => Ok(Some(src)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                misses.record(name);
                Ok(None)
            }
            Err(e) => Err(minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("could not read template '{name}'"),
            )
            .with_source(e)),
        }
    });

    env
}

/// Join a `/`-separated template name onto `root`, refusing to leave it.
fn scoped_path(root: &Path, name: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') => return None,
            s => path.push(s),
        }
    }
    Some(path)
}

/// Sort an engine error into the conversion taxonomy.
///
/// `missing` is the name the loader last failed to find while rendering
/// `name`, if any.
pub fn classify(err: minijinja::Error, root: &Path, name: &str, missing: Option<String>, debug: bool) -> Error {
    if debug {
        tracing::debug!(template = name, "{}", err.display_debug_info());
    }

    let template = root.join(name);
    match err.kind() {
        ErrorKind::SyntaxError => Error::TemplateSyntax { template, raw: err },
        ErrorKind::TemplateNotFound => {
            let missing = missing.unwrap_or_else(|| name.to_owned());
            let from = (missing != name).then_some(template);
            Error::TemplateNotFound {
                name: missing,
                from,
                root: root.to_path_buf(),
                raw: err,
            }
        }
        _ => Error::TemplateRuntime { template, raw: err },
    }
}
