//! Template rendering facade over the engine.

mod cache;
mod engine;

use crate::{error::Result, vars::VariableSet};
use cache::SourceCache;
use serde::Deserialize;
use std::{path::Path, sync::Arc};

/// Options passed through to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Keep template sources in memory across render calls.
    pub cache: bool,
    /// Log the engine's extended diagnostics on failure.
    pub debug: bool,
    /// Re-check a cached template's mtime before reusing it.
    pub auto_reload: bool,
    /// Undefined variables fail the render instead of printing nothing.
    pub strict_variables: bool,
    /// HTML-escape printed values.
    pub autoescape: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache: false,
            debug: false,
            auto_reload: true,
            strict_variables: false,
            autoescape: true,
        }
    }
}

/// Renders one template at a time with a search root scoped to its directory.
///
/// Every call builds its own engine environment, so a `Renderer` can be
/// shared between threads rendering unrelated directories. Only the source
/// cache, when enabled, is shared.
pub struct Renderer {
    options: EngineOptions,
    cache: Option<Arc<SourceCache>>,
}

impl Renderer {
    pub fn new(options: EngineOptions) -> Self {
        let cache = options.cache.then(|| Arc::new(SourceCache::default()));
        Self { options, cache }
    }

    /// Render `template_name` from `template_dir` with `vars`.
    pub fn render(&self, template_dir: &Path, template_name: &str, vars: &VariableSet) -> Result<String> {
        let misses = engine::LastMiss::default();
        let env = engine::environment(template_dir, &self.options, self.cache.clone(), misses.clone());
        let classify = |e| engine::classify(e, template_dir, template_name, misses.take(), self.options.debug);

        let template = env.get_template(template_name).map_err(classify)?;
        template.render(vars).map_err(classify)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}
