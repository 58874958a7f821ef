//! File-name policy: which files are templates, which are partials.

use std::{ffi::OsStr, path::Path};

/// Suffix marking an include-only template.
pub const PARTIAL_SUFFIX: &str = ".part.twig";

/// `true` iff `file_name` ends with `.part.twig` (byte-exact, case-sensitive).
pub fn is_partial(file_name: impl AsRef<OsStr>) -> bool {
    file_name
        .as_ref()
        .as_encoded_bytes()
        .ends_with(PARTIAL_SUFFIX.as_bytes())
}

/// Suffix of every template file name.
pub const TEMPLATE_SUFFIX: &str = ".twig";

/// `true` iff the file name of `path` ends with `.twig` (byte-exact).
///
/// A file named just `.twig` counts, even though `Path::extension` sees no
/// extension on it.
pub fn is_template(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(TEMPLATE_SUFFIX.as_bytes()))
}
