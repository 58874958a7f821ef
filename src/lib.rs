//! `twig2html` — render Twig template trees into static HTML.
//!
//! [`Converter::convert`] renders one template; [`Converter::convert_directory`]
//! walks a source tree, skips partials (`*.part.twig`), merges per-template
//! data files over global variables and reports every file's outcome.

mod batch;
pub mod classify;
pub mod config;
mod convert;
pub mod data;
pub mod error;
pub mod layout;
pub mod render;
pub mod report;
pub mod vars;

pub use convert::Converter;
pub use data::DataFormat;
pub use error::{Error, Result};
pub use render::{EngineOptions, Renderer};
pub use report::ConversionReport;
pub use vars::VariableSet;
