//! `twig2html` — render Twig templates into static HTML.
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use twig2html::{
    ConversionReport, Converter, DataFormat, EngineOptions, VariableSet, config::Config, data, vars,
};

#[derive(Parser)]
#[command(name = "twig2html", version, about = "Render Twig templates into static HTML")]
struct Cli {
    /// Project config file (default: ./twig2html.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the directory report as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    engine: EngineFlags,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args)]
struct EngineFlags {
    /// Keep template sources in memory between renders
    #[arg(long, global = true)]
    cache: bool,
    /// Log extended engine diagnostics on failure
    #[arg(long, global = true)]
    debug: bool,
    /// Reuse cached templates without checking their mtime
    #[arg(long, global = true)]
    no_auto_reload: bool,
    /// Fail on undefined variables
    #[arg(long, global = true)]
    strict_variables: bool,
    /// Print values without HTML escaping
    #[arg(long, global = true)]
    no_autoescape: bool,
}

#[derive(Args)]
struct VarFlags {
    /// Global variable, KEY=VALUE (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = vars::parse_assignment)]
    vars: Vec<(String, serde_json::Value)>,
    /// TOML or JSON file of global variables
    #[arg(long = "vars", value_name = "FILE")]
    vars_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Convert a single template
    Convert {
        template: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        vars: VarFlags,
    },

    /// Convert every template under a directory
    Dir {
        source: Option<PathBuf>,
        output: Option<PathBuf>,
        /// Directory of per-template data files mirroring the source layout
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long, value_enum)]
        data_format: Option<DataFormat>,
        #[command(flatten)]
        vars: VarFlags,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = Config::discover(cli.config.as_deref()).context("load config")?;
    let options = cli.engine.apply(config.engine.clone());

    match cli.cmd {
        Cmd::Convert {
            template,
            output,
            vars,
        } => {
            let globals = vars.resolve(&config)?;
            Converter::new(options)
                .convert(&template, &output, &globals)
                .with_context(|| format!("convert {}", template.display()))?;
            println!("📝 {} => 📄 {}", template.display(), output.display());
            Ok(())
        }

        Cmd::Dir {
            source,
            output,
            data,
            data_format,
            vars,
        } => {
            let source = source
                .or_else(|| config.source.clone())
                .context("no source directory given (argument or `source` in config)")?;
            let output = output
                .or_else(|| config.output.clone())
                .context("no output directory given (argument or `output` in config)")?;
            let data = data.or_else(|| config.data.clone());
            let globals = vars.resolve(&config)?;

            let converter = Converter::new(options)
                .with_data_format(data_format.unwrap_or(config.data_format));
            let report = converter
                .convert_directory(&source, &output, data.as_deref(), &globals)
                .context("convert directory")?;

            print_report(&report, cli.json)?;
            anyhow::ensure!(
                report.is_clean(),
                "{} of {} template(s) failed",
                report.failed.len(),
                report.total()
            );
            Ok(())
        }
    }
}

impl EngineFlags {
    /// Layer command-line switches over config-file options.
    fn apply(&self, mut options: EngineOptions) -> EngineOptions {
        options.cache |= self.cache;
        options.debug |= self.debug;
        options.strict_variables |= self.strict_variables;
        if self.no_auto_reload {
            options.auto_reload = false;
        }
        if self.no_autoescape {
            options.autoescape = false;
        }
        options
    }
}

impl VarFlags {
    /// Config `[vars]`, then `--vars FILE`, then each `--var`; later wins.
    fn resolve(&self, config: &Config) -> Result<VariableSet> {
        let mut globals = config.vars();
        if let Some(file) = &self.vars_file {
            globals = globals.merge(&load_vars_file(file)?);
        }
        let cli: VariableSet = self.vars.iter().cloned().collect();
        Ok(globals.merge(&cli))
    }
}

fn load_vars_file(path: &Path) -> Result<VariableSet> {
    data::load_file(path).with_context(|| format!("load variables from {}", path.display()))
}

fn print_report(report: &ConversionReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report).context("serialize report")?);
        return Ok(());
    }

    for entry in &report.success {
        println!("{entry}");
    }
    for entry in &report.skipped {
        println!("skipped: {entry}");
    }
    for entry in &report.failed {
        println!("failed:  {entry}");
    }
    println!("{report}");
    Ok(())
}

fn init_tracing(verbose: u8) -> Result<()> {
    let default = match verbose {
        0 => "twig2html=warn",
        1 => "twig2html=info",
        _ => "twig2html=debug",
    };
    let filter = match std::env::var("RUST_LOG") {
        Ok(spec) if !spec.is_empty() => EnvFilter::try_new(spec)?,
        _ => EnvFilter::try_new(default)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
