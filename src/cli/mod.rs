use std::io::Read as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use crate::config::{ConfigError, Settings, load_settings};
use crate::grammar::Arguments;

#[derive(Parser)]
#[command(name = "usage-grammar", version)]
#[command(about = "Match arguments against the usage section of a help text and print them as JSON")]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Cli {
    /// Help text containing a "usage:" section (reads stdin when omitted)
    #[arg(long, value_name = "FILE")]
    pub doc: Option<PathBuf>,

    /// YAML settings file (help, version, options_first)
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Stop option parsing at the first positional argument
    #[arg(long)]
    pub options_first: bool,

    /// Treat -h/--help as ordinary options
    #[arg(long)]
    pub no_help: bool,

    /// Text printed when the arguments contain --version
    #[arg(long, value_name = "TEXT")]
    pub version_string: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Arguments to match, after `--`
    #[arg(last = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Settings from `--settings`, then overridden by the flags.
    pub fn resolve_settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = match &self.settings {
            Some(path) => load_settings(path)?,
            None => Settings::default(),
        };
        if self.options_first {
            settings = settings.with_options_first(true);
        }
        if self.no_help {
            settings = settings.with_help(false);
        }
        if let Some(version) = &self.version_string {
            settings = settings.with_version(version.as_str());
        }
        Ok(settings)
    }

    /// The usage document from `--doc` or stdin.
    pub fn read_doc(&self) -> Result<String, anyhow::Error> {
        match &self.doc {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read usage document {}", path.display())),
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read usage document from stdin")?;
                Ok(buf)
            }
        }
    }
}

pub fn render(arguments: &Arguments, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(arguments)
    } else {
        serde_json::to_string(arguments)
    }
}
