use serde::Deserialize;

/// Knobs for [`docopt`](crate::grammar::engine::docopt).
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Answer `-h`/`--help` in argv with the whole document.
    pub help: bool,
    /// Answer `--version` in argv with this text.
    pub version: Option<String>,
    /// Treat everything from the first positional on as positional.
    pub options_first: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            help: true,
            version: None,
            options_first: false,
        }
    }
}

impl Settings {
    pub fn with_help(mut self, help: bool) -> Self {
        self.help = help;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_options_first(mut self, options_first: bool) -> Self {
        self.options_first = options_first;
        self
    }
}

/// Parse a YAML string into `Settings`. Missing keys keep their defaults.
pub fn parse_settings(yaml: &str) -> Result<Settings, crate::config::ConfigError> {
    let settings: Settings = serde_saphyr::from_str(yaml)?;
    Ok(settings)
}
