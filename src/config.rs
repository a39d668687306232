//! Site configuration management.
//!
//! Handles loading, parsing, and validating the `sella.toml` configuration file.

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default values for serde deserialization
pub mod config_defaults {
    pub fn r#true() -> bool {
        true
    }

    pub fn r#false() -> bool {
        false
    }

    pub mod build {
        use std::path::PathBuf;

        pub fn root() -> Option<PathBuf> {
            None
        }
        pub fn templates() -> PathBuf {
            "templates".into()
        }
        pub fn output() -> PathBuf {
            "public".into()
        }
    }

    pub mod data {
        pub fn source() -> String {
            "local".into()
        }
        pub fn dir() -> String {
            "_data".into()
        }
        pub fn base_url() -> Option<String> {
            None
        }
    }

    pub mod serve {
        pub fn interface() -> String {
            "127.0.0.1".into()
        }
        pub fn port() -> u16 {
            5277
        }
    }
}

/// `[build]` section in sella.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root; all other paths are resolved against it
    #[serde(default = "config_defaults::build::root")]
    #[educe(Default = config_defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Directory holding the HTML page templates (and static assets)
    #[serde(default = "config_defaults::build::templates")]
    #[educe(Default = config_defaults::build::templates())]
    pub templates: PathBuf,

    /// Directory the hydrated site is written to
    #[serde(default = "config_defaults::build::output")]
    #[educe(Default = config_defaults::build::output())]
    pub output: PathBuf,

    /// Minify hydrated HTML
    #[serde(default = "config_defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Clear the output directory before building
    #[serde(default = "config_defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,
}

/// `[data]` section in sella.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Where content documents live: "local" or "remote"
    #[serde(default = "config_defaults::data::source")]
    #[educe(Default = config_defaults::data::source())]
    pub source: String,

    /// Document directory: a path under the templates directory when
    /// local, a URL path segment when remote
    #[serde(default = "config_defaults::data::dir")]
    #[educe(Default = config_defaults::data::dir())]
    pub dir: String,

    /// Base URL for remote documents, e.g.: "https://example.com"
    #[serde(default = "config_defaults::data::base_url")]
    #[educe(Default = config_defaults::data::base_url())]
    pub base_url: Option<String>,

    /// Convert Markdown body fields to HTML.
    /// When disabled, those fields are inserted raw.
    #[serde(default = "config_defaults::r#true")]
    #[educe(Default = true)]
    pub markdown: bool,
}

/// `[serve]` section in sella.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// Network interface to bind (e.g.: "127.0.0.1", "0.0.0.0")
    #[serde(default = "config_defaults::serve::interface")]
    #[educe(Default = config_defaults::serve::interface())]
    pub interface: String,

    /// Port number to listen on
    #[serde(default = "config_defaults::serve::port")]
    #[educe(Default = config_defaults::serve::port())]
    pub port: u16,
}

/// Root configuration structure representing sella.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SellaConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Content document settings
    #[serde(default)]
    pub data: DataConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl SellaConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf());
    }

    /// Local data directory: `<templates>/<data.dir>`
    pub fn local_data_dir(&self) -> PathBuf {
        self.build.templates.join(&self.data.dir)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());
        self.update_path_with_root(&root, cli);

        let build_args = cli.build_args();
        Self::update_option(&mut self.build.minify, build_args.minify.as_ref());
        Self::update_option(&mut self.data.markdown, build_args.markdown.as_ref());
        if build_args.clean {
            self.build.clean = true;
        }
        if let Some(base_url) = &build_args.base_url {
            self.data.base_url = Some(base_url.clone());
        }

        if let Commands::Serve { interface, port, .. } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory
    fn update_path_with_root(&mut self, root: &Path, cli: &Cli) {
        self.set_root(root);

        Self::update_option(&mut self.build.templates, cli.templates.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        self.build.templates = root.join(&self.build.templates);
        self.build.output = root.join(&self.build.output);
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if !self.build.templates.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[build.templates] not found: {}",
                self.build.templates.display()
            )));
        }

        match self.data.source.as_str() {
            "local" => {
                if !self.local_data_dir().is_dir() {
                    bail!(ConfigError::Validation(format!(
                        "[data.dir] not found under templates: {}",
                        self.local_data_dir().display()
                    )));
                }
            }
            "remote" => match &self.data.base_url {
                None => bail!(ConfigError::Validation(
                    "[data.source] = \"remote\" requires [data.base_url] to be set".into()
                )),
                Some(url) if !url.starts_with("http") => bail!(ConfigError::Validation(
                    "[data.base_url] must start with http:// or https://".into()
                )),
                _ => {}
            },
            other => bail!(ConfigError::Validation(format!(
                "[data.source] must be \"local\" or \"remote\", got `{other}`"
            ))),
        }

        Ok(())
    }
}
