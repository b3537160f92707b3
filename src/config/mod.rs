use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use reqwest::Url;
use serde::Deserialize;

/// Prefix shared by every environment variable the app reads
const ENV_PREFIX: &str = "PROJECTS_";

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the projects collection resource (`PROJECTS_URL`)
    #[serde(default)]
    pub url: String,
    /// Bearer token attached to every request (`PROJECTS_API_TOKEN`)
    #[serde(default)]
    pub api_token: Option<String>,
    /// Operator log destination (`PROJECTS_LOG_FILE`)
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("projects-admin.log")
}

impl Config {
    /// Deserialize `PROJECTS_*` pairs; entries without the prefix are skipped
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Config>(vars)
            .context("reading PROJECTS_* environment variables")?;

        Ok(config)
    }

    /// Replace values with those given on the command line
    pub fn with_overrides(mut self, url: Option<String>, log_file: Option<PathBuf>) -> Result<Self> {
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(log_file) = log_file {
            self.log_file = log_file;
        }

        self.validated()
    }

    /// Parsed collection URL
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.url).with_context(|| format!("invalid projects URL `{}`", self.url))
    }

    fn validated(mut self) -> Result<Self> {
        if self.url.trim().is_empty() {
            bail!("no projects URL: set PROJECTS_URL or pass --url");
        }
        self.base_url()?;

        // An empty token means "no auth", same as leaving it unset
        if self.api_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            self.api_token = None;
        }

        Ok(self)
    }
}

/// Initialize environment variables and load configuration
///
/// This function will:
/// 1. Load variables from .env file if it exists
/// 2. Deserialize `PROJECTS_*` environment variables into Config struct
/// 3. Let command line values win, then validate the result
pub fn init(url: Option<String>, log_file: Option<PathBuf>) -> Result<Config> {
    dotenv().ok();

    resolve(std::env::vars(), url, log_file)
}

fn resolve<I>(vars: I, url: Option<String>, log_file: Option<PathBuf>) -> Result<Config>
where
    I: IntoIterator<Item = (String, String)>,
{
    Config::from_vars(vars)?.with_overrides(url, log_file)
}
