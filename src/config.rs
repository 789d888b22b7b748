use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access_log::{CsvFileSink, LogSink, NullSink, SheetSink};
use crate::agenda::{AgendaEntry, AgendaError, AgendaItem, default_agenda};
use crate::asset::DirectoryResolver;
use crate::constants::*;
use crate::render::PageConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("agenda item {position}: {source}")]
    Agenda {
        position: usize,
        #[source]
        source: AgendaError,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub assets: AssetsConfig,
    pub log: LogConfig,
    /// Overrides the built-in new-hire day when present.
    pub agenda: Option<Vec<AgendaEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub dir: PathBuf,
    pub logo_fallback: String,
    pub slide_fallback: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            logo_fallback: LOGO_FALLBACK_URL.to_string(),
            slide_fallback: SLIDE_FALLBACK_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum LogConfig {
    Csv {
        #[serde(default = "default_log_path")]
        path: PathBuf,
    },
    Sheet {
        spreadsheet_id: String,
        #[serde(default = "default_sheet_range")]
        range: String,
        #[serde(default = "default_token_env")]
        token_env: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_base: Option<String>,
    },
    None,
}

fn default_log_path() -> PathBuf {
    PathBuf::from(LOG_FILE)
}

fn default_sheet_range() -> String {
    "Sheet1!A:C".to_string()
}

fn default_token_env() -> String {
    SHEET_TOKEN_ENV.to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig::Csv { path: default_log_path() }
    }
}

impl LogConfig {
    pub fn sink(&self) -> Box<dyn LogSink> {
        match self {
            LogConfig::Csv { path } => Box::new(CsvFileSink::new(path)),
            LogConfig::Sheet { spreadsheet_id, range, token_env, api_base } => {
                let sink = SheetSink::from_env(spreadsheet_id.as_str(), range.as_str(), token_env);
                match api_base {
                    Some(base) => Box::new(sink.with_api_base(base.as_str())),
                    None => Box::new(sink),
                }
            }
            LogConfig::None => Box::new(NullSink),
        }
    }
}

impl Config {
    /// Loads a TOML config. Relative paths inside it are taken from the
    /// config file's directory.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.assets.dir = base.join(&config.assets.dir);
            if let LogConfig::Csv { path } = &mut config.log {
                *path = base.join(&*path);
            }
        }
        config.agenda()?;
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Validated agenda items; `position` in errors is 1-based.
    pub fn agenda(&self) -> Result<Vec<AgendaItem>, ConfigError> {
        let Some(entries) = &self.agenda else {
            return Ok(default_agenda());
        };
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .clone()
                    .into_item()
                    .map_err(|source| ConfigError::Agenda { position: i + 1, source })
            })
            .collect()
    }

    pub fn resolver(&self) -> DirectoryResolver {
        DirectoryResolver::new(&self.assets.dir)
            .with_fallbacks(self.assets.logo_fallback.as_str(), self.assets.slide_fallback.as_str())
    }
}
