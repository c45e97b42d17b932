//! # Configuration
//!
//! Optional `myprogress.toml`. Every key has a default, so an empty or
//! missing file behaves the same as no file at all.
//!
//! ```toml
//! document = "career.json"
//! export_dir = "exports"
//! confirm = true
//! max_import_bytes = 52428800
//! ```

use myprogress_core::ProgressError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "myprogress.toml";

/// Working document used when neither `--document` nor the config names one.
pub const DEFAULT_DOCUMENT: &str = "progress.json";

/// Largest document `import` will read (50 MB).
pub const DEFAULT_MAX_IMPORT_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Working document path.
    #[serde(default = "default_document")]
    pub document: PathBuf,

    /// Directory `export` writes to when no output path is given.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Ask before destructive actions. `false` behaves like `--yes`.
    #[serde(default = "default_true")]
    pub confirm: bool,

    #[serde(default = "default_max_import_bytes")]
    pub max_import_bytes: u64,
}

fn default_document() -> PathBuf {
    PathBuf::from(DEFAULT_DOCUMENT)
}

fn default_true() -> bool {
    true
}

fn default_max_import_bytes() -> u64 {
    DEFAULT_MAX_IMPORT_BYTES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: default_document(),
            export_dir: None,
            confirm: true,
            max_import_bytes: DEFAULT_MAX_IMPORT_BYTES,
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ProgressError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProgressError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ProgressError> {
        toml::from_str(content)
            .map_err(|e| ProgressError::Parse(format!("Invalid config: {}", e)))
    }

    /// Resolve the config for this run.
    ///
    /// An explicit path must exist. Otherwise [`DEFAULT_CONFIG_FILE`] is
    /// used when present, else the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ProgressError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
