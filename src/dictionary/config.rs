use std::path::{Path, PathBuf};

use derive_builder::Builder;

/// Environment variable overriding the dictionary data directory.
pub const DATA_DIR_ENV: &str = "PRONOUNCE_DATA_DIR";

/// Data directory used when the environment does not name one.
///
/// Packagers can set `PRONOUNCE_DEFAULT_DATA_DIR` at build time.
pub const DEFAULT_DATA_DIR: &str = match option_env!("PRONOUNCE_DEFAULT_DATA_DIR") {
    Some(dir) => dir,
    None => "/usr/share/pronounce-rs",
};

/// Parameters for dictionary file loading.
///
/// ```rust
/// use pronounce_rs::dictionary::DictionaryConfigBuilder;
///
/// let config = DictionaryConfigBuilder::default()
///     .data_dir("/opt/voices/data")
///     .build()?;
/// assert!(config.resolve("/dictionaries/en.dict").starts_with("/opt/voices/data"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct DictionaryConfig {
    /// Directory `.import` paths are resolved against.
    #[builder(default = "data_dir_from_env()")]
    pub data_dir: PathBuf,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl DictionaryConfig {
    /// Use `PRONOUNCE_DATA_DIR` if set, otherwise [`DEFAULT_DATA_DIR`].
    pub fn from_env() -> Self {
        Self {
            data_dir: data_dir_from_env(),
        }
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolve a dictionary path against the data directory.
    ///
    /// Paths are always relative to the data directory, even when written with
    /// a leading `/`.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches(['/', '\\']);
        self.data_dir.join(Path::new(relative))
    }
}

fn data_dir_from_env() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
