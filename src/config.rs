// File: src/config.rs
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::audio::DEFAULT_VOICE;
use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "ALTENGLISH_CONFIG";
pub const DICT_ENV: &str = "ALTENGLISH_DICT";
pub const OUTPUT_DIR_ENV: &str = "ALTENGLISH_OUTPUT_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// CMUdict source file.
    pub dictionary: Option<PathBuf>,
    /// Bincode cache of the parsed dictionary.
    pub snapshot: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub voice: String,
    pub audio: bool,
    pub preserve_punctuation: bool,
    pub pause_between_words: bool,
}

impl AppConfig {
    pub const DEFAULT_OUTPUT_DIR: &'static str = "output";

    /// Reads a JSON config file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Defaults, then the file named by `explicit` or `ALTENGLISH_CONFIG`,
    /// then the `ALTENGLISH_DICT` / `ALTENGLISH_OUTPUT_DIR` overrides.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var_os(key).map(PathBuf::from));
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<PathBuf>) {
        if let Some(dict) = lookup(DICT_ENV) {
            self.dictionary = Some(dict);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV) {
            self.output_dir = dir;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dictionary: None,
            snapshot: None,
            output_dir: PathBuf::from(Self::DEFAULT_OUTPUT_DIR),
            voice: DEFAULT_VOICE.to_string(),
            audio: true,
            preserve_punctuation: true,
            pause_between_words: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_command_line_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.voice, "en");
        assert!(config.audio);
        assert!(config.preserve_punctuation);
        assert!(config.dictionary.is_none());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "dictionary": "/usr/share/cmudict.dict", "audio": false }"#)
            .unwrap();
        assert_eq!(config.dictionary, Some(PathBuf::from("/usr/share/cmudict.dict")));
        assert!(!config.audio);
        assert_eq!(config.voice, "en");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(AppConfig::from_json(r#"{ "dialect": "scots" }"#).is_err());
    }

    #[test]
    fn env_overrides_apply_on_top() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            DICT_ENV => Some(PathBuf::from("/tmp/cmudict")),
            _ => None,
        });
        assert_eq!(config.dictionary, Some(PathBuf::from("/tmp/cmudict")));
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("altenglish.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("altenglish.json"));
    }
}
