use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "rusbit-bencode.toml";

/// Tunables for the decoder. Every field has a default, so a config file
/// only needs the keys it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Deepest list/dictionary nesting accepted; the root dictionary is level 1.
    pub max_depth: usize,
    /// Reject duplicate and out-of-order dictionary keys.
    pub strict_keys: bool,
    /// Reject bytes left over after the root value.
    pub require_eof: bool,
    /// Reject leading zeros and negative zero in numbers.
    pub canonical_integers: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            strict_keys: false,
            require_eof: false,
            canonical_integers: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl DecodeOptions {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let options = Self::from_toml_str(&contents)?;
        debug!("loaded decoder options from {}: {:?}", path.display(), options);
        Ok(options)
    }

    /// Like [`DecodeOptions::load`], but a missing file means defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!("{} not found, using default decoder options", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let options = DecodeOptions::from_toml_str("strict_keys = true\nmax_depth = 8\n").unwrap();
        assert_eq!(options.max_depth, 8);
        assert!(options.strict_keys);
        assert!(!options.require_eof);
        assert!(!options.canonical_integers);
    }

    #[test]
    fn test_invalid_config() {
        let err = DecodeOptions::from_toml_str("max_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "require_eof = true").unwrap();
        let options = DecodeOptions::load(file.path()).unwrap();
        assert!(options.require_eof);
        assert_eq!(options.max_depth, 64);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_PATH);
        assert_eq!(DecodeOptions::load_or_default(&path).unwrap(), DecodeOptions::default());
        assert!(matches!(DecodeOptions::load(&path), Err(ConfigError::Io(_))));
    }
}
