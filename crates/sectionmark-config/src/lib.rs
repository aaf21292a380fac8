//! Settings for the `sectionmark` command, stored as TOML in
//! `~/.config/sectionmark/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Word statistics settings, mirrored by the tokenizer's own options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub use_blacklist: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            use_blacklist: true,
        }
    }
}

fn default_note_delimiter() -> String {
    "\n".to_string()
}

fn default_note_extension() -> String {
    "md".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory searched for notes when no files are named on the command line.
    pub notes_path: PathBuf,

    /// Placed between a section's name and its body when tokenizing it.
    #[serde(default = "default_note_delimiter")]
    pub note_delimiter: String,

    #[serde(default = "default_note_extension")]
    pub note_extension: String,

    #[serde(default)]
    pub tokenizer: TokenizerConfig,
}

impl Config {
    pub fn new(notes_path: impl Into<PathBuf>) -> Self {
        Self {
            notes_path: notes_path.into(),
            note_delimiter: default_note_delimiter(),
            note_extension: default_note_extension(),
            tokenizer: TokenizerConfig::default(),
        }
    }

    /// `Ok(None)` when there is no file at `config_path`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        Self::from_toml(&content, config_path).map(Some)
    }

    fn from_toml(content: &str, config_path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config =
            toml::from_str(content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // ~ and $VARS
        config.notes_path = Self::expand_path(&config.notes_path).unwrap_or(config.notes_path);
        Ok(config)
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/sectionmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Note files directly inside `notes_path`, sorted by name.
    pub fn note_files(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.notes_path)? {
            let path = entry?.path();
            let matches = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.note_extension));
            if matches && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        shellexpand::full(&path.to_string_lossy())
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn config_path_is_expanded() {
        let path = Config::config_path();
        let path = path.to_string_lossy();

        assert!(!path.starts_with('~'));
        assert!(path.ends_with(".config/sectionmark/config.toml"));
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let config = Config::from_toml("notes_path = \"/notes\"\n", Path::new("config.toml")).unwrap();

        assert_eq!(config, Config::new("/notes"));
        assert_eq!(config.note_delimiter, "\n");
        assert!(config.tokenizer.lowercase);
        assert!(config.tokenizer.use_blacklist);
    }

    #[test]
    fn partial_tokenizer_section() {
        let content = r#"
notes_path = "/notes"
note_delimiter = " - "

[tokenizer]
use_blacklist = false
"#;
        let config = Config::from_toml(content, Path::new("config.toml")).unwrap();

        assert_eq!(config.note_delimiter, " - ");
        assert_eq!(
            config.tokenizer,
            TokenizerConfig {
                lowercase: true,
                use_blacklist: false,
            }
        );
    }

    #[test]
    fn invalid_toml_names_the_file() {
        let err = Config::from_toml("notes_path = [", Path::new("/etc/broken.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("/etc/broken.toml"));
    }

    #[test]
    fn expands_tilde_and_env_vars() {
        let expanded = Config::expand_path(Path::new("~/notes")).unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("notes"));

        unsafe {
            env::set_var("SECTIONMARK_TEST_ROOT", "/custom/root");
        }
        let content = "notes_path = \"$SECTIONMARK_TEST_ROOT/notes\"\n";
        let config = Config::from_toml(content, Path::new("config.toml")).unwrap();
        assert_eq!(config.notes_path, PathBuf::from("/custom/root/notes"));
        unsafe {
            env::remove_var("SECTIONMARK_TEST_ROOT");
        }
    }

    #[test]
    fn plain_paths_are_unchanged() {
        for path in ["/absolute/path", "relative/path"] {
            assert_eq!(Config::expand_path(Path::new(path)).unwrap(), PathBuf::from(path));
        }
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_path(temp_dir.path().join("nonexistent.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut config = Config::new("/tmp/test-notes");
        config.tokenizer.lowercase = false;
        config.note_delimiter = ": ".to_string();

        config.save_to_path(&config_file).unwrap();
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn lists_note_files() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.md", "a.MD", "skip.txt"] {
            std::fs::write(temp_dir.path().join(name), "# Note\n").unwrap();
        }
        std::fs::create_dir(temp_dir.path().join("dir.md")).unwrap();

        let files = Config::new(temp_dir.path()).note_files().unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name()?.to_str())
            .collect();

        assert_eq!(names, vec!["a.MD", "b.md"]);
    }
}
