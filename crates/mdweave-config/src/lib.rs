use log::{debug, warn};
use mdweave_engine::ext::{
    AsideExtension, StrikethroughExtension, SuperscriptExtension, WikiLinkExtension,
};
use mdweave_engine::{Parser, ParserBuilder, ParserOptions};
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

    #[error("Failed to build parser: {0}")]
    ParserBuildError(#[from] mdweave_engine::ConfigError),
}

/// Contents of `config.toml`:
///
/// ```toml
/// extensions = ["strikethrough", "wikilink"]
///
/// [parser]
/// blank_lines_in_ast = false
///
/// [parser.blocks]
/// indented_code = false
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shipped extensions to enable, by name.
    pub extensions: Vec<String>,
    pub parser: ParserOptions,
}

impl Config {
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

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        debug!("loaded config from {}", config_path.display());

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/mdweave");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Builds a parser from these options with the named extensions applied.
    /// Unknown extension names are logged and skipped.
    pub fn parser(&self) -> Result<Parser, ConfigError> {
        let mut builder = ParserBuilder::new(self.parser.clone());
        for name in &self.extensions {
            builder = match name.as_str() {
                "aside" => builder.with_extension(&AsideExtension),
                "strikethrough" => builder.with_extension(&StrikethroughExtension),
                "superscript" => builder.with_extension(&SuperscriptExtension),
                "wikilink" => builder.with_extension(&WikiLinkExtension),
                other => {
                    warn!("unknown extension {other:?} in config, skipping");
                    builder
                }
            };
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdweave_engine::NodeKind;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/mdweave/config.toml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let mut test_config = Config {
            extensions: vec!["wikilink".to_string()],
            ..Config::default()
        };
        test_config.parser.blank_lines_in_ast = true;
        test_config.parser = test_config.parser.with("wikilink.disabled", true);

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(
            &config_file,
            "[parser]\ncode_block_indent = 8\n\n[parser.blocks]\nhtml_block = false\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.parser.code_block_indent, 8);
        assert!(!config.parser.blocks.html_block);
        assert!(config.parser.blocks.list);
        assert!(config.parser.reference_definitions);
        assert!(config.extensions.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[parser\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_parser_applies_named_extensions() {
        let config = Config {
            extensions: vec!["strikethrough".to_string(), "bogus".to_string()],
            ..Config::default()
        };

        let doc = config.parser().unwrap().parse("a ~~b~~\n");

        let para = doc.tree().children(doc.root())[0];
        let kinds: Vec<&NodeKind> = doc
            .tree()
            .children(para)
            .iter()
            .map(|&c| doc.tree().kind(c))
            .collect();
        assert_eq!(kinds, vec![&NodeKind::Text, &NodeKind::Strikethrough]);
    }
}
