use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Runtime configuration for the inspector, the CLI and the server.
///
/// Layers, lowest priority first: built-in defaults, a TOML file, `THEMELENS__*`
/// environment variables (e.g. `THEMELENS__SERVER__PORT=8080`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InspectorConfig {
    pub theme: ThemeConfig,
    pub structural: StructuralConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    /// Root of the theme tree. Everything else is relative to it.
    pub root: PathBuf,
    pub sections_dir: String,
    pub blocks_dir: String,
    /// Schema translation file holding the `names` table.
    pub locale_file: PathBuf,
    /// Template file extension, without the dot.
    pub extension: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("ThemeFiles"),
            sections_dir: "sections".to_string(),
            blocks_dir: "blocks".to_string(),
            locale_file: PathBuf::from("locales/en.default.schema.json"),
            extension: "liquid".to_string(),
        }
    }
}

impl ThemeConfig {
    pub fn sections_path(&self) -> PathBuf {
        self.root.join(&self.sections_dir)
    }

    pub fn blocks_path(&self) -> PathBuf {
        self.root.join(&self.blocks_dir)
    }

    pub fn locale_path(&self) -> PathBuf {
        self.root.join(&self.locale_file)
    }

    /// `.liquid` style suffix used to strip file names down to template names.
    pub fn dotted_extension(&self) -> String {
        format!(".{}", self.extension)
    }
}

/// Sections that always render in main content (page bodies, password page, the
/// header/footer shells). They count as available in `main` without presets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StructuralConfig {
    pub prefixes: Vec<String>,
    pub names: Vec<String>,
}

impl Default for StructuralConfig {
    fn default() -> Self {
        Self {
            prefixes: vec!["main-".to_string()],
            names: vec![
                "password".to_string(),
                "header".to_string(),
                "footer".to_string(),
            ],
        }
    }
}

impl StructuralConfig {
    pub fn is_structural(&self, section_name: &str) -> bool {
        self.prefixes.iter().any(|p| section_name.starts_with(p.as_str()))
            || self.names.iter().any(|n| n == section_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl InspectorConfig {
    /// Load configuration. An explicit `path` must exist; otherwise the platform
    /// config file is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&InspectorConfig::default())?);

        match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(default_path) = Self::default_path() {
                    debug!("Looking for configuration at {}", default_path.display());
                    builder = builder.add_source(config::File::from(default_path).required(false));
                }
            }
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("THEMELENS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "themelens")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.theme.root = root.into();
        self
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::error::ThemeError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        let config = InspectorConfig::default().with_root("/theme");
        assert_eq!(config.theme.sections_path(), PathBuf::from("/theme/sections"));
        assert_eq!(config.theme.blocks_path(), PathBuf::from("/theme/blocks"));
        assert_eq!(
            config.theme.locale_path(),
            PathBuf::from("/theme/locales/en.default.schema.json")
        );
        assert_eq!(config.theme.dotted_extension(), ".liquid");
    }

    #[test]
    fn test_structural_templates() {
        let structural = StructuralConfig::default();
        assert!(structural.is_structural("main-product"));
        assert!(structural.is_structural("password"));
        assert!(structural.is_structural("header"));
        assert!(structural.is_structural("footer"));
        assert!(!structural.is_structural("hero"));
        assert!(!structural.is_structural("product-main"));
    }

    #[test]
    fn test_load_from_toml_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("themelens.toml");
        fs::write(
            &path,
            r#"
[theme]
root = "/srv/theme"

[structural]
names = ["password", "custom-shell"]

[server]
port = 8080
"#,
        )
        .unwrap();

        let config = InspectorConfig::load(Some(&path)).unwrap();
        assert_eq!(config.theme.root, PathBuf::from("/srv/theme"));
        assert_eq!(config.theme.sections_dir, "sections");
        assert_eq!(config.structural.prefixes, vec!["main-".to_string()]);
        assert!(config.structural.is_structural("custom-shell"));
        assert!(!config.structural.is_structural("header"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = InspectorConfig::load(Some(&dir.path().join("missing.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_to_toml_round_trips_through_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.toml");
        let config = InspectorConfig::default().with_root("/x");
        fs::write(&path, config.to_toml().unwrap()).unwrap();
        let loaded = InspectorConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }
}
