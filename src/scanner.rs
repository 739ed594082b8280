use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::ThemeConfig;
use crate::error::{Result, ThemeError};
use crate::naming::compare_display_names;
use crate::schema::{extract_schema, SchemaExtraction, ThemeSchema};

/// Marker a section renders when it hosts theme blocks.
pub const THEME_BLOCKS_TAG: &str = "{% content_for 'blocks' %}";

/// Entry of the raw file listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFile {
    pub name: String,
    pub path: PathBuf,
    pub relative_path: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    /// Parent directory relative to the root, `root` for top-level files.
    pub directory: String,
    pub has_schema: bool,
    /// `None` when the schema is missing or malformed.
    pub schema: Option<Value>,
    pub schema_raw: Option<String>,
    pub schema_error: Option<String>,
}

/// A template file from one collection directory, with its raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSource {
    /// File name without extension.
    pub name: String,
    pub file: String,
    pub path: PathBuf,
    /// `None` when the file could not be read.
    pub content: Option<String>,
}

impl TemplateSource {
    pub fn new(name: impl Into<String>, file: impl Into<String>, content: impl Into<String>) -> Self {
        let file = file.into();
        Self {
            name: name.into(),
            path: PathBuf::from(&file),
            file,
            content: Some(content.into()),
        }
    }

    pub fn extraction(&self) -> SchemaExtraction {
        match &self.content {
            Some(content) => extract_schema(content),
            None => SchemaExtraction::Missing,
        }
    }

    /// Typed schema, logging malformed payloads.
    pub fn schema(&self) -> Option<ThemeSchema> {
        match self.extraction() {
            SchemaExtraction::Parsed { value, .. } => ThemeSchema::from_value(value),
            SchemaExtraction::Invalid { message, .. } => {
                warn!("Error parsing schema from {}: {}", self.path.display(), message);
                None
            }
            SchemaExtraction::Missing => None,
        }
    }

    pub fn renders_theme_blocks(&self) -> bool {
        self.content
            .as_deref()
            .is_some_and(|c| c.contains(THEME_BLOCKS_TAG))
    }
}

/// Discovers template files under a theme root.
#[derive(Debug, Clone)]
pub struct ThemeScanner {
    config: ThemeConfig,
}

impl ThemeScanner {
    pub fn new(config: ThemeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    /// Recursive listing of every template file under the root, sorted by relative path.
    pub fn scan_files(&self) -> Result<Vec<ThemeFile>> {
        let root = &self.config.root;
        info!("Scanning directory: {}", root.display());

        fs::read_dir(root).map_err(|source| ThemeError::RootUnreadable {
            path: root.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error scanning directory entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.has_template_extension(entry.path()) {
                continue;
            }

            if let Some(file) = self.describe_file(entry.path()) {
                files.push(file);
            }
        }

        files.sort_by(|a, b| compare_display_names(&a.relative_path, &b.relative_path));
        info!("Found {} template files", files.len());
        Ok(files)
    }

    /// Template files directly inside `dir`, sorted by file name. Fails only when
    /// `dir` itself cannot be listed.
    pub fn list_templates(&self, dir: &Path) -> Result<Vec<TemplateSource>> {
        let entries = fs::read_dir(dir).map_err(|source| ThemeError::RootUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut templates = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error reading entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !self.has_template_extension(&path) {
                continue;
            }

            let file = entry.file_name().to_string_lossy().into_owned();
            let name = self.template_name(&file);
            let content = match fs::read_to_string(&path) {
                Ok(content) => Some(content),
                Err(e) => {
                    warn!("Error reading file {}: {}", path.display(), e);
                    None
                }
            };

            debug!("Discovered template {}", file);
            templates.push(TemplateSource {
                name,
                file,
                path,
                content,
            });
        }

        templates.sort_by(|a, b| a.file.cmp(&b.file));
        Ok(templates)
    }

    pub fn list_sections(&self) -> Result<Vec<TemplateSource>> {
        self.list_templates(&self.config.sections_path())
    }

    pub fn list_blocks(&self) -> Result<Vec<TemplateSource>> {
        self.list_templates(&self.config.blocks_path())
    }

    fn has_template_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.config.extension)
    }

    fn template_name(&self, file: &str) -> String {
        file.strip_suffix(&self.config.dotted_extension())
            .unwrap_or(file)
            .to_string()
    }

    fn describe_file(&self, path: &Path) -> Option<ThemeFile> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Error reading metadata for {}: {}", path.display(), e);
                return None;
            }
        };

        let relative = path.strip_prefix(&self.config.root).unwrap_or(path);
        let relative_path = relative.to_string_lossy().into_owned();
        let directory = match relative.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
            _ => "root".to_string(),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let last_modified = metadata.modified().ok().map(DateTime::<Utc>::from);

        let extraction = match fs::read_to_string(path) {
            Ok(content) => extract_schema(&content),
            Err(e) => {
                warn!("Error reading file {}: {}", path.display(), e);
                SchemaExtraction::Missing
            }
        };

        if let Some(message) = extraction.error() {
            warn!("Invalid schema JSON in {}: {}", relative_path, message);
        }

        Some(ThemeFile {
            name,
            path: path.to_path_buf(),
            relative_path,
            size: metadata.len(),
            last_modified,
            directory,
            has_schema: extraction.has_block(),
            schema_raw: extraction.raw().map(str::to_string),
            schema_error: extraction.error().map(str::to_string),
            schema: extraction.into_value(),
        })
    }
}

/// Group a listing by its `directory` field.
pub fn group_files_by_directory(files: &[ThemeFile]) -> BTreeMap<String, Vec<&ThemeFile>> {
    let mut groups: BTreeMap<String, Vec<&ThemeFile>> = BTreeMap::new();
    for file in files {
        groups.entry(file.directory.clone()).or_default().push(file);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scanner_for(dir: &TempDir) -> ThemeScanner {
        ThemeScanner::new(ThemeConfig {
            root: dir.path().to_path_buf(),
            ..ThemeConfig::default()
        })
    }

    #[test]
    fn test_scan_files_lists_templates_recursively() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "layout/theme.liquid", "<html></html>");
        write(dir.path(), "sections/hero.liquid", "{% schema %}{\"name\":\"Hero\"}{% endschema %}");
        write(dir.path(), "blocks/_icon.liquid", "{% schema %}{ broken {% endschema %}");
        write(dir.path(), "snippet.liquid", "top level");
        write(dir.path(), "locales/en.default.schema.json", "{}");

        let files = scanner_for(&dir).scan_files().unwrap();
        let relative: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(
            relative,
            vec!["blocks/_icon.liquid", "layout/theme.liquid", "sections/hero.liquid", "snippet.liquid"]
        );

        let icon = &files[0];
        assert_eq!(icon.name, "_icon.liquid");
        assert_eq!(icon.directory, "blocks");
        assert!(icon.has_schema);
        assert!(icon.schema.is_none());
        assert!(icon.schema_error.is_some());
        assert_eq!(icon.schema_raw.as_deref(), Some("{ broken"));

        let hero = &files[2];
        assert!(hero.has_schema);
        assert_eq!(hero.schema.as_ref().unwrap()["name"], "Hero");
        assert!(hero.last_modified.is_some());

        let snippet = &files[3];
        assert_eq!(snippet.directory, "root");
        assert!(!snippet.has_schema);
        assert_eq!(snippet.size, "top level".len() as u64);
    }

    #[test]
    fn test_scan_files_unreadable_root() {
        let dir = TempDir::new().unwrap();
        let scanner = ThemeScanner::new(ThemeConfig {
            root: dir.path().join("missing"),
            ..ThemeConfig::default()
        });
        let err = scanner.scan_files().unwrap_err();
        assert!(matches!(err, ThemeError::RootUnreadable { .. }));
    }

    #[test]
    fn test_list_templates_is_flat_and_sorted() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sections/slideshow.liquid", "");
        write(dir.path(), "sections/announcement-bar.liquid", "");
        write(dir.path(), "sections/header-group.json", "{}");
        write(dir.path(), "sections/nested/deep.liquid", "");

        let sections = scanner_for(&dir).list_sections().unwrap();
        let names: Vec<_> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["announcement-bar", "slideshow"]);
        assert_eq!(sections[0].file, "announcement-bar.liquid");
        assert_eq!(sections[0].content.as_deref(), Some(""));
    }

    #[test]
    fn test_list_blocks_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        assert!(scanner_for(&dir).list_blocks().is_err());
    }

    #[test]
    fn test_template_source_schema_and_container_flag() {
        let source = TemplateSource::new(
            "section",
            "section.liquid",
            "<div>{% content_for 'blocks' %}</div>{% schema %}{\"blocks\":[{\"type\":\"@theme\"}]}{% endschema %}",
        );
        assert!(source.renders_theme_blocks());
        assert!(source.schema().unwrap().accepts_theme_blocks());

        let broken = TemplateSource::new("x", "x.liquid", "{% schema %}nope{% endschema %}");
        assert!(broken.schema().is_none());
        assert!(!broken.renders_theme_blocks());
    }

    #[test]
    fn test_group_files_by_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sections/a.liquid", "");
        write(dir.path(), "sections/b.liquid", "");
        write(dir.path(), "blocks/c.liquid", "");

        let files = scanner_for(&dir).scan_files().unwrap();
        let groups = group_files_by_directory(&files);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["sections"].len(), 2);
        assert_eq!(groups["blocks"].len(), 1);
    }
}
