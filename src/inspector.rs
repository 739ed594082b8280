use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::catalog::ThemeCatalog;
use crate::check::{check_catalog, Finding};
use crate::config::InspectorConfig;
use crate::error::Result;
use crate::nesting::{blocks_by_section, BlocksBySection};
use crate::placement::{sections_by_page, SectionsByPage};
use crate::scanner::{ThemeFile, ThemeScanner};
use crate::translations::SharedTranslations;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub count: usize,
    pub files: Vec<ThemeFile>,
    pub scanned_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementReport {
    #[serde(flatten)]
    pub report: SectionsByPage,
    pub scanned_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScannedPaths {
    pub sections: PathBuf,
    pub blocks: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NestingReport {
    #[serde(flatten)]
    pub report: BlocksBySection,
    pub scanned_paths: ScannedPaths,
}

/// Entry point for every analysis. Each call re-reads the theme from disk; only the
/// translation table is shared between calls.
#[derive(Debug, Clone)]
pub struct ThemeInspector {
    config: InspectorConfig,
    scanner: ThemeScanner,
    translations: Arc<SharedTranslations>,
}

impl ThemeInspector {
    pub fn new(config: InspectorConfig) -> Self {
        let translations = Arc::new(SharedTranslations::new(config.theme.locale_path()));
        Self::with_translations(config, translations)
    }

    pub fn with_translations(config: InspectorConfig, translations: Arc<SharedTranslations>) -> Self {
        let scanner = ThemeScanner::new(config.theme.clone());
        Self {
            config,
            scanner,
            translations,
        }
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn translations(&self) -> &SharedTranslations {
        &self.translations
    }

    /// Raw listing of every template file under the theme root.
    pub fn scan(&self) -> Result<ScanReport> {
        let files = self.scanner.scan_files()?;
        Ok(ScanReport {
            count: files.len(),
            files,
            scanned_path: self.config.theme.root.clone(),
        })
    }

    pub fn sections_by_page(&self) -> Result<PlacementReport> {
        let sections_path = self.config.theme.sections_path();
        info!("Analyzing sections in: {}", sections_path.display());

        let sections = self.scanner.list_sections()?;
        info!("Found {} section files", sections.len());

        let catalog = ThemeCatalog::build(&sections, &[], self.translations.get());
        let report = sections_by_page(&catalog, &self.config.structural);

        Ok(PlacementReport {
            report,
            scanned_path: sections_path,
        })
    }

    pub fn blocks_by_section(&self) -> Result<NestingReport> {
        let catalog = self.full_catalog()?;
        let report = blocks_by_section(&catalog, self.translations.get());

        Ok(NestingReport {
            report,
            scanned_paths: ScannedPaths {
                sections: self.config.theme.sections_path(),
                blocks: self.config.theme.blocks_path(),
            },
        })
    }

    pub fn check(&self) -> Result<Vec<Finding>> {
        Ok(check_catalog(&self.full_catalog()?))
    }

    fn full_catalog(&self) -> Result<ThemeCatalog> {
        info!("Analyzing sections in: {}", self.config.theme.sections_path().display());
        info!("Analyzing blocks in: {}", self.config.theme.blocks_path().display());

        let sections = self.scanner.list_sections()?;
        let blocks = self.scanner.list_blocks()?;
        info!("Found {} sections and {} blocks", sections.len(), blocks.len());

        Ok(ThemeCatalog::build(&sections, &blocks, self.translations.get()))
    }
}
